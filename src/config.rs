//! Per-service base URLs.
//!
//! Each backend domain can be pointed at its own service instance through an
//! environment override; anything left unset falls back to `<origin>/api/<domain>`.
//! Endpoints are resolved once at startup and never mutated afterwards.

use std::fmt::{Display, Formatter};

pub const ORIGIN_ENV: &str = "PRPO_ORIGIN";
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Auth,
    Facility,
    Booking,
    Calendar,
    Payment,
    Notification,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Auth,
        Domain::Facility,
        Domain::Booking,
        Domain::Calendar,
        Domain::Payment,
        Domain::Notification,
    ];

    pub fn default_path(&self) -> &'static str {
        match self {
            Domain::Auth => "/api/auth",
            Domain::Facility => "/api/facilities",
            Domain::Booking => "/api/bookings",
            Domain::Calendar => "/api/calendar",
            Domain::Payment => "/api/payments",
            Domain::Notification => "/api/notifications",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Domain::Auth => "PRPO_AUTH_API",
            Domain::Facility => "PRPO_FACILITY_API",
            Domain::Booking => "PRPO_BOOKING_API",
            Domain::Calendar => "PRPO_CALENDAR_API",
            Domain::Payment => "PRPO_PAYMENT_API",
            Domain::Notification => "PRPO_NOTIFICATION_API",
        }
    }

    fn index(&self) -> usize {
        match self {
            Domain::Auth => 0,
            Domain::Facility => 1,
            Domain::Booking => 2,
            Domain::Calendar => 3,
            Domain::Payment => 4,
            Domain::Notification => 5,
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Domain::Auth => "auth",
            Domain::Facility => "facility",
            Domain::Booking => "booking",
            Domain::Calendar => "calendar",
            Domain::Payment => "payment",
            Domain::Notification => "notification",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    bases: [String; 6],
}

fn normalize(url: &str) -> String { url.trim().trim_end_matches('/').to_string() }

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl ServiceEndpoints {
    /// Every domain under its default path on one origin.
    pub fn from_origin(origin: &str) -> Self {
        let origin = normalize(origin);
        let bases = Domain::ALL.map(|d| format!("{}{}", origin, d.default_path()));
        Self { bases }
    }

    /// Resolve the origin and the six overrides through `lookup` (an env-like source).
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let origin = non_blank(lookup(ORIGIN_ENV)).unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        let mut eps = Self::from_origin(&origin);
        for d in Domain::ALL {
            if let Some(v) = non_blank(lookup(d.env_var())) {
                eps = eps.with_override(d, &v);
            }
        }
        eps
    }

    pub fn from_env() -> Self {
        let eps = Self::from_lookup(|k| std::env::var(k).ok());
        for d in Domain::ALL {
            tracing::debug!(domain = %d, base = eps.base(d), "service endpoint");
        }
        eps
    }

    pub fn with_override(mut self, domain: Domain, url: &str) -> Self {
        self.bases[domain.index()] = normalize(url);
        self
    }

    pub fn base(&self, domain: Domain) -> &str { &self.bases[domain.index()] }

    /// `base + path`; an empty path addresses the collection root itself.
    pub fn url(&self, domain: Domain, path: &str) -> String {
        format!("{}{}", self.base(domain), path)
    }
}

impl Default for ServiceEndpoints {
    fn default() -> Self { Self::from_origin(DEFAULT_ORIGIN) }
}
