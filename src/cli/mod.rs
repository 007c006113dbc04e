//! Command layer behind the `prpo` binary: parse a command line, run it against the
//! gateway using the stored session, and hand back renderable output.

pub mod output;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::api::GatewayClient;
use crate::fanout::fan_out2;
use crate::model::{
    BookingStatus, CreateBookingPayload, CreateCalendarEventPayload, NotificationRequest, PaymentCheckoutRequest,
};
use crate::session::{Identity, SessionProvider};

pub use output::{render, Output};

pub const USAGE: &str = "Usage:
  prpo [--json] [--origin <url>] [--state-dir <dir>] <command> [args...]

Session:
  login <username> <password>            log in and remember the identity
  register <username> <email> <password> create an account
  logout                                 forget the stored identity
  whoami                                 show the stored identity

Facilities:
  facilities [--available | --type <T>]  list facilities
  facility <id>                          show one facility

Bookings (logged in):
  bookings [upcoming|past]               list my bookings
  booking <id>                           show one of my bookings
  book <facilityId> <start> <end> [notes]
  status <bookingId> <PENDING|CONFIRMED|CANCELLED|COMPLETED>
  cancel <bookingId>
  dashboard                              facilities and my bookings together

Calendar:
  events [userId]                        calendar events (default: me)
  event-create <bookingId> <facilityId> <title> <start> <end>

Payments:
  checkout <bookingId> <amount> [currency]   (currency defaults to EUR)
  pay <sessionId>                        complete a mock checkout
  pay-fail <sessionId> [reason]          fail a mock checkout
  payments                               my payments

Notifications:
  notify <recipient> <subject> <content> [type] [channel]
  notifications                          my notifications

Environment:
  PRPO_ORIGIN, PRPO_{AUTH,FACILITY,BOOKING,CALENDAR,PAYMENT,NOTIFICATION}_API,
  PRPO_STATE_DIR (default .prpo), RUST_LOG";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: String, password: String },
    Register { username: String, email: String, password: String },
    Logout,
    WhoAmI,
    Facilities { filter: FacilityFilter },
    Facility { id: i64 },
    Bookings { scope: BookingScope },
    Booking { id: i64 },
    Book { facility_id: i64, start: String, end: String, notes: Option<String> },
    Status { booking_id: i64, status: BookingStatus },
    Cancel { booking_id: i64 },
    Dashboard,
    Events { user_id: Option<i64> },
    EventCreate { booking_id: i64, facility_id: i64, title: String, start: String, end: String },
    Checkout { booking_id: i64, amount: f64, currency: String },
    Pay { session_id: String },
    PayFail { session_id: String, reason: Option<String> },
    Payments,
    Notify { recipient: String, subject: String, content: String, kind: String, channel: String },
    Notifications,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FacilityFilter {
    All,
    Available,
    Type(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    All,
    Upcoming,
    Past,
}

/// Flags accepted ahead of the command word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    pub json: bool,
    pub help: bool,
    pub origin: Option<String>,
    pub state_dir: Option<String>,
}

/// Split leading global flags from `<command> [args...]`. Everything from the command
/// word on is passed through untouched, so a positional value may look like a flag.
pub fn split_global_flags(args: Vec<String>) -> Result<(GlobalFlags, Vec<String>)> {
    let mut flags = GlobalFlags::default();
    let mut it = args.into_iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--json" => flags.json = true,
            "-h" | "--help" => flags.help = true,
            "--origin" => flags.origin = Some(it.next().ok_or_else(|| anyhow!("--origin requires a URL"))?),
            "--state-dir" => {
                flags.state_dir = Some(it.next().ok_or_else(|| anyhow!("--state-dir requires a path"))?)
            }
            _ => {
                let mut rest = vec![a];
                rest.extend(it);
                return Ok((flags, rest));
            }
        }
    }
    Ok((flags, Vec::new()))
}

fn arg<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i).map(String::as_str).ok_or_else(|| anyhow!("missing <{}>", name))
}

fn id_arg(args: &[String], i: usize, name: &str) -> Result<i64> {
    let raw = arg(args, i, name)?;
    raw.parse::<i64>().with_context(|| format!("<{}> must be an integer, got '{}'", name, raw))
}

fn opt_arg(args: &[String], i: usize) -> Option<String> { args.get(i).cloned() }

/// Parse `<command> [args...]` (global flags already stripped).
pub fn parse_command(args: &[String]) -> Result<Command> {
    let (head, rest) = args.split_first().ok_or_else(|| anyhow!("no command given"))?;
    let cmd = match head.as_str() {
        "login" => Command::Login { username: arg(rest, 0, "username")?.into(), password: arg(rest, 1, "password")?.into() },
        "register" => Command::Register {
            username: arg(rest, 0, "username")?.into(),
            email: arg(rest, 1, "email")?.into(),
            password: arg(rest, 2, "password")?.into(),
        },
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "facilities" => {
            let filter = match rest.first().map(String::as_str) {
                None => FacilityFilter::All,
                Some("--available") => FacilityFilter::Available,
                Some("--type") => FacilityFilter::Type(arg(rest, 1, "type")?.into()),
                Some(other) => bail!("unknown facilities option '{}'", other),
            };
            Command::Facilities { filter }
        }
        "facility" => Command::Facility { id: id_arg(rest, 0, "id")? },
        "bookings" => {
            let scope = match rest.first().map(String::as_str) {
                None => BookingScope::All,
                Some("upcoming") => BookingScope::Upcoming,
                Some("past") => BookingScope::Past,
                Some(other) => bail!("unknown bookings scope '{}'", other),
            };
            Command::Bookings { scope }
        }
        "booking" => Command::Booking { id: id_arg(rest, 0, "id")? },
        "book" => Command::Book {
            facility_id: id_arg(rest, 0, "facilityId")?,
            start: arg(rest, 1, "start")?.into(),
            end: arg(rest, 2, "end")?.into(),
            notes: opt_arg(rest, 3),
        },
        "status" => {
            let raw = arg(rest, 1, "status")?;
            Command::Status {
                booking_id: id_arg(rest, 0, "bookingId")?,
                status: raw.parse::<BookingStatus>().map_err(|e| anyhow!(e))?,
            }
        }
        "cancel" => Command::Cancel { booking_id: id_arg(rest, 0, "bookingId")? },
        "dashboard" => Command::Dashboard,
        "events" => Command::Events { user_id: if rest.is_empty() { None } else { Some(id_arg(rest, 0, "userId")?) } },
        "event-create" => Command::EventCreate {
            booking_id: id_arg(rest, 0, "bookingId")?,
            facility_id: id_arg(rest, 1, "facilityId")?,
            title: arg(rest, 2, "title")?.into(),
            start: arg(rest, 3, "start")?.into(),
            end: arg(rest, 4, "end")?.into(),
        },
        "checkout" => {
            let raw = arg(rest, 1, "amount")?;
            Command::Checkout {
                booking_id: id_arg(rest, 0, "bookingId")?,
                amount: raw.parse::<f64>().with_context(|| format!("<amount> must be a number, got '{}'", raw))?,
                currency: opt_arg(rest, 2).unwrap_or_else(|| "EUR".to_string()),
            }
        }
        "pay" => Command::Pay { session_id: arg(rest, 0, "sessionId")?.into() },
        "pay-fail" => Command::PayFail { session_id: arg(rest, 0, "sessionId")?.into(), reason: opt_arg(rest, 1) },
        "payments" => Command::Payments,
        "notify" => Command::Notify {
            recipient: arg(rest, 0, "recipient")?.into(),
            subject: arg(rest, 1, "subject")?.into(),
            content: arg(rest, 2, "content")?.into(),
            kind: opt_arg(rest, 3).unwrap_or_else(|| "BOOKING_CONFIRMATION".to_string()),
            channel: opt_arg(rest, 4).unwrap_or_else(|| "EMAIL".to_string()),
        },
        "notifications" => Command::Notifications,
        other => bail!("unknown command '{}'", other),
    };
    Ok(cmd)
}

fn require_user(session: &dyn SessionProvider) -> Result<Identity> {
    session.load().ok_or_else(|| anyhow!("not logged in"))
}

fn to_value<T: Serialize>(v: &T) -> Result<Value> { serde_json::to_value(v).context("encode output") }

fn rows<T: Serialize>(v: &T) -> Result<Output> { Ok(Output::Rows(to_value(v)?)) }

fn record<T: Serialize>(v: &T) -> Result<Output> { Ok(Output::Record(to_value(v)?)) }

/// Run one command. User-scoped calls go out with the stored identity's bearer token
/// attached, alongside the `X-User-Id` header the services authorize on.
pub async fn execute(cmd: Command, client: &GatewayClient, session: &dyn SessionProvider) -> Result<Output> {
    match cmd {
        Command::Login { username, password } => {
            let resp = client.login(&username, &password).await?;
            let identity = Identity::from(resp);
            session.save(&identity).context("store session")?;
            tracing::info!(user_id = identity.id, "logged in");
            Ok(Output::Message(format!("logged in as {} (id {})", identity.username, identity.id)))
        }
        Command::Register { username, email, password } => {
            let resp = client.register(&username, &email, &password).await?;
            record(&resp)
        }
        Command::Logout => {
            session.clear().context("clear session")?;
            Ok(Output::Message("logged out".to_string()))
        }
        Command::WhoAmI => match session.load() {
            Some(identity) => record(&Identity { token: identity.token.map(|_| "<redacted>".to_string()), ..identity }),
            None => Ok(Output::Message("not logged in".to_string())),
        },
        Command::Facilities { filter } => match filter {
            FacilityFilter::All => rows(&client.fetch_facilities().await?),
            FacilityFilter::Available => rows(&client.fetch_available_facilities().await?),
            FacilityFilter::Type(t) => rows(&client.fetch_facilities_by_type(&t).await?),
        },
        Command::Facility { id } => record(&client.fetch_facility(id).await?),
        Command::Bookings { scope } => {
            let me = require_user(session)?;
            let c = client.for_identity(&me);
            match scope {
                BookingScope::All => rows(&c.fetch_my_bookings(me.id).await?),
                BookingScope::Upcoming => rows(&c.fetch_upcoming_bookings(me.id).await?),
                BookingScope::Past => rows(&c.fetch_past_bookings(me.id).await?),
            }
        }
        Command::Booking { id } => {
            let me = require_user(session)?;
            record(&client.for_identity(&me).fetch_booking(me.id, id).await?)
        }
        Command::Book { facility_id, start, end, notes } => {
            let me = require_user(session)?;
            let payload = CreateBookingPayload { facility_id, start_time: start, end_time: end, notes };
            record(&client.for_identity(&me).create_booking(me.id, &payload).await?)
        }
        Command::Status { booking_id, status } => {
            let me = require_user(session)?;
            record(&client.for_identity(&me).update_booking_status(me.id, booking_id, status).await?)
        }
        Command::Cancel { booking_id } => {
            let me = require_user(session)?;
            client.for_identity(&me).cancel_booking(me.id, booking_id).await?;
            Ok(Output::Message(format!("booking {} cancelled", booking_id)))
        }
        Command::Dashboard => {
            let me = require_user(session)?;
            let c = client.for_identity(&me);
            let (facilities, bookings) = fan_out2(c.fetch_facilities(), c.fetch_my_bookings(me.id)).await?;
            Ok(Output::Record(serde_json::json!({
                "user": me.username,
                "facilities": to_value(&facilities)?,
                "bookings": to_value(&bookings)?,
            })))
        }
        Command::Events { user_id } => {
            let uid = match user_id {
                Some(u) => u,
                None => require_user(session)?.id,
            };
            rows(&client.fetch_calendar_events_by_user(uid).await?)
        }
        Command::EventCreate { booking_id, facility_id, title, start, end } => {
            let me = require_user(session)?;
            let payload = CreateCalendarEventPayload {
                booking_id,
                user_id: me.id,
                facility_id,
                title,
                location: None,
                description: None,
                start_time: start,
                end_time: end,
            };
            record(&client.for_identity(&me).create_calendar_event(&payload).await?)
        }
        Command::Checkout { booking_id, amount, currency } => {
            let me = require_user(session)?;
            let payload = PaymentCheckoutRequest { booking_id, user_id: me.id, amount, currency };
            record(&client.for_identity(&me).create_payment_checkout(&payload).await?)
        }
        Command::Pay { session_id } => Ok(Output::Message(client.complete_payment_mock(&session_id).await?)),
        Command::PayFail { session_id, reason } => {
            Ok(Output::Message(client.fail_payment_mock(&session_id, reason.as_deref()).await?))
        }
        Command::Payments => {
            let me = require_user(session)?;
            rows(&client.for_identity(&me).fetch_payments_by_user(me.id).await?)
        }
        Command::Notify { recipient, subject, content, kind, channel } => {
            let me = require_user(session)?;
            let payload = NotificationRequest {
                user_id: me.id,
                booking_id: None,
                payment_id: None,
                event_id: None,
                kind,
                channel,
                recipient,
                subject,
                content,
            };
            client.for_identity(&me).send_notification(&payload).await?;
            Ok(Output::Message("notification sent".to_string()))
        }
        Command::Notifications => {
            let me = require_user(session)?;
            rows(&client.for_identity(&me).fetch_notifications_by_user(me.id).await?)
        }
    }
}

/// Parse, execute and render in one step.
pub async fn run(args: &[String], client: &GatewayClient, session: &dyn SessionProvider, force_json: bool) -> Result<String> {
    let cmd = parse_command(args)?;
    tracing::debug!(command = args.first().map(String::as_str).unwrap_or(""), "cli.run");
    let out = execute(cmd, client, session).await?;
    Ok(render(&out, force_json))
}
