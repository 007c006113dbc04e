//! Booking service calls. All of them are scoped to the acting user through the
//! `X-User-Id` header.

use reqwest::Method;

use super::{call_json, dispatch, GatewayClient};
use crate::config::Domain;
use crate::error::ClientResult;
use crate::model::{Booking, BookingStatus, CreateBookingPayload, UpdateBookingStatusRequest};

impl GatewayClient {
    #[tracing::instrument(skip(self))]
    pub async fn fetch_my_bookings(&self, user_id: i64) -> ClientResult<Vec<Booking>> {
        let rb = self.user_request(Method::GET, Domain::Booking, "/my", user_id);
        call_json("fetch_my_bookings", "Failed to load bookings", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_upcoming_bookings(&self, user_id: i64) -> ClientResult<Vec<Booking>> {
        let rb = self.user_request(Method::GET, Domain::Booking, "/my/upcoming", user_id);
        call_json("fetch_upcoming_bookings", "Failed to load upcoming bookings", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_past_bookings(&self, user_id: i64) -> ClientResult<Vec<Booking>> {
        let rb = self.user_request(Method::GET, Domain::Booking, "/my/past", user_id);
        call_json("fetch_past_bookings", "Failed to load past bookings", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_booking(&self, user_id: i64, booking_id: i64) -> ClientResult<Booking> {
        let rb = self.user_request(Method::GET, Domain::Booking, &format!("/{}", booking_id), user_id);
        call_json("fetch_booking", "Failed to load booking", rb).await
    }

    /// `POST {booking}` with the payload as the body, unchanged.
    #[tracing::instrument(skip(self, payload), fields(facility_id = payload.facility_id))]
    pub async fn create_booking(&self, user_id: i64, payload: &CreateBookingPayload) -> ClientResult<Booking> {
        let rb = self.user_request(Method::POST, Domain::Booking, "", user_id).json(payload);
        call_json("create_booking", "Create booking failed", rb).await
    }

    /// `PATCH {booking}/{id}/status`; repeating the same status is harmless.
    #[tracing::instrument(skip(self))]
    pub async fn update_booking_status(
        &self,
        user_id: i64,
        booking_id: i64,
        status: BookingStatus,
    ) -> ClientResult<Booking> {
        let rb = self
            .user_request(Method::PATCH, Domain::Booking, &format!("/{}/status", booking_id), user_id)
            .json(&UpdateBookingStatusRequest { status });
        call_json("update_booking_status", "Update booking status failed", rb).await
    }

    /// `DELETE {booking}/{id}`; the service answers 204.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_booking(&self, user_id: i64, booking_id: i64) -> ClientResult<()> {
        let rb = self.user_request(Method::DELETE, Domain::Booking, &format!("/{}", booking_id), user_id);
        dispatch("cancel_booking", "Cancel booking failed", rb).await?;
        Ok(())
    }
}
