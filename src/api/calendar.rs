use reqwest::Method;

use super::{call_json, GatewayClient};
use crate::config::Domain;
use crate::error::ClientResult;
use crate::model::{CalendarEvent, CreateCalendarEventPayload};

impl GatewayClient {
    #[tracing::instrument(skip(self))]
    pub async fn fetch_calendar_events_by_user(&self, user_id: i64) -> ClientResult<Vec<CalendarEvent>> {
        let rb = self.request(Method::GET, Domain::Calendar, &format!("/events/user/{}", user_id));
        call_json("fetch_calendar_events_by_user", "Failed to load calendar events", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_upcoming_calendar_events(&self, user_id: i64) -> ClientResult<Vec<CalendarEvent>> {
        let rb = self.request(Method::GET, Domain::Calendar, &format!("/events/user/{}/upcoming", user_id));
        call_json("fetch_upcoming_calendar_events", "Failed to load upcoming calendar events", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_calendar_event_by_booking(&self, booking_id: i64) -> ClientResult<CalendarEvent> {
        let rb = self.request(Method::GET, Domain::Calendar, &format!("/events/booking/{}", booking_id));
        call_json("fetch_calendar_event_by_booking", "Failed to load calendar event", rb).await
    }

    #[tracing::instrument(skip(self, payload), fields(booking_id = payload.booking_id))]
    pub async fn create_calendar_event(&self, payload: &CreateCalendarEventPayload) -> ClientResult<CalendarEvent> {
        let rb = self.request(Method::POST, Domain::Calendar, "/events").json(payload);
        call_json("create_calendar_event", "Create calendar event failed", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_calendar_event(&self, event_id: i64) -> ClientResult<CalendarEvent> {
        let rb = self.request(Method::POST, Domain::Calendar, &format!("/events/{}/cancel", event_id));
        call_json("cancel_calendar_event", "Cancel calendar event failed", rb).await
    }
}
