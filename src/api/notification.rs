use reqwest::Method;

use super::{call_json, GatewayClient};
use crate::config::Domain;
use crate::error::ClientResult;
use crate::model::{NotificationReceipt, NotificationRequest};

impl GatewayClient {
    /// Fire-and-forget send; the receipt is only an acknowledgement.
    #[tracing::instrument(skip(self, payload), fields(user_id = payload.user_id, channel = %payload.channel))]
    pub async fn send_notification(&self, payload: &NotificationRequest) -> ClientResult<NotificationReceipt> {
        let rb = self.request(Method::POST, Domain::Notification, "").json(payload);
        call_json("send_notification", "Send notification failed", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_notifications_by_user(&self, user_id: i64) -> ClientResult<Vec<NotificationReceipt>> {
        let rb = self.request(Method::GET, Domain::Notification, &format!("/user/{}", user_id));
        call_json("fetch_notifications_by_user", "Failed to load notifications", rb).await
    }
}
