use reqwest::Method;

use super::{call_json, dispatch, read_text, segment, GatewayClient};
use crate::config::Domain;
use crate::error::ClientResult;
use crate::model::{Payment, PaymentCheckout, PaymentCheckoutRequest};

impl GatewayClient {
    #[tracing::instrument(skip(self, payload), fields(booking_id = payload.booking_id))]
    pub async fn create_payment_checkout(&self, payload: &PaymentCheckoutRequest) -> ClientResult<PaymentCheckout> {
        let rb = self.request(Method::POST, Domain::Payment, "/checkout").json(payload);
        call_json("create_payment_checkout", "Payment checkout failed", rb).await
    }

    /// Demo-only transition of a checkout session to completed. The service answers
    /// with plain text, returned as-is.
    #[tracing::instrument(skip(self))]
    pub async fn complete_payment_mock(&self, session_id: &str) -> ClientResult<String> {
        let rb = self.request(Method::POST, Domain::Payment, &format!("/mock/{}/complete", segment(session_id)));
        let resp = dispatch("complete_payment_mock", "Mock completion failed", rb).await?;
        read_text("complete_payment_mock", resp).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fail_payment_mock(&self, session_id: &str, reason: Option<&str>) -> ClientResult<String> {
        let mut rb = self.request(Method::POST, Domain::Payment, &format!("/mock/{}/fail", segment(session_id)));
        if let Some(reason) = reason {
            rb = rb.query(&[("reason", reason)]);
        }
        let resp = dispatch("fail_payment_mock", "Mock failure failed", rb).await?;
        read_text("fail_payment_mock", resp).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_payments_by_user(&self, user_id: i64) -> ClientResult<Vec<Payment>> {
        let rb = self.request(Method::GET, Domain::Payment, &format!("/user/{}", user_id));
        call_json("fetch_payments_by_user", "Failed to load payments", rb).await
    }
}
