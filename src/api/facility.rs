use reqwest::Method;

use super::{call_json, segment, GatewayClient};
use crate::config::Domain;
use crate::error::ClientResult;
use crate::model::Facility;

impl GatewayClient {
    #[tracing::instrument(skip(self))]
    pub async fn fetch_facilities(&self) -> ClientResult<Vec<Facility>> {
        let rb = self.request(Method::GET, Domain::Facility, "");
        call_json("fetch_facilities", "Failed to load facilities", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_facility(&self, facility_id: i64) -> ClientResult<Facility> {
        let rb = self.request(Method::GET, Domain::Facility, &format!("/{}", facility_id));
        call_json("fetch_facility", "Failed to load facility", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_available_facilities(&self) -> ClientResult<Vec<Facility>> {
        let rb = self.request(Method::GET, Domain::Facility, "/available");
        call_json("fetch_available_facilities", "Failed to load available facilities", rb).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_facilities_by_type(&self, kind: &str) -> ClientResult<Vec<Facility>> {
        let rb = self.request(Method::GET, Domain::Facility, &format!("/type/{}", segment(kind)));
        call_json("fetch_facilities_by_type", "Failed to load facilities by type", rb).await
    }
}
