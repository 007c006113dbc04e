use reqwest::Method;
use serde_json::json;

use super::{call_json, GatewayClient};
use crate::config::Domain;
use crate::error::ClientResult;
use crate::model::{LoginResponse, RegisterResponse};

impl GatewayClient {
    /// `POST {auth}/login`
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let rb = self
            .request(Method::POST, Domain::Auth, "/login")
            .json(&json!({ "username": username, "password": password }));
        call_json("login", "Login failed", rb).await
    }

    /// `POST {auth}/register`
    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ClientResult<RegisterResponse> {
        let rb = self
            .request(Method::POST, Domain::Auth, "/register")
            .json(&json!({ "username": username, "email": email, "password": password }));
        call_json("register", "Register failed", rb).await
    }
}
