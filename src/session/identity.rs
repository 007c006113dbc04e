use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{LoginResponse, RegisterResponse};

/// The authenticated user as cached locally. `token` is the opaque bearer credential
/// issued at login; registration does not yield one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Records written by other clients may carry `null` for optional profile fields.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl From<LoginResponse> for Identity {
    fn from(r: LoginResponse) -> Self {
        Self { id: r.id, username: r.username, email: r.email, role: r.role, token: Some(r.token) }
    }
}

impl From<RegisterResponse> for Identity {
    fn from(r: RegisterResponse) -> Self {
        Self { id: r.id, username: r.username, email: r.email, role: r.role, token: None }
    }
}
