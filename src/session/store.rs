use anyhow::{Context, Result};

use super::identity::Identity;
use super::storage::LocalStorage;

/// Fixed storage key for the cached identity.
pub const SESSION_KEY: &str = "prpo_auth";

/// Injectable access to the current identity. Initialized once per process and mutated
/// only through these calls.
pub trait SessionProvider: Send + Sync {
    fn save(&self, identity: &Identity) -> Result<()>;
    /// None when nothing is stored or the stored record does not parse.
    fn load(&self) -> Option<Identity>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SessionStore<S: LocalStorage> {
    storage: S,
}

impl<S: LocalStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self { Self { storage } }

    pub fn storage(&self) -> &S { &self.storage }
}

impl<S: LocalStorage> SessionProvider for SessionStore<S> {
    fn save(&self, identity: &Identity) -> Result<()> {
        let raw = serde_json::to_string(identity).context("encode identity")?;
        self.storage.set_item(SESSION_KEY, &raw)?;
        tracing::debug!(user_id = identity.id, username = %identity.username, "session.save");
        Ok(())
    }

    fn load(&self) -> Option<Identity> {
        let raw = self.storage.get_item(SESSION_KEY)?;
        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(error = %e, "stored identity is unreadable; treating as logged out");
                None
            }
        }
    }

    fn clear(&self) -> Result<()> {
        self.storage.remove_item(SESSION_KEY)?;
        tracing::debug!("session.clear");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoginResponse;
    use crate::session::MemoryStorage;

    fn alice() -> Identity {
        Identity {
            id: 42,
            username: "alice".into(),
            email: "alice@example.com".into(),
            role: "USER".into(),
            token: Some("tok-1".into()),
        }
    }

    #[test]
    fn save_then_load_is_unchanged() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&alice()).unwrap();
        assert_eq!(store.load(), Some(alice()));
    }

    #[test]
    fn save_overwrites_previous_identity() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&alice()).unwrap();
        let bob = Identity { id: 7, username: "bob".into(), ..Default::default() };
        store.save(&bob).unwrap();
        assert_eq!(store.load(), Some(bob));
    }

    #[test]
    fn load_empty_is_none() {
        let store = SessionStore::new(MemoryStorage::new());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn load_malformed_is_none() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        for bad in ["not json", "{\"id\":\"x\"}", "", "[1,2,3]", "{\"username\":\"no id\"}"] {
            storage.set_item(SESSION_KEY, bad).unwrap();
            assert_eq!(store.load(), None, "input {bad:?}");
        }
    }

    #[test]
    fn clear_is_idempotent() {
        let store = SessionStore::new(MemoryStorage::new());
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.save(&alice()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn sparse_record_from_older_client_loads() {
        let storage = MemoryStorage::new();
        storage.set_item(SESSION_KEY, r#"{"id":3,"username":"carol"}"#).unwrap();
        let got = SessionStore::new(storage).load().unwrap();
        assert_eq!(got.id, 3);
        assert!(got.email.is_empty());
        assert!(got.token.is_none());
    }

    #[test]
    fn null_profile_fields_still_load() {
        let storage = MemoryStorage::new();
        storage
            .set_item(SESSION_KEY, r#"{"id":1,"username":"u","email":null,"role":null,"token":"t"}"#)
            .unwrap();
        let got = SessionStore::new(storage).load().unwrap();
        assert_eq!(got.id, 1);
        assert!(got.email.is_empty());
        assert!(got.role.is_empty());
        assert_eq!(got.token.as_deref(), Some("t"));
    }

    #[test]
    fn identity_from_login_keeps_token() {
        let resp = LoginResponse {
            token: "jwt".into(),
            token_type: "Bearer".into(),
            id: 42,
            username: "alice".into(),
            email: "alice@example.com".into(),
            role: "USER".into(),
        };
        let id = Identity::from(resp);
        assert_eq!(id.token.as_deref(), Some("jwt"));
        assert_eq!(id.id, 42);
    }
}
