//! Client-side session: who is using this client.
//! Keep the public surface thin and split implementation across sub-modules.

mod identity;
mod storage;
mod store;

pub use identity::Identity;
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use store::{SessionProvider, SessionStore, SESSION_KEY};
