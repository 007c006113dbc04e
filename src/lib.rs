//! Typed async client for the PRPO facility booking services, plus the locally cached
//! session of whoever is using it.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fanout;
pub mod model;
pub mod session;

pub use api::GatewayClient;
pub use config::{Domain, ServiceEndpoints};
pub use error::{ClientError, ClientResult};
pub use fanout::{fan_out, fan_out2};
pub use session::{FileStorage, Identity, LocalStorage, MemoryStorage, SessionProvider, SessionStore};
