//!
//! prpo CLI binary
//! ---------------
//! Command-line front end over the PRPO booking services. Logs in once, remembers the
//! identity under the state directory, and runs one command per invocation.

use std::env;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use prpo_client::cli::{self, split_global_flags, USAGE};
use prpo_client::config::{ServiceEndpoints, ORIGIN_ENV};
use prpo_client::{FileStorage, GatewayClient, SessionStore};

const STATE_DIR_ENV: &str = "PRPO_STATE_DIR";
const DEFAULT_STATE_DIR: &str = ".prpo";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (flags, rest) = match split_global_flags(args) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if flags.help || rest.is_empty() {
        println!("{}", USAGE);
        return Ok(());
    }

    let origin = flags.origin.clone();
    let endpoints = ServiceEndpoints::from_lookup(|k| {
        if k == ORIGIN_ENV && origin.is_some() { origin.clone() } else { env::var(k).ok() }
    });
    let state_dir = flags
        .state_dir
        .or_else(|| env::var(STATE_DIR_ENV).ok().filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_STATE_DIR.to_string());
    tracing::debug!(state_dir = %state_dir, "prpo starting");

    let client = GatewayClient::new(endpoints);
    let session = SessionStore::new(FileStorage::new(state_dir));

    match cli::run(&rest, &client, &session, flags.json).await {
        Ok(out) => {
            println!("{}", out);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}
