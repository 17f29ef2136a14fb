//! Backend entry-point: wires the contacts REST API and health probes.

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use std::env;
use std::net::SocketAddr;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use backend::inbound::http::health::HealthState;
use backend::server::{ServerConfig, create_server};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);
    if let Ok(raw) = env::var("PUBLIC_BASE_URL") {
        let base = Url::parse(&raw)
            .map_err(|e| std::io::Error::other(format!("invalid PUBLIC_BASE_URL: {e}")))?;
        config = config.with_public_base_url(base);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
