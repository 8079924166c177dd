use std::{env, net::SocketAddr};
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not defined")]
    Missing(&'static str),
    #[error("BIND_ADDR is not a valid socket address: {0}")]
    InvalidBindAddr(String),
}

/// Runtime settings read from the environment (and `.env`, when present)
#[derive(Debug, Clone)]
pub struct Config {
    pub oidc_issuer_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let oidc_issuer_url = env::var("OIDC_ISSUER_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("OIDC_ISSUER_URL"))?;
        let bind_addr = parse_bind_addr(env::var("BIND_ADDR").ok())?;

        Ok(Self {
            oidc_issuer_url,
            bind_addr,
        })
    }
}

fn parse_bind_addr(raw: Option<String>) -> Result<SocketAddr, ConfigError> {
    let raw = raw
        .filter(|addr| !addr.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());

    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBindAddr(raw))
}
