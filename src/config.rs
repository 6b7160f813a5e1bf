use std::net::SocketAddr;

use crate::Result;

use anyhow::Context;
use tracing::{info, warn};

const DEFAULT_SCORES_TABLE: &str = "high_scores";
const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_protocol: String,
    pub server_domain: String,
    pub server_port: String,
    pub server_host_uri: String,

    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,

    pub scores_table: String,
    pub leaderboard_limit: usize,
}

impl Config {
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let port: u16 = if self.server_port.is_empty() {
            80
        } else {
            self.server_port
                .parse()
                .with_context(|| format!("Invalid SERVER_PORT: {}", self.server_port))?
        };

        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }
}

pub fn build() -> Config {
    return build_from(|key| std::env::var(key).ok());
}

pub fn build_from(lookup: impl Fn(&str) -> Option<String>) -> Config {
    let var_or = |key: &str, default: &str| -> String {
        lookup(key).unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
    };

    let secret = |key: &str| -> Option<String> {
        let value = lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if value.is_none() {
            warn!("{key} not set, high scores will be unavailable");
        }

        value
    };

    let server_protocol = var_or("SERVER_PROTOCOL", "http");
    let server_domain = var_or("SERVER_DOMAIN", "localhost");
    let server_port = var_or("SERVER_PORT", "3000");

    let server_port_postfix = if server_port.is_empty() {
        "".to_string()
    } else {
        format!(":{server_port}")
    };

    let server_host_uri = format!("{server_protocol}://{server_domain}{server_port_postfix}");

    let leaderboard_limit = lookup("LEADERBOARD_LIMIT")
        .and_then(|raw| match raw.parse::<usize>() {
            Ok(limit) if limit > 0 => Some(limit),
            _ => {
                warn!("Invalid LEADERBOARD_LIMIT value: {raw}");
                None
            }
        })
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT);

    return Config {
        server_protocol,
        server_domain,
        server_port,
        server_host_uri,

        supabase_url: secret("SUPABASE_URL"),
        supabase_key: secret("SUPABASE_KEY"),

        scores_table: var_or("HIGH_SCORES_TABLE", DEFAULT_SCORES_TABLE),
        leaderboard_limit,
    };
}
