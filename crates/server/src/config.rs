use axum::http::HeaderValue;
use log::warn;
use std::env;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_BASE_PATH: &str = "/api";
const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:3002",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value `{value}` for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub oidc_audiences: Vec<String>,
    pub bind_address: String,
    /// Prefix of every authenticated route, empty to mount them at the root
    pub base_path: String,
    pub cors_origins: Vec<HeaderValue>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            warn!("Failed to load .env file: {err}");
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| value(name).ok_or(ConfigError::Missing(name));

        let cors_origins = match value("CORS_ORIGINS") {
            Some(origins) => parse_origins(comma_list(&origins))?,
            None => parse_origins(DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect())?,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            oidc_audiences: value("OIDC_AUDIENCES")
                .map(|v| comma_list(&v))
                .unwrap_or_default(),
            bind_address: value("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
            base_path: normalize_base_path(
                &value("BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.to_owned()),
            ),
            cors_origins,
        })
    }
}

fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_origins(origins: Vec<String>) -> Result<Vec<HeaderValue>, ConfigError> {
    origins
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(&origin).map_err(|_| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: origin,
            })
        })
        .collect()
}

/// `api/` becomes `/api`, `/` becomes the empty root prefix
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
