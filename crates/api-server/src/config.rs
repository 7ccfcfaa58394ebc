//! Process configuration, read from the environment (and an optional `.env`).

use chrono::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DB_URI: &str = "file://.homescape-data";
pub const DEFAULT_TOKEN_SECRET: &str = "dev-access-token-secret-change-me";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 5;
pub const DEFAULT_SMTP_RELAY: &str = "smtp.gmail.com";
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] =
    &["http://localhost:3000", "https://homescape-ae176.web.app"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub username: String,
    pub password: String,
    pub relay: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_uri: String,
    pub token_secret: String,
    pub token_ttl: Duration,
    pub mail: Option<MailConfig>,
    pub stripe_secret_key: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "Failed to load .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = get("PORT")
            .and_then(|raw| raw.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let token_ttl_hours = get("ACCESS_TOKEN_TTL_HOURS")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        let mail = match (get("EMAIL"), get("PASS")) {
            (Some(username), Some(password)) => Some(MailConfig {
                username,
                password,
                relay: get("SMTP_RELAY").unwrap_or_else(|| DEFAULT_SMTP_RELAY.to_string()),
            }),
            _ => None,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_ORIGINS
                    .iter()
                    .map(|origin| origin.to_string())
                    .collect()
            });

        Self {
            port,
            database_uri: get("DB_URI").unwrap_or_else(|| DEFAULT_DB_URI.to_string()),
            token_secret: get("ACCESS_TOKEN_SECRET")
                .unwrap_or_else(|| DEFAULT_TOKEN_SECRET.to_string()),
            token_ttl: Duration::hours(token_ttl_hours),
            mail,
            stripe_secret_key: get("STRIPE_SECRET_KEY"),
            allowed_origins,
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }
}
