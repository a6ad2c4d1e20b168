//! Runtime settings read from the environment (and `.env` when present).

use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use tracing::Level;

use crate::errors::ConfigError;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_EMAILJS_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailRelaySettings {
    pub url: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub page_size: usize,
    pub http_timeout: Duration,
    pub log_level: Level,
    pub mail_relay: Option<MailRelaySettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_ITEMS_PER_PAGE,
            http_timeout: Duration::from_secs(30),
            log_level: Level::INFO,
            mail_relay: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = get("LEAVE_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let page_size = match get("LEAVE_PAGE_SIZE") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "LEAVE_PAGE_SIZE",
                        value: raw,
                    })
                }
            },
            None => defaults.page_size,
        };

        let http_timeout = match get("LEAVE_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    key: "LEAVE_HTTP_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => defaults.http_timeout,
        };

        let log_level = match get("LEAVE_LOG_LEVEL") {
            Some(raw) => raw.parse::<Level>().map_err(|_| ConfigError::Invalid {
                key: "LEAVE_LOG_LEVEL",
                value: raw,
            })?,
            None => defaults.log_level,
        };

        let mail_relay = match (
            get("EMAILJS_SERVICE_ID"),
            get("EMAILJS_TEMPLATE_ID"),
            get("EMAILJS_PUBLIC_KEY"),
        ) {
            (Some(service_id), Some(template_id), Some(public_key)) => Some(MailRelaySettings {
                url: get("EMAILJS_URL").unwrap_or_else(|| DEFAULT_EMAILJS_URL.to_string()),
                service_id,
                template_id,
                public_key,
            }),
            _ => None,
        };

        Ok(Settings {
            api_base_url,
            page_size,
            http_timeout,
            log_level,
            mail_relay,
        })
    }

    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        Ok(reqwest::Client::builder().timeout(self.http_timeout).build()?)
    }
}
