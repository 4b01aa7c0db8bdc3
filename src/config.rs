use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};
use url::Url;

use crate::domain::fee::DEFAULT_RATE_PER_HOUR;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SLOT_CACHE_SECS: u64 = 15;

const API_URL_VAR: &str = "PARKVISION_API_URL";
const TIMEOUT_VAR: &str = "PARKVISION_TIMEOUT_SECS";
const RATE_VAR: &str = "PARKVISION_RATE_PER_HOUR";
const SLOT_CACHE_VAR: &str = "PARKVISION_SLOT_CACHE_SECS";
const LOG_JSON_VAR: &str = "PARKVISION_LOG_JSON";

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub rate_per_hour: f64,
    /// How long a fetched slot list counts as current.
    pub slot_cache_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_url(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rate_per_hour: DEFAULT_RATE_PER_HOUR,
            slot_cache_ttl: Duration::from_secs(DEFAULT_SLOT_CACHE_SECS),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base_url = lookup(API_URL_VAR)
            .and_then(|raw| match parse_base_url(&raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Invalid {API_URL_VAR} value {raw:?}: {e}");
                    None
                }
            })
            .unwrap_or_else(|| {
                info!("{API_URL_VAR} not usable, using default: {DEFAULT_API_URL}");
                defaults.api_base_url.clone()
            });

        let timeout_secs: u64 = try_parse(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS);
        let rate_per_hour: f64 = try_parse(&lookup, RATE_VAR, DEFAULT_RATE_PER_HOUR);
        let rate_per_hour = if rate_per_hour.is_finite() && rate_per_hour >= 0.0 {
            rate_per_hour
        } else {
            warn!("{RATE_VAR} must be a non-negative number, using default");
            DEFAULT_RATE_PER_HOUR
        };

        let slot_cache_secs: u64 = try_parse(&lookup, SLOT_CACHE_VAR, DEFAULT_SLOT_CACHE_SECS);

        Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            rate_per_hour,
            slot_cache_ttl: Duration::from_secs(slot_cache_secs),
        }
    }

    /// Swaps in a base URL chosen by the user, keeping the rest.
    pub fn with_base_url_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match parse_base_url(raw) {
                Ok(url) => self.api_base_url = url,
                Err(e) => warn!("Ignoring saved API URL {raw:?}: {e}"),
            }
        }
        self
    }
}

/// Read ahead of [`ClientConfig::load`] so the subscriber exists before config warnings.
pub fn log_json_from_env() -> bool {
    log_json_from_lookup(|key| env::var(key).ok())
}

fn log_json_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> bool {
    lookup(LOG_JSON_VAR).is_some_and(|raw| parse_flag(&raw))
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Parses a base URL and makes sure it ends in `/` so relative joins keep the path.
pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed)?;
    if url.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}

fn try_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}; using default {default}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_URL_VAR, "http://192.168.1.2:8000/api"),
            (TIMEOUT_VAR, "30"),
            (RATE_VAR, "12.5"),
            (SLOT_CACHE_VAR, "45"),
        ]));
        assert_eq!(config.api_base_url.as_str(), "http://192.168.1.2:8000/api/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.rate_per_hour, 12.5);
        assert_eq!(config.slot_cache_ttl, Duration::from_secs(45));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_URL_VAR, "not a url"),
            (TIMEOUT_VAR, "soon"),
            (RATE_VAR, "-4"),
        ]));
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.rate_per_hour, DEFAULT_RATE_PER_HOUR);
    }

    #[test]
    fn saved_override_replaces_base_url_only_when_valid() {
        let config = ClientConfig::default().with_base_url_override(Some("http://10.0.2.2:8000"));
        assert_eq!(config.api_base_url.as_str(), "http://10.0.2.2:8000/");

        let config = ClientConfig::default().with_base_url_override(Some("::"));
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn json_logging_is_opt_in() {
        assert!(!log_json_from_lookup(|_| None));
        assert!(log_json_from_lookup(lookup_from(&[(LOG_JSON_VAR, "1")])));
        assert!(!log_json_from_lookup(lookup_from(&[(LOG_JSON_VAR, "no")])));
    }

    #[test]
    fn non_base_urls_are_rejected() {
        assert!(parse_base_url("mailto:ops@example.com").is_err());
    }
}
