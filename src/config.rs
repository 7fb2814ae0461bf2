// src/config.rs

use color_eyre::eyre::{eyre, Result, WrapErr};
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::core::flow::CheckMode;
use crate::logging::{get_data_dir, PROJECT_NAME};

pub const DEFAULT_API_BASE: &str = "https://api.nine-security.com";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2500);

lazy_static! {
    pub static ref API_BASE_ENV: String = format!("{}_API_BASE", PROJECT_NAME.clone());
    pub static ref POLL_MS_ENV: String = format!("{}_POLL_MS", PROJECT_NAME.clone());
    pub static ref EXPORT_DIR_ENV: String = format!("{}_EXPORT_DIR", PROJECT_NAME.clone());
    pub static ref MODE_ENV: String = format!("{}_MODE", PROJECT_NAME.clone());
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the assessment backend, always ending with `/`.
    pub api_base: Url,
    pub poll_interval: Duration,
    pub export_dir: PathBuf,
    pub default_mode: CheckMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: normalize_base(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            export_dir: get_data_dir().join("reports"),
            default_mode: CheckMode::default(),
        }
    }
}

/// Parses the API base and makes sure relative joins land under its path.
fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).wrap_err_with(|| format!("Invalid API base URL '{}'", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(eyre!("API base URL must be http or https, got '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup. Unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(raw) = lookup(API_BASE_ENV.as_str()) {
            config.api_base = normalize_base(&raw)?;
        }
        if let Some(raw) = lookup(POLL_MS_ENV.as_str()) {
            let millis: u64 = raw
                .trim()
                .parse()
                .wrap_err_with(|| format!("{} must be a number of milliseconds", *POLL_MS_ENV))?;
            if millis == 0 {
                return Err(eyre!("{} must be greater than zero", *POLL_MS_ENV));
            }
            config.poll_interval = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup(EXPORT_DIR_ENV.as_str()) {
            config.export_dir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(MODE_ENV.as_str()) {
            config.default_mode = raw
                .trim()
                .parse()
                .map_err(|_| eyre!("{} must be 'quick' or 'verified', got '{}'", *MODE_ENV, raw))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_base.as_str(), "https://api.nine-security.com/");
        assert_eq!(config.poll_interval, Duration::from_millis(2500));
        assert_eq!(config.default_mode, CheckMode::Verified);
        assert!(config.export_dir.ends_with("reports"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("VANGUARD_MAIL_API_BASE", "http://localhost:8080/staging"),
            ("VANGUARD_MAIL_POLL_MS", "500"),
            ("VANGUARD_MAIL_EXPORT_DIR", "/tmp/out"),
            ("VANGUARD_MAIL_MODE", "Quick"),
        ]))
        .unwrap();
        assert_eq!(config.api_base.as_str(), "http://localhost:8080/staging/");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.default_mode, CheckMode::Quick);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("VANGUARD_MAIL_API_BASE", "not a url")])).is_err());
        assert!(Config::from_lookup(lookup(&[("VANGUARD_MAIL_API_BASE", "ftp://x.example")])).is_err());
        assert!(Config::from_lookup(lookup(&[("VANGUARD_MAIL_POLL_MS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("VANGUARD_MAIL_POLL_MS", "fast")])).is_err());
        assert!(Config::from_lookup(lookup(&[("VANGUARD_MAIL_MODE", "slow")])).is_err());
    }
}
