use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub db_path: PathBuf,
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let backend_url =
            var("SLACKR_BACKEND_URL").unwrap_or_else(|| "http://localhost:5005".into());
        let db_path = var("SLACKR_DB_PATH").unwrap_or_else(|| "slackr.db".into());
        let poll_ms: u64 = var("SLACKR_POLL_INTERVAL_MS")
            .unwrap_or_else(|| "1000".into())
            .parse()
            .context("SLACKR_POLL_INTERVAL_MS must be a number of milliseconds")?;
        if poll_ms == 0 {
            bail!("SLACKR_POLL_INTERVAL_MS must be greater than zero");
        }

        Ok(Self {
            backend_url,
            db_path: PathBuf::from(db_path),
            poll_interval: Duration::from_millis(poll_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_vars(|_| None).unwrap();
        assert_eq!(config.backend_url, "http://localhost:5005");
        assert_eq!(config.db_path, PathBuf::from("slackr.db"));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_vars(|key| match key {
            "SLACKR_BACKEND_URL" => Some("http://chat.local:8080".into()),
            "SLACKR_POLL_INTERVAL_MS" => Some("250".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.backend_url, "http://chat.local:8080");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn rejects_bad_interval() {
        let err = Config::from_vars(|key| (key == "SLACKR_POLL_INTERVAL_MS").then(|| "soon".into()))
            .unwrap_err();
        assert!(err.to_string().contains("SLACKR_POLL_INTERVAL_MS"));
    }

    #[test]
    fn rejects_zero_interval() {
        let err = Config::from_vars(|key| (key == "SLACKR_POLL_INTERVAL_MS").then(|| "0".into()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "SLACKR_POLL_INTERVAL_MS must be greater than zero"
        );
    }
}
