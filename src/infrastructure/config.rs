use crate::application::coordinator::SessionConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub miners: Vec<MinerConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MinerConfig {
    pub host: String,
    pub name: Option<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_unavailable_threshold")]
    pub unavailable_threshold: u32,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_history_metrics")]
    pub history_metrics: Vec<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_unavailable_threshold() -> u32 {
    3
}

fn default_history_capacity() -> usize {
    crate::domain::history::DEFAULT_HISTORY_CAPACITY
}

fn default_history_metrics() -> Vec<String> {
    vec!["hashRate".to_string()]
}

impl MinerConfig {
    /// Display name, defaulting to the host.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.host)
    }

    /// Stable identifier derived from the host, usable in URLs.
    pub fn id(&self) -> String {
        self.host
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .replace([' ', '.', ':', '/'], "_")
            .to_lowercase()
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            unavailable_threshold: self.unavailable_threshold,
            history_capacity: self.history_capacity,
            history_metrics: self.history_metrics.clone(),
        }
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/miners"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_miner_gets_defaults() {
        let cfg = parse(
            r#"
            [[miners]]
            host = "192.168.1.42"
            "#,
        );

        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        let miner = &cfg.miners[0];
        assert_eq!(miner.display_name(), "192.168.1.42");
        assert_eq!(miner.poll_interval_secs, 30);
        assert_eq!(miner.unavailable_threshold, 3);
        assert_eq!(miner.history_capacity, 100);
        assert_eq!(miner.history_metrics, vec!["hashRate".to_string()]);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let cfg = parse(
            r#"
            listen_addr = "127.0.0.1:9090"

            [[miners]]
            host = "bitaxe.local"
            name = "Gamma"
            poll_interval_secs = 10
            unavailable_threshold = 5
            "#,
        );

        assert_eq!(cfg.listen_addr, "127.0.0.1:9090");
        let miner = &cfg.miners[0];
        assert_eq!(miner.display_name(), "Gamma");
        assert_eq!(miner.session_config().poll_interval, Duration::from_secs(10));
        assert_eq!(miner.session_config().unavailable_threshold, 5);
    }

    #[test]
    fn test_miner_id_is_url_safe() {
        let cfg = parse(
            r#"
            [[miners]]
            host = "http://BitAxe Gamma.local"
            "#,
        );

        assert_eq!(cfg.miners[0].id(), "bitaxe_gamma_local");
    }
}
