/*
[INPUT]:  Optional YAML configuration file
[OUTPUT]: Parsed application configuration
[POS]:    Configuration layer - HTTP timeouts, settings location, logging
[UPDATE]: When adding new configuration options
*/

use std::path::PathBuf;
use std::time::Duration;

use collector_adapter::ClientConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the collector client
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// HTTP client options
    #[serde(default)]
    pub http: HttpConfig,
    /// Settings file location; defaults to the platform data dir
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
    /// Logging options
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "collector_session=debug"
    #[serde(default)]
    pub level: Option<String>,
    /// Log file; when set, logs go to a daily-rolling file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.http.timeout_secs == 0 {
            anyhow::bail!("http.timeout_secs must be greater than zero");
        }
        if self.http.connect_timeout_secs == 0 {
            anyhow::bail!("http.connect_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = AppConfig::from_yaml("{}").expect("parse config");
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert!(config.settings_path.is_none());
        assert!(config.log.file.is_none());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
http:
  timeout_secs: 5
  connect_timeout_secs: 2
settings_path: /tmp/collector/settings.json
log:
  level: debug
  file: /tmp/collector/collector.log
"#;
        let config = AppConfig::from_yaml(yaml).expect("parse config");
        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.log.level.as_deref(), Some("debug"));
        assert_eq!(
            config.settings_path,
            Some(PathBuf::from("/tmp/collector/settings.json"))
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = AppConfig::from_yaml("http:\n  timeout_secs: 0\n").expect_err("invalid");
        assert!(err.to_string().contains("timeout_secs"));
    }
}
