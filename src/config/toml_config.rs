use crate::domain::model::ConnectTiming;
use crate::utils::error::{Result, WirelessError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ATTEMPTS: u8 = 5;
pub const DEFAULT_WAIT_LOOPS: u8 = 5;

pub const SSID_MIN_LEN: usize = 2;
pub const SSID_MAX_LEN: usize = 32;
pub const RETRY_MIN: u8 = 1;
pub const RETRY_MAX: u8 = 9;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirelessConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    pub retry: Option<RetryConfig>,
    pub timing: Option<TimingConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub ssid: Option<String>,
    pub password: Option<String>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub attempts: Option<u8>,
    pub wait_loops: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingConfig {
    pub wake_seconds: Option<u64>,
    pub settle_seconds: Option<u64>,
    pub wait_seconds: Option<u64>,
    pub attempt_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    pub level: Option<String>,
}

impl WirelessConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Expand `${VAR}` and `${VAR:-fallback}` from the environment. An unset
    /// variable without a fallback stays as written so validation can name it.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").map_err(|e| {
            WirelessError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let expanded = re.replace_all(content, |caps: &regex::Captures| {
            match (std::env::var(&caps[1]), caps.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(fallback)) => fallback.as_str().to_string(),
                (Err(_), None) => caps[0].to_string(),
            }
        });

        Ok(expanded.into_owned())
    }

    pub fn ssid(&self) -> Result<&str> {
        validation::validate_required_field("network.ssid", &self.network.ssid).map(String::as_str)
    }

    pub fn password(&self) -> &str {
        self.network.password.as_deref().unwrap_or("")
    }

    pub fn interface(&self) -> Option<&str> {
        self.network.interface.as_deref()
    }

    pub fn attempts(&self) -> u8 {
        self.retry
            .as_ref()
            .and_then(|r| r.attempts)
            .unwrap_or(DEFAULT_ATTEMPTS)
    }

    pub fn wait_loops(&self) -> u8 {
        self.retry
            .as_ref()
            .and_then(|r| r.wait_loops)
            .unwrap_or(DEFAULT_WAIT_LOOPS)
    }

    pub fn timing(&self) -> ConnectTiming {
        let defaults = ConnectTiming::default();
        let Some(t) = self.timing.as_ref() else {
            return defaults;
        };
        let pick = |secs: Option<u64>, fallback: Duration| secs.map(Duration::from_secs).unwrap_or(fallback);

        ConnectTiming {
            wake: pick(t.wake_seconds, defaults.wake),
            settle: pick(t.settle_seconds, defaults.settle),
            wait: pick(t.wait_seconds, defaults.wait),
            attempt: pick(t.attempt_seconds, defaults.attempt),
        }
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    /// Checks every value that is present. A missing ssid is only an error
    /// for operations that need one, see [`WirelessConfig::ssid`].
    pub fn validate_config(&self) -> Result<()> {
        if let Some(ssid) = &self.network.ssid {
            validation::validate_length("network.ssid", ssid, SSID_MIN_LEN, SSID_MAX_LEN)?;
        }
        if let Some(interface) = &self.network.interface {
            validation::validate_non_empty_string("network.interface", interface)?;
        }
        validation::validate_range("retry.attempts", self.attempts(), RETRY_MIN, RETRY_MAX)?;
        validation::validate_range("retry.wait_loops", self.wait_loops(), RETRY_MIN, RETRY_MAX)?;

        if let Some(level) = self.log_level() {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(WirelessError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}

impl Validate for WirelessConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[network]
ssid = "KTLT9000"
password = "hunter22"
interface = "wlan0"

[retry]
attempts = 3
wait_loops = 2

[timing]
wait_seconds = 2
attempt_seconds = 4

[logging]
json = true
level = "debug"
"#;

        let config = WirelessConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.ssid().unwrap(), "KTLT9000");
        assert_eq!(config.password(), "hunter22");
        assert_eq!(config.interface(), Some("wlan0"));
        assert_eq!(config.attempts(), 3);
        assert_eq!(config.wait_loops(), 2);

        let timing = config.timing();
        assert_eq!(timing.wake, Duration::from_secs(1));
        assert_eq!(timing.wait, Duration::from_secs(2));
        assert_eq!(timing.attempt, Duration::from_secs(4));

        assert!(config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = WirelessConfig::from_toml_str("").unwrap();

        assert_eq!(config.attempts(), DEFAULT_ATTEMPTS);
        assert_eq!(config.wait_loops(), DEFAULT_WAIT_LOOPS);
        assert_eq!(config.password(), "");
        assert_eq!(config.timing(), ConnectTiming::default());
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.ssid(),
            Err(WirelessError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LOBO_TEST_WLAN_PASSWORD", "from-env");

        let toml_content = r#"
[network]
ssid = "home"
password = "${LOBO_TEST_WLAN_PASSWORD}"
"#;

        let config = WirelessConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.password(), "from-env");

        std::env::remove_var("LOBO_TEST_WLAN_PASSWORD");
    }

    #[test]
    fn test_env_var_fallback() {
        let toml_content = r#"
[network]
ssid = "home"
interface = "${LOBO_TEST_UNSET_IFACE:-wlan1}"
"#;

        let config = WirelessConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.interface(), Some("wlan1"));
    }

    #[test]
    fn test_unset_env_var_left_verbatim() {
        let toml_content = r#"
[network]
ssid = "home"
password = "${LOBO_TEST_SURELY_UNSET_VAR}"
"#;

        let config = WirelessConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.password(), "${LOBO_TEST_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation_rejects_out_of_range() {
        let short_ssid = WirelessConfig::from_toml_str("[network]\nssid = \"x\"\n").unwrap();
        assert!(short_ssid.validate().is_err());

        let too_many = WirelessConfig::from_toml_str("[retry]\nattempts = 10\n").unwrap();
        assert!(too_many.validate().is_err());

        let zero_loops = WirelessConfig::from_toml_str("[retry]\nwait_loops = 0\n").unwrap();
        assert!(zero_loops.validate().is_err());

        let bad_level = WirelessConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = WirelessConfig::from_toml_str("[retry]\nattempts = \"three\"\n");
        assert!(matches!(result, Err(WirelessError::TomlError(_))));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[network]\nssid = \"file-net\"\n")
            .unwrap();

        let config = WirelessConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.ssid().unwrap(), "file-net");
    }
}
