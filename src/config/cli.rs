use crate::config::toml_config::WirelessConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lobo-wireless")]
#[command(about = "Connect a wireless interface to a network, with retries")]
#[command(version)]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Network name (2 to 32 characters)
    #[arg(long, global = true)]
    pub ssid: Option<String>,

    /// Network password
    #[arg(long, env = "WLAN_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Wireless device, e.g. wlan0 (default: first wifi device)
    #[arg(long, global = true)]
    pub interface: Option<String>,

    /// Connection attempts (1 to 9)
    #[arg(long, global = true)]
    pub attempts: Option<u8>,

    /// Status polls per attempt (1 to 9)
    #[arg(long, global = true)]
    pub wait_loops: Option<u8>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Connect to the configured network
    Connect,
    /// List visible networks
    Scan,
    /// Show link status and address
    Status,
    /// Disconnect and power down the radio
    Disconnect,
}

impl CliConfig {
    /// Load the config file (if any) and layer command line values on top.
    pub fn resolve(&self) -> Result<WirelessConfig> {
        let mut config = match &self.config {
            Some(path) => WirelessConfig::from_file(path)?,
            None => WirelessConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut WirelessConfig) {
        if let Some(ssid) = &self.ssid {
            config.network.ssid = Some(ssid.clone());
        }
        if let Some(password) = &self.password {
            config.network.password = Some(password.clone());
        }
        if let Some(interface) = &self.interface {
            config.network.interface = Some(interface.clone());
        }
        if self.attempts.is_some() || self.wait_loops.is_some() {
            let retry = config.retry.get_or_insert_with(Default::default);
            if self.attempts.is_some() {
                retry.attempts = self.attempts;
            }
            if self.wait_loops.is_some() {
                retry.wait_loops = self.wait_loops;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect_with_flags() {
        let cli = CliConfig::try_parse_from([
            "lobo-wireless",
            "connect",
            "--ssid",
            "home",
            "--attempts",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.command, Command::Connect);
        let config = cli.resolve().unwrap();
        assert_eq!(config.ssid().unwrap(), "home");
        assert_eq!(config.attempts(), 2);
        assert_eq!(config.wait_loops(), 5);
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut config =
            WirelessConfig::from_toml_str("[network]\nssid = \"file\"\n[retry]\nwait_loops = 4\n")
                .unwrap();
        let cli =
            CliConfig::try_parse_from(["lobo-wireless", "--ssid", "flag", "status"]).unwrap();

        cli.apply_overrides(&mut config);

        assert_eq!(config.ssid().unwrap(), "flag");
        assert_eq!(config.wait_loops(), 4);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(CliConfig::try_parse_from(["lobo-wireless"]).is_err());
    }
}
