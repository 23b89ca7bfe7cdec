use crate::domain::model::{IfConfig, ScanResult, Security, WlanStatus};
use crate::domain::ports::WlanDriver;
use crate::utils::error::{Result, WirelessError};
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::process::Output;
use tokio::process::Command;

/// [`WlanDriver`] backed by NetworkManager's `nmcli`.
#[derive(Debug, Clone)]
pub struct NmcliDriver {
    program: String,
    interface: Option<String>,
}

impl NmcliDriver {
    pub fn new(interface: Option<String>) -> Self {
        Self {
            program: "nmcli".to_string(),
            interface,
        }
    }

    /// Use a different executable, e.g. a wrapper script.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::trace!("{} {}", self.program, redact(args).join(" "));
        Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| WirelessError::CommandError {
                command: self.program.clone(),
                message: e.to_string(),
            })
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(WirelessError::CommandError {
                command: format!("{} {}", self.program, redact(args).join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn device(&self) -> Result<String> {
        if let Some(interface) = &self.interface {
            return Ok(interface.clone());
        }
        let listing = self.run(&["-t", "-f", "DEVICE,TYPE", "device", "status"]).await?;
        parse_wifi_device(&listing).ok_or_else(|| WirelessError::CommandError {
            command: format!("{} device status", self.program),
            message: "no wifi device found".to_string(),
        })
    }
}

impl Default for NmcliDriver {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl WlanDriver for NmcliDriver {
    async fn is_active(&self) -> Result<bool> {
        let state = self.run(&["radio", "wifi"]).await?;
        Ok(state.trim() == "enabled")
    }

    async fn set_active(&self, active: bool) -> Result<()> {
        let switch = if active { "on" } else { "off" };
        self.run(&["radio", "wifi", switch]).await?;
        Ok(())
    }

    async fn is_connected(&self) -> Result<bool> {
        Ok(self.status().await? == WlanStatus::GotIp)
    }

    async fn connect(&self, ssid: &str, password: &str) -> Result<()> {
        let device = self.device().await?;
        let mut args = vec!["--wait", "0", "device", "wifi", "connect", ssid];
        if !password.is_empty() {
            args.extend(["password", password]);
        }
        args.extend(["ifname", device.as_str()]);

        let output = self.output(&args).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(WirelessError::driver(
                String::from_utf8_lossy(&output.stderr).trim(),
            ))
        }
    }

    async fn disconnect(&self) -> Result<()> {
        let device = self.device().await?;
        self.run(&["device", "disconnect", &device]).await?;
        Ok(())
    }

    async fn status(&self) -> Result<WlanStatus> {
        let device = self.device().await?;
        let out = self
            .run(&["-t", "-g", "GENERAL.STATE", "device", "show", &device])
            .await?;
        parse_device_state(&out)
            .map(device_state_to_status)
            .ok_or_else(|| WirelessError::CommandError {
                command: format!("{} device show {}", self.program, device),
                message: format!("unexpected GENERAL.STATE '{}'", out.trim()),
            })
    }

    async fn scan(&self) -> Result<Vec<ScanResult>> {
        let device = self.device().await?;
        let out = self
            .run(&[
                "-t",
                "-f",
                "SSID,BSSID,CHAN,SIGNAL,SECURITY",
                "device",
                "wifi",
                "list",
                "ifname",
                &device,
                "--rescan",
                "yes",
            ])
            .await?;
        Ok(parse_scan_output(&out))
    }

    async fn ifconfig(&self) -> Result<IfConfig> {
        let device = self.device().await?;
        let out = self
            .run(&[
                "-t",
                "-f",
                "IP4.ADDRESS,IP4.GATEWAY,IP4.DNS",
                "device",
                "show",
                &device,
            ])
            .await?;
        Ok(parse_ip4_output(&out))
    }
}

fn redact<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut redacted = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for &arg in args {
        redacted.push(if hide_next { "********" } else { arg });
        hide_next = arg == "password";
    }
    redacted
}

/// Split one line of `nmcli -t` output on unescaped `:`.
pub fn split_terse(line: &str) -> Vec<String> {
    let mut fields = vec![String::new()];
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    if let Some(field) = fields.last_mut() {
                        field.push(escaped);
                    }
                }
            }
            ':' => fields.push(String::new()),
            other => {
                if let Some(field) = fields.last_mut() {
                    field.push(other);
                }
            }
        }
    }
    fields
}

pub fn parse_wifi_device(listing: &str) -> Option<String> {
    listing.lines().find_map(|line| {
        let fields = split_terse(line);
        match fields.as_slice() {
            [device, kind, ..] if kind == "wifi" => Some(device.clone()),
            _ => None,
        }
    })
}

/// `"100 (connected)"` -> `100`
pub fn parse_device_state(out: &str) -> Option<u16> {
    out.trim()
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
}

/// NetworkManager device state numbers.
pub fn device_state_to_status(state: u16) -> WlanStatus {
    match state {
        100 => WlanStatus::GotIp,
        40..=90 => WlanStatus::Connecting,
        30 => WlanStatus::Idle,
        120 => WlanStatus::ConnectFail,
        other => WlanStatus::Unknown(i32::from(other)),
    }
}

pub fn parse_security(raw: &str) -> Security {
    let raw = raw.trim();
    if raw.is_empty() || raw == "--" {
        return Security::Open;
    }
    let has = |tag: &str| raw.split_whitespace().any(|t| t == tag);
    // enterprise networks have no PSK variant
    if has("802.1X") {
        Security::Other(raw.to_string())
    } else if raw.contains("WPA3") {
        Security::Wpa3Sae
    } else if has("WPA1") && has("WPA2") {
        Security::WpaWpa2Psk
    } else if has("WPA2") {
        Security::Wpa2Psk
    } else if has("WPA1") || has("WPA") {
        Security::WpaPsk
    } else if has("WEP") {
        Security::Wep
    } else {
        Security::Other(raw.to_string())
    }
}

/// Signal quality (0..=100) to an approximate dBm value.
pub fn signal_to_rssi(signal: u8) -> i16 {
    i16::from(signal.min(100)) / 2 - 100
}

/// Parse `SSID:BSSID:CHAN:SIGNAL:SECURITY` rows; malformed rows are skipped.
pub fn parse_scan_output(out: &str) -> Vec<ScanResult> {
    out.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields = split_terse(line);
            let parsed = match fields.as_slice() {
                [ssid, bssid, chan, signal, security] => {
                    match (chan.parse::<u16>(), signal.parse::<u8>()) {
                        (Ok(channel), Ok(signal)) => {
                            let hidden = ssid.is_empty() || ssid == "--";
                            Some(ScanResult {
                                ssid: if hidden { String::new() } else { ssid.clone() },
                                bssid: bssid.clone(),
                                channel,
                                rssi: signal_to_rssi(signal),
                                security: parse_security(security),
                                hidden,
                            })
                        }
                        _ => None,
                    }
                }
                _ => None,
            };
            if parsed.is_none() {
                tracing::warn!("Skipping unparseable scan row: {}", line);
            }
            parsed
        })
        .collect()
}

/// First address of each kind from `IP4.*` rows; missing values stay 0.0.0.0.
pub fn parse_ip4_output(out: &str) -> IfConfig {
    let mut config = IfConfig::default();
    let (mut have_ip, mut have_gw, mut have_dns) = (false, false, false);

    for line in out.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if key.starts_with("IP4.ADDRESS") && !have_ip {
            if let Some((ip, prefix)) = parse_cidr(value) {
                config.ip = ip;
                config.netmask = prefix_to_netmask(prefix);
                have_ip = true;
            }
        } else if key.starts_with("IP4.GATEWAY") && !have_gw {
            if let Ok(gw) = value.parse() {
                config.gateway = gw;
                have_gw = true;
            }
        } else if key.starts_with("IP4.DNS") && !have_dns {
            if let Ok(dns) = value.parse() {
                config.dns = dns;
                have_dns = true;
            }
        }
    }

    config
}

fn parse_cidr(value: &str) -> Option<(Ipv4Addr, u8)> {
    let (ip, prefix) = value.split_once('/').unwrap_or((value, "32"));
    let prefix: u8 = prefix.parse().ok()?;
    if prefix > 32 {
        return None;
    }
    Some((ip.parse().ok()?, prefix))
}

pub fn prefix_to_netmask(prefix: u8) -> Ipv4Addr {
    let bits = match prefix {
        0 => 0,
        p if p >= 32 => u32::MAX,
        p => u32::MAX << (32 - u32::from(p)),
    };
    Ipv4Addr::from(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_terse_unescapes_colons() {
        let fields = split_terse(r"Cafe\: Guest:AA\:BB\:CC\:DD\:EE\:FF:6:70:WPA2");
        assert_eq!(
            fields,
            vec!["Cafe: Guest", "AA:BB:CC:DD:EE:FF", "6", "70", "WPA2"]
        );
    }

    #[test]
    fn test_parse_scan_output() {
        let out = concat!(
            "KTLT9000:AA\\:BB\\:CC\\:DD\\:EE\\:01:11:80:WPA1 WPA2\n",
            ":AA\\:BB\\:CC\\:DD\\:EE\\:02:1:40:WPA2\n",
            "Library:AA\\:BB\\:CC\\:DD\\:EE\\:03:36:100:\n",
            "garbage line\n",
        );

        let networks = parse_scan_output(out);
        assert_eq!(networks.len(), 3);

        assert_eq!(networks[0].ssid, "KTLT9000");
        assert_eq!(networks[0].bssid, "AA:BB:CC:DD:EE:01");
        assert_eq!(networks[0].channel, 11);
        assert_eq!(networks[0].rssi, -60);
        assert_eq!(networks[0].security, Security::WpaWpa2Psk);
        assert!(!networks[0].hidden);

        assert!(networks[1].hidden);
        assert_eq!(networks[1].ssid, "");

        assert_eq!(networks[2].security, Security::Open);
        assert_eq!(networks[2].rssi, -50);
    }

    #[test]
    fn test_parse_security() {
        assert_eq!(parse_security("--"), Security::Open);
        assert_eq!(parse_security("WEP"), Security::Wep);
        assert_eq!(parse_security("WPA1"), Security::WpaPsk);
        assert_eq!(parse_security("WPA2"), Security::Wpa2Psk);
        assert_eq!(parse_security("WPA2 WPA3"), Security::Wpa3Sae);
        assert_eq!(
            parse_security("WPA2 802.1X"),
            Security::Other("WPA2 802.1X".to_string())
        );
        assert_eq!(
            parse_security("WPA1 WPA2 802.1X"),
            Security::Other("WPA1 WPA2 802.1X".to_string())
        );
        assert_eq!(
            parse_security("802.1X"),
            Security::Other("802.1X".to_string())
        );
    }

    #[test]
    fn test_device_state_mapping() {
        assert_eq!(parse_device_state("100 (connected)\n"), Some(100));
        assert_eq!(parse_device_state("garbage"), None);
        assert_eq!(device_state_to_status(100), WlanStatus::GotIp);
        assert_eq!(device_state_to_status(50), WlanStatus::Connecting);
        assert_eq!(device_state_to_status(30), WlanStatus::Idle);
        assert_eq!(device_state_to_status(120), WlanStatus::ConnectFail);
        assert_eq!(device_state_to_status(20), WlanStatus::Unknown(20));
    }

    #[test]
    fn test_parse_wifi_device() {
        let listing = "eth0:ethernet\nwlp2s0:wifi\nlo:loopback\n";
        assert_eq!(parse_wifi_device(listing), Some("wlp2s0".to_string()));
        assert_eq!(parse_wifi_device("eth0:ethernet\n"), None);
    }

    #[test]
    fn test_parse_ip4_output() {
        let out = concat!(
            "IP4.ADDRESS[1]:192.168.1.23/24\n",
            "IP4.ADDRESS[2]:10.0.0.5/8\n",
            "IP4.GATEWAY:192.168.1.1\n",
            "IP4.DNS[1]:1.1.1.1\n",
            "IP4.DNS[2]:8.8.8.8\n",
        );
        let config = parse_ip4_output(out);
        assert_eq!(config.ip, Ipv4Addr::new(192, 168, 1, 23));
        assert_eq!(config.netmask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(config.gateway, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(config.dns, Ipv4Addr::new(1, 1, 1, 1));

        assert_eq!(parse_ip4_output(""), IfConfig::default());
    }

    #[test]
    fn test_prefix_to_netmask() {
        assert_eq!(prefix_to_netmask(0), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(prefix_to_netmask(20), Ipv4Addr::new(255, 255, 240, 0));
        assert_eq!(prefix_to_netmask(32), Ipv4Addr::new(255, 255, 255, 255));
    }

    #[test]
    fn test_redact_hides_password_argument() {
        let args = ["device", "wifi", "connect", "home", "password", "s3cret"];
        assert_eq!(
            redact(&args),
            vec!["device", "wifi", "connect", "home", "password", "********"]
        );
    }
}
