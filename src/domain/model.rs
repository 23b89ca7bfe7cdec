use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Link status as reported by the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WlanStatus {
    Idle,
    Connecting,
    GotIp,
    ConnectFail,
    NoApFound,
    WrongPassword,
    Unknown(i32),
}

impl WlanStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Idle,
            1 => Self::Connecting,
            3 => Self::GotIp,
            -1 => Self::ConnectFail,
            -2 => Self::NoApFound,
            -3 => Self::WrongPassword,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Idle => 0,
            Self::Connecting => 1,
            Self::GotIp => 3,
            Self::ConnectFail => -1,
            Self::NoApFound => -2,
            Self::WrongPassword => -3,
            Self::Unknown(code) => *code,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::Connecting => f.write_str("CONNECTING"),
            Self::GotIp => f.write_str("GOT_IP"),
            Self::ConnectFail => f.write_str("CONNECT_FAIL"),
            Self::NoApFound => f.write_str("NO_AP_FOUND"),
            Self::WrongPassword => f.write_str("WRONG_PASSWORD"),
            Self::Unknown(code) => write!(f, "ERROR {}?", code),
        }
    }
}

/// Describe a raw radio status code.
pub fn status_message(code: i32) -> String {
    WlanStatus::from_code(code).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Security {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
    Wpa3Sae,
    Other(String),
}

impl Security {
    pub fn code(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Wep => 1,
            Self::WpaPsk => 2,
            Self::Wpa2Psk => 3,
            Self::WpaWpa2Psk => 4,
            Self::Wpa3Sae => 5,
            Self::Other(_) => 255,
        }
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Wep => f.write_str("WEP"),
            Self::WpaPsk => f.write_str("WPA-PSK"),
            Self::Wpa2Psk => f.write_str("WPA2-PSK"),
            Self::WpaWpa2Psk => f.write_str("WPA/WPA2-PSK"),
            Self::Wpa3Sae => f.write_str("WPA3-SAE"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub ssid: String,
    pub bssid: String,
    pub channel: u16,
    /// dBm
    pub rssi: i16,
    pub security: Security,
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfConfig {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dns: Ipv4Addr,
}

impl Default for IfConfig {
    fn default() -> Self {
        Self {
            ip: Ipv4Addr::UNSPECIFIED,
            netmask: Ipv4Addr::UNSPECIFIED,
            gateway: Ipv4Addr::UNSPECIFIED,
            dns: Ipv4Addr::UNSPECIFIED,
        }
    }
}

/// Delays used while connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectTiming {
    /// After activating the radio.
    pub wake: Duration,
    /// After issuing a connect request, before polling.
    pub settle: Duration,
    /// Between polls within one attempt.
    pub wait: Duration,
    /// Between attempts.
    pub attempt: Duration,
}

impl ConnectTiming {
    pub const fn immediate() -> Self {
        Self {
            wake: Duration::ZERO,
            settle: Duration::ZERO,
            wait: Duration::ZERO,
            attempt: Duration::ZERO,
        }
    }
}

impl Default for ConnectTiming {
    fn default() -> Self {
        Self {
            wake: Duration::from_secs(1),
            settle: Duration::from_secs(1),
            wait: Duration::from_secs(7),
            attempt: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ConnectOutcome {
    AlreadyConnected { ip: Ipv4Addr },
    Connected { ip: Ipv4Addr },
    Rejected { reason: String },
    Failed { status: WlanStatus },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectReport {
    pub messages: Vec<String>,
    pub outcome: ConnectOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ConnectReport {
    pub fn is_connected(&self) -> bool {
        matches!(
            self.outcome,
            ConnectOutcome::AlreadyConnected { .. } | ConnectOutcome::Connected { .. }
        )
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        match self.outcome {
            ConnectOutcome::AlreadyConnected { ip } | ConnectOutcome::Connected { ip } => Some(ip),
            _ => None,
        }
    }
}
