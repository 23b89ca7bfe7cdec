pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::WirelessConfig;

pub use adapters::NmcliDriver;
pub use crate::core::{Wireless, WlanDriver};
pub use domain::model::{
    status_message, ConnectOutcome, ConnectReport, ConnectTiming, IfConfig, ScanResult, Security,
    WlanStatus,
};
pub use utils::error::{Result, WirelessError};
