pub mod wireless;

pub use crate::domain::model::{ConnectOutcome, ConnectReport, ConnectTiming, ScanResult, WlanStatus};
pub use crate::domain::ports::WlanDriver;
pub use crate::utils::error::Result;
pub use wireless::{disconnect_radio, scan_networks, Wireless};
