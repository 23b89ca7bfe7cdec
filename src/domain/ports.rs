use crate::domain::model::{IfConfig, ScanResult, WlanStatus};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A radio interface in station mode.
///
/// `connect` only starts association; callers poll `is_connected` and
/// `status` to learn how it went. An `Err` from `connect` means the
/// request was refused outright (typically bad credentials).
#[async_trait]
pub trait WlanDriver: Send + Sync {
    async fn is_active(&self) -> Result<bool>;
    async fn set_active(&self, active: bool) -> Result<()>;
    async fn is_connected(&self) -> Result<bool>;
    async fn connect(&self, ssid: &str, password: &str) -> Result<()>;
    async fn disconnect(&self) -> Result<()>;
    async fn status(&self) -> Result<WlanStatus>;
    async fn scan(&self) -> Result<Vec<ScanResult>>;
    async fn ifconfig(&self) -> Result<IfConfig>;
}
