use crate::config::toml_config::{
    WirelessConfig, RETRY_MAX, RETRY_MIN, SSID_MAX_LEN, SSID_MIN_LEN,
};
use crate::domain::model::{
    ConnectOutcome, ConnectReport, ConnectTiming, ScanResult, WlanStatus,
};
use crate::domain::ports::WlanDriver;
use crate::utils::error::{Result, WirelessError};
use crate::utils::validation;
use chrono::Utc;
use std::fmt;
use std::time::Duration;

/// Station-mode controller: holds credentials and retry settings for one
/// network and drives a [`WlanDriver`] through the connect sequence.
pub struct Wireless<D: WlanDriver> {
    driver: D,
    ssid: String,
    password: String,
    attempts: u8,
    wait_loops: u8,
    timing: ConnectTiming,
}

impl<D: WlanDriver> Wireless<D> {
    /// Validates the settings, then power-cycles the radio.
    pub async fn new(
        driver: D,
        ssid: impl Into<String>,
        password: impl Into<String>,
        attempts: u8,
        wait_loops: u8,
    ) -> Result<Self> {
        let ssid = ssid.into();
        validate_ssid(&ssid)?;
        validate_retry("attempts", attempts)?;
        validate_retry("wait_loops", wait_loops)?;

        driver.set_active(false).await?;

        let wireless = Self {
            driver,
            ssid,
            password: password.into(),
            attempts,
            wait_loops,
            timing: ConnectTiming::default(),
        };

        wireless.driver.set_active(true).await?;
        tracing::debug!("Instantiated {}", wireless);
        Ok(wireless)
    }

    pub async fn from_config(driver: D, config: &WirelessConfig) -> Result<Self> {
        let wireless = Self::new(
            driver,
            config.ssid()?,
            config.password(),
            config.attempts(),
            config.wait_loops(),
        )
        .await?;
        Ok(wireless.with_timing(config.timing()))
    }

    pub fn with_timing(mut self, timing: ConnectTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn set_ssid(&mut self, ssid: impl Into<String>) -> Result<()> {
        let ssid = ssid.into();
        validate_ssid(&ssid)?;
        self.ssid = ssid;
        Ok(())
    }

    /// The password is write-only.
    pub fn password(&self) -> Option<&str> {
        None
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    pub fn set_attempts(&mut self, attempts: u8) -> Result<()> {
        validate_retry("attempts", attempts)?;
        self.attempts = attempts;
        Ok(())
    }

    pub fn wait_loops(&self) -> u8 {
        self.wait_loops
    }

    pub fn set_wait_loops(&mut self, wait_loops: u8) -> Result<()> {
        validate_retry("wait_loops", wait_loops)?;
        self.wait_loops = wait_loops;
        Ok(())
    }

    pub fn timing(&self) -> ConnectTiming {
        self.timing
    }

    pub async fn is_connected(&self) -> Result<bool> {
        self.driver.is_connected().await
    }

    pub async fn status(&self) -> Result<WlanStatus> {
        self.driver.status().await
    }

    pub async fn available_wlans(&self) -> Result<Vec<ScanResult>> {
        scan_networks(&self.driver, self.timing.wake).await
    }

    /// Runs the attempt/poll loop and returns the transcript.
    ///
    /// A [`WirelessError::Driver`] from the radio's connect request and
    /// running out of attempts are reported through the outcome; every other
    /// error (device lookup, I/O, missing tooling) is returned as `Err`.
    pub async fn connect(&self) -> Result<ConnectReport> {
        let mut transcript = Transcript::new();

        if self.driver.is_connected().await? {
            let ip = self.driver.ifconfig().await?.ip;
            transcript.push(ip.to_string());
            return Ok(transcript.finish(ConnectOutcome::AlreadyConnected { ip }));
        }

        self.driver.set_active(true).await?;
        pause(self.timing.wake).await;

        let mut last_status = WlanStatus::Idle;

        for attempt in (1..=self.attempts).rev() {
            transcript.push(format!("WLAN {}", attempt));

            match self.driver.connect(&self.ssid, &self.password).await {
                Ok(()) => {}
                Err(e @ WirelessError::Driver { .. }) => {
                    tracing::warn!("Connect request for '{}' refused: {}", self.ssid, e);
                    transcript.push(format!("{}. Probably wrong network password", e));
                    return Ok(transcript.finish(ConnectOutcome::Rejected {
                        reason: e.to_string(),
                    }));
                }
                Err(e) => return Err(e),
            }
            pause(self.timing.settle).await;

            for remaining in (1..=self.wait_loops).rev() {
                if self.driver.is_connected().await? {
                    let ip = self.driver.ifconfig().await?.ip;
                    transcript.push(format!(" {}", ip));
                    tracing::info!("Connected to '{}' as {}", self.ssid, ip);
                    return Ok(transcript.finish(ConnectOutcome::Connected { ip }));
                }
                if remaining > 1 {
                    transcript.push(format!(" Wait {}", remaining));
                    pause(self.timing.wait).await;
                }
            }

            last_status = self.driver.status().await?;
            transcript.push(last_status.message());
            if attempt > 1 {
                pause(self.timing.attempt).await;
            }
        }

        transcript.push("WLAN connection failed".to_string());
        tracing::warn!(
            "Giving up on '{}' after {} attempts ({})",
            self.ssid,
            self.attempts,
            last_status
        );
        Ok(transcript.finish(ConnectOutcome::Failed {
            status: last_status,
        }))
    }

    pub async fn disconnect(&self) -> Result<bool> {
        disconnect_radio(&self.driver).await
    }
}

impl<D: WlanDriver> fmt::Display for Wireless<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wireless(ssid={})", self.ssid)
    }
}

impl<D: WlanDriver> fmt::Debug for Wireless<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Scan, waking the radio first if needed and putting it back to sleep afterwards.
pub async fn scan_networks<D: WlanDriver + ?Sized>(
    driver: &D,
    wake: Duration,
) -> Result<Vec<ScanResult>> {
    let was_active = driver.is_active().await?;
    if !was_active {
        driver.set_active(true).await?;
        pause(wake).await;
    }

    let scanned = driver.scan().await;

    if !was_active {
        driver.set_active(false).await?;
    }

    let networks = scanned?;
    tracing::debug!("Scan found {} networks", networks.len());
    Ok(networks)
}

/// Returns whether a link was actually torn down.
pub async fn disconnect_radio<D: WlanDriver + ?Sized>(driver: &D) -> Result<bool> {
    if !driver.is_connected().await? {
        return Ok(false);
    }
    driver.disconnect().await?;
    driver.set_active(false).await?;
    tracing::info!("Disconnected and powered down the radio");
    Ok(true)
}

fn validate_ssid(ssid: &str) -> Result<()> {
    validation::validate_length("ssid", ssid, SSID_MIN_LEN, SSID_MAX_LEN)
}

fn validate_retry(field: &str, value: u8) -> Result<()> {
    validation::validate_range(field, value, RETRY_MIN, RETRY_MAX)
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

struct Transcript {
    messages: Vec<String>,
    started_at: chrono::DateTime<Utc>,
}

impl Transcript {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            started_at: Utc::now(),
        }
    }

    fn push(&mut self, message: String) {
        tracing::debug!("{}", message);
        self.messages.push(message);
    }

    fn finish(self, outcome: ConnectOutcome) -> ConnectReport {
        ConnectReport {
            messages: self.messages,
            outcome,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
