// Device API boundary - the capability to talk to one AxeOS miner
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Classified outcome of a failed device request. Always recoverable; the
/// coordinator retries on its next cycle, nothing at this layer does.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("device returned HTTP {0}")]
    HttpStatus(u16),
}

impl TransportError {
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Timeout => "timeout",
            TransportError::ConnectionFailed(_) => "connection_failed",
            TransportError::HttpStatus(_) => "http_status",
        }
    }
}

#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Fetch the raw telemetry payload (GET /api/system/info).
    async fn system_info(&self) -> Result<Value, TransportError>;

    /// Restart the miner.
    async fn restart(&self) -> Result<(), TransportError>;

    /// Set the ASIC frequency in MHz.
    async fn set_frequency(&self, frequency: u32) -> Result<(), TransportError>;

    /// Set the core voltage in mV.
    async fn set_voltage(&self, voltage: u32) -> Result<(), TransportError>;

    /// Set the fan speed in percent.
    async fn set_fanspeed(&self, fanspeed: u32) -> Result<(), TransportError>;
}
