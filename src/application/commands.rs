// Command dispatch - control actions forwarded to the device
use crate::application::device_api::{DeviceApi, TransportError};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Restart,
    SetFrequency(u32),
    SetVoltage(u32),
    SetFanspeed(u32),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Restart => "restart",
            Command::SetFrequency(_) => "set_frequency",
            Command::SetVoltage(_) => "set_voltage",
            Command::SetFanspeed(_) => "set_fanspeed",
        }
    }
}

/// Failure of a control action, surfaced to the caller as-is. Mirrors the
/// transport taxonomy; no retries happen here.
#[derive(Debug, Clone, thiserror::Error)]
#[error(transparent)]
pub struct CommandError(#[from] pub TransportError);

/// Sends control actions through the device API. Parameter validation is the
/// caller's concern; values are forwarded as given. Callers typically
/// request a coordinator refresh after a successful command to observe the
/// effect.
#[derive(Clone)]
pub struct CommandDispatcher {
    api: Arc<dyn DeviceApi>,
}

impl CommandDispatcher {
    pub fn new(api: Arc<dyn DeviceApi>) -> Self {
        Self { api }
    }

    pub async fn send(&self, command: Command) -> Result<(), CommandError> {
        let result = match command {
            Command::Restart => self.api.restart().await,
            Command::SetFrequency(mhz) => self.api.set_frequency(mhz).await,
            Command::SetVoltage(mv) => self.api.set_voltage(mv).await,
            Command::SetFanspeed(percent) => self.api.set_fanspeed(percent).await,
        };
        match result {
            Ok(()) => {
                tracing::info!("command {} accepted", command.name());
                Ok(())
            }
            Err(err) => {
                tracing::warn!("command {} failed: {}", command.name(), err);
                Err(err.into())
            }
        }
    }
}
