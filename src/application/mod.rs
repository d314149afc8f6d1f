// Application layer - use cases and the device API seam
pub mod commands;
pub mod coordinator;
pub mod device_api;
