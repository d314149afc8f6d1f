// Presentation layer - HTTP API for subscribers and control
pub mod app_state;
pub mod handlers;
