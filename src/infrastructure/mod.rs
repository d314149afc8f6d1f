// Infrastructure layer - External dependencies and adapters
pub mod axeos_client;
pub mod config;
pub mod normalize;
