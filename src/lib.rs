pub mod api;
pub mod config;
pub mod core;
pub mod jobs;
pub mod registry;
pub mod telemetry;
