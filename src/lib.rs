// Library interface for azdo-dash - lets integration tests drive the dashboard state
pub mod app;
pub mod azure;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod refresh;
pub mod ui;
