pub mod constants;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

// Application use cases and their output adapters
pub mod app;
pub mod infra;
