//! Outer surface for the Postmill automation engine.
//!
//! - [`AppConfig`]: layered TOML/environment configuration
//! - [`create_router`]: the dashboard's HTTP API over an [`AutomationEngine`](postmill_engine::AutomationEngine)
//! - [`spawn_interval_trigger`]: the built-in periodic trigger
//! - [`build_engine`] / [`serve`]: wiring used by the `postmill` binary

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod app;
mod config;
mod error;
mod observability;
mod trigger;

pub use api::{ApiState, create_router};
pub use app::{build_engine, serve};
pub use config::{AppConfig, LoggingConfig, ServerConfig};
pub use error::ApiError;
pub use observability::init_logging;
pub use trigger::spawn_interval_trigger;
