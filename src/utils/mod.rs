//! # Utility Modules
//!
//! Supporting utilities shared across the crate.
//!
//! ## Components
//! - **Logging**: structured logging configuration via `tracing-subscriber`

pub mod logging;

pub use logging::init_logging;
