//! Utility modules for llmfit-setup

pub mod logging;

pub use logging::{init_from_env, init_logging, LoggingConfig};
