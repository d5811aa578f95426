//! llmfit-setup - configure opencode's vLLM provider from llmfit recommendations
//!
//! `llmfit recommend --json` reports which models fit the local hardware. This
//! crate runs it and adds every recommended model missing from
//! `provider.vllm.models` in `opencode.json`, leaving existing entries alone.
//! It can also point a vLLM launch script at the top recommendation.
//!
//! # Example Usage
//!
//! ```no_run
//! use llmfit_setup::progress::LoggingHandler;
//! use llmfit_setup::{AutoConfigurator, SetupConfig};
//!
//! let config = SetupConfig::default();
//! let summary = AutoConfigurator::new(&config, &LoggingHandler).run()?;
//! println!("added {} models", summary.merge.added.len());
//! # Ok::<(), llmfit_setup::SetupError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`locator`]: finds the llmfit executable
//! - [`recommend`]: runs llmfit and parses its recommendations
//! - [`opencode`]: merges recommendations into `opencode.json`
//! - [`script`]: rewrites the `--model` flag of a launch script
//! - [`pipeline`]: runs the stages in order

pub mod cli;
pub mod config;
pub mod error;
pub mod locator;
pub mod opencode;
pub mod pipeline;
pub mod progress;
pub mod recommend;
pub mod script;
pub mod util;

pub use config::{ConfigError, SetupConfig};
pub use error::SetupError;
pub use locator::{Located, LocationSource, Locator, LocatorError};
pub use opencode::{MergeOutcome, ModelEntry, OpencodeConfig, OpencodeError};
pub use pipeline::{AutoConfigurator, RunSummary};
pub use recommend::{
    LlmfitRecommender, RecommendError, Recommendation, RecommendationSet, Recommender,
};
pub use script::ScriptError;
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
