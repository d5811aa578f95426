//! Runtime settings for llmfit-setup
//!
//! Settings are loaded from environment variables with defaults, then
//! overridden by command line flags.
//!
//! # Environment Variables
//!
//! - `LLMFIT_SETUP_CONFIG`: opencode config file - default: "opencode.json"
//! - `LLMFIT_SETUP_SCRIPT`: vLLM launch script - default: "run.sh"
//! - `LLMFIT_SETUP_UPDATE_SCRIPT`: patch the launch script (true|false) - default: "false"
//! - `LLMFIT_SETUP_LLMFIT`: explicit llmfit executable, skips the lookup
//! - `LLMFIT_SETUP_LOG_LEVEL`: logging level - default: "info"
//!
//! Relative config and script paths resolve against the working directory.

use crate::opencode::DEFAULT_CONFIG_FILE;
use crate::script::DEFAULT_SCRIPT_FILE;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_UPDATE_SCRIPT: bool = false;

pub const ENV_CONFIG: &str = "LLMFIT_SETUP_CONFIG";
pub const ENV_SCRIPT: &str = "LLMFIT_SETUP_SCRIPT";
pub const ENV_UPDATE_SCRIPT: &str = "LLMFIT_SETUP_UPDATE_SCRIPT";
pub const ENV_LLMFIT: &str = "LLMFIT_SETUP_LLMFIT";
pub const ENV_LOG_LEVEL: &str = "LLMFIT_SETUP_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    /// Directory checked first for llmfit and used to resolve relative paths
    pub working_dir: PathBuf,

    pub config_file: PathBuf,

    pub script_file: PathBuf,

    /// Whether the launch script gets the best model written into it
    pub update_script: bool,

    /// Skips the executable lookup when set
    pub llmfit_path: Option<PathBuf>,

    pub log_level: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        let config_file = env::var(ENV_CONFIG)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let script_file = env::var(ENV_SCRIPT)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCRIPT_FILE));

        let update_script = env::var(ENV_UPDATE_SCRIPT)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_UPDATE_SCRIPT);

        let llmfit_path = env::var_os(ENV_LLMFIT)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let log_level = env::var(ENV_LOG_LEVEL)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            working_dir: PathBuf::from("."),
            config_file,
            script_file,
            update_script,
            llmfit_path,
            log_level,
        }
    }
}

impl SetupConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.working_dir.is_dir() {
            return Err(ConfigError::ValidationFailed(format!(
                "Working directory {} is not a directory",
                self.working_dir.display()
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.working_dir.join(&self.config_file)
    }

    pub fn script_path(&self) -> PathBuf {
        self.working_dir.join(&self.script_file)
    }
}

impl fmt::Display for SetupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "llmfit-setup configuration:")?;
        writeln!(f, "  Working Dir: {}", self.working_dir.display())?;
        writeln!(f, "  Config: {}", self.config_path().display())?;
        writeln!(f, "  Script: {}", self.script_path().display())?;
        writeln!(f, "  Update Script: {}", self.update_script)?;
        if let Some(ref path) = self.llmfit_path {
            writeln!(f, "  llmfit: {}", path.display())?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
