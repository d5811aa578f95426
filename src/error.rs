use crate::config::ConfigError;
use crate::locator::LocatorError;
use crate::opencode::OpencodeError;
use crate::recommend::RecommendError;
use thiserror::Error;

/// Conditions that stop a run
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ToolNotFound(#[from] LocatorError),

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error(transparent)]
    Opencode(#[from] OpencodeError),
}

impl SetupError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
