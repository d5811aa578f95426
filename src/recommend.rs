//! Model recommendations produced by `llmfit recommend --json`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONTEXT_LENGTH: u64 = 32_768;
pub const DEFAULT_QUANT: &str = "auto";

/// One suggested model. Fields the tool emits beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_quant: Option<String>,
}

impl Recommendation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context_length: None,
            best_quant: None,
        }
    }

    pub fn with_context_length(mut self, context_length: u64) -> Self {
        self.context_length = Some(context_length);
        self
    }

    pub fn with_quant(mut self, quant: impl Into<String>) -> Self {
        self.best_quant = Some(quant.into());
        self
    }

    pub fn context_window(&self) -> u64 {
        self.context_length.unwrap_or(DEFAULT_CONTEXT_LENGTH)
    }

    pub fn quant(&self) -> &str {
        self.best_quant.as_deref().unwrap_or(DEFAULT_QUANT)
    }

    /// Trailing segment of the identifier after the last `/`
    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Ordered list of recommendations, best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    #[serde(default)]
    pub models: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn new(models: Vec<Recommendation>) -> Self {
        Self { models }
    }

    pub fn best(&self) -> Option<&Recommendation> {
        self.models.first()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Failed to run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("llmfit failed ({}): {}", describe_status(*code), stderr.trim_end())]
    ProcessFailed { code: Option<i32>, stderr: String },

    #[error("Failed to parse llmfit JSON output: {source}\nOutput was: {output}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        output: String,
    },

    #[error("Unexpected llmfit JSON output: {reason}\nOutput was: {output}")]
    UnexpectedShape { reason: String, output: String },
}

fn describe_status(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Source of model recommendations
pub trait Recommender {
    fn recommend(&self) -> Result<RecommendationSet, RecommendError>;
}

/// Runs the `llmfit` executable and parses its stdout
#[derive(Debug, Clone)]
pub struct LlmfitRecommender {
    program: PathBuf,
    args: Vec<String>,
}

impl LlmfitRecommender {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec!["recommend".to_string(), "--json".to_string()],
        }
    }

}

impl Recommender for LlmfitRecommender {
    fn recommend(&self) -> Result<RecommendationSet, RecommendError> {
        debug!("Running {} {}", self.program.display(), self.args.join(" "));

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| RecommendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(process_failed(output.status, &output.stderr));
        }

        debug!("llmfit produced {} bytes of output", stdout.len());
        let set = parse_recommendations(&stdout)?;
        debug!("llmfit recommended {} models", set.len());
        Ok(set)
    }
}

fn process_failed(status: ExitStatus, stderr: &[u8]) -> RecommendError {
    RecommendError::ProcessFailed {
        code: status.code(),
        stderr: String::from_utf8_lossy(stderr).into_owned(),
    }
}

/// Parses the JSON document printed by `llmfit recommend --json`
///
/// The top level and every entry of `models` must be JSON objects; arrays are
/// never read positionally.
pub fn parse_recommendations(output: &str) -> Result<RecommendationSet, RecommendError> {
    let invalid_json = |source: serde_json::Error| RecommendError::InvalidJson {
        source,
        output: output.to_string(),
    };

    let document: Value = serde_json::from_str(output).map_err(invalid_json)?;
    check_shape(&document).map_err(|reason| RecommendError::UnexpectedShape {
        reason: reason.to_string(),
        output: output.to_string(),
    })?;

    serde_json::from_value(document).map_err(invalid_json)
}

fn check_shape(document: &Value) -> Result<(), &'static str> {
    let object = document
        .as_object()
        .ok_or("expected a JSON object at the top level")?;

    match object.get("models") {
        None => Ok(()),
        Some(Value::Array(models)) if models.iter().all(Value::is_object) => Ok(()),
        Some(Value::Array(_)) => Err("every entry of \"models\" must be an object"),
        Some(_) => Err("\"models\" must be a list"),
    }
}
