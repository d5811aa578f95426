//! Merges llmfit recommendations into opencode's `opencode.json`
//!
//! The document is kept as an untyped JSON tree so that everything outside
//! `provider.vllm.models` survives the round-trip unchanged, key order
//! included. Only new entries are typed, via [`ModelEntry`].
//!
//! The merge is additive: an identifier already present under `models` is
//! never touched, which makes repeated runs idempotent.

use crate::recommend::{Recommendation, RecommendationSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "opencode.json";

/// Upper bound for the derived `maxTokens` setting
pub const MAX_TOKENS_CAP: u64 = 8192;

#[derive(Debug, Error)]
pub enum OpencodeError {
    #[error("{} not found.", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {} format. {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Entry stored under `provider.vllm.models.<id>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub name: String,
    pub context_window: u64,
    pub max_tokens: u64,
}

impl ModelEntry {
    pub fn from_recommendation(rec: &Recommendation) -> Self {
        let context_window = rec.context_window();
        Self {
            name: format!("{} (vLLM, {})", rec.basename(), rec.quant()),
            context_window,
            max_tokens: max_tokens_for(context_window),
        }
    }
}

pub fn max_tokens_for(context_window: u64) -> u64 {
    MAX_TOKENS_CAP.min(context_window / 4)
}

/// Result of a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Identifiers inserted by this merge, in recommendation order
    pub added: Vec<String>,
    /// First recommendation, whether or not it was inserted
    pub best_model: Option<String>,
}

impl MergeOutcome {
    pub fn is_up_to_date(&self) -> bool {
        self.added.is_empty()
    }
}

/// In-memory `opencode.json` document
#[derive(Debug, Clone)]
pub struct OpencodeConfig {
    path: PathBuf,
    document: Value,
}

impl OpencodeConfig {
    /// Reads and validates the document. Nothing is written on failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OpencodeError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(OpencodeError::NotFound(path));
        }

        let content = fs::read_to_string(&path).map_err(|source| OpencodeError::Read {
            path: path.clone(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&content).map_err(|source| OpencodeError::Parse {
                path: path.clone(),
                source,
            })?;

        debug!("Loaded {} ({} bytes)", path.display(), content.len());
        Self::from_value(path, document)
    }

    pub fn from_value(path: impl Into<PathBuf>, document: Value) -> Result<Self, OpencodeError> {
        let config = Self {
            path: path.into(),
            document,
        };
        config.check_shape()?;
        Ok(config)
    }

    fn malformed(&self, reason: impl Into<String>) -> OpencodeError {
        OpencodeError::Malformed {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn check_shape(&self) -> Result<(), OpencodeError> {
        let vllm = self
            .document
            .get("provider")
            .and_then(|provider| provider.get("vllm"))
            .ok_or_else(|| self.malformed("Missing provider.vllm"))?;

        let vllm = vllm
            .as_object()
            .ok_or_else(|| self.malformed("provider.vllm must be an object"))?;

        match vllm.get("models") {
            None | Some(Value::Object(_)) => Ok(()),
            Some(_) => Err(self.malformed("provider.vllm.models must be an object")),
        }
    }

    /// `provider.vllm.models`, created empty when absent
    fn models_mut(&mut self) -> Result<&mut Map<String, Value>, OpencodeError> {
        let malformed = self.malformed("Missing provider.vllm");
        let vllm = self
            .document
            .get_mut("provider")
            .and_then(|provider| provider.get_mut("vllm"))
            .and_then(Value::as_object_mut)
            .ok_or(malformed)?;

        if !vllm.contains_key("models") {
            debug!("Creating provider.vllm.models");
            vllm.insert("models".to_string(), Value::Object(Map::new()));
        }

        match vllm.get_mut("models") {
            Some(Value::Object(models)) => Ok(models),
            _ => Err(OpencodeError::Malformed {
                path: self.path.clone(),
                reason: "provider.vllm.models must be an object".to_string(),
            }),
        }
    }

    pub fn models(&self) -> Option<&Map<String, Value>> {
        self.document
            .get("provider")?
            .get("vllm")?
            .get("models")?
            .as_object()
    }

    pub fn contains_model(&self, id: &str) -> bool {
        self.models().is_some_and(|models| models.contains_key(id))
    }

    /// Inserts every recommendation whose identifier is not already configured
    pub fn merge(
        &mut self,
        recommendations: &RecommendationSet,
    ) -> Result<MergeOutcome, OpencodeError> {
        let best_model = recommendations.best().map(|rec| rec.name.clone());
        let models = self.models_mut()?;

        let mut added = Vec::new();
        for rec in &recommendations.models {
            if models.contains_key(&rec.name) {
                debug!("{} already configured, leaving it untouched", rec.name);
                continue;
            }

            let entry = ModelEntry::from_recommendation(rec);
            debug!(
                "Adding {} (contextWindow={}, maxTokens={})",
                rec.name, entry.context_window, entry.max_tokens
            );
            models.insert(rec.name.clone(), model_entry_value(&entry));
            added.push(rec.name.clone());
        }

        Ok(MergeOutcome { added, best_model })
    }

    /// Serialises the document with 2-space indentation
    pub fn to_pretty_string(&self) -> String {
        let mut content = serde_json::to_string_pretty(&self.document)
            .unwrap_or_else(|_| self.document.to_string());
        content.push('\n');
        content
    }

    pub fn save(&self) -> Result<(), OpencodeError> {
        let content = self.to_pretty_string();
        fs::write(&self.path, &content).map_err(|source| OpencodeError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} ({} bytes)", self.path.display(), content.len());
        Ok(())
    }
}

fn model_entry_value(entry: &ModelEntry) -> Value {
    let mut object = Map::new();
    object.insert("name".to_string(), Value::from(entry.name.clone()));
    object.insert("contextWindow".to_string(), Value::from(entry.context_window));
    object.insert("maxTokens".to_string(), Value::from(entry.max_tokens));
    Value::Object(object)
}

/// Load, merge and write back `path` in one read-modify-write
pub fn update_config_file(
    path: impl AsRef<Path>,
    recommendations: &RecommendationSet,
) -> Result<MergeOutcome, OpencodeError> {
    let mut config = OpencodeConfig::load(path)?;
    let outcome = config.merge(recommendations)?;
    config.save()?;
    Ok(outcome)
}
