//! Progress handler trait and events

use crate::locator::LocationSource;

/// Events emitted while configuring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Run started
    Started,

    /// llmfit executable resolved
    ToolLocated {
        path: String,
        source: LocationSource,
    },

    /// llmfit invocation started
    RecommendStarted,

    /// llmfit returned a parseable recommendation list
    RecommendationsReceived { count: usize },

    /// Config file is about to be read and merged
    ConfigUpdating { path: String },

    /// A model entry was inserted
    ModelAdded { model: String, path: String },

    /// Config file written back
    ConfigUpdated { path: String, added: usize },

    /// No recommendation was missing from the config
    ConfigUpToDate { path: String },

    /// Launch script is about to be patched
    ScriptUpdating { path: String, model: String },

    /// Launch script now points at the model
    ScriptUpdated { path: String, model: String },

    /// Launch script could not be patched; the run continues
    ScriptSkipped { reason: String },

    /// llmfit returned an empty list; nothing to recommend
    NoRecommendations,

    /// Run finished successfully
    Completed,

    /// Run stopped on a fatal error
    Failed { error: String },
}

/// Trait for handling progress events
pub trait ProgressHandler {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
