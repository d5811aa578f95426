//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started => info!("Starting auto-configuration"),
            ProgressEvent::ToolLocated { path, source } => {
                info!(path = %path, source = %source, "Located llmfit");
            }
            ProgressEvent::RecommendStarted => debug!("Running llmfit recommend"),
            ProgressEvent::RecommendationsReceived { count } => {
                info!(count, "Received recommendations");
            }
            ProgressEvent::ConfigUpdating { path } => {
                debug!(path = %path, "Updating config");
            }
            ProgressEvent::ModelAdded { model, path } => {
                info!(model = %model, path = %path, "Added model");
            }
            ProgressEvent::ConfigUpdated { path, added } => {
                info!(path = %path, added, "Config updated");
            }
            ProgressEvent::ConfigUpToDate { path } => {
                info!(path = %path, "Config already up-to-date");
            }
            ProgressEvent::ScriptUpdating { path, model } => {
                debug!(path = %path, model = %model, "Updating launch script");
            }
            ProgressEvent::ScriptUpdated { path, model } => {
                info!(path = %path, model = %model, "Launch script updated");
            }
            ProgressEvent::ScriptSkipped { reason } => {
                warn!(reason = %reason, "Launch script not updated");
            }
            ProgressEvent::NoRecommendations => warn!("llmfit returned no recommendations"),
            ProgressEvent::Completed => info!("Auto-configuration complete"),
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Auto-configuration failed");
            }
        }
    }
}
