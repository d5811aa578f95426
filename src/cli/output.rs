//! Human-readable progress trace
//!
//! Every stage prints one status line prefixed with a marker. Normal lines go
//! to stdout; fatal diagnostics go to stderr and are shown even in quiet mode.

use crate::locator::LocationSource;
use crate::progress::{ProgressEvent, ProgressHandler};

/// Where a rendered line is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Renders a progress event as a console line
pub fn render(event: &ProgressEvent) -> (Stream, String) {
    let line = match event {
        ProgressEvent::Started => "🚀 Starting auto-configuration process...".to_string(),
        ProgressEvent::ToolLocated { path, source } => match source {
            LocationSource::WorkingDir => format!("✅ Found {} in current directory.", path),
            LocationSource::SearchPath => format!("✅ Found llmfit in PATH: {}", path),
            LocationSource::Override => format!("✅ Using llmfit at {}", path),
        },
        ProgressEvent::RecommendStarted => {
            "🔍 Running llmfit to detect hardware and recommend models...".to_string()
        }
        ProgressEvent::RecommendationsReceived { count } => {
            format!("✅ llmfit recommended {} model{}.", count, plural(*count))
        }
        ProgressEvent::NoRecommendations => {
            "⚠️ llmfit returned no model recommendations.".to_string()
        }
        ProgressEvent::ConfigUpdating { path } => format!("📝 Updating {}...", path),
        ProgressEvent::ModelAdded { model, path } => format!("  ➕ Added {} to {}", model, path),
        ProgressEvent::ConfigUpdated { path, added } => {
            format!("✅ Successfully added {} models to {}.", added, path)
        }
        ProgressEvent::ConfigUpToDate { path } => {
            format!("ℹ️ {} is already up-to-date with llmfit recommendations.", path)
        }
        ProgressEvent::ScriptUpdating { path, model } => {
            format!("📝 Updating {} with best model: {}...", path, model)
        }
        ProgressEvent::ScriptUpdated { path, model } => {
            format!("✅ Successfully set default model to {} in {}.", model, path)
        }
        ProgressEvent::ScriptSkipped { reason } => format!("❌ {}", reason),
        ProgressEvent::Completed => "🎉 Auto-configuration complete!".to_string(),
        ProgressEvent::Failed { error } => return (Stream::Stderr, format!("❌ {}", error)),
    };
    (Stream::Stdout, line)
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Prints the progress trace to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleHandler {
    quiet: bool,
}

impl ConsoleHandler {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ProgressHandler for ConsoleHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match render(event) {
            (Stream::Stderr, line) => eprintln!("{}", line),
            (Stream::Stdout, line) if !self.quiet => println!("{}", line),
            _ => {}
        }
    }
}
