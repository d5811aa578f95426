//! Sets the default model in the vLLM launch script
//!
//! Only the first line carrying a `--model ` flag is rewritten; every other
//! byte of the script is written back as it was read.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SCRIPT_FILE: &str = "run.sh";

const MODEL_FLAG: &str = "--model ";

/// Failures here never abort a run
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("{} not found.", .0.display())]
    NotFound(PathBuf),

    #[error("Could not find '--model' flag in {} to update.", .0.display())]
    NoModelFlag(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rewrites the first `--model` line of `content`, or returns `None` when no
/// line carries the flag
pub fn patch_model_line(content: &str, model: &str) -> Option<String> {
    let mut patched = String::with_capacity(content.len() + model.len());
    let mut replaced = false;

    for line in content.split_inclusive('\n') {
        if replaced || !line.contains(MODEL_FLAG) {
            patched.push_str(line);
            continue;
        }

        let indent_len = line.len() - line.trim_start().len();
        let terminator = if line.ends_with("\r\n") { "\r\n" } else { "\n" };
        patched.push_str(&line[..indent_len]);
        patched.push_str(MODEL_FLAG);
        patched.push_str(model);
        patched.push_str(" \\");
        patched.push_str(terminator);
        replaced = true;
    }

    replaced.then_some(patched)
}

/// Points the launch script at `model`, rewriting the file in place
pub fn update_script(path: impl AsRef<Path>, model: &str) -> Result<(), ScriptError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScriptError::NotFound(path.to_path_buf()));
    }

    let io_error = |source: std::io::Error| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    };

    let content = fs::read_to_string(path).map_err(io_error)?;
    let patched = patch_model_line(&content, model)
        .ok_or_else(|| ScriptError::NoModelFlag(path.to_path_buf()))?;

    fs::write(path, patched).map_err(io_error)?;
    debug!("Patched --model in {}", path.display());
    Ok(())
}
