//! Locates the `llmfit` executable
//!
//! The working directory is checked first, then the system search path. A copy
//! of the tool sitting next to the config always wins over an installed one.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the tool as looked up on the search path
pub const TOOL_NAME: &str = "llmfit";

/// Platform-dependent file name of the tool in the working directory
pub fn binary_name() -> &'static str {
    if cfg!(windows) {
        "llmfit.exe"
    } else {
        TOOL_NAME
    }
}

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("Could not find {0}. Please ensure it is installed (e.g., via 'cargo install llmfit').")]
    NotFound(String),

    #[error("{} does not exist", .0.display())]
    OverrideMissing(PathBuf),
}

/// Which check produced the executable path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    WorkingDir,
    SearchPath,
    Override,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSource::WorkingDir => write!(f, "current directory"),
            LocationSource::SearchPath => write!(f, "PATH"),
            LocationSource::Override => write!(f, "command line"),
        }
    }
}

/// An invocable path to the tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub path: PathBuf,
    pub source: LocationSource,
}

#[derive(Debug, Clone)]
pub struct Locator {
    binary_name: String,
    working_dir: PathBuf,
    search_path: Option<OsString>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new(binary_name())
    }
}

impl Locator {
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self {
            binary_name: binary_name.into(),
            working_dir: PathBuf::from("."),
            search_path: env::var_os("PATH"),
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Replaces the `PATH`-style list of directories searched in the second check
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    pub fn locate(&self) -> Result<Located, LocatorError> {
        let local = self.working_dir.join(&self.binary_name);
        debug!("Checking for {} at {}", self.binary_name, local.display());
        if local.exists() {
            return Ok(Located {
                path: local,
                source: LocationSource::WorkingDir,
            });
        }

        let Some(paths) = self.search_path.as_ref() else {
            debug!("No search path available");
            return Err(LocatorError::NotFound(self.binary_name.clone()));
        };

        match which::which_in(self.search_name(), Some(paths), &self.working_dir) {
            Ok(path) => Ok(Located {
                path,
                source: LocationSource::SearchPath,
            }),
            Err(e) => {
                debug!("Search path lookup failed: {}", e);
                Err(LocatorError::NotFound(self.binary_name.clone()))
            }
        }
    }

    /// `which` appends executable extensions itself on Windows
    fn search_name(&self) -> &str {
        self.binary_name
            .strip_suffix(".exe")
            .unwrap_or(&self.binary_name)
    }
}

/// Accepts a user-supplied executable path without searching
pub fn from_override(path: &Path) -> Result<Located, LocatorError> {
    if !path.exists() {
        return Err(LocatorError::OverrideMissing(path.to_path_buf()));
    }
    Ok(Located {
        path: path.to_path_buf(),
        source: LocationSource::Override,
    })
}
