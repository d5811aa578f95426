//! Runs the setup stages in order
//!
//! locate llmfit → ask it for recommendations → merge them into the opencode
//! config → optionally point the launch script at the best model.
//!
//! The first three stages are fatal on failure. Whatever the config merge
//! already wrote stays on disk. The script stage only reports its failures.

use crate::config::SetupConfig;
use crate::error::SetupError;
use crate::locator::{self, Located, Locator};
use crate::opencode::{self, MergeOutcome};
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::recommend::{LlmfitRecommender, RecommendationSet, Recommender};
use crate::script;
use tracing::debug;

/// What a successful run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub recommendations: usize,
    pub merge: MergeOutcome,
    pub script_updated: bool,
}

pub struct AutoConfigurator<'a> {
    config: &'a SetupConfig,
    progress: &'a dyn ProgressHandler,
}

impl<'a> AutoConfigurator<'a> {
    pub fn new(config: &'a SetupConfig, progress: &'a dyn ProgressHandler) -> Self {
        Self { config, progress }
    }

    /// Full run against the real llmfit executable
    pub fn run(&self) -> Result<RunSummary, SetupError> {
        self.progress.on_progress(&ProgressEvent::Started);
        let result = self
            .validate()
            .and_then(|_| self.locate_tool())
            .and_then(|tool| self.configure(&LlmfitRecommender::new(tool.path)));
        self.finish(result)
    }

    /// Full run with recommendations from `recommender`; no executable lookup
    pub fn run_with(&self, recommender: &dyn Recommender) -> Result<RunSummary, SetupError> {
        self.progress.on_progress(&ProgressEvent::Started);
        let result = self.validate().and_then(|_| self.configure(recommender));
        self.finish(result)
    }

    fn validate(&self) -> Result<(), SetupError> {
        self.config.validate()?;
        Ok(())
    }

    pub fn locate_tool(&self) -> Result<Located, SetupError> {
        let located = match &self.config.llmfit_path {
            Some(path) => locator::from_override(path)?,
            None => Locator::default()
                .with_working_dir(&self.config.working_dir)
                .locate()?,
        };

        self.progress.on_progress(&ProgressEvent::ToolLocated {
            path: located.path.display().to_string(),
            source: located.source,
        });
        Ok(located)
    }

    fn configure(&self, recommender: &dyn Recommender) -> Result<RunSummary, SetupError> {
        let recommendations = self.fetch_recommendations(recommender)?;
        let merge = self.update_config(&recommendations)?;

        let script_updated = if self.config.update_script {
            self.update_script(merge.best_model.as_deref())
        } else {
            debug!("Launch script update disabled");
            false
        };

        Ok(RunSummary {
            recommendations: recommendations.len(),
            merge,
            script_updated,
        })
    }

    fn fetch_recommendations(
        &self,
        recommender: &dyn Recommender,
    ) -> Result<RecommendationSet, SetupError> {
        self.progress.on_progress(&ProgressEvent::RecommendStarted);
        let recommendations = recommender.recommend()?;

        if recommendations.is_empty() {
            self.progress.on_progress(&ProgressEvent::NoRecommendations);
        } else {
            self.progress
                .on_progress(&ProgressEvent::RecommendationsReceived {
                    count: recommendations.len(),
                });
        }
        Ok(recommendations)
    }

    fn update_config(
        &self,
        recommendations: &RecommendationSet,
    ) -> Result<MergeOutcome, SetupError> {
        let path = self.config.config_path();
        let display = path.display().to_string();
        self.progress.on_progress(&ProgressEvent::ConfigUpdating {
            path: display.clone(),
        });

        let outcome = opencode::update_config_file(&path, recommendations)?;

        for model in &outcome.added {
            self.progress.on_progress(&ProgressEvent::ModelAdded {
                model: model.clone(),
                path: display.clone(),
            });
        }

        if outcome.is_up_to_date() {
            self.progress
                .on_progress(&ProgressEvent::ConfigUpToDate { path: display });
        } else {
            self.progress.on_progress(&ProgressEvent::ConfigUpdated {
                path: display,
                added: outcome.added.len(),
            });
        }
        Ok(outcome)
    }

    fn update_script(&self, best_model: Option<&str>) -> bool {
        let Some(model) = best_model else {
            debug!("No best model, leaving launch script alone");
            return false;
        };

        let path = self.config.script_path();
        self.progress.on_progress(&ProgressEvent::ScriptUpdating {
            path: path.display().to_string(),
            model: model.to_string(),
        });

        match script::update_script(&path, model) {
            Ok(()) => {
                self.progress.on_progress(&ProgressEvent::ScriptUpdated {
                    path: path.display().to_string(),
                    model: model.to_string(),
                });
                true
            }
            Err(e) => {
                self.progress.on_progress(&ProgressEvent::ScriptSkipped {
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    fn finish(&self, result: Result<RunSummary, SetupError>) -> Result<RunSummary, SetupError> {
        match &result {
            Ok(_) => self.progress.on_progress(&ProgressEvent::Completed),
            Err(e) => self.progress.on_progress(&ProgressEvent::Failed {
                error: e.to_string(),
            }),
        }
        result
    }
}
