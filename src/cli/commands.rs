use crate::config::SetupConfig;
use clap::Parser;
use std::path::PathBuf;

/// Configure opencode's vLLM provider from llmfit model recommendations
#[derive(Parser, Debug)]
#[command(
    name = "llmfit-setup",
    about = "Configure opencode's vLLM provider from llmfit model recommendations",
    version,
    long_about = "llmfit-setup runs `llmfit recommend --json` to find the models that fit \
                  this machine and adds any that are missing to the vLLM provider in \
                  opencode.json. Existing model entries are never changed.\n\n\
                  Examples:\n  \
                  llmfit-setup\n  \
                  llmfit-setup -C ~/agent --config opencode.json\n  \
                  llmfit-setup --update-script --script run.sh\n  \
                  llmfit-setup --llmfit ~/bin/llmfit"
)]
pub struct CliArgs {
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        help = "Directory searched first for llmfit and used to resolve relative paths"
    )]
    pub working_dir: Option<PathBuf>,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "opencode config file to update [default: opencode.json]"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        value_name = "FILE",
        help = "vLLM launch script to patch with --update-script [default: run.sh]"
    )]
    pub script: Option<PathBuf>,

    #[arg(long, help = "Also set the best recommended model in the launch script")]
    pub update_script: bool,

    #[arg(
        long,
        value_name = "PATH",
        help = "Use this llmfit executable instead of searching for one"
    )]
    pub llmfit: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Layers the command line over `base` (normally loaded from the environment)
    pub fn apply_to(&self, mut base: SetupConfig) -> SetupConfig {
        if let Some(dir) = &self.working_dir {
            base.working_dir = dir.clone();
        }
        if let Some(config) = &self.config {
            base.config_file = config.clone();
        }
        if let Some(script) = &self.script {
            base.script_file = script.clone();
        }
        if self.update_script {
            base.update_script = true;
        }
        if let Some(llmfit) = &self.llmfit {
            base.llmfit_path = Some(llmfit.clone());
        }
        if let Some(level) = &self.log_level {
            base.log_level = level.to_lowercase();
        }
        base
    }
}
