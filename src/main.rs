use llmfit_setup::cli::{CliArgs, ConsoleHandler};
use llmfit_setup::util::{init_logging, LoggingConfig};
use llmfit_setup::{AutoConfigurator, SetupConfig, NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_cli(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    process::exit(handle_setup(&args));
}

fn handle_setup(args: &CliArgs) -> i32 {
    let config = args.apply_to(SetupConfig::default());
    debug!("Configuration:\n{}", config);

    let console = ConsoleHandler::new(args.quiet);
    match AutoConfigurator::new(&config, &console).run() {
        Ok(summary) => {
            debug!(
                "Added {} of {} recommended models, script updated: {}",
                summary.merge.added.len(),
                summary.recommendations,
                summary.script_updated
            );
            0
        }
        Err(e) => {
            debug!("Setup failed: {:?}", e);
            e.exit_code()
        }
    }
}
