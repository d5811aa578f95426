pub mod commands;
pub mod output;

pub use commands::CliArgs;
pub use output::ConsoleHandler;
