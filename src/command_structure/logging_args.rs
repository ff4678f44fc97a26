use clap::{ArgAction, Args};
use tracing_subscriber::filter::LevelFilter;

/// Verbosity flag shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct LoggingArgs {
    /// Raise the log level: -v for info, -vv for debug.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl LoggingArgs {
    pub fn level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    }
}
