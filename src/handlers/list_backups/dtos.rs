use clap::Parser;
use s3_dynamo_restore::command_structure::logging_args::LoggingArgs;
use serde::Serialize;
use validator::Validate;

/// List the change-log backups kept for a table.
#[derive(Parser, Validate, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ListBackupsArgs {
    /// Table whose backups are listed.
    #[arg(long)]
    #[validate(length(min = 3, max = 255))]
    pub source_table: String,

    /// Bucket holding the backups.
    #[arg(long)]
    #[validate(length(min = 1))]
    pub bucket: String,

    /// Key prefix above the per-table directories.
    #[arg(long, default_value = "")]
    pub prefix: String,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl AsRef<LoggingArgs> for ListBackupsArgs {
    fn as_ref(&self) -> &LoggingArgs {
        &self.logging
    }
}

#[derive(Serialize, Debug)]
pub struct ListBackupsResponse {
    pub bucket: String,
    pub keys: Vec<String>,
}
