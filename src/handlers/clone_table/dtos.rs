use clap::Parser;
use s3_dynamo_restore::command_structure::logging_args::LoggingArgs;
use serde::Serialize;
use validator::Validate;

/// Create an empty table with the same keys, indexes and capacity as another one.
#[derive(Parser, Validate, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CloneTableArgs {
    /// Table whose schema is copied.
    #[arg(long)]
    #[validate(length(min = 3, max = 255))]
    pub source_table: String,

    /// Name of the table to create.
    #[arg(long)]
    #[validate(length(min = 3, max = 255))]
    pub target_table: String,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl AsRef<LoggingArgs> for CloneTableArgs {
    fn as_ref(&self) -> &LoggingArgs {
        &self.logging
    }
}

#[derive(Serialize, Debug)]
pub struct CloneTableResponse {
    pub source_table: String,
    pub target_table: String,
    pub global_secondary_indexes: usize,
    pub local_secondary_indexes: usize,
}

#[cfg(test)]
mod tests {
    use super::CloneTableArgs;
    use clap::Parser;
    use validator::Validate;

    #[test]
    fn parses_table_names() {
        let args = CloneTableArgs::parse_from([
            "clone_table",
            "--source-table",
            "orders",
            "--target-table",
            "orders-restored",
        ]);

        assert_eq!("orders", args.source_table);
        assert_eq!("orders-restored", args.target_table);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn short_table_name_is_invalid() {
        let args = CloneTableArgs::parse_from([
            "clone_table",
            "--source-table",
            "ab",
            "--target-table",
            "orders-restored",
        ]);

        assert!(args.validate().is_err());
    }
}
