use clap::Parser;
use s3_dynamo_restore::command_structure::logging_args::LoggingArgs;
use s3_dynamo_restore::restore::BackupFormat;
use validator::Validate;

/// Replay the change-log backups of a table onto an existing target table.
#[derive(Parser, Validate, Debug)]
#[command(author, version, about, long_about = None)]
pub struct RestoreTableArgs {
    /// Table the backups were captured from.
    #[arg(long)]
    #[validate(length(min = 3, max = 255))]
    pub source_table: String,

    /// Existing table the backups are written to.
    #[arg(long)]
    #[validate(length(min = 3, max = 255))]
    pub target_table: String,

    /// Bucket holding the backups.
    #[arg(long)]
    #[validate(length(min = 1))]
    pub bucket: String,

    /// Key prefix above the per-table directories.
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Layout of the backup lines.
    #[arg(long, value_enum, default_value_t = BackupFormat::ChangeLog)]
    pub format: BackupFormat,

    /// Write requests per batch. Overrides BATCH_SIZE.
    #[arg(long)]
    #[validate(range(min = 1, max = 25))]
    pub batch_size: Option<usize>,

    /// Read, decode and reconcile the backups without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl AsRef<LoggingArgs> for RestoreTableArgs {
    fn as_ref(&self) -> &LoggingArgs {
        &self.logging
    }
}

#[cfg(test)]
mod tests {
    use super::RestoreTableArgs;
    use clap::Parser;
    use s3_dynamo_restore::restore::BackupFormat;
    use rstest::rstest;
    use validator::Validate;

    fn parse(extra: &[&str]) -> RestoreTableArgs {
        let mut argv = vec![
            "restore_table",
            "--source-table",
            "orders",
            "--target-table",
            "orders-restored",
            "--bucket",
            "backups",
        ];
        argv.extend_from_slice(extra);
        RestoreTableArgs::parse_from(argv)
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);

        assert_eq!("", args.prefix);
        assert_eq!(BackupFormat::ChangeLog, args.format);
        assert_eq!(None, args.batch_size);
        assert!(!args.dry_run);
        assert_eq!(0, args.logging.verbose);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn all_flags() {
        let args = parse(&["--prefix", "prod", "--batch-size", "10", "--dry-run", "-vv"]);

        assert_eq!("prod", args.prefix);
        assert_eq!(Some(10), args.batch_size);
        assert!(args.dry_run);
        assert_eq!(2, args.logging.verbose);
    }

    #[test]
    fn item_export_format() {
        let args = parse(&["--format", "item-export"]);

        assert_eq!(BackupFormat::ItemExport, args.format);
    }

    #[test]
    fn unknown_format_is_refused() {
        let argv = [
            "restore_table",
            "--source-table",
            "orders",
            "--target-table",
            "orders-restored",
            "--bucket",
            "backups",
            "--format",
            "csv",
        ];

        assert!(RestoreTableArgs::try_parse_from(argv).is_err());
    }

    #[rstest]
    #[case("0")]
    #[case("26")]
    fn batch_size_outside_store_limit_is_invalid(#[case] batch_size: &str) {
        let args = parse(&["--batch-size", batch_size]);

        assert!(args.validate().is_err());
    }
}
