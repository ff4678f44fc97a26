use std::sync::Arc;

use async_trait::async_trait;
use common::aws_clients::dynamodb::get_dynamodb_client;
use common::aws_clients::s3::get_s3_client;
use common::config::ConfigLoader;
use dtos::RestoreTableArgs;
use repositories::backups::backups_repository_impl::BackupsRepositoryImpl;
use repositories::backups::BackupsRepository;
use repositories::tables::tables_repository_impl::TablesRepositoryImpl;
use repositories::tables::TablesRepository;
use rusoto_dynamodb::DynamoDbClient;
use rusoto_s3::S3Client;
use s3_dynamo_restore::command_main;
use s3_dynamo_restore::command_structure::command_trait::Command;
use s3_dynamo_restore::config::{GlobalConfig, RestoreConfig};
use s3_dynamo_restore::restore::{RestoreRequest, RestoreSummary, Restorer};
use s3_dynamo_restore::result::error::RestoreError;
use validator::Validate;

mod dtos;

pub struct State<BR: BackupsRepository, TR: TablesRepository> {
    pub restorer: Restorer<BR, TR>,
}

pub struct RestoreTable;

#[async_trait]
impl Command for RestoreTable {
    const NAME: &'static str = "restore_table";

    type PersistedMemory =
        State<BackupsRepositoryImpl<S3Client>, TablesRepositoryImpl<DynamoDbClient>>;
    type Args = RestoreTableArgs;
    type Output = RestoreSummary;
    type Error = RestoreError;

    async fn bootstrap(args: &Self::Args) -> Result<Self::PersistedMemory, Self::Error> {
        let global_config = ConfigLoader::load_default::<GlobalConfig>()?;
        let mut restore_config = ConfigLoader::load_default::<RestoreConfig>()?;
        if let Some(batch_size) = args.batch_size {
            restore_config.batch_size = batch_size;
        }
        restore_config.validate()?;

        let aws_client_config = global_config.aws_client_config();
        let backups_repository = Arc::new(BackupsRepositoryImpl::new(
            args.bucket.clone(),
            restore_config.list_page_size,
            get_s3_client(&aws_client_config)?,
        ));
        let tables_repository = Arc::new(TablesRepositoryImpl::new(
            get_dynamodb_client(&aws_client_config)?,
            restore_config.retry_policy(),
        ));

        Ok(State {
            restorer: Restorer::new(backups_repository, tables_repository, &restore_config),
        })
    }

    async fn run(
        args: Self::Args,
        state: &Self::PersistedMemory,
    ) -> Result<Self::Output, Self::Error> {
        let request = RestoreRequest {
            source_table: args.source_table,
            target_table: args.target_table,
            prefix: args.prefix,
            format: args.format,
            dry_run: args.dry_run,
        };

        state.restorer.restore(&request).await
    }
}

command_main!(RestoreTable);
