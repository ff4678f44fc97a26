use std::sync::Arc;

use async_trait::async_trait;
use common::aws_clients::s3::get_s3_client;
use common::config::ConfigLoader;
use dtos::{ListBackupsArgs, ListBackupsResponse};
use repositories::backups::backups_repository_impl::BackupsRepositoryImpl;
use repositories::backups::BackupsRepository;
use rusoto_s3::S3Client;
use s3_dynamo_restore::command_main;
use s3_dynamo_restore::command_structure::command_trait::Command;
use s3_dynamo_restore::config::{GlobalConfig, RestoreConfig};
use s3_dynamo_restore::restore::catalog::BackupCatalog;
use s3_dynamo_restore::result::error::RestoreError;

mod dtos;

pub struct State<BR: BackupsRepository> {
    pub catalog: BackupCatalog<BR>,
}

pub struct ListBackups;

#[async_trait]
impl Command for ListBackups {
    const NAME: &'static str = "list_backups";

    type PersistedMemory = State<BackupsRepositoryImpl<S3Client>>;
    type Args = ListBackupsArgs;
    type Output = ListBackupsResponse;
    type Error = RestoreError;

    async fn bootstrap(args: &Self::Args) -> Result<Self::PersistedMemory, Self::Error> {
        let global_config = ConfigLoader::load_default::<GlobalConfig>()?;
        let restore_config = ConfigLoader::load_default::<RestoreConfig>()?;
        let s3_client = get_s3_client(&global_config.aws_client_config())?;
        let backups_repository = Arc::new(BackupsRepositoryImpl::new(
            args.bucket.clone(),
            restore_config.list_page_size,
            s3_client,
        ));

        Ok(State {
            catalog: BackupCatalog::new(backups_repository, restore_config.backup_file_extension),
        })
    }

    async fn run(
        args: Self::Args,
        state: &Self::PersistedMemory,
    ) -> Result<Self::Output, Self::Error> {
        let keys = state
            .catalog
            .list(&args.prefix, &args.source_table)
            .await?;

        Ok(ListBackupsResponse {
            bucket: args.bucket,
            keys,
        })
    }
}

command_main!(ListBackups);
