use std::sync::Arc;

use async_trait::async_trait;
use common::aws_clients::dynamodb::get_dynamodb_client;
use common::config::ConfigLoader;
use dtos::{CloneTableArgs, CloneTableResponse};
use repositories::tables::tables_repository_impl::TablesRepositoryImpl;
use repositories::tables::TablesRepository;
use rusoto_dynamodb::DynamoDbClient;
use s3_dynamo_restore::command_main;
use s3_dynamo_restore::command_structure::command_trait::Command;
use s3_dynamo_restore::config::{GlobalConfig, RestoreConfig};
use s3_dynamo_restore::restore::schema_cloner::SchemaCloner;
use s3_dynamo_restore::result::error::RestoreError;

mod dtos;

pub struct State<TR: TablesRepository> {
    pub schema_cloner: SchemaCloner<TR>,
}

pub struct CloneTable;

#[async_trait]
impl Command for CloneTable {
    const NAME: &'static str = "clone_table";

    type PersistedMemory = State<TablesRepositoryImpl<DynamoDbClient>>;
    type Args = CloneTableArgs;
    type Output = CloneTableResponse;
    type Error = RestoreError;

    async fn bootstrap(_args: &Self::Args) -> Result<Self::PersistedMemory, Self::Error> {
        let global_config = ConfigLoader::load_default::<GlobalConfig>()?;
        let restore_config = ConfigLoader::load_default::<RestoreConfig>()?;
        let dynamodb_client = get_dynamodb_client(&global_config.aws_client_config())?;
        let tables_repository = Arc::new(TablesRepositoryImpl::new(
            dynamodb_client,
            restore_config.retry_policy(),
        ));

        Ok(State {
            schema_cloner: SchemaCloner::new(tables_repository),
        })
    }

    async fn run(
        args: Self::Args,
        state: &Self::PersistedMemory,
    ) -> Result<Self::Output, Self::Error> {
        let created = state
            .schema_cloner
            .clone_schema(&args.source_table, &args.target_table)
            .await?;

        Ok(CloneTableResponse {
            source_table: args.source_table,
            target_table: created.table_name,
            global_secondary_indexes: created.global_secondary_indexes.len(),
            local_secondary_indexes: created.local_secondary_indexes.len(),
        })
    }
}

command_main!(CloneTable);
