use std::sync::Arc;

use repositories::backups::BackupsRepository;

use crate::result::error::RestoreError;

/// Key prefix holding the change logs of `table_name`: `<prefix>/<table_name>/`.
/// An empty prefix puts the table directory at the bucket root.
pub fn backup_prefix(prefix: &str, table_name: &str) -> String {
    if prefix.is_empty() {
        format!("{table_name}/")
    } else if prefix.ends_with('/') {
        format!("{prefix}{table_name}/")
    } else {
        format!("{prefix}/{table_name}/")
    }
}

/// Finds and reads the backup objects of a table.
pub struct BackupCatalog<BR: BackupsRepository> {
    backups_repository: Arc<BR>,
    file_extension: Option<String>,
}

impl<BR: BackupsRepository> BackupCatalog<BR> {
    pub fn new(backups_repository: Arc<BR>, file_extension: Option<String>) -> Self {
        Self {
            backups_repository,
            file_extension,
        }
    }

    /// Backup keys of `table_name` under `prefix`, sorted so a restore always reads them
    /// in the same order.
    pub async fn list(&self, prefix: &str, table_name: &str) -> Result<Vec<String>, RestoreError> {
        let table_prefix = backup_prefix(prefix, table_name);
        let mut keys: Vec<String> = self
            .backups_repository
            .list_keys(table_prefix.clone())
            .await
            .map_err(RestoreError::Listing)?
            .into_iter()
            .filter(|key| !key.ends_with('/'))
            .filter(|key| match &self.file_extension {
                Some(extension) => key.ends_with(extension.as_str()),
                None => true,
            })
            .collect();
        keys.sort();

        tracing::info!(prefix = ?table_prefix, backups = keys.len(), "backups listed");
        Ok(keys)
    }

    pub async fn read(&self, key: &str) -> Result<Vec<u8>, RestoreError> {
        self.backups_repository
            .get_object(key.to_owned())
            .await
            .map_err(|source| RestoreError::GetObject {
                key: key.to_owned(),
                source,
            })
    }
}
