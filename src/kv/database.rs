use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use serde_json::Value;

use super::{KvBackend, KvError, KvResult};
use crate::db::entities::kv_entry;

/// Key-value pairs stored as JSON text in the `kv_entries` table.
#[derive(Clone)]
pub struct DatabaseKv {
    db: DatabaseConnection,
}

impl DatabaseKv {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KvBackend for DatabaseKv {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn get(&self, key: &str) -> KvResult<Option<Value>> {
        let entry = kv_entry::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;

        match entry {
            Some(entry) => serde_json::from_str(&entry.value)
                .map(Some)
                .map_err(KvError::Decode),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> KvResult<()> {
        let raw = serde_json::to_string(&value).map_err(KvError::Encode)?;
        let entry = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(raw),
            updated_at: Set(Utc::now().fixed_offset()),
        };

        kv_entry::Entity::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
