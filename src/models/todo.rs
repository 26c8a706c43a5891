use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Priority, timestamp};

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTodo")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

// Persisted records may come from older writers that used `text`/`date` and
// omitted the optional fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTodo {
    id: String,
    #[serde(alias = "text")]
    title: String,
    #[serde(default)]
    completed: bool,
    #[serde(alias = "date", deserialize_with = "timestamp::deserialize")]
    created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: Vec<String>,
}

impl From<StoredTodo> for Todo {
    fn from(stored: StoredTodo) -> Self {
        Self {
            updated_at: stored
                .updated_at
                .map_or(stored.created_at, |ts| ts.max(stored.created_at)),
            id: stored.id,
            title: stored.title,
            completed: stored.completed,
            created_at: stored.created_at,
            priority: stored.priority,
            category: stored
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            due_date: stored.due_date,
            tags: stored.tags,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default, alias = "text")]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Partial update. Absent fields are left untouched; `dueDate: null` clears
/// the due date.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default, alias = "text")]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_patch")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
