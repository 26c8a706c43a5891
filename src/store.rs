use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::{
    kv::{KvBackend, KvError},
    models::{Priority, Todo},
};

/// The todo collection, kept as one JSON array under a single key.
///
/// Reads never fail: a missing value, or one that is not a list, is replaced
/// by the seed set, and an unreachable backend yields the seed set without
/// writing. Individual records that cannot be read are skipped.
/// Writes report success as a flag so a failed save never fails a request.
#[derive(Clone)]
pub struct TodoStore {
    backend: Arc<dyn KvBackend>,
    key: String,
    write_lock: Arc<Mutex<()>>,
}

impl TodoStore {
    pub fn new(backend: Arc<dyn KvBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Serializes read-modify-write cycles within this process.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub async fn load_all(&self) -> Vec<Todo> {
        let stored = match self.backend.get(&self.key).await {
            Ok(stored) => stored,
            Err(KvError::Decode(err)) => {
                warn!(key = %self.key, error = %err, "stored todos are corrupt; reseeding");
                return self.reseed().await;
            }
            Err(err) => {
                error!(
                    key = %self.key,
                    backend = self.backend.name(),
                    error = %err,
                    "failed to read todos; serving seed data"
                );
                return seed_todos();
            }
        };

        let Some(value) = stored else {
            info!(key = %self.key, "no todos stored yet; seeding");
            return self.reseed().await;
        };

        let Value::Array(records) = value else {
            warn!(key = %self.key, "stored todos are not a list; reseeding");
            return self.reseed().await;
        };

        let total = records.len();
        let todos: Vec<Todo> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Todo>(record) {
                Ok(todo) => Some(todo),
                Err(err) => {
                    warn!(key = %self.key, index, error = %err, "skipping unreadable todo");
                    None
                }
            })
            .collect();
        if todos.len() < total {
            warn!(
                key = %self.key,
                skipped = total - todos.len(),
                "some stored todos could not be read"
            );
        }
        todos
    }

    pub async fn save_all(&self, todos: &[Todo]) -> bool {
        let value = match serde_json::to_value(todos) {
            Ok(value) => value,
            Err(err) => {
                error!(key = %self.key, error = %err, "failed to encode todos");
                return false;
            }
        };

        match self.backend.set(&self.key, value).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    key = %self.key,
                    backend = self.backend.name(),
                    error = %err,
                    "failed to save todos"
                );
                false
            }
        }
    }

    async fn reseed(&self) -> Vec<Todo> {
        let seed = seed_todos();
        self.save_all(&seed).await;
        seed
    }
}

pub fn seed_todos() -> Vec<Todo> {
    vec![
        Todo {
            id: "1".to_string(),
            title: "Learn React".to_string(),
            completed: false,
            created_at: seed_time("2024-01-01T10:00:00Z"),
            updated_at: seed_time("2024-01-01T10:00:00Z"),
            priority: Priority::Medium,
            category: "learning".to_string(),
            due_date: None,
            tags: vec!["react".to_string(), "frontend".to_string()],
        },
        Todo {
            id: "2".to_string(),
            title: "Build a todo app".to_string(),
            completed: true,
            created_at: seed_time("2024-01-02T14:30:00Z"),
            updated_at: seed_time("2024-01-02T16:45:00Z"),
            priority: Priority::High,
            category: "project".to_string(),
            due_date: Some(seed_time("2024-01-15T23:59:59Z")),
            tags: vec!["project".to_string(), "fullstack".to_string()],
        },
        Todo {
            id: "3".to_string(),
            title: "Deploy to production".to_string(),
            completed: false,
            created_at: seed_time("2024-01-03T09:15:00Z"),
            updated_at: seed_time("2024-01-03T09:15:00Z"),
            priority: Priority::High,
            category: "deployment".to_string(),
            due_date: Some(seed_time("2024-01-20T23:59:59Z")),
            tags: vec!["deployment".to_string(), "vercel".to_string()],
        },
    ]
}

fn seed_time(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::{TodoStore, seed_todos};
    use crate::kv::{KvBackend, KvError, KvResult, MemoryKv};

    struct UnreachableKv;

    #[async_trait]
    impl KvBackend for UnreachableKv {
        fn name(&self) -> &'static str {
            "unreachable"
        }

        async fn get(&self, _key: &str) -> KvResult<Option<Value>> {
            Err(KvError::Backend {
                operation: "get",
                message: "connection refused".to_string(),
            })
        }

        async fn set(&self, _key: &str, _value: Value) -> KvResult<()> {
            Err(KvError::Backend {
                operation: "set",
                message: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn empty_backend_is_seeded_and_persisted() {
        let kv = Arc::new(MemoryKv::new());
        let store = TodoStore::new(kv.clone(), "todos");

        let todos = store.load_all().await;
        assert_eq!(todos, seed_todos());

        let stored = kv.get("todos").await.unwrap().expect("seed persisted");
        assert_eq!(stored.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn corrupt_value_is_replaced_by_seed() {
        let kv = Arc::new(MemoryKv::new());
        kv.set("todos", json!({ "not": "a list" })).await.unwrap();
        let store = TodoStore::new(kv.clone(), "todos");

        assert_eq!(store.load_all().await, seed_todos());
        let stored = kv.get("todos").await.unwrap().unwrap();
        assert!(stored.is_array());
    }

    #[tokio::test]
    async fn unreadable_records_are_skipped_without_rewriting() {
        let kv = Arc::new(MemoryKv::new());
        let mut records: Vec<Value> = (0..50)
            .map(|i| {
                json!({
                    "id": format!("user-{i}"),
                    "title": format!("Task {i}"),
                    "createdAt": "2024-03-01T12:00:00Z"
                })
            })
            .collect();
        records.push(json!({ "id": "blank-due", "title": "Imported", "createdAt": "2024-03-02", "dueDate": "" }));
        records.push(json!({ "id": "bad-priority", "title": "Odd", "createdAt": "2024-03-01T12:00:00Z", "priority": "URGENT" }));
        records.push(json!({ "id": "no-created-at", "title": "Odd" }));
        kv.set("todos", Value::Array(records)).await.unwrap();
        let store = TodoStore::new(kv.clone(), "todos");

        let todos = store.load_all().await;
        assert_eq!(todos.len(), 51);
        assert_eq!(todos[0].id, "user-0");
        assert_eq!(todos[50].id, "blank-due");
        assert_eq!(todos[50].due_date, None);

        let stored = kv.get("todos").await.unwrap().unwrap();
        assert_eq!(stored.as_array().map(Vec::len), Some(53));
    }

    #[tokio::test]
    async fn unreachable_backend_serves_seed_and_reports_failed_save() {
        let store = TodoStore::new(Arc::new(UnreachableKv), "todos");

        assert_eq!(store.load_all().await, seed_todos());
        assert!(!store.save_all(&seed_todos()).await);
    }

    #[tokio::test]
    async fn save_replaces_collection() {
        let store = TodoStore::new(Arc::new(MemoryKv::new()), "todos");
        let mut todos = seed_todos();
        todos.truncate(1);

        assert!(store.save_all(&todos).await);
        assert_eq!(store.load_all().await, todos);

        assert!(store.save_all(&[]).await);
        assert!(store.load_all().await.is_empty());
    }
}
