use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{CreateTodoRequest, Todo, UpdateTodoRequest, todo::DEFAULT_CATEGORY},
    query::{ListQuery, TodoPage},
    store::TodoStore,
};

pub const TODO_NOT_FOUND_MESSAGE: &str = "Todo not found";
pub const TITLE_REQUIRED_MESSAGE: &str = "Title is required";
pub const TITLE_EMPTY_MESSAGE: &str = "Title cannot be empty";

#[derive(Clone)]
pub struct TodoService {
    store: TodoStore,
}

impl TodoService {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &ListQuery) -> TodoPage {
        query.run(self.store.load_all().await)
    }

    pub async fn get(&self, id: &str) -> Result<Todo, AppError> {
        self.store
            .load_all()
            .await
            .into_iter()
            .find(|todo| todo.id == id)
            .ok_or_else(|| AppError::not_found(TODO_NOT_FOUND_MESSAGE))
    }

    pub async fn create(&self, request: CreateTodoRequest) -> Result<Todo, AppError> {
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| AppError::bad_request(TITLE_REQUIRED_MESSAGE))?
            .to_string();

        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title,
            completed: request.completed.unwrap_or(false),
            created_at: now,
            updated_at: now,
            priority: request.priority.unwrap_or_default(),
            category: request
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            due_date: request.due_date,
            tags: request.tags.unwrap_or_default(),
        };

        let _guard = self.store.lock_writes().await;
        let mut todos = self.store.load_all().await;
        todos.insert(0, todo.clone());
        self.persist(&todos, "create", &todo.id).await;
        Ok(todo)
    }

    pub async fn update(&self, id: &str, request: UpdateTodoRequest) -> Result<Todo, AppError> {
        let title = match request.title.as_deref().map(str::trim) {
            Some("") => return Err(AppError::bad_request(TITLE_EMPTY_MESSAGE)),
            Some(title) => Some(title.to_string()),
            None => None,
        };

        let _guard = self.store.lock_writes().await;
        let mut todos = self.store.load_all().await;
        let todo = todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| AppError::not_found(TODO_NOT_FOUND_MESSAGE))?;

        if let Some(title) = title {
            todo.title = title;
        }
        if let Some(completed) = request.completed {
            todo.completed = completed;
        }
        if let Some(priority) = request.priority {
            todo.priority = priority;
        }
        if let Some(category) = request.category {
            todo.category = category;
        }
        if let Some(due_date) = request.due_date {
            todo.due_date = due_date;
        }
        if let Some(tags) = request.tags {
            todo.tags = tags;
        }
        todo.updated_at = next_update_time(todo.updated_at, Utc::now());

        let updated = todo.clone();
        self.persist(&todos, "update", id).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.store.lock_writes().await;
        let mut todos = self.store.load_all().await;
        let index = todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or_else(|| AppError::not_found(TODO_NOT_FOUND_MESSAGE))?;

        todos.remove(index);
        self.persist(&todos, "delete", id).await;
        Ok(())
    }

    async fn persist(&self, todos: &[Todo], operation: &'static str, id: &str) {
        if !self.store.save_all(todos).await {
            tracing::warn!(operation, todo_id = %id, "todo change was not persisted");
        }
    }
}

// updatedAt must move forward even when the clock has not ticked since the
// previous write.
fn next_update_time(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::{TodoService, next_update_time};
    use crate::{
        error::AppError,
        kv::MemoryKv,
        models::{CreateTodoRequest, Priority, UpdateTodoRequest},
        query::ListQuery,
        store::TodoStore,
    };

    fn service() -> TodoService {
        TodoService::new(TodoStore::new(Arc::new(MemoryKv::new()), "todos"))
    }

    fn create_request(title: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_applies_defaults_and_inserts_at_head() {
        let service = service();
        let todo = service.create(create_request("  Water plants ")).await.unwrap();

        assert_eq!(todo.title, "Water plants");
        assert!(!todo.completed);
        assert_eq!(todo.priority, Priority::Medium);
        assert_eq!(todo.category, "general");
        assert_eq!(todo.due_date, None);
        assert!(todo.tags.is_empty());
        assert_eq!(todo.created_at, todo.updated_at);

        let page = service.list(&ListQuery::default()).await;
        assert_eq!(page.total_todos, 4);

        let fetched = service.get(&todo.id).await.unwrap();
        assert_eq!(fetched, todo);
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let service = service();
        let err = service.create(create_request("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = service.create(CreateTodoRequest::default()).await.unwrap_err();
        assert_eq!(err.message(), "Title is required");

        assert_eq!(service.list(&ListQuery::default()).await.total_todos, 3);
    }

    #[tokio::test]
    async fn update_merges_supplied_fields_only() {
        let service = service();
        let before = service.get("2").await.unwrap();

        let after = service
            .update(
                "2",
                UpdateTodoRequest {
                    completed: Some(false),
                    due_date: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!after.completed);
        assert_eq!(after.due_date, None);
        assert_eq!(after.title, before.title);
        assert_eq!(after.tags, before.tags);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(service.get("2").await.unwrap(), after);
    }

    #[tokio::test]
    async fn update_rejects_blank_title_and_unknown_id() {
        let service = service();
        let blank = UpdateTodoRequest {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        let err = service.update("1", blank).await.unwrap_err();
        assert_eq!(err.message(), "Title cannot be empty");

        let err = service
            .update("missing", UpdateTodoRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let service = service();
        service.delete("1").await.unwrap();

        assert!(matches!(service.get("1").await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete("1").await, Err(AppError::NotFound(_))));
        assert_eq!(service.list(&ListQuery::default()).await.total_todos, 2);
    }

    #[tokio::test]
    async fn concurrent_creates_are_not_lost() {
        let service = service();
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.create(create_request(&format!("task {i}"))).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(service.list(&ListQuery::default()).await.total_todos, 19);
    }

    #[test]
    fn update_time_is_strictly_increasing() {
        let previous = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let stale_clock = Utc.with_ymd_and_hms(2029, 1, 1, 0, 0, 0).unwrap();

        assert!(next_update_time(previous, stale_clock) > previous);
        assert!(next_update_time(previous, previous) > previous);
    }
}
