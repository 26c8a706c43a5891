use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use super::{API_PREFIX, extract::JsonBody};
use crate::{
    error::AppError,
    models::{CreateTodoRequest, Todo, UpdateTodoRequest},
    query::{ListQuery, TodoPage},
    services::ServiceContext,
    state::AppState,
};

const TODOS_PATH: &str = "/todos";

/// Mounted both at `/todos` and under the API prefix.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();
    for prefix in ["", API_PREFIX] {
        router = router
            .route(
                &format!("{prefix}{TODOS_PATH}"),
                get(list_todos).post(create_todo),
            )
            .route(
                &format!("{prefix}{TODOS_PATH}/{{id}}"),
                get(get_todo).put(update_todo).delete(delete_todo),
            );
    }
    router.with_state(state)
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<TodoPage> {
    let query = ListQuery::from_params(&params);
    let page = ServiceContext::from_state(&state).todo().list(&query).await;
    Json(page)
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let todo = ServiceContext::from_state(&state).todo().get(&id).await?;
    Ok(Json(todo))
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = ServiceContext::from_state(&state).todo().create(body).await?;
    tracing::info!(todo_id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let todo = ServiceContext::from_state(&state)
        .todo()
        .update(&id, body)
        .await?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    ServiceContext::from_state(&state).todo().delete(&id).await?;
    tracing::info!(todo_id = %id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
