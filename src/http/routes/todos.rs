use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Path, Request, State},
    http::{header, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use tracing::info;

use crate::{
    application::todo_service::TodoService,
    domain::{
        todo::{CreateTodo, Todo, TodoId},
        update::UpdateRequest,
    },
    http::types::{ApiError, Success},
};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/api/todos/:id", patch(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.service.list().await?;
    info!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, Json(payload): Json<CreateTodo>) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.service.create(payload).await?;
    info!(id = %todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<i64>, UpdateBody(request): UpdateBody) -> Result<Json<Todo>, ApiError> {
    let toggle = matches!(request, UpdateRequest::Toggle);
    let todo = state.service.update(TodoId(id), request).await?;
    info!(%id, toggle, completed = todo.completed, "updated todo");
    Ok(Json(todo))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<i64>) -> Result<Json<Success>, ApiError> {
    state.service.delete(TodoId(id)).await?;
    info!(%id, "deleted todo");
    Ok(Json(Success::default()))
}

/// PATCH body, resolved into either a toggle or a set of typed fields.
/// Never rejects on content: an unreadable payload means "toggle".
pub struct UpdateBody(pub UpdateRequest);

#[async_trait]
impl<S> FromRequest<S> for UpdateBody
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = Bytes::from_request(req, state).await?;
        Ok(Self(UpdateRequest::from_body(content_type.as_deref(), &bytes)))
    }
}
