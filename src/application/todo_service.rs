use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoId};
use crate::domain::update::UpdateRequest;
use async_trait::async_trait;
use tracing::debug;

use super::error::TodoError;

pub type Result<T> = std::result::Result<T, TodoError>;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn create(&self, input: CreateTodo) -> Result<Todo>;
    async fn update(&self, id: TodoId, request: UpdateRequest) -> Result<Todo>;
    async fn delete(&self, id: TodoId) -> Result<()>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn list(&self) -> Result<Vec<Todo>> {
        self.repo.list().await.map_err(TodoError::storage("Error fetching todos"))
    }

    async fn create(&self, input: CreateTodo) -> Result<Todo> {
        if input.body.is_empty() {
            return Err(TodoError::EmptyBody);
        }
        self.repo.create(input).await.map_err(TodoError::storage("Error creating todo"))
    }

    /// A toggle checks that the row exists before writing. A field update
    /// does not: an unknown id updates nothing and then fails the re-read
    /// with `Refetch` rather than `NotFound`.
    async fn update(&self, id: TodoId, request: UpdateRequest) -> Result<Todo> {
        match request {
            UpdateRequest::Toggle => {
                let current = self
                    .repo
                    .completed(id)
                    .await
                    .map_err(TodoError::storage("Error updating todo"))?
                    .ok_or(TodoError::NotFound)?;
                self.repo
                    .set_completed(id, !current)
                    .await
                    .map_err(TodoError::storage("Error updating todo"))?;
            }
            UpdateRequest::Fields(payload) => {
                let assignments = payload.assignments();
                if assignments.is_empty() {
                    return Err(TodoError::NoValidFields);
                }
                let rows = self
                    .repo
                    .apply(id, &assignments)
                    .await
                    .map_err(TodoError::storage("Error updating todo"))?;
                debug!(%id, rows, "field update applied");
            }
        }

        self.repo
            .get(id)
            .await
            .map_err(TodoError::storage("Error fetching updated todo"))?
            .ok_or(TodoError::Refetch)
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        let rows = self.repo.delete(id).await.map_err(TodoError::storage("Error deleting todo"))?;
        debug!(%id, rows, "delete executed");
        Ok(())
    }
}
