use async_trait::async_trait;
use super::todo::{CreateTodo, Todo, TodoId};
use super::update::Assignment;

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    /// All rows, newest id first.
    async fn list(&self) -> anyhow::Result<Vec<Todo>>;
    async fn create(&self, input: CreateTodo) -> anyhow::Result<Todo>;
    async fn get(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    async fn completed(&self, id: TodoId) -> anyhow::Result<Option<bool>>;
    async fn set_completed(&self, id: TodoId, completed: bool) -> anyhow::Result<()>;
    /// Applies the assignments as one statement; returns affected rows.
    async fn apply(&self, id: TodoId, assignments: &[Assignment]) -> anyhow::Result<u64>;
    /// Returns affected rows; zero is not an error.
    async fn delete(&self, id: TodoId) -> anyhow::Result<u64>;
}
