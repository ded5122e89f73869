use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};
use tracing::debug;

use crate::domain::{
    repository::TodoRepository,
    todo::{CreateTodo, Todo, TodoId},
    update::Assignment,
};
use super::update_query::update_statement;

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // An in-memory database lives only as long as its connection, so keep exactly one.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&*self.pool)
        .await?;
        debug!("todos table ready");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, body, completed, created_at FROM todos ORDER BY id DESC")
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(row_to_todo).collect()
    }

    async fn create(&self, input: CreateTodo) -> Result<Todo> {
        let now = Utc::now();
        let result = sqlx::query("INSERT INTO todos (body, completed, created_at) VALUES (?1, ?2, ?3)")
            .bind(&input.body)
            .bind(input.completed)
            .bind(now)
            .execute(&*self.pool)
            .await?;
        let id = TodoId(result.last_insert_rowid());
        if id.is_unset() {
            anyhow::bail!("store did not assign an id");
        }
        debug!(%id, "inserted todo");
        Ok(Todo { id, completed: input.completed, body: input.body, created_at: now })
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, body, completed, created_at FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        row.as_ref().map(row_to_todo).transpose()
    }

    async fn completed(&self, id: TodoId) -> Result<Option<bool>> {
        let completed = sqlx::query_scalar::<_, bool>("SELECT completed FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(completed)
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<()> {
        sqlx::query("UPDATE todos SET completed = ?2 WHERE id = ?1")
            .bind(id.0)
            .bind(completed)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn apply(&self, id: TodoId, assignments: &[Assignment]) -> Result<u64> {
        let Some(mut statement) = update_statement(id, assignments) else {
            anyhow::bail!("no columns to update for todo {id}");
        };
        let result = statement.build().execute(&*self.pool).await?;
        debug!(%id, rows = result.rows_affected(), "applied update");
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: TodoId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn row_to_todo(row: &SqliteRow) -> Result<Todo> {
    let id: i64 = row.try_get("id")?;
    let body: String = row.try_get("body")?;
    let completed: bool = row.try_get("completed")?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .with_context(|| format!("decoding created_at of todo {id}"))?;
    Ok(Todo { id: TodoId(id), completed, body, created_at })
}
