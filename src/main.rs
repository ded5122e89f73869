use todo_api::{
    application::todo_service::TodoServiceImpl,
    config::Config,
    domain::repository::TodoRepository,
    http::{routes::todos, routing},
    infrastructure::sqlite_repo::SqliteTodoRepository,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let repo = SqliteTodoRepository::connect(&config.database_url).await?;
    repo.init().await?;
    tracing::info!(database_url = %config.database_url, "todos table initialized");

    let service = TodoServiceImpl::new(repo);
    let router = routing::app(todos::router(todos::AppState { service }), &config);

    let addr = config.addr();
    tracing::info!(%addr, production = config.production, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown");
}
