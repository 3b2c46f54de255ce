mod error;
mod handlers;
mod routes;

pub use error::{ApiError, ApiResult};

use std::env;
use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use sqlx::{Pool, Sqlite};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
}

/// Assembles the full application router. Kept separate from the serve loop
/// so integration tests can drive it directly.
pub fn router(pool: Pool<Sqlite>) -> Router {
    let state = AppState { db: pool };

    Router::new()
        .route("/health", get(|| async { "Backend is running" }))
        .merge(routes::api_routes())
        .with_state(state)
}

pub async fn run_server(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let app = router(pool);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
