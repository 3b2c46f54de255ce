// src/main.rs
use std::env;

use dotenvy::dotenv;
use home_budget::{backend, cli, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "server" {
        // the TUI owns the terminal, so the subscriber only runs server-side
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("home_budget=info")),
            )
            .init();

        let pool = database::db::connection::get_db_pool().await?;
        database::db::migrate::run_migrations(&pool).await?;

        backend::run_server(pool).await?;
    } else {
        cli::run().await?;
    }
    Ok(())
}
