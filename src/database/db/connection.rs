use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::env;

pub async fn get_db_pool() -> Result<Pool<Sqlite>, sqlx::Error> {
    // mode=rwc lets the first run create the database file
    let db_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://./home_budget.db?mode=rwc".to_string());

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
}
