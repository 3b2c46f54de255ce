use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::backend::{handlers, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/config",
            get(handlers::get_income).put(handlers::set_income),
        )
        .route(
            "/api/fixed-expenses",
            get(handlers::list_fixed).post(handlers::create_fixed),
        )
        .route(
            "/api/fixed-expenses/:id",
            put(handlers::update_fixed).delete(handlers::delete_fixed),
        )
        .route(
            "/api/weekly-expenses",
            get(handlers::list_weekly).delete(handlers::clear_all),
        )
        .route(
            "/api/weekly-expenses/:week",
            post(handlers::create_weekly).delete(handlers::clear_week),
        )
        .route(
            "/api/weekly-expenses/item/:id",
            delete(handlers::delete_weekly_item),
        )
        .route("/api/allocations", get(handlers::allocations))
}
