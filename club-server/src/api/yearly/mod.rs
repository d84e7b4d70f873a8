//! Yearly Balance API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/yearly", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{year}", get(handler::get));

    let write_routes = Router::new()
        .route("/{year}/opening", put(handler::set_opening_balance))
        .route("/{year}/refresh", post(handler::refresh))
        .layer(middleware::from_fn(require_permission("yearly:write")));

    read_routes.merge(write_routes)
}
