//! Special Occasion API Module
//!
//! Live payout list per year; `reset` archives a year's list into the
//! history and clears it.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/history", get(handler::history))
        .route("/history/{id}", get(handler::history_by_id))
        .route("/{id}", get(handler::get_by_id));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/reset", post(handler::reset))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission("events:write")));

    read_routes.merge(write_routes)
}
