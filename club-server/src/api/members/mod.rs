//! Member API Module
//!
//! Members follow the users; `sync` re-runs the reconciliation by hand.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/members", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/sync", post(handler::sync))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("users:manage")));

    read_routes.merge(manage_routes)
}
