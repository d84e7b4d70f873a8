//! Dues API Module
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/dues?year= | GET | - |
//! | /api/dues/{member_id}/{year} | GET | - |
//! | /api/dues/{member_id}/{year}/months/{month} | PUT | dues:write |
//! | /api/dues/{member_id}/{year}/unpaid | PUT | dues:write |
//! | /api/dues/{member_id}/{year}/recalculate | POST | dues:write |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dues", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::overview))
        .route("/{member_id}/{year}", get(handler::get));

    let write_routes = Router::new()
        .route(
            "/{member_id}/{year}/months/{month}",
            put(handler::update_month),
        )
        .route("/{member_id}/{year}/unpaid", put(handler::override_unpaid))
        .route("/{member_id}/{year}/recalculate", post(handler::recalculate))
        .layer(middleware::from_fn(require_permission("dues:write")));

    read_routes.merge(write_routes)
}
