//! Operator and permission middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, OPERATOR_HEADER};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Operator middleware - resolves `X-Operator-Id` to an active user
///
/// On success [`CurrentUser`] is inserted into the request extensions.
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - non `/api/` paths (health, unknown routes fall through to 404)
///
/// # Errors
///
/// | Case | Code |
/// |------|------|
/// | header missing | OperatorRequired (401) |
/// | not an id / no such user | OperatorUnknown (401) |
/// | user deactivated | OperatorDisabled (401) |
pub async fn require_operator(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || !req.uri().path().starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let Some(raw) = req
        .headers()
        .get(OPERATOR_HEADER)
        .and_then(|h| h.to_str().ok())
    else {
        security_log!(WARN, "operator_missing", uri = %req.uri());
        return Err(AppError::operator_required());
    };

    let Ok(operator_id) = raw.trim().parse::<i64>() else {
        security_log!(WARN, "operator_malformed", value = raw, uri = %req.uri());
        return Err(AppError::new(ErrorCode::OperatorUnknown));
    };

    let Some(operator) = user::find_by_id(&state.pool, operator_id).await? else {
        security_log!(WARN, "operator_unknown", operator_id = operator_id, uri = %req.uri());
        return Err(AppError::new(ErrorCode::OperatorUnknown).with_detail("operator_id", operator_id));
    };

    if !operator.is_active {
        security_log!(WARN, "operator_disabled", operator_id = operator_id, uri = %req.uri());
        return Err(AppError::new(ErrorCode::OperatorDisabled));
    }

    req.extensions_mut().insert(CurrentUser::from(&operator));
    Ok(next.run(req).await)
}

/// Permission middleware - requires a specific permission
///
/// # Usage
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/", post(handler::create))
///     .layer(middleware::from_fn(require_permission("ledger:write")));
/// ```
///
/// # Errors
///
/// Missing permission returns 403 Forbidden
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::operator_required)?;

            if !user.has_permission(permission) {
                security_log!(
                    WARN,
                    "permission_denied",
                    operator_id = user.id,
                    username = %user.username,
                    role = %user.role,
                    required_permission = permission
                );
                return Err(AppError::permission_denied(format!(
                    "Permission denied: {permission}"
                ))
                .with_detail("required_permission", permission));
            }

            Ok(next.run(req).await)
        })
    }
}
