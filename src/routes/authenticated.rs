use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Routes that require a valid bearer token but not a specific role. The
/// whole router is wrapped in the `auth_middleware` layer (see lib.rs), so a
/// missing or invalid token is rejected with 401 before any handler runs.
///
/// Both methods of `/users/admin/{email}` live on this one route so the
/// pattern is registered exactly once:
///   - GET: the self-service admin check. The path segment is the caller's
///     own email; querying anyone else's is rejected with 403.
///   - PATCH: admin-only promotion. The path segment is the target user's
///     id, and the handler's `AdminUser` extractor enforces the role on top
///     of the token check applied here.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new().route(
        "/users/admin/{email}",
        get(handlers::check_admin).patch(handlers::promote_user),
    )
}
