use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Admin Router Module
///
/// Routes exclusively for users with the 'admin' role: user administration
/// and publisher creation. Enforcement lives in the `AdminUser` extractor on
/// every handler here — the token is verified first, then the caller's role
/// is resolved from the user store, so a promotion or demotion takes effect
/// on the next request rather than at the next token issuance.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /users
        // Lists every registered user, role and subscription state included.
        .route("/users", get(handlers::list_users))
        // DELETE /users/{id}
        // Removes a user record. Idempotent; unknown ids report a zero count.
        .route("/users/{id}", delete(handlers::delete_user))
        // POST /admin/publishers
        // Registers a publisher. Requires both a name and a logo (400
        // otherwise). Admin-gated as of the latest API generation.
        .route("/admin/publishers", post(handlers::create_publisher))

    // PATCH /users/admin/{id} (promotion) is registered alongside the GET of
    // the same path in the authenticated router; see routes/authenticated.rs.
}
