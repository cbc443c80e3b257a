use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Public Router Module
///
/// Endpoints that are **unauthenticated** and accessible to any client. This
/// covers the whole article surface (the moderation endpoints included — an
/// inherited property of the API contract), user sign-in/profile/subscription
/// flows, and publisher listing.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Liveness probe; responds with a fixed string immediately.
        .route("/", get(|| async { "Newspaper server is running" }))
        // POST /jwt
        // Issues a one-hour session token for the submitted identity.
        .route("/jwt", post(handlers::issue_token))
        // --- Articles ---
        // GET /articles?search=...&publisher=...
        // Lists articles; title substring search and exact publisher filter.
        // POST /articles
        // Submits a new article (always enters the queue as 'pending').
        .route(
            "/articles",
            get(handlers::list_articles).post(handlers::create_article),
        )
        // GET/PATCH/DELETE /articles/{id}
        // Fetch one (200 + null for unknown or malformed ids), the
        // first-generation full-field update, and idempotent deletion.
        .route(
            "/articles/{id}",
            get(handlers::get_article)
                .patch(handlers::update_article)
                .delete(handlers::delete_article),
        )
        // PATCH /articles/approve/{id} | /articles/decline/{id} | /articles/premium/{id}
        // The narrow second-generation moderation mutations.
        .route("/articles/approve/{id}", patch(handlers::approve_article))
        .route("/articles/decline/{id}", patch(handlers::decline_article))
        .route("/articles/premium/{id}", patch(handlers::set_premium))
        // GET /myArticles?email=...
        // Lists the articles authored under the given email.
        .route("/myArticles", get(handlers::my_articles))
        // --- Users ---
        // POST /users: idempotent first-sign-in registration.
        // PATCH /users: overwrites name/photo for the addressed email.
        .route(
            "/users",
            post(handlers::create_user).patch(handlers::update_profile),
        )
        // GET /myProfile?email=...
        .route("/myProfile", get(handlers::my_profile))
        // PATCH /users/subscribe
        // Sets the premium expiry to now + durationDays.
        .route("/users/subscribe", patch(handlers::subscribe))
        // GET /users/premium-status/{email}
        // Reports premium as a comparison against the clock; clears an
        // expired expiry on the way through.
        .route(
            "/users/premium-status/{email}",
            get(handlers::premium_status),
        )
        // GET /stats
        .route("/stats", get(handlers::get_stats))
        // GET /publishers
        .route("/publishers", get(handlers::list_publishers))
}
