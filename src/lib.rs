use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point.
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the service,
/// aggregating every handler decorated with `#[utoipa::path]` and every
/// schema decorated with `ToSchema`. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::issue_token,
        handlers::list_articles, handlers::create_article, handlers::get_article,
        handlers::my_articles, handlers::update_article, handlers::approve_article,
        handlers::decline_article, handlers::set_premium, handlers::delete_article,
        handlers::list_users, handlers::check_admin, handlers::create_user,
        handlers::my_profile, handlers::update_profile, handlers::promote_user,
        handlers::delete_user, handlers::subscribe, handlers::premium_status,
        handlers::get_stats, handlers::list_publishers, handlers::create_publisher,
    ),
    components(
        schemas(
            models::Article, models::User, models::Publisher,
            models::TokenRequest, models::TokenResponse,
            models::CreateArticleRequest, models::UpdateArticleRequest,
            models::DeclineRequest, models::CreateUserRequest,
            models::UpdateProfileRequest, models::SubscribeRequest,
            models::CreatePublisherRequest, models::AdminFlag,
            models::PremiumStatus, models::UserStats, models::MessageResponse,
            models::InsertSummary, models::UpdateSummary, models::DeleteSummary,
            models::CreateUserResponse,
        )
    ),
    tags(
        (name = "newsdesk", description = "Newspaper publishing API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding the injected
/// repository handle and the loaded configuration. Shared across all
/// incoming requests; the external store is the only state that outlives a
/// request.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts all access to the document store.
    pub repo: RepositoryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Allow extractors to selectively pull components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the authenticated route group. The `AuthUser`
/// extractor performs the actual token verification; a failure rejects the
/// request with 401 before the handler runs, and a success lets the request
/// proceed (handlers re-extract the claims they need).
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // CORS: restrict to the configured browser origins; an empty list (dev)
    // falls back to allowing any origin.
    let cors = if state.config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods(Any)
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_methods(Any)
            .allow_origin(AllowOrigin::list(origins))
            .allow_headers(Any)
    };

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // Base router assembly: Swagger docs, then the three access tiers.
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Authenticated routes: protected by `auth_middleware`.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Admin routes: role enforcement lives in the `AdminUser` extractor
        // on each handler, after the same token verification.
        .merge(admin::admin_routes())
        // Apply the unified state to all routes.
        .with_state(state);

    // Observability and correlation layers (applied outermost).
    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID generation: a unique UUID for every request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing: wraps the request/response lifecycle in a
                // span correlated by the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the tracing span created per request: includes the
/// `x-request-id` header (if present) alongside the HTTP method and URI so
/// every log line for a single request is correlated by one id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
