use crate::{
    AppState,
    auth::{self, AdminUser, AuthUser},
    error::ApiError,
    models::{
        AdminFlag, Article, CreateArticleRequest, CreatePublisherRequest, CreateUserRequest,
        CreateUserResponse, DeclineRequest, DeleteSummary, InsertSummary, MessageResponse,
        PremiumStatus, Publisher, SubscribeRequest, TokenRequest, TokenResponse,
        UpdateArticleRequest, UpdateProfileRequest, UpdateSummary, User, UserStats,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// ArticleFilter
///
/// Accepted query parameters for the public article listing (GET /articles).
/// `search` is a case-insensitive substring match on the title; `publisher`
/// is an exact match; both are AND-combined when present.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ArticleFilter {
    pub search: Option<String>,
    pub publisher: Option<String>,
}

/// EmailQuery
///
/// The `?email=` query parameter used by the per-user listings.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct EmailQuery {
    pub email: String,
}

// --- Token Handlers ---

/// issue_token
///
/// [Public Route] Issues a signed session token for the submitted identity.
/// The token carries the email claim and expires one hour after issuance.
#[utoipa::path(
    post,
    path = "/jwt",
    request_body = TokenRequest,
    responses((status = 200, description = "Signed token", body = TokenResponse))
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = auth::issue_token(&state.config.jwt_secret, &payload.email)
        .map_err(|_| ApiError::Internal)?;
    Ok(Json(TokenResponse { token }))
}

// --- Article Handlers ---

/// list_articles
///
/// [Public Route] Lists articles with optional title search and exact
/// publisher filtering.
#[utoipa::path(
    get,
    path = "/articles",
    params(ArticleFilter),
    responses((status = 200, description = "Filtered articles", body = [Article]))
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(filter): Query<ArticleFilter>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state
        .repo
        .list_articles(filter.search, filter.publisher)
        .await?;
    Ok(Json(articles))
}

/// create_article
///
/// [Public Route] Accepts a new article submission. The response echoes the
/// insert summary with the generated identifier; the submission always
/// starts out `pending`.
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleRequest,
    responses((status = 200, description = "Insert summary", body = InsertSummary))
)]
pub async fn create_article(
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<Json<InsertSummary>, ApiError> {
    let summary = state.repo.create_article(payload).await?;
    Ok(Json(summary))
}

/// get_article
///
/// [Public Route] Fetches one article. An unknown — or even malformed —
/// identifier responds 200 with a null body rather than an error status;
/// absence is not an error in this API.
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article ID")),
    responses((status = 200, description = "Article, or null when absent", body = Article))
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Article>>, ApiError> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Ok(Json(None));
    };
    let article = state.repo.get_article(id).await?;
    Ok(Json(article))
}

/// my_articles
///
/// [Public Route] Lists all articles authored under the given email.
#[utoipa::path(
    get,
    path = "/myArticles",
    params(EmailQuery),
    responses((status = 200, description = "Author's articles", body = [Article]))
)]
pub async fn my_articles(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.repo.list_articles_by_email(&query.email).await?;
    Ok(Json(articles))
}

/// update_article
///
/// [Public Route] First-generation full-field update: overwrites title,
/// description, status, and the premium flag in one shot. The narrower
/// approve/decline/premium endpoints below superseded this shape, but both
/// generations remain live.
#[utoipa::path(
    patch,
    path = "/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses((status = 200, description = "Update summary", body = UpdateSummary))
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let summary = state.repo.update_article(id, payload).await?;
    Ok(Json(summary))
}

/// approve_article
///
/// [Public Route] Moves an article to `approved` and clears any stale
/// decline reason.
#[utoipa::path(
    patch,
    path = "/articles/approve/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses((status = 200, description = "Update summary", body = UpdateSummary))
)]
pub async fn approve_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let summary = state.repo.approve_article(id).await?;
    Ok(Json(summary))
}

/// decline_article
///
/// [Public Route] Moves an article to `declined`, recording the reason.
#[utoipa::path(
    patch,
    path = "/articles/decline/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = DeclineRequest,
    responses((status = 200, description = "Update summary", body = UpdateSummary))
)]
pub async fn decline_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeclineRequest>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let summary = state.repo.decline_article(id, payload.reason).await?;
    Ok(Json(summary))
}

/// set_premium
///
/// [Public Route] Flags an article as premium. One-directional: the API
/// exposes no unset operation.
#[utoipa::path(
    patch,
    path = "/articles/premium/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses((status = 200, description = "Update summary", body = UpdateSummary))
)]
pub async fn set_premium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let summary = state.repo.set_premium(id).await?;
    Ok(Json(summary))
}

/// delete_article
///
/// [Public Route] Removes an article. Deleting an unknown id succeeds with a
/// zero deleted count.
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses((status = 200, description = "Delete summary", body = DeleteSummary))
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteSummary>, ApiError> {
    let summary = state.repo.delete_article(id).await?;
    Ok(Json(summary))
}

// --- User Handlers ---

/// list_users
///
/// [Admin Route] Lists every registered user. The `AdminUser` extractor
/// rejects with 401/403 before this body runs.
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.repo.list_users().await?;
    Ok(Json(users))
}

/// check_admin
///
/// [Authenticated Route] Self-service admin check. A caller may only query
/// their own email; any other email is rejected with 403 even though the
/// token itself is valid.
#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    params(("email" = String, Path, description = "Email to check (must match the caller)")),
    responses(
        (status = 200, description = "Admin flag", body = AdminFlag),
        (status = 403, description = "Identity mismatch")
    )
)]
pub async fn check_admin(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AdminFlag>, ApiError> {
    if email != auth_user.email {
        return Err(ApiError::Forbidden);
    }
    let admin = state.repo.is_admin(&email).await?;
    Ok(Json(AdminFlag { admin }))
}

/// create_user
///
/// [Public Route] Registers a user on first sign-in. Creation is idempotent
/// per email: a repeat submission is answered with a distinguishing message
/// and a null insertedId, as a normal 200 rather than an error.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses((status = 200, description = "Insert summary or already-exists message", body = CreateUserResponse))
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let response = match state.repo.create_user(payload).await? {
        Some(summary) => CreateUserResponse::Created(summary),
        None => CreateUserResponse::AlreadyExists {
            message: "User already exists".to_string(),
            inserted_id: None,
        },
    };
    Ok(Json(response))
}

/// my_profile
///
/// [Public Route] Fetches a user record by email; an unknown email responds
/// 200 with a null body.
#[utoipa::path(
    get,
    path = "/myProfile",
    params(EmailQuery),
    responses((status = 200, description = "User, or null when absent", body = User))
)]
pub async fn my_profile(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Option<User>>, ApiError> {
    let user = state.repo.get_user_by_email(&query.email).await?;
    Ok(Json(user))
}

/// update_profile
///
/// [Public Route] Overwrites the display name and photo of the user
/// addressed by the email in the payload.
#[utoipa::path(
    patch,
    path = "/users",
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Update summary", body = UpdateSummary))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let summary = state
        .repo
        .update_profile(&payload.email, payload.name, payload.photo)
        .await?;
    Ok(Json(summary))
}

/// promote_user
///
/// [Admin Route] Promotes a user to the admin role. There is no demotion
/// counterpart in this API.
#[utoipa::path(
    patch,
    path = "/users/admin/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "Update summary", body = UpdateSummary))
)]
pub async fn promote_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let summary = state.repo.promote_to_admin(id).await?;
    Ok(Json(summary))
}

/// delete_user
///
/// [Admin Route] Removes a user record; unknown ids report a zero count.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "Delete summary", body = DeleteSummary))
)]
pub async fn delete_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteSummary>, ApiError> {
    let summary = state.repo.delete_user(id).await?;
    Ok(Json(summary))
}

/// subscribe
///
/// [Public Route] Purchases a premium subscription: the expiry becomes
/// now + durationDays, replacing whatever expiry was stored before.
#[utoipa::path(
    patch,
    path = "/users/subscribe",
    request_body = SubscribeRequest,
    responses((status = 200, description = "Update summary", body = UpdateSummary))
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<UpdateSummary>, ApiError> {
    let summary = state
        .repo
        .subscribe(&payload.email, payload.duration_days)
        .await?;
    Ok(Json(summary))
}

/// premium_status
///
/// [Public Route] Reports whether the user currently holds a premium
/// entitlement. An expired entitlement reads as not-premium immediately and
/// its stored expiry is cleared as part of the call.
#[utoipa::path(
    get,
    path = "/users/premium-status/{email}",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Premium flag", body = PremiumStatus))
)]
pub async fn premium_status(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<PremiumStatus>, ApiError> {
    let premium = state.repo.premium_status(&email).await?;
    Ok(Json(PremiumStatus { premium }))
}

/// get_stats
///
/// [Public Route] User totals with the premium/normal partition.
#[utoipa::path(
    get,
    path = "/stats",
    responses((status = 200, description = "User stats", body = UserStats))
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<UserStats>, ApiError> {
    let stats = state.repo.stats().await?;
    Ok(Json(stats))
}

// --- Publisher Handlers ---

/// list_publishers
///
/// [Public Route] Lists every publisher.
#[utoipa::path(
    get,
    path = "/publishers",
    responses((status = 200, description = "All publishers", body = [Publisher]))
)]
pub async fn list_publishers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Publisher>>, ApiError> {
    let publishers = state.repo.list_publishers().await?;
    Ok(Json(publishers))
}

/// create_publisher
///
/// [Admin Route] Registers a new publisher. Both fields are required; an
/// empty name or logo is rejected with 400 before anything is inserted.
#[utoipa::path(
    post,
    path = "/admin/publishers",
    request_body = CreatePublisherRequest,
    responses(
        (status = 200, description = "Acknowledgement", body = MessageResponse),
        (status = 400, description = "Missing name or logo")
    )
)]
pub async fn create_publisher(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePublisherRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.name.is_empty() || payload.logo.is_empty() {
        return Err(ApiError::BadRequest(
            "Name and logo are required!".to_string(),
        ));
    }

    state
        .repo
        .create_publisher(payload.name, payload.logo)
        .await?;

    Ok(Json(MessageResponse {
        message: "Publisher added successfully!".to_string(),
    }))
}
