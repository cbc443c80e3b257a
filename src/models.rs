use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Article
///
/// A newspaper article from the `articles` table. Articles enter the system
/// as `pending` submissions and are moved to `approved` or `declined` by
/// moderation; `decline_reason` is non-null only while declined.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    // Email of the submitting user; the key used by the /myArticles listing.
    pub author_email: String,
    // Publisher display name (exact-match filter key).
    pub publisher: String,
    // One of "pending", "approved", "declined".
    pub status: String,
    pub decline_reason: Option<String>,
    pub is_premium: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// User
///
/// A user record from the `users` table. `email` is the unique identity key
/// (enforced by the store). A null `premium_expires_at` means the user never
/// purchased a subscription, or the last one expired and has been cleared.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub photo: Option<String>,
    // The RBAC field: "user" or "admin".
    pub role: String,
    #[ts(type = "string | null")]
    pub premium_expires_at: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Publisher
///
/// A publisher from the `publishers` table. Created by admins, read by
/// anyone; no update or delete operation is exposed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Publisher {
    pub id: Uuid,
    pub name: String,
    pub logo: String,
}

// --- Request Payloads (Input Schemas) ---

/// TokenRequest
///
/// Identity submitted to POST /jwt for token issuance.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TokenRequest {
    pub email: String,
}

/// TokenResponse
///
/// The signed session token returned by POST /jwt.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

/// CreateArticleRequest
///
/// Input payload for submitting a new article (POST /articles). This layer
/// performs no required-field validation; absent fields fall back to their
/// defaults and the status of a new submission is always `pending`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub is_premium: bool,
}

/// UpdateArticleRequest
///
/// Full-field overwrite payload for PATCH /articles/{id} — the
/// first-generation update shape, kept alongside the narrower
/// approve/decline/premium operations that later replaced it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateArticleRequest {
    pub title: String,
    pub description: String,
    pub status: String,
    pub is_premium: bool,
}

/// DeclineRequest
///
/// The reason recorded when an admin declines an article.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeclineRequest {
    #[serde(default)]
    pub reason: String,
}

/// CreateUserRequest
///
/// Input payload for POST /users, issued on first sign-in. Creation is
/// idempotent per email and always stores the "user" role; promotion is a
/// separate admin operation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// UpdateProfileRequest
///
/// Overwrites the display name and photo of the user addressed by email.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateProfileRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// SubscribeRequest
///
/// Sets the premium expiry to now + durationDays, overwriting any existing
/// expiry (a purchase never extends from the previous expiry).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubscribeRequest {
    pub email: String,
    pub duration_days: i64,
}

/// CreatePublisherRequest
///
/// Input payload for POST /admin/publishers. Both fields are required;
/// empty strings are treated as absent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePublisherRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo: String,
}

// --- Response Schemas (Output) ---

/// AdminFlag
///
/// Result of the self-service admin check (GET /users/admin/{email}).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminFlag {
    pub admin: bool,
}

/// PremiumStatus
///
/// Result of GET /users/premium-status/{email}. Computed from the stored
/// expiry against the current time, so it is never stale.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PremiumStatus {
    pub premium: bool,
}

/// UserStats
///
/// Totals for GET /stats. The premium partition counts users with a non-null
/// expiry and is deliberately not re-validated against the clock at stats
/// time (inherited contract).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserStats {
    pub total_users: i64,
    pub premium_users: i64,
    pub normal_users: i64,
}

/// MessageResponse
///
/// Plain acknowledgement body, e.g. publisher creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

// --- Mutation Summaries ---
//
// Mutation endpoints echo driver-style summaries (insertedId, matchedCount,
// modifiedCount, deletedCount) rather than the mutated documents. This is the
// response contract clients were built against and is preserved as-is; under
// SQL, matched and modified are both the affected-row count.

/// InsertSummary
///
/// Summary of a single-document insert.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InsertSummary {
    pub acknowledged: bool,
    pub inserted_id: Option<Uuid>,
}

/// UpdateSummary
///
/// Summary of a single-document update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateSummary {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// DeleteSummary
///
/// Summary of a single-document delete. Deleting an absent id is not an
/// error; it reports a zero count.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeleteSummary {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// CreateUserResponse
///
/// POST /users returns either the insert summary for a fresh sign-in, or a
/// distinguishing message (with a null insertedId) when the email is already
/// registered. The duplicate case is an expected outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(untagged)]
#[ts(export)]
pub enum CreateUserResponse {
    AlreadyExists {
        message: String,
        #[serde(rename = "insertedId")]
        inserted_id: Option<Uuid>,
    },
    Created(InsertSummary),
}
