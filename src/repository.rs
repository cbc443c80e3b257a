use crate::models::{
    Article, CreateArticleRequest, CreateUserRequest, DeleteSummary, InsertSummary, Publisher,
    UpdateArticleRequest, UpdateSummary, User, UserStats,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{PgPool, postgres::PgQueryResult, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Handlers talk to the
/// store exclusively through this trait, so the concrete backend (Postgres in
/// production, an in-memory mock in tests) is injected rather than captured.
///
/// Every operation is a single call against the external store; failures are
/// surfaced as `sqlx::Error` and mapped to a 500 at the HTTP boundary.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Articles ---
    /// Listing with optional filters: case-insensitive substring match on the
    /// title, exact match on the publisher, AND-combined.
    async fn list_articles(
        &self,
        search: Option<String>,
        publisher: Option<String>,
    ) -> Result<Vec<Article>, sqlx::Error>;
    /// Inserts a new submission; status is always stored as "pending".
    async fn create_article(
        &self,
        req: CreateArticleRequest,
    ) -> Result<InsertSummary, sqlx::Error>;
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>, sqlx::Error>;
    /// All articles whose author email equals the given email.
    async fn list_articles_by_email(&self, email: &str) -> Result<Vec<Article>, sqlx::Error>;
    /// First-generation full-field overwrite (title, description, status,
    /// premium flag), kept alongside the narrow mutations below.
    async fn update_article(
        &self,
        id: Uuid,
        req: UpdateArticleRequest,
    ) -> Result<UpdateSummary, sqlx::Error>;
    async fn approve_article(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error>;
    async fn decline_article(
        &self,
        id: Uuid,
        reason: String,
    ) -> Result<UpdateSummary, sqlx::Error>;
    /// One-directional: there is no unset operation.
    async fn set_premium(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error>;
    /// Idempotent; deleting an absent id reports a zero count.
    async fn delete_article(&self, id: Uuid) -> Result<DeleteSummary, sqlx::Error>;

    // --- Users ---
    /// Idempotent per email: returns `None` when the email is already
    /// registered. Uniqueness is enforced by the store itself, so concurrent
    /// duplicate submissions cannot both insert.
    async fn create_user(
        &self,
        req: CreateUserRequest,
    ) -> Result<Option<InsertSummary>, sqlx::Error>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error>;
    /// True iff a record with this email exists and has role "admin".
    async fn is_admin(&self, email: &str) -> Result<bool, sqlx::Error>;
    /// Overwrites exactly the name and photo fields.
    async fn update_profile(
        &self,
        email: &str,
        name: Option<String>,
        photo: Option<String>,
    ) -> Result<UpdateSummary, sqlx::Error>;
    /// Irreversible via this API: no demotion operation exists.
    async fn promote_to_admin(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error>;
    async fn delete_user(&self, id: Uuid) -> Result<DeleteSummary, sqlx::Error>;
    /// Expiry := now + duration_days, overwriting any previous expiry.
    async fn subscribe(
        &self,
        email: &str,
        duration_days: i64,
    ) -> Result<UpdateSummary, sqlx::Error>;
    /// Premium is a comparison of the stored expiry against the current time,
    /// never the raw presence of a value; an expired expiry is cleared by a
    /// separate conditional update before the read.
    async fn premium_status(&self, email: &str) -> Result<bool, sqlx::Error>;
    /// Total user count partitioned into premium/normal by presence of a
    /// non-null expiry (not re-validated against the clock at stats time).
    async fn stats(&self) -> Result<UserStats, sqlx::Error>;

    // --- Publishers ---
    async fn list_publishers(&self) -> Result<Vec<Publisher>, sqlx::Error>;
    async fn create_publisher(
        &self,
        name: String,
        logo: String,
    ) -> Result<InsertSummary, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL pool. Queries are runtime-checked; row mapping goes through the
/// `FromRow` derives on the models.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ARTICLE_COLUMNS: &str = "id, title, description, author_email, publisher, status, \
     decline_reason, is_premium, created_at, updated_at";

const USER_COLUMNS: &str = "id, email, name, photo, role, premium_expires_at, created_at";

// Under SQL an UPDATE reports a single affected-row count, so the echoed
// matched and modified counts are the same number.
fn update_summary(res: PgQueryResult) -> UpdateSummary {
    let n = res.rows_affected();
    UpdateSummary {
        acknowledged: true,
        matched_count: n,
        modified_count: n,
    }
}

fn delete_summary(res: PgQueryResult) -> DeleteSummary {
    DeleteSummary {
        acknowledged: true,
        deleted_count: res.rows_affected(),
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// list_articles
    ///
    /// Builds the filter incrementally with QueryBuilder so both filters stay
    /// bound parameters regardless of which combination is present.
    async fn list_articles(
        &self,
        search: Option<String>,
        publisher: Option<String>,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE 1 = 1"));

        if let Some(s) = search {
            builder.push(" AND title ILIKE ");
            builder.push_bind(format!("%{}%", s));
        }

        if let Some(p) = publisher {
            builder.push(" AND publisher = ");
            builder.push_bind(p);
        }

        builder.push(" ORDER BY created_at DESC");

        builder
            .build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await
    }

    /// create_article
    ///
    /// New submissions always enter the moderation queue as "pending".
    async fn create_article(
        &self,
        req: CreateArticleRequest,
    ) -> Result<InsertSummary, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO articles \
                 (id, title, description, author_email, publisher, status, is_premium, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, 'pending', $6, NOW(), NOW())",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.author_email)
        .bind(req.publisher)
        .bind(req.is_premium)
        .execute(&self.pool)
        .await?;

        Ok(InsertSummary {
            acknowledged: true,
            inserted_id: Some(id),
        })
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_articles_by_email(&self, email: &str) -> Result<Vec<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE author_email = $1 ORDER BY created_at DESC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    /// update_article
    ///
    /// Overwrites the four first-generation fields. The decline reason only
    /// survives while the written status is "declined".
    async fn update_article(
        &self,
        id: Uuid,
        req: UpdateArticleRequest,
    ) -> Result<UpdateSummary, sqlx::Error> {
        let res = sqlx::query(
            "UPDATE articles \
             SET title = $2, \
                 description = $3, \
                 status = $4, \
                 is_premium = $5, \
                 decline_reason = CASE WHEN $4 = 'declined' THEN decline_reason ELSE NULL END, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.status)
        .bind(req.is_premium)
        .execute(&self.pool)
        .await?;

        Ok(update_summary(res))
    }

    async fn approve_article(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error> {
        let res = sqlx::query(
            "UPDATE articles \
             SET status = 'approved', decline_reason = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(update_summary(res))
    }

    async fn decline_article(
        &self,
        id: Uuid,
        reason: String,
    ) -> Result<UpdateSummary, sqlx::Error> {
        let res = sqlx::query(
            "UPDATE articles \
             SET status = 'declined', decline_reason = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        Ok(update_summary(res))
    }

    async fn set_premium(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error> {
        let res =
            sqlx::query("UPDATE articles SET is_premium = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(update_summary(res))
    }

    async fn delete_article(&self, id: Uuid) -> Result<DeleteSummary, sqlx::Error> {
        let res = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(delete_summary(res))
    }

    /// create_user
    ///
    /// `ON CONFLICT (email) DO NOTHING` pushes the uniqueness invariant into
    /// the store: the duplicate case shows up as zero affected rows instead
    /// of a racy pre-insert existence check.
    async fn create_user(
        &self,
        req: CreateUserRequest,
    ) -> Result<Option<InsertSummary>, sqlx::Error> {
        let id = Uuid::new_v4();
        let res = sqlx::query(
            "INSERT INTO users (id, email, name, photo, role, created_at) \
             VALUES ($1, $2, $3, $4, 'user', NOW()) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(id)
        .bind(&req.email)
        .bind(&req.name)
        .bind(&req.photo)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(InsertSummary {
            acknowledged: true,
            inserted_id: Some(id),
        }))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn is_admin(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND role = 'admin')",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_profile(
        &self,
        email: &str,
        name: Option<String>,
        photo: Option<String>,
    ) -> Result<UpdateSummary, sqlx::Error> {
        let res = sqlx::query("UPDATE users SET name = $2, photo = $3 WHERE email = $1")
            .bind(email)
            .bind(name)
            .bind(photo)
            .execute(&self.pool)
            .await?;

        Ok(update_summary(res))
    }

    async fn promote_to_admin(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error> {
        let res = sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(update_summary(res))
    }

    async fn delete_user(&self, id: Uuid) -> Result<DeleteSummary, sqlx::Error> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(delete_summary(res))
    }

    /// subscribe
    ///
    /// The expiry is computed from "now", never extended from the current
    /// value: buying a second subscription mid-term restarts the clock.
    async fn subscribe(
        &self,
        email: &str,
        duration_days: i64,
    ) -> Result<UpdateSummary, sqlx::Error> {
        let expires_at = Utc::now() + Duration::days(duration_days);
        let res = sqlx::query("UPDATE users SET premium_expires_at = $2 WHERE email = $1")
            .bind(email)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(update_summary(res))
    }

    /// premium_status
    ///
    /// Clears an already-expired expiry with a conditional update, then reads
    /// the record and reports the comparison against the current time. The
    /// cleanup is its own atomic statement, so the read itself never mutates
    /// and a concurrent reader can never observe a stale "premium".
    async fn premium_status(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query(
            "UPDATE users SET premium_expires_at = NULL \
             WHERE email = $1 AND premium_expires_at <= NOW()",
        )
        .bind(email)
        .execute(&self.pool)
        .await?;

        let expiry: Option<Option<chrono::DateTime<Utc>>> =
            sqlx::query_scalar("SELECT premium_expires_at FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(match expiry.flatten() {
            Some(expires_at) => expires_at > Utc::now(),
            None => false,
        })
    }

    async fn stats(&self) -> Result<UserStats, sqlx::Error> {
        let (total, premium): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COUNT(premium_expires_at) FROM users")
                .fetch_one(&self.pool)
                .await?;

        Ok(UserStats {
            total_users: total,
            premium_users: premium,
            normal_users: total - premium,
        })
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>, sqlx::Error> {
        sqlx::query_as::<_, Publisher>("SELECT id, name, logo FROM publishers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn create_publisher(
        &self,
        name: String,
        logo: String,
    ) -> Result<InsertSummary, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO publishers (id, name, logo) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(name)
            .bind(logo)
            .execute(&self.pool)
            .await?;

        Ok(InsertSummary {
            acknowledged: true,
            inserted_id: Some(id),
        })
    }
}
