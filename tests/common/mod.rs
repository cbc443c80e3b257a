#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Duration, Utc};
use newsdesk::{
    AppConfig, AppState, auth, create_router,
    models::{
        Article, CreateArticleRequest, CreateUserRequest, DeleteSummary, InsertSummary, Publisher,
        UpdateArticleRequest, UpdateSummary, User, UserStats,
    },
    repository::{Repository, RepositoryState},
};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use uuid::Uuid;

/// In-memory stand-in for the external store. Mirrors the semantics of the
/// Postgres repository closely enough to exercise every handler contract
/// without a database.
#[derive(Default)]
struct MockDb {
    articles: Vec<Article>,
    users: Vec<User>,
    publishers: Vec<Publisher>,
}

#[derive(Default)]
pub struct MockRepository {
    db: Mutex<MockDb>,
}

impl MockRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Inserts a user record directly, bypassing the creation endpoint.
    pub fn seed_user(&self, email: &str, role: &str, premium_expires_at: Option<DateTime<Utc>>) -> Uuid {
        let id = Uuid::new_v4();
        self.db.lock().unwrap().users.push(User {
            id,
            email: email.to_string(),
            name: None,
            photo: None,
            role: role.to_string(),
            premium_expires_at,
            created_at: Utc::now(),
        });
        id
    }

    /// Inserts an article record directly.
    pub fn seed_article(&self, title: &str, author_email: &str, publisher: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.db.lock().unwrap().articles.push(Article {
            id,
            title: title.to_string(),
            description: String::new(),
            author_email: author_email.to_string(),
            publisher: publisher.to_string(),
            status: "pending".to_string(),
            decline_reason: None,
            is_premium: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }

    pub fn user_count(&self, email: &str) -> usize {
        self.db
            .lock()
            .unwrap()
            .users
            .iter()
            .filter(|u| u.email == email)
            .count()
    }

    pub fn publisher_count(&self) -> usize {
        self.db.lock().unwrap().publishers.len()
    }

    pub fn article(&self, id: Uuid) -> Option<Article> {
        self.db
            .lock()
            .unwrap()
            .articles
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.db
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    fn update_count(n: u64) -> UpdateSummary {
        UpdateSummary {
            acknowledged: true,
            matched_count: n,
            modified_count: n,
        }
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn list_articles(
        &self,
        search: Option<String>,
        publisher: Option<String>,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let db = self.db.lock().unwrap();
        Ok(db
            .articles
            .iter()
            .filter(|a| match &search {
                Some(s) => a.title.to_lowercase().contains(&s.to_lowercase()),
                None => true,
            })
            .filter(|a| match &publisher {
                Some(p) => &a.publisher == p,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn create_article(
        &self,
        req: CreateArticleRequest,
    ) -> Result<InsertSummary, sqlx::Error> {
        let id = Uuid::new_v4();
        self.db.lock().unwrap().articles.push(Article {
            id,
            title: req.title,
            description: req.description,
            author_email: req.author_email,
            publisher: req.publisher,
            status: "pending".to_string(),
            decline_reason: None,
            is_premium: req.is_premium,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        Ok(InsertSummary {
            acknowledged: true,
            inserted_id: Some(id),
        })
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>, sqlx::Error> {
        Ok(self.article(id))
    }

    async fn list_articles_by_email(&self, email: &str) -> Result<Vec<Article>, sqlx::Error> {
        let db = self.db.lock().unwrap();
        Ok(db
            .articles
            .iter()
            .filter(|a| a.author_email == email)
            .cloned()
            .collect())
    }

    async fn update_article(
        &self,
        id: Uuid,
        req: UpdateArticleRequest,
    ) -> Result<UpdateSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let n = match db.articles.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.title = req.title;
                a.description = req.description;
                a.is_premium = req.is_premium;
                if req.status != "declined" {
                    a.decline_reason = None;
                }
                a.status = req.status;
                a.updated_at = Utc::now();
                1
            }
            None => 0,
        };
        Ok(Self::update_count(n))
    }

    async fn approve_article(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let n = match db.articles.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.status = "approved".to_string();
                a.decline_reason = None;
                1
            }
            None => 0,
        };
        Ok(Self::update_count(n))
    }

    async fn decline_article(
        &self,
        id: Uuid,
        reason: String,
    ) -> Result<UpdateSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let n = match db.articles.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.status = "declined".to_string();
                a.decline_reason = Some(reason);
                1
            }
            None => 0,
        };
        Ok(Self::update_count(n))
    }

    async fn set_premium(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let n = match db.articles.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.is_premium = true;
                1
            }
            None => 0,
        };
        Ok(Self::update_count(n))
    }

    async fn delete_article(&self, id: Uuid) -> Result<DeleteSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let before = db.articles.len();
        db.articles.retain(|a| a.id != id);
        Ok(DeleteSummary {
            acknowledged: true,
            deleted_count: (before - db.articles.len()) as u64,
        })
    }

    async fn create_user(
        &self,
        req: CreateUserRequest,
    ) -> Result<Option<InsertSummary>, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        if db.users.iter().any(|u| u.email == req.email) {
            return Ok(None);
        }
        let id = Uuid::new_v4();
        db.users.push(User {
            id,
            email: req.email,
            name: req.name,
            photo: req.photo,
            role: "user".to_string(),
            premium_expires_at: None,
            created_at: Utc::now(),
        });
        Ok(Some(InsertSummary {
            acknowledged: true,
            inserted_id: Some(id),
        }))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.user_by_email(email))
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        Ok(self.db.lock().unwrap().users.clone())
    }

    async fn is_admin(&self, email: &str) -> Result<bool, sqlx::Error> {
        Ok(self
            .db
            .lock()
            .unwrap()
            .users
            .iter()
            .any(|u| u.email == email && u.role == "admin"))
    }

    async fn update_profile(
        &self,
        email: &str,
        name: Option<String>,
        photo: Option<String>,
    ) -> Result<UpdateSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let n = match db.users.iter_mut().find(|u| u.email == email) {
            Some(u) => {
                u.name = name;
                u.photo = photo;
                1
            }
            None => 0,
        };
        Ok(Self::update_count(n))
    }

    async fn promote_to_admin(&self, id: Uuid) -> Result<UpdateSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let n = match db.users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.role = "admin".to_string();
                1
            }
            None => 0,
        };
        Ok(Self::update_count(n))
    }

    async fn delete_user(&self, id: Uuid) -> Result<DeleteSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let before = db.users.len();
        db.users.retain(|u| u.id != id);
        Ok(DeleteSummary {
            acknowledged: true,
            deleted_count: (before - db.users.len()) as u64,
        })
    }

    async fn subscribe(
        &self,
        email: &str,
        duration_days: i64,
    ) -> Result<UpdateSummary, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let n = match db.users.iter_mut().find(|u| u.email == email) {
            Some(u) => {
                u.premium_expires_at = Some(Utc::now() + Duration::days(duration_days));
                1
            }
            None => 0,
        };
        Ok(Self::update_count(n))
    }

    async fn premium_status(&self, email: &str) -> Result<bool, sqlx::Error> {
        let mut db = self.db.lock().unwrap();
        let now = Utc::now();
        if let Some(u) = db.users.iter_mut().find(|u| u.email == email) {
            if matches!(u.premium_expires_at, Some(exp) if exp <= now) {
                u.premium_expires_at = None;
            }
            return Ok(matches!(u.premium_expires_at, Some(exp) if exp > now));
        }
        Ok(false)
    }

    async fn stats(&self) -> Result<UserStats, sqlx::Error> {
        let db = self.db.lock().unwrap();
        let total = db.users.len() as i64;
        let premium = db
            .users
            .iter()
            .filter(|u| u.premium_expires_at.is_some())
            .count() as i64;
        Ok(UserStats {
            total_users: total,
            premium_users: premium,
            normal_users: total - premium,
        })
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>, sqlx::Error> {
        Ok(self.db.lock().unwrap().publishers.clone())
    }

    async fn create_publisher(
        &self,
        name: String,
        logo: String,
    ) -> Result<InsertSummary, sqlx::Error> {
        let id = Uuid::new_v4();
        self.db.lock().unwrap().publishers.push(Publisher { id, name, logo });
        Ok(InsertSummary {
            acknowledged: true,
            inserted_id: Some(id),
        })
    }
}

/// Builds the full application router around a mock repository, using the
/// non-panicking default configuration.
pub fn app(repo: Arc<MockRepository>) -> Router {
    let state = AppState {
        repo: repo as RepositoryState,
        config: AppConfig::default(),
    };
    create_router(state)
}

/// Issues a real session token signed with the test configuration's secret.
pub fn token_for(email: &str) -> String {
    auth::issue_token(&AppConfig::default().jwt_secret, email).unwrap()
}

/// Drives one request through the router and returns the status plus the
/// parsed JSON body (Null when the body is empty or not JSON).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
