use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError>;

    /// Fetches the given users in request order, skipping ids that don't exist
    async fn get_users(&self, user_ids: &[String]) -> Result<Vec<UserModel>, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let user_map = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            users: Mutex::new(user_map),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, UserModel>>, AppError> {
        self.users
            .lock()
            .map_err(|_| AppError::DatabaseError("User store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, name = %user.name, "Creating user in memory");

        let mut users = self.lock()?;
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::DatabaseError("User already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        let user = self.lock()?.get(user_id).cloned();
        debug!(user_id = %user_id, found = user.is_some(), "Fetched user from memory");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_users(&self, user_ids: &[String]) -> Result<Vec<UserModel>, AppError> {
        let users = self.lock()?;
        let found: Vec<UserModel> = user_ids
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect();

        debug!(
            requested = user_ids.len(),
            found = found.len(),
            "Fetched users from memory"
        );
        Ok(found)
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, "Creating user in database");

        sqlx::query("INSERT INTO users (id, name, avatar_url) VALUES ($1, $2, $3)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.avatar_url)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user.id, "Failed to create user in database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>("SELECT id, name, avatar_url FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user_id, "Failed to fetch user from database");
                AppError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self))]
    async fn get_users(&self, user_ids: &[String]) -> Result<Vec<UserModel>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UserModel>(
            "SELECT id, name, avatar_url FROM users WHERE id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch users from database");
            AppError::DatabaseError(e.to_string())
        })?;

        // ANY() doesn't preserve order, so restore the caller's ordering
        let mut by_id: HashMap<String, UserModel> =
            rows.into_iter().map(|u| (u.id.clone(), u)).collect();
        Ok(user_ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
