use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::ChatModel;
use crate::shared::AppError;

/// Trait for chat repository operations
#[async_trait]
pub trait ChatRepository {
    async fn create_chat(&self, chat: &ChatModel) -> Result<(), AppError>;
    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatModel>, AppError>;

    /// Chats the user belongs to, oldest first
    async fn find_chats_by_member(&self, user_id: &str) -> Result<Vec<ChatModel>, AppError>;

    /// Group chats the user created and still belongs to, oldest first
    async fn find_groups_by_creator(&self, user_id: &str) -> Result<Vec<ChatModel>, AppError>;

    /// Overwrites name, creator and members of an existing chat
    async fn update_chat(&self, chat: &ChatModel) -> Result<(), AppError>;
}

/// In-memory implementation of ChatRepository for development and testing
pub struct InMemoryChatRepository {
    chats: Mutex<HashMap<String, ChatModel>>,
}

impl Default for InMemoryChatRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self {
            chats: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated chats
    pub fn with_chats(chats: Vec<ChatModel>) -> Self {
        let chat_map = chats.into_iter().map(|c| (c.id.clone(), c)).collect();
        Self {
            chats: Mutex::new(chat_map),
        }
    }

    pub fn chat_count(&self) -> usize {
        self.chats.lock().map(|chats| chats.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, ChatModel>>, AppError> {
        self.chats
            .lock()
            .map_err(|_| AppError::DatabaseError("Chat store lock poisoned".to_string()))
    }

    fn find_sorted<F>(&self, predicate: F) -> Result<Vec<ChatModel>, AppError>
    where
        F: Fn(&ChatModel) -> bool,
    {
        let chats = self.lock()?;
        let mut found: Vec<ChatModel> = chats.values().filter(|c| predicate(*c)).cloned().collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    #[instrument(skip(self, chat))]
    async fn create_chat(&self, chat: &ChatModel) -> Result<(), AppError> {
        debug!(chat_id = %chat.id, name = %chat.name, "Creating chat in memory");

        let mut chats = self.lock()?;
        if chats.contains_key(&chat.id) {
            warn!(chat_id = %chat.id, "Chat already exists in memory");
            return Err(AppError::DatabaseError("Chat already exists".to_string()));
        }
        chats.insert(chat.id.clone(), chat.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatModel>, AppError> {
        let chat = self.lock()?.get(chat_id).cloned();

        match &chat {
            Some(c) => debug!(chat_id = %chat_id, members = c.member_count(), "Chat found in memory"),
            None => debug!(chat_id = %chat_id, "Chat not found in memory"),
        }

        Ok(chat)
    }

    #[instrument(skip(self))]
    async fn find_chats_by_member(&self, user_id: &str) -> Result<Vec<ChatModel>, AppError> {
        self.find_sorted(|c| c.has_member(user_id))
    }

    #[instrument(skip(self))]
    async fn find_groups_by_creator(&self, user_id: &str) -> Result<Vec<ChatModel>, AppError> {
        self.find_sorted(|c| c.group_chat && c.is_creator(user_id) && c.has_member(user_id))
    }

    #[instrument(skip(self, chat))]
    async fn update_chat(&self, chat: &ChatModel) -> Result<(), AppError> {
        debug!(chat_id = %chat.id, members = chat.member_count(), "Updating chat in memory");

        let mut chats = self.lock()?;
        match chats.get_mut(&chat.id) {
            Some(stored) => {
                stored.name = chat.name.clone();
                stored.creator = chat.creator.clone();
                stored.members = chat.members.clone();
                Ok(())
            }
            None => {
                warn!(chat_id = %chat.id, "Chat not found for update in memory");
                Err(AppError::NotFound("Chat not found".to_string()))
            }
        }
    }
}

/// PostgreSQL implementation of chat repository
pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CHAT_COLUMNS: &str = "id, name, group_chat, creator, members, created_at";

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    #[instrument(skip(self, chat))]
    async fn create_chat(&self, chat: &ChatModel) -> Result<(), AppError> {
        debug!(chat_id = %chat.id, "Creating chat in database");

        sqlx::query(
            "INSERT INTO chats (id, name, group_chat, creator, members, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&chat.id)
        .bind(&chat.name)
        .bind(chat.group_chat)
        .bind(&chat.creator)
        .bind(&chat.members)
        .bind(chat.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, chat_id = %chat.id, "Failed to create chat in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatModel>, AppError> {
        sqlx::query_as::<_, ChatModel>(&format!("SELECT {} FROM chats WHERE id = $1", CHAT_COLUMNS))
            .bind(chat_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, chat_id = %chat_id, "Failed to fetch chat from database");
                AppError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self))]
    async fn find_chats_by_member(&self, user_id: &str) -> Result<Vec<ChatModel>, AppError> {
        sqlx::query_as::<_, ChatModel>(&format!(
            "SELECT {} FROM chats WHERE $1 = ANY(members) ORDER BY created_at, id",
            CHAT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to list chats from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_groups_by_creator(&self, user_id: &str) -> Result<Vec<ChatModel>, AppError> {
        sqlx::query_as::<_, ChatModel>(&format!(
            "SELECT {} FROM chats WHERE group_chat AND creator = $1 AND $1 = ANY(members) ORDER BY created_at, id",
            CHAT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to list groups from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, chat))]
    async fn update_chat(&self, chat: &ChatModel) -> Result<(), AppError> {
        debug!(chat_id = %chat.id, "Updating chat in database");

        let result =
            sqlx::query("UPDATE chats SET name = $2, creator = $3, members = $4 WHERE id = $1")
                .bind(&chat.id)
                .bind(&chat.name)
                .bind(&chat.creator)
                .bind(&chat.members)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, chat_id = %chat.id, "Failed to update chat in database");
                    AppError::DatabaseError(e.to_string())
                })?;

        if result.rows_affected() == 0 {
            warn!(chat_id = %chat.id, "Chat not found for update");
            return Err(AppError::NotFound("Chat not found".to_string()));
        }

        Ok(())
    }
}
