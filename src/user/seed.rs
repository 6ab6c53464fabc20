use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{models::UserModel, repository::UserRepository};
use crate::{auth::TokenConfig, shared::AppError};

const DEMO_NAMES: [&str; 5] = ["Alice", "Bob", "Carol", "Dave", "Erin"];

/// Inserts a fixed set of demo users and returns each with a bearer token
#[instrument(skip(repository, token_config))]
pub async fn seed_demo_users(
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: &TokenConfig,
) -> Result<Vec<(UserModel, String)>, AppError> {
    let mut seeded = Vec::with_capacity(DEMO_NAMES.len());

    for name in DEMO_NAMES {
        let id = Uuid::new_v4().to_string();
        let user = UserModel::new(
            id.clone(),
            name,
            format!("https://api.dicebear.com/9.x/initials/svg?seed={}", name),
        );
        repository.create_user(&user).await?;

        let token = token_config.create_token(&id)?;
        info!(user_id = %id, name = %name, "Seeded demo user");
        debug!(user_id = %id, token = %token, "Demo user bearer token");
        seeded.push((user, token));
    }

    Ok(seeded)
}
