use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{dedup_ids, ChatModel, MAX_GROUP_MEMBERS, MIN_GROUP_MEMBERS},
    repository::ChatRepository,
    types::{AddMembersRequest, ChatSummary, GroupSummary, NewGroupRequest, RemoveMemberRequest},
};
use crate::{
    event::{ChatEvent, EventEmitter},
    shared::AppError,
    user::{models::UserModel, repository::UserRepository},
};

/// Number of member avatars shown for a group
const AVATAR_STACK_SIZE: usize = 3;

/// Service for handling group chat business logic
pub struct ChatService {
    chats: Arc<dyn ChatRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    events: Arc<dyn EventEmitter>,
}

impl ChatService {
    pub fn new(
        chats: Arc<dyn ChatRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        events: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            chats,
            users,
            events,
        }
    }

    /// Creates a group chat owned by `user_id` and notifies its members
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_group(
        &self,
        user_id: &str,
        request: NewGroupRequest,
    ) -> Result<ChatModel, AppError> {
        request.validate()?;

        let invited = dedup_ids(
            request
                .members
                .into_iter()
                .filter(|member| member != user_id),
        );

        let found = self.users.get_users(&invited).await?;
        if found.len() != invited.len() {
            warn!(
                requested = invited.len(),
                found = found.len(),
                "Group creation references unknown users"
            );
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let mut all_members = invited.clone();
        all_members.push(user_id.to_string());

        if all_members.len() < MIN_GROUP_MEMBERS {
            return Err(AppError::BadRequest(format!(
                "Group must have at least {} members",
                MIN_GROUP_MEMBERS
            )));
        }
        if all_members.len() > MAX_GROUP_MEMBERS {
            return Err(AppError::BadRequest(
                "Group members limit reached".to_string(),
            ));
        }

        let chat = ChatModel::new_group(request.name, user_id.to_string(), all_members);
        self.chats.create_chat(&chat).await?;

        info!(chat_id = %chat.id, members = chat.member_count(), "Group chat created");

        self.events
            .emit(
                ChatEvent::alert(format!("Welcome to {} group", chat.name)),
                &chat.members,
            )
            .await;
        self.events.emit(ChatEvent::RefetchChats, &invited).await;

        Ok(chat)
    }

    /// Lists every chat the user belongs to in display form
    #[instrument(skip(self))]
    pub async fn my_chats(&self, user_id: &str) -> Result<Vec<ChatSummary>, AppError> {
        let chats = self.chats.find_chats_by_member(user_id).await?;
        let users = self.populate(&chats).await?;

        let summaries = chats
            .iter()
            .map(|chat| {
                let populated = populated_members(chat, &users);
                let other = populated.iter().find(|u| u.id != user_id);

                let (avatar, name) = if chat.group_chat {
                    (avatar_stack(&populated), chat.name.clone())
                } else {
                    match other {
                        Some(other) => (vec![other.avatar_url.clone()], other.name.clone()),
                        None => (Vec::new(), chat.name.clone()),
                    }
                };

                ChatSummary {
                    id: chat.id.clone(),
                    group_chat: chat.group_chat,
                    avatar,
                    name,
                    members: chat.members_without(user_id),
                }
            })
            .collect();

        debug!(chat_count = chats.len(), "Chats projected for display");
        Ok(summaries)
    }

    /// Lists the groups the user created
    #[instrument(skip(self))]
    pub async fn my_groups(&self, user_id: &str) -> Result<Vec<GroupSummary>, AppError> {
        let chats = self.chats.find_groups_by_creator(user_id).await?;
        let users = self.populate(&chats).await?;

        Ok(chats
            .iter()
            .map(|chat| GroupSummary {
                id: chat.id.clone(),
                group_chat: chat.group_chat,
                name: chat.name.clone(),
                avatar: avatar_stack(&populated_members(chat, &users)),
            })
            .collect())
    }

    /// Adds users to a group; only the creator may do this
    #[instrument(skip(self, request), fields(chat_id = %request.chat_id))]
    pub async fn add_members(
        &self,
        user_id: &str,
        request: AddMembersRequest,
    ) -> Result<ChatModel, AppError> {
        request.validate()?;

        let mut chat = self.load_group(&request.chat_id).await?;
        if !chat.is_creator(user_id) {
            return Err(AppError::Forbidden(
                "You are not allowed to add members".to_string(),
            ));
        }

        let requested = dedup_ids(request.members);
        let new_members = self.users.get_users(&requested).await?;
        if new_members.len() != requested.len() {
            warn!(
                requested = requested.len(),
                found = new_members.len(),
                "Add members references unknown users"
            );
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let candidate_ids: Vec<String> = new_members.iter().map(|u| u.id.clone()).collect();
        let added = chat.add_members(&candidate_ids);

        if chat.member_count() > MAX_GROUP_MEMBERS {
            return Err(AppError::BadRequest(
                "Group members limit reached".to_string(),
            ));
        }

        self.chats.update_chat(&chat).await?;

        info!(
            chat_id = %chat.id,
            added = added.len(),
            members = chat.member_count(),
            "Members added to group"
        );

        let all_users_name = new_members
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.events
            .emit(
                ChatEvent::alert(format!("{} has been added in the group", all_users_name)),
                &chat.members,
            )
            .await;
        self.events.emit(ChatEvent::RefetchChats, &chat.members).await;

        Ok(chat)
    }

    /// Removes the caller from a group, handing over the creator role if needed
    #[instrument(skip(self))]
    pub async fn leave_group(&self, user_id: &str, chat_id: &str) -> Result<ChatModel, AppError> {
        let mut chat = self.load_group(chat_id).await?;

        if !chat.has_member(user_id) {
            return Err(AppError::BadRequest(
                "You are not a member of this group".to_string(),
            ));
        }

        let remaining = chat.members_without(user_id);
        if remaining.len() < MIN_GROUP_MEMBERS {
            return Err(AppError::BadRequest(format!(
                "Group must have at least {} members",
                MIN_GROUP_MEMBERS
            )));
        }

        chat.members = remaining;
        if chat.is_creator(user_id) {
            let new_creator = chat.reassign_creator(&mut rand::rng()).map(str::to_string);
            info!(chat_id = %chat.id, new_creator = ?new_creator, "Creator left, role reassigned");
        }

        let (user, ()) = tokio::try_join!(self.users.get_user(user_id), self.chats.update_chat(&chat))?;
        let name = user.map(|u| u.name).unwrap_or_else(|| user_id.to_string());

        info!(chat_id = %chat.id, members = chat.member_count(), "User left group");

        self.events
            .emit(
                ChatEvent::chat_alert(&chat.id, format!("User {} has left the group", name)),
                &chat.members,
            )
            .await;

        Ok(chat)
    }

    /// Removes a member from a group; only the creator may do this
    #[instrument(skip(self, request), fields(chat_id = %request.chat_id, removed_user = %request.user_id))]
    pub async fn remove_member(
        &self,
        user_id: &str,
        request: RemoveMemberRequest,
    ) -> Result<ChatModel, AppError> {
        request.validate()?;

        let (chat, removed_user) = tokio::try_join!(
            self.chats.get_chat(&request.chat_id),
            self.users.get_user(&request.user_id)
        )?;

        let mut chat = ensure_group(chat)?;
        if !chat.is_creator(user_id) {
            return Err(AppError::Forbidden(
                "You are not allowed to remove members".to_string(),
            ));
        }
        if chat.member_count() <= MIN_GROUP_MEMBERS {
            return Err(AppError::BadRequest(format!(
                "Group must have at least {} members",
                MIN_GROUP_MEMBERS
            )));
        }

        let removed_user =
            removed_user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if !chat.has_member(&removed_user.id) {
            return Err(AppError::BadRequest(
                "User is not a member of this group".to_string(),
            ));
        }
        if chat.is_creator(&removed_user.id) {
            return Err(AppError::BadRequest(
                "The creator cannot be removed, leave the group instead".to_string(),
            ));
        }

        let all_chat_members = chat.members.clone();
        chat.members = chat.members_without(&removed_user.id);
        self.chats.update_chat(&chat).await?;

        info!(chat_id = %chat.id, members = chat.member_count(), "Member removed from group");

        self.events
            .emit(
                ChatEvent::chat_alert(
                    &chat.id,
                    format!("{} has been removed from the group", removed_user.name),
                ),
                &chat.members,
            )
            .await;
        self.events
            .emit(ChatEvent::RefetchChats, &all_chat_members)
            .await;

        Ok(chat)
    }

    async fn load_group(&self, chat_id: &str) -> Result<ChatModel, AppError> {
        ensure_group(self.chats.get_chat(chat_id).await?)
    }

    /// Loads every member of the given chats in one lookup
    async fn populate(&self, chats: &[ChatModel]) -> Result<HashMap<String, UserModel>, AppError> {
        let member_ids = dedup_ids(chats.iter().flat_map(|c| c.members.iter().cloned()));
        let users = self.users.get_users(&member_ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }
}

fn ensure_group(chat: Option<ChatModel>) -> Result<ChatModel, AppError> {
    let chat = chat.ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;
    if !chat.group_chat {
        return Err(AppError::BadRequest("This is not a group chat".to_string()));
    }
    Ok(chat)
}

/// Members in chat order, skipping users that no longer exist
fn populated_members<'a>(chat: &ChatModel, users: &'a HashMap<String, UserModel>) -> Vec<&'a UserModel> {
    chat.members.iter().filter_map(|id| users.get(id)).collect()
}

fn avatar_stack(members: &[&UserModel]) -> Vec<String> {
    members
        .iter()
        .take(AVATAR_STACK_SIZE)
        .map(|u| u.avatar_url.clone())
        .collect()
}
