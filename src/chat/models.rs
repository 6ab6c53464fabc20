use chrono::{DateTime, Utc};
use rand::{seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use uuid::Uuid;

/// A group may never shrink below this many members
pub const MIN_GROUP_MEMBERS: usize = 3;

/// Hard cap on group size
pub const MAX_GROUP_MEMBERS: usize = 100;

/// Database model for chats table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ChatModel {
    pub id: String, // UUID v4
    pub name: String,
    pub group_chat: bool,
    pub creator: String,      // User id allowed to add/remove members
    pub members: Vec<String>, // User ids, first three drive the avatar stack
    pub created_at: DateTime<Utc>,
}

impl ChatModel {
    /// Creates a group chat; `members` should already include the creator
    pub fn new_group(name: String, creator: String, members: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            group_chat: true,
            creator,
            members,
            created_at: Utc::now(),
        }
    }

    /// Creates a one-to-one chat between two users, for test fixtures
    #[cfg(test)]
    pub fn new_direct(first: String, second: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: format!("{}-{}", first, second),
            group_chat: false,
            creator: first.clone(),
            members: vec![first, second],
            created_at: Utc::now(),
        }
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    pub fn is_creator(&self, user_id: &str) -> bool {
        self.creator == user_id
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Appends the ids not already in the chat, returns the ones actually added
    pub fn add_members(&mut self, user_ids: &[String]) -> Vec<String> {
        let mut added = Vec::new();
        for id in user_ids {
            if !self.has_member(id) {
                self.members.push(id.clone());
                added.push(id.clone());
            }
        }
        added
    }

    /// Members left over if `user_id` were gone
    pub fn members_without(&self, user_id: &str) -> Vec<String> {
        self.members
            .iter()
            .filter(|m| m.as_str() != user_id)
            .cloned()
            .collect()
    }

    /// Hands the creator role to a random current member
    pub fn reassign_creator<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&str> {
        let new_creator = self.members.choose(rng)?.clone();
        self.creator = new_creator;
        Some(&self.creator)
    }
}

/// Drops repeated ids, keeping the first occurrence
pub fn dedup_ids(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
