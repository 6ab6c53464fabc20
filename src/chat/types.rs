use serde::{Deserialize, Serialize};

use super::models::MAX_GROUP_MEMBERS;
use crate::shared::AppError;

/// Request payload for creating a group chat
#[derive(Debug, Deserialize)]
pub struct NewGroupRequest {
    pub name: String,
    pub members: Vec<String>,
}

impl NewGroupRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Please enter name".to_string()));
        }
        if self.members.len() < 2 || self.members.len() > MAX_GROUP_MEMBERS {
            return Err(AppError::BadRequest(format!(
                "Members must be 2-{}",
                MAX_GROUP_MEMBERS
            )));
        }
        Ok(())
    }
}

/// Request payload for adding members to a group
#[derive(Debug, Deserialize)]
pub struct AddMembersRequest {
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub members: Vec<String>,
}

impl AddMembersRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.chat_id.trim().is_empty() {
            return Err(AppError::BadRequest("Please enter Chat ID".to_string()));
        }
        if self.members.is_empty() {
            return Err(AppError::BadRequest("Please enter members".to_string()));
        }
        if self.members.len() > MAX_GROUP_MEMBERS {
            return Err(AppError::BadRequest(
                "Group members limit reached".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request payload for removing a member from a group
#[derive(Debug, Deserialize)]
pub struct RemoveMemberRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
}

impl RemoveMemberRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.chat_id.trim().is_empty() {
            return Err(AppError::BadRequest("Please enter Chat ID".to_string()));
        }
        if self.user_id.trim().is_empty() {
            return Err(AppError::BadRequest("Please enter User ID".to_string()));
        }
        Ok(())
    }
}

/// One entry of the "my chats" list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "groupChat")]
    pub group_chat: bool,
    pub avatar: Vec<String>,
    pub name: String,
    /// Every member except the caller
    pub members: Vec<String>,
}

/// One entry of the "my groups" list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "groupChat")]
    pub group_chat: bool,
    pub name: String,
    pub avatar: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatsResponse {
    pub success: bool,
    pub chats: Vec<ChatSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupsResponse {
    pub success: bool,
    pub groups: Vec<GroupSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("user-{}", i)).collect()
    }

    #[test]
    fn test_new_group_request_validation() {
        let ok = NewGroupRequest {
            name: "Rustaceans".to_string(),
            members: ids(2),
        };
        assert!(ok.validate().is_ok());

        let blank_name = NewGroupRequest {
            name: "   ".to_string(),
            members: ids(2),
        };
        assert!(matches!(blank_name.validate(), Err(AppError::BadRequest(_))));

        let too_few = NewGroupRequest {
            name: "x".to_string(),
            members: ids(1),
        };
        assert!(matches!(too_few.validate(), Err(AppError::BadRequest(_))));

        let too_many = NewGroupRequest {
            name: "x".to_string(),
            members: ids(101),
        };
        assert!(matches!(too_many.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_add_members_request_uses_camel_case_chat_id() {
        let request: AddMembersRequest =
            serde_json::from_value(json!({ "chatId": "c1", "members": ["u1"] })).unwrap();
        assert_eq!(request.chat_id, "c1");
        assert!(request.validate().is_ok());

        let empty: AddMembersRequest =
            serde_json::from_value(json!({ "chatId": "c1", "members": [] })).unwrap();
        assert!(matches!(empty.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_add_members_request_is_capped() {
        let at_limit = AddMembersRequest {
            chat_id: "c1".to_string(),
            members: ids(MAX_GROUP_MEMBERS),
        };
        assert!(at_limit.validate().is_ok());

        let over_limit = AddMembersRequest {
            chat_id: "c1".to_string(),
            members: ids(MAX_GROUP_MEMBERS + 1),
        };
        assert!(
            matches!(over_limit.validate(), Err(AppError::BadRequest(msg)) if msg == "Group members limit reached")
        );
    }

    #[test]
    fn test_remove_member_request_fields() {
        let request: RemoveMemberRequest =
            serde_json::from_value(json!({ "userId": "u1", "chatId": "c1" })).unwrap();
        assert_eq!(request.user_id, "u1");
        assert_eq!(request.chat_id, "c1");
    }

    #[test]
    fn test_chat_summary_wire_names() {
        let summary = ChatSummary {
            id: "c1".to_string(),
            group_chat: true,
            avatar: vec!["a.png".to_string()],
            name: "Rustaceans".to_string(),
            members: vec!["u2".to_string()],
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["_id"], "c1");
        assert_eq!(value["groupChat"], true);
    }
}
