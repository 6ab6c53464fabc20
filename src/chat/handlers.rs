use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::ChatService,
    types::{
        AddMembersRequest, ChatsResponse, GroupsResponse, MessageResponse, NewGroupRequest,
        RemoveMemberRequest,
    },
};
use crate::auth::AuthUser;
use crate::shared::{AppError, AppJson, AppState};

fn chat_service(state: &AppState) -> ChatService {
    ChatService::new(
        Arc::clone(&state.chat_repository),
        Arc::clone(&state.user_repository),
        Arc::clone(&state.event_emitter),
    )
}

/// HTTP handler for creating a group chat
///
/// POST /api/v1/chat/new
#[instrument(name = "new_group_chat", skip(state, request), fields(user_id = %user.user_id))]
pub async fn new_group_chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<NewGroupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let chat = chat_service(&state)
        .create_group(&user.user_id, request)
        .await?;

    info!(chat_id = %chat.id, "Group created");

    Ok((StatusCode::CREATED, Json(MessageResponse::ok("Group Created"))))
}

/// HTTP handler for listing the caller's chats
///
/// GET /api/v1/chat/my
#[instrument(name = "get_my_chats", skip(state), fields(user_id = %user.user_id))]
pub async fn get_my_chats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ChatsResponse>, AppError> {
    let chats = chat_service(&state).my_chats(&user.user_id).await?;

    info!(chat_count = chats.len(), "Chats listed successfully");

    Ok(Json(ChatsResponse {
        success: true,
        chats,
    }))
}

/// HTTP handler for listing the groups the caller created
///
/// GET /api/v1/chat/my/groups
#[instrument(name = "get_my_groups", skip(state), fields(user_id = %user.user_id))]
pub async fn get_my_groups(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GroupsResponse>, AppError> {
    let groups = chat_service(&state).my_groups(&user.user_id).await?;

    info!(group_count = groups.len(), "Groups listed successfully");

    Ok(Json(GroupsResponse {
        success: true,
        groups,
    }))
}

/// PUT /api/v1/chat/addmembers
#[instrument(name = "add_members", skip(state, request), fields(user_id = %user.user_id))]
pub async fn add_members(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<AddMembersRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    chat_service(&state)
        .add_members(&user.user_id, request)
        .await?;

    Ok(Json(MessageResponse::ok("Members added successfully")))
}

/// PUT /api/v1/chat/removemember
#[instrument(name = "remove_member", skip(state, request), fields(user_id = %user.user_id))]
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<RemoveMemberRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    chat_service(&state)
        .remove_member(&user.user_id, request)
        .await?;

    Ok(Json(MessageResponse::ok("Member removed successfully")))
}

/// DELETE /api/v1/chat/:id
#[instrument(name = "leave_group", skip(state), fields(user_id = %user.user_id))]
pub async fn leave_group(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(chat_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    chat_service(&state)
        .leave_group(&user.user_id, &chat_id)
        .await?;

    Ok(Json(MessageResponse::ok("Leave Group Successfully")))
}
