use axum::http::StatusCode;
use groupchat::{event::AlertPayload, ChatEvent, ChatRepository};
use serde_json::{json, Value};

mod utils;

use utils::*;

async fn create_rustaceans(setup: &mut TestSetup) -> String {
    let (status, _) = setup
        .send(
            "alice",
            "POST",
            "/api/v1/chat/new",
            Some(json!({ "name": "Rustaceans", "members": ["bob", "charlie", "david"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = setup.send("alice", "GET", "/api/v1/chat/my", None).await;
    let chat_id = body["chats"][0]["_id"].as_str().unwrap().to_string();
    setup.clear_events();
    chat_id
}

#[tokio::test]
async fn test_group_creation_notifies_members() {
    let mut setup = TestSetupBuilder::new().with_five_users().build().await;

    let (status, body) = setup
        .send(
            "alice",
            "POST",
            "/api/v1/chat/new",
            Some(json!({ "name": "Rustaceans", "members": ["bob", "charlie", "david"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "success": true, "message": "Group Created" }));

    let welcome = ChatEvent::alert("Welcome to Rustaceans group");
    assert_eq!(setup.inbox("alice").drain(), vec![welcome.clone()]);
    for member in ["bob", "charlie", "david"] {
        assert_eq!(
            setup.inbox(member).drain(),
            vec![welcome.clone(), ChatEvent::RefetchChats]
        );
    }
    setup.inbox("erin").assert_empty();
}

#[tokio::test]
async fn test_chat_lists_reflect_membership() {
    let mut setup = TestSetupBuilder::new().with_five_users().build().await;
    let chat_id = create_rustaceans(&mut setup).await;

    let (status, body) = setup.send("bob", "GET", "/api/v1/chat/my", None).await;
    assert_eq!(status, StatusCode::OK);
    let chat = &body["chats"][0];
    assert_eq!(chat["_id"], json!(chat_id));
    assert_eq!(chat["name"], "Rustaceans");
    assert_eq!(chat["avatar"].as_array().unwrap().len(), 3);
    assert_eq!(chat["members"], json!(["charlie", "david", "alice"]));

    let (_, body) = setup.send("erin", "GET", "/api/v1/chat/my", None).await;
    assert_eq!(body["chats"], json!([]));

    let (_, body) = setup.send("alice", "GET", "/api/v1/chat/my/groups", None).await;
    assert_eq!(body["groups"].as_array().unwrap().len(), 1);

    let (_, body) = setup.send("bob", "GET", "/api/v1/chat/my/groups", None).await;
    assert_eq!(body["groups"], json!([]));
}

#[tokio::test]
async fn test_add_then_remove_member() {
    let mut setup = TestSetupBuilder::new().with_five_users().build().await;
    let chat_id = create_rustaceans(&mut setup).await;

    // Only the creator may add
    let (status, _) = setup
        .send(
            "bob",
            "PUT",
            "/api/v1/chat/addmembers",
            Some(json!({ "chatId": chat_id, "members": ["erin"] })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = setup
        .send(
            "alice",
            "PUT",
            "/api/v1/chat/addmembers",
            Some(json!({ "chatId": chat_id, "members": ["erin", "bob"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let stored = setup.chats.get_chat(&chat_id).await.unwrap().unwrap();
    assert_eq!(stored.member_count(), 5);
    assert_eq!(
        setup.inbox("erin").drain(),
        vec![
            ChatEvent::alert("Erin, Bob has been added in the group"),
            ChatEvent::RefetchChats
        ]
    );

    setup.clear_events();

    let (status, _) = setup
        .send(
            "alice",
            "PUT",
            "/api/v1/chat/removemember",
            Some(json!({ "chatId": chat_id, "userId": "erin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The removed user only learns to refetch; the rest also get the alert
    assert_eq!(setup.inbox("erin").drain(), vec![ChatEvent::RefetchChats]);
    assert_eq!(
        setup.inbox("bob").drain(),
        vec![
            ChatEvent::chat_alert(chat_id.clone(), "Erin has been removed from the group"),
            ChatEvent::RefetchChats
        ]
    );

    let (status, _) = setup
        .send(
            "alice",
            "PUT",
            "/api/v1/chat/removemember",
            Some(json!({ "chatId": chat_id, "userId": "david" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Down to three members, removal is refused
    let (status, body) = setup
        .send(
            "alice",
            "PUT",
            "/api/v1/chat/removemember",
            Some(json!({ "chatId": chat_id, "userId": "charlie" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Group must have at least 3 members");
}

#[tokio::test]
async fn test_creator_leaves_and_role_moves_on() {
    let mut setup = TestSetupBuilder::new().with_five_users().build().await;
    let chat_id = create_rustaceans(&mut setup).await;
    let uri = format!("/api/v1/chat/{}", chat_id);

    let (status, body) = setup.send("alice", "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Leave Group Successfully");

    let stored = setup.chats.get_chat(&chat_id).await.unwrap().unwrap();
    assert_eq!(stored.members, vec!["bob", "charlie", "david"]);
    assert!(stored.has_member(&stored.creator));

    let expected = ChatEvent::Alert(AlertPayload {
        message: "User Alice has left the group".to_string(),
        chat_id: Some(chat_id.clone()),
    });
    for member in ["bob", "charlie", "david"] {
        assert_eq!(setup.inbox(member).drain(), vec![expected.clone()]);
    }
    setup.inbox("alice").assert_empty();

    // The new creator now sees the group as theirs
    let new_creator = stored.creator.clone();
    let (_, body) = setup
        .send(&new_creator, "GET", "/api/v1/chat/my/groups", None)
        .await;
    assert_eq!(body["groups"][0]["_id"], json!(chat_id));

    // Three left, nobody else may leave
    let (status, body) = setup.send("bob", "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Group must have at least 3 members");
}

#[tokio::test]
async fn test_errors_use_uniform_shape() {
    let mut setup = TestSetupBuilder::new().with_five_users().build().await;
    create_rustaceans(&mut setup).await;

    let (status, body) = setup
        .send("alice", "DELETE", "/api/v1/chat/does-not-exist", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Chat not found" })
    );

    let (status, body): (StatusCode, Value) = setup
        .send(
            "alice",
            "PUT",
            "/api/v1/chat/addmembers",
            Some(json!({ "chatId": "does-not-exist", "members": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
