use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::auth::jwt_auth;
use crate::chat::{
    add_members, get_my_chats, get_my_groups, leave_group, new_group_chat, remove_member,
};
use crate::shared::{AppError, AppState};
use crate::websockets::websocket_handler;

/// Group chat routes, all behind JWT authentication
pub fn chat_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/new", post(new_group_chat))
        .route("/my", get(get_my_chats))
        .route("/my/groups", get(get_my_groups))
        .route("/addmembers", put(add_members))
        .route("/removemember", put(remove_member))
        .route("/:id", delete(leave_group))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth))
}

/// Create the main application router with all routes
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(|| async { "Hello, World!" }))
        .nest("/api/v1/chat", chat_routes(state.clone()))
        .route("/api/v1/events", get(websocket_handler))
        .with_state(state);

    with_middleware(router)
}

/// Cross-cutting layers shared by every route
fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Turns a panicking handler into the regular error response
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");

    AppError::Internal.into_response()
}
