use axum::{
    extract::{State, WebSocketUpgrade},
    http::HeaderMap,
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::shared::{AppError, AppState};

use super::socket::Connection;

/// GET /api/v1/events
///
/// Upgrades to a WebSocket that streams `ALERT` and `REFETCH_CHATS` events
/// for the authenticated user. Browsers can't set an Authorization header on
/// a socket, so the JWT travels in Sec-WebSocket-Protocol.
#[instrument(name = "events_socket", skip(ws, headers, app_state))]
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    let token = headers
        .get("sec-websocket-protocol")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing or invalid Sec-WebSocket-Protocol header");
            AppError::Unauthorized("Missing authentication token".to_string())
        })?;

    let claims = app_state.token_config.validate_token(token)?;
    let user_id = claims.sub;

    info!(user_id = %user_id, "WebSocket authentication successful");

    // Browsers drop the socket unless the offered subprotocol is echoed back
    let protocol = token.to_string();
    Ok(ws
        .protocols([protocol])
        .on_upgrade(move |socket| handle_websocket_connection(socket, user_id, app_state)))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    user_id: String,
    app_state: AppState,
) {
    let connection_id = Uuid::new_v4().to_string();
    info!(user_id = %user_id, connection_id = %connection_id, "WebSocket connection established");

    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(user_id.clone(), connection_id.clone(), outbound_sender)
        .await;

    let connection = Connection::new(user_id.clone(), Box::new(socket), outbound_receiver);
    if let Err(e) = connection.run().await {
        warn!(user_id = %user_id, error = ?e, "WebSocket connection ended with error");
    }

    app_state
        .connection_manager
        .remove_connection(&user_id, &connection_id)
        .await;

    info!(user_id = %user_id, connection_id = %connection_id, "WebSocket connection closed");
}
