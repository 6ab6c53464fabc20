use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

/// What arrived from the client
#[derive(Debug, PartialEq)]
pub enum Inbound {
    Text(String),
    /// Binary, ping and pong frames
    Ignored,
    Closed,
}

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    async fn receive_message(&mut self) -> Result<Inbound, SocketError>;

    async fn close(&mut self) -> Result<(), SocketError>;
}

#[derive(Debug)]
pub enum SocketError {
    SendFailed(String),
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Inbound, SocketError> {
        match self.next().await {
            Some(Ok(Message::Text(text))) => Ok(Inbound::Text(text)),
            Some(Ok(Message::Close(_))) | None => Ok(Inbound::Closed),
            Some(Ok(_)) => Ok(Inbound::Ignored),
            Some(Err(e)) => Err(SocketError::ReceiveFailed(e.to_string())),
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// A user's event stream: forwards emitted events to the socket until either side closes
pub struct Connection {
    pub user_id: String,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
}

impl Connection {
    pub fn new(
        user_id: String,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self {
            user_id,
            socket,
            outbound_receiver,
        }
    }

    pub async fn run(mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => self.socket.send_message(message).await?,
                        None => break,
                    }
                }

                msg = self.socket.receive_message() => {
                    match msg? {
                        Inbound::Text(text) => {
                            // The stream is server-to-client only
                            debug!(user_id = %self.user_id, message = %text, "Ignoring client message");
                        }
                        Inbound::Ignored => {}
                        Inbound::Closed => break,
                    }
                }
            }
        }

        let _ = self.socket.close().await;
        Ok(())
    }
}
