//! Event stream session management.

use crate::error::ClientError;
use crate::event::Event;
use futures::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

/// One connection to the event stream.
pub struct EventSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl EventSession {
    /// Connects to the event stream, sending the token as a bearer header.
    ///
    /// # Errors
    /// Returns `ClientError::ConnectTimeout` if the handshake does not finish
    /// in time, or `ClientError::WebSocket` if it fails.
    pub async fn connect(
        url: &Url,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let mut request = url.as_str().into_client_request()?;
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::config("token is not a valid header value"))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (stream, _response) = tokio::time::timeout(timeout, connect_async(request))
            .await
            .map_err(|_| ClientError::ConnectTimeout)??;

        Ok(Self { stream })
    }

    /// Receives the next protocol event.
    ///
    /// Frames that do not decode as an event are skipped.
    ///
    /// # Returns
    /// `Ok(Some(event))` if received, `Ok(None)` if the connection closed.
    ///
    /// # Errors
    /// Returns `ClientError::WebSocket` on a transport failure.
    pub async fn recv(&mut self) -> Result<Option<Event>, ClientError> {
        while let Some(message) = self.stream.next().await {
            let message = message?;
            let frame: &[u8] = match &message {
                Message::Text(text) => text.as_bytes(),
                Message::Binary(data) => &data[..],
                Message::Close(_) => return Ok(None),
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            };

            match Event::from_slice(frame) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping frame that is not a protocol event")
                }
            }
        }
        Ok(None)
    }

    /// Closes the connection.
    pub async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "error while closing event stream");
        }
    }
}
