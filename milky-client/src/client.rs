//! The Milky client: API calls and the event loop.

use crate::error::ClientError;
use crate::event::{Event, HandlerRegistry};
use crate::reconnect::{Backoff, ReconnectConfig};
use crate::session::EventSession;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Response envelope of every API call.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    retcode: i64,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiResponse {
    fn into_result(self) -> Result<Value, ClientError> {
        if self.status == "failed" || self.retcode != 0 {
            return Err(ClientError::Api {
                retcode: self.retcode,
                message: self.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(self.data.unwrap_or(Value::Null))
    }
}

/// Client for one Milky protocol endpoint.
///
/// Cloning is cheap; clones share the HTTP connection pool, the handler
/// registry and the shutdown signal.
#[derive(Clone)]
pub struct MilkyClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    api_base: Url,
    event_url: Url,
    token: Option<String>,
    connect_timeout: Duration,
    reconnect_config: ReconnectConfig,
    handlers: HandlerRegistry,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for MilkyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MilkyClient")
            .field("api_base", &self.inner.api_base.as_str())
            .field("event_url", &self.inner.event_url.as_str())
            .field("handlers", &self.inner.handlers.len())
            .finish_non_exhaustive()
    }
}

impl MilkyClient {
    pub(crate) fn new(
        http: reqwest::Client,
        api_base: Url,
        event_url: Url,
        token: Option<String>,
        connect_timeout: Duration,
        reconnect_config: ReconnectConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                api_base,
                event_url,
                token,
                connect_timeout,
                reconnect_config,
                handlers: HandlerRegistry::default(),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Returns the base URL of the HTTP API.
    #[must_use]
    pub fn api_base(&self) -> &Url {
        &self.inner.api_base
    }

    /// Returns the URL of the event stream.
    #[must_use]
    pub fn event_url(&self) -> &Url {
        &self.inner.event_url
    }

    /// Calls an API action and returns its `data` payload.
    ///
    /// A `null` `params` is sent as an empty object.
    ///
    /// # Errors
    /// Returns `ClientError::Http` on transport or HTTP status failures and
    /// `ClientError::Api` when the server reports a `failed` status or a
    /// non-zero `retcode`.
    pub async fn call(&self, action: &str, params: Value) -> Result<Value, ClientError> {
        let url = self.inner.api_base.join(action)?;
        let params = match params {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let mut request = self.inner.http.post(url).json(&params);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let envelope: ApiResponse = response.json().await?;
        let result = envelope.into_result();
        if let Err(e) = &result {
            tracing::debug!(action, error = %e, "API call failed");
        }
        result
    }

    /// Registers an async handler for one event type.
    ///
    /// Handlers of the same event type run one after another in
    /// registration order.
    pub fn subscribe<F, Fut>(&self, event_type: impl Into<String>, handler: F)
    where
        F: Fn(MilkyClient, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.inner.handlers.register(event_type.into(), handler);
    }

    /// Runs every handler subscribed to the event's type.
    pub async fn dispatch(&self, event: Event) {
        let handlers = self.inner.handlers.handlers_for(&event.event_type);
        if handlers.is_empty() {
            tracing::trace!(event_type = %event.event_type, "no handler for event");
            return;
        }
        for handler in handlers {
            handler(self.clone(), event.clone()).await;
        }
    }

    /// Connects to the event stream and dispatches events until
    /// [`shutdown`](Self::shutdown) is called.
    ///
    /// Lost connections are re-established with exponential backoff.
    ///
    /// # Errors
    /// Returns `ClientError::MaxReconnectAttempts` when the reconnect policy
    /// gives up, or the connection error itself when reconnection is
    /// disabled.
    pub async fn run(&self) -> Result<(), ClientError> {
        let mut reconnect = Backoff::new(self.inner.reconnect_config.clone());

        loop {
            if self.inner.shutdown.is_cancelled() {
                return Ok(());
            }

            let error = match self.run_session(&mut reconnect).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };

            match reconnect.next_delay() {
                Some(delay) => {
                    tracing::warn!(error = %error, ?delay, "event stream lost, reconnecting");
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = self.inner.shutdown.cancelled() => return Ok(()),
                    }
                }
                None if reconnect.is_enabled() => {
                    tracing::error!(
                        attempts = reconnect.failures(),
                        "max reconnect attempts reached"
                    );
                    return Err(ClientError::MaxReconnectAttempts);
                }
                None => return Err(error),
            }
        }
    }

    /// Stops a running event loop. A stopped client cannot run again.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    async fn run_session(&self, reconnect: &mut Backoff) -> Result<(), ClientError> {
        let mut session = tokio::select! {
            session = EventSession::connect(
                &self.inner.event_url,
                self.inner.token.as_deref(),
                self.inner.connect_timeout,
            ) => session?,
            () = self.inner.shutdown.cancelled() => return Ok(()),
        };

        reconnect.reset();
        tracing::info!(url = %self.inner.event_url, "connected to event stream");

        loop {
            tokio::select! {
                () = self.inner.shutdown.cancelled() => {
                    session.close().await;
                    tracing::info!("event stream closed");
                    return Ok(());
                }

                result = session.recv() => {
                    match result? {
                        Some(event) => self.dispatch(event).await,
                        None => return Err(ClientError::ConnectionClosed),
                    }
                }
            }
        }
    }
}
