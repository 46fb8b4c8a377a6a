//! Protocol events and handler registry.

use crate::client::MilkyClient;
use crate::error::ClientError;
use crate::segment::Segment;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// An event pushed on the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type key, e.g. `message_receive`.
    pub event_type: String,
    /// Account the event was received by.
    #[serde(default)]
    pub self_id: Option<i64>,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// Event payload.
    pub data: Value,
}

impl Event {
    /// Decodes an event from a text or binary frame.
    ///
    /// # Errors
    /// Returns `serde_json::Error` if the frame is not a protocol event.
    pub fn from_slice(frame: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(frame)
    }

    /// Decodes the `segments` of a message payload.
    ///
    /// # Errors
    /// Returns `ClientError::Json` if the payload has no valid segment list.
    pub fn segments(&self) -> Result<Vec<Segment>, ClientError> {
        let segments = self.data.get("segments").cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(segments)?)
    }
}

pub(crate) type Handler = Arc<dyn Fn(MilkyClient, Event) -> BoxFuture<'static, ()> + Send + Sync>;

/// Handlers keyed by event type, in registration order.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Vec<Handler>>>,
}

impl HandlerRegistry {
    pub(crate) fn register<F, Fut>(&self, event_type: String, handler: F)
    where
        F: Fn(MilkyClient, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |client, event| Box::pin(handler(client, event)));
        self.handlers.write().entry(event_type).or_default().push(handler);
    }

    /// Returns a snapshot of the handlers for one event type.
    pub(crate) fn handlers_for(&self, event_type: &str) -> Vec<Handler> {
        self.handlers
            .read()
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.read().values().map(Vec::len).sum()
    }
}
