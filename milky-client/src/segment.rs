//! Message segments.
//!
//! A message is a sequence of segments, each `{"type": ..., "data": {...}}`.
//! The constructors below build the outgoing kinds; received segments
//! deserialize into the same [`Segment`] type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// One element of a structured message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Kind-specific payload.
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Sub-type of an image segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSubType {
    /// Regular picture.
    #[default]
    Normal,
    /// Sticker.
    Sticker,
}

impl ImageSubType {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Sticker => "sticker",
        }
    }
}

impl Segment {
    fn new(kind: &str, data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            kind: kind.to_string(),
            data,
        }
    }

    /// Plain text.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new("text", json!({ "text": content.into() }))
    }

    /// Mentions a user.
    #[must_use]
    pub fn mention(user_id: i64) -> Self {
        Self::new("mention", json!({ "user_id": user_id }))
    }

    /// Mentions every group member.
    #[must_use]
    pub fn mention_all() -> Self {
        Self::new("mention_all", json!({}))
    }

    /// Built-in face.
    #[must_use]
    pub fn face(face_id: impl Into<String>) -> Self {
        Self::new("face", json!({ "face_id": face_id.into() }))
    }

    /// Replies to the message with the given sequence number.
    #[must_use]
    pub fn reply(message_seq: i64) -> Self {
        Self::new("reply", json!({ "message_seq": message_seq }))
    }

    /// Image. `uri` accepts `file://`, `http(s)://` and `base64://`.
    #[must_use]
    pub fn image(uri: impl Into<String>, sub_type: ImageSubType, summary: Option<&str>) -> Self {
        let mut segment = Self::new(
            "image",
            json!({ "uri": uri.into(), "sub_type": sub_type.as_str() }),
        );
        if let Some(summary) = summary.filter(|s| !s.is_empty()) {
            segment.data.insert("summary".to_string(), json!(summary));
        }
        segment
    }

    /// Voice record.
    #[must_use]
    pub fn record(uri: impl Into<String>) -> Self {
        Self::new("record", json!({ "uri": uri.into() }))
    }

    /// Video with an optional cover image.
    #[must_use]
    pub fn video(uri: impl Into<String>, thumb_uri: Option<&str>) -> Self {
        let mut segment = Self::new("video", json!({ "uri": uri.into() }));
        if let Some(thumb_uri) = thumb_uri.filter(|s| !s.is_empty()) {
            segment.data.insert("thumb_uri".to_string(), json!(thumb_uri));
        }
        segment
    }

    /// Forwarded messages.
    #[must_use]
    pub fn forward(messages: Vec<Value>) -> Self {
        Self::new("forward", json!({ "messages": messages }))
    }

    /// Returns the text of a text segment.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if self.kind != "text" {
            return None;
        }
        self.data.get("text").and_then(Value::as_str)
    }
}

/// Concatenates the text of every text segment.
#[must_use]
pub fn extract_text(segments: &[Segment]) -> String {
    segments.iter().filter_map(Segment::as_text).collect()
}

/// Anything accepted where an outgoing message is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// Plain text, sent as a single text segment.
    Text(String),
    /// Explicit segments.
    Segments(Vec<Segment>),
}

impl MessageContent {
    /// Normalizes the content into a segment sequence.
    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        match self {
            Self::Text(text) => vec![Segment::text(text)],
            Self::Segments(segments) => segments,
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Segment> for MessageContent {
    fn from(segment: Segment) -> Self {
        Self::Segments(vec![segment])
    }
}

impl From<Vec<Segment>> for MessageContent {
    fn from(segments: Vec<Segment>) -> Self {
        Self::Segments(segments)
    }
}
