//! API reference page generation.

use super::field_item;
use crate::returns::{DescribedOperation, ReturnDoc};
use crate::signature::signature;
use milky_schema::ir::group_by_tag;

const HEADER: &str = "# Milky API Reference

This page lists every API method available on `MilkyClient` together with its
parameters. All API methods are `async`.

> [!TIP]
> Every method returns the raw `serde_json::Value` payload, whose fields match
> the Milky protocol documentation exactly. See the
> [data structure reference](structs.md) for details.

## Client lifecycle

### `ClientBuilder::new(host)`
Creates a client builder.
- **Options**:
    - `port(u16)`: Shared port, `3010` by default. Used for both the API and the event stream unless overridden.
    - `token(&str)`: Access token, sent as `Authorization: Bearer <token>` (optional).
    - `api_port(u16)`: Port of the HTTP API (optional).
    - `event_port(u16)`: Port of the WebSocket event stream (optional).
    - `request_timeout(Duration)` / `connect_timeout(Duration)`: Network timeouts.
- `ClientBuilder::from_env()` reads `MILKY_HOST`, `MILKY_PORT`, `MILKY_API_PORT`, `MILKY_EVENT_PORT` and `MILKY_TOKEN`.

### `subscribe(event_type, handler)`
Registers an async handler for one event type. Handlers receive a client clone
and the decoded `Event`, and run in registration order.

### `run()`
Connects to the event stream and dispatches events until `shutdown()` is
called, reconnecting with exponential backoff.
- **Example**: `client.run().await?`

---
";

const FOOTER: &str = "
## Low-level calls

### `call(action: &str, params: Value)`
Calls any API defined by the Milky protocol over HTTP and returns its `data`
payload. A `failed` status or a non-zero `retcode` is returned as
`ClientError::Api`.
- **Example**: `client.call(\"get_cookies\", json!({\"domain\": \"qq.com\"})).await?`

---

## Message segment helpers

`Segment` provides constructors for outgoing message segments. Combine them
into a `Vec<Segment>`, or pass plain text wherever a message is expected.

### Constructors
- `Segment::text(content)`: Plain text.
- `Segment::mention(user_id)`: Mentions a user.
- `Segment::mention_all()`: Mentions every group member.
- `Segment::face(face_id)`: Built-in face.
- `Segment::reply(message_seq)`: Replies to a message.
- `Segment::image(uri, sub_type, summary)`: Image. `uri` accepts `file://`, `http(s)://` and `base64://`; `sub_type` is `ImageSubType::Normal` or `ImageSubType::Sticker`.
- `Segment::record(uri)`: Voice record.
- `Segment::video(uri, thumb_uri)`: Video.
- `Segment::forward(messages)`: Forwarded messages.

### Utilities
- `extract_text(&[Segment])`: Concatenates the text of every text segment of a received message.
";

/// Generator for the API reference page.
pub struct ApiDocEmitter<'a> {
    operations: &'a [DescribedOperation<'a>],
    version: Option<&'a str>,
}

impl<'a> ApiDocEmitter<'a> {
    /// Creates a new API reference emitter.
    #[must_use]
    pub fn new(operations: &'a [DescribedOperation<'a>]) -> Self {
        Self {
            operations,
            version: None,
        }
    }

    /// Sets the API version shown in the header.
    #[must_use]
    pub fn with_version(mut self, version: Option<&'a str>) -> Self {
        self.version = version;
        self
    }

    /// Generates the complete page.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut content: Vec<String> = Vec::new();

        let mut header = HEADER.to_string();
        if let Some(version) = self.version {
            header = header.replacen(
                "parameters. All API methods",
                &format!("parameters (protocol version `{version}`). All API methods"),
                1,
            );
        }
        content.push(header);

        for (tag, operations) in group_by_tag(self.operations, |described| described.operation) {
            content.push(format!("## {tag}\n"));
            for described in operations {
                content.push(generate_method(described));
            }
            content.push("---\n".to_string());
        }

        content.push(FOOTER.to_string());
        content.join("\n")
    }
}

/// Generates the section of one method.
fn generate_method(described: &DescribedOperation<'_>) -> String {
    let op = described.operation;
    let mut lines = vec![format!("### `{}`", signature(op)), op.summary_or_empty().to_string()];

    if !op.parameters.is_empty() {
        lines.push("- **Parameters**:".to_string());
        for param in &op.parameters {
            lines.push(format!(
                "    - {}",
                field_item(&param.name, &param.description, &param.display_type.to_string())
            ));
        }
    }

    match &described.returns {
        ReturnDoc::Fields(fields) => {
            lines.push("- **Returns**: An object with the following fields:".to_string());
            for field in fields {
                lines.push(format!(
                    "    - {}",
                    field_item(&field.name, &field.description, &field.display_type.to_string())
                ));
            }
        }
        ReturnDoc::Value {
            display_type,
            description,
        } => {
            if description.is_empty() {
                lines.push(format!("- **Returns**: A `{display_type}` value."));
            } else {
                lines.push(format!("- **Returns**: {description} (`{display_type}`)"));
            }
        }
        ReturnDoc::Absent | ReturnDoc::Degraded { .. } => {}
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::returns::ReturnDescriber;
    use milky_schema::{ApiIr, Resolver, parse_document};

    const DOCUMENT: &str = r##"{
  "info": {"version": "1.0"},
  "paths": {
    "/api/send_private_message": {"post": {
      "summary": "Send a private message",
      "tags": ["Message"],
      "requestBody": {"content": {"application/json": {"schema": {
        "type": "object",
        "properties": {
          "user_id": {"type": "integer", "description": "Friend"},
          "message": {"type": "array", "items": {"$ref": "#/components/schemas/Segment"}}
        },
        "required": ["user_id", "message"]
      }}}},
      "responses": {"200": {"content": {"application/json": {"schema": {
        "type": "object",
        "properties": {"data": {"type": "object", "properties": {
          "message_seq": {"type": "integer", "description": "Sequence"}
        }}}
      }}}}}
    }},
    "/api/get_friend_list": {"post": {"summary": "List friends", "tags": ["Friend"]}},
    "/api/delete_message": {"post": {
      "tags": ["Message"],
      "responses": {"200": {"content": {"application/json": {"schema": {
        "type": "object",
        "properties": {"data": {"$ref": "#/components/schemas/Gone"}}
      }}}}}
    }},
    "/api/get_impl_info": {"post": {}}
  },
  "components": {"schemas": {"Segment": {"type": "object"}}}
}"##;

    fn generate() -> String {
        let document = parse_document(DOCUMENT).expect("Failed to parse document");
        let ir = ApiIr::from_document(&document).expect("Failed to extract operations");
        let (described, _) = ReturnDescriber::new(Resolver::new(&document)).describe_all(&ir);
        ApiDocEmitter::new(&described)
            .with_version(ir.version.as_deref())
            .generate()
    }

    #[test]
    fn test_tags_and_methods_sorted() {
        let output = generate();
        let friend = output.find("## Friend\n").unwrap();
        let message = output.find("## Message\n").unwrap();
        let uncategorized = output.find("## Uncategorized\n").unwrap();
        assert!(friend < message && message < uncategorized);

        let delete = output.find("### `delete_message()`").unwrap();
        let send = output.find("### `send_private_message(").unwrap();
        assert!(delete < send);
    }

    #[test]
    fn test_method_section() {
        let output = generate();
        assert!(output.contains(
            "### `send_private_message(user_id: int64, message: sequence<Segment> | text)`\nSend a private message\n"
        ));
        assert!(output.contains("    - `user_id`: Friend (int64)\n"));
        assert!(output.contains("    - `message`: (sequence<Segment> | text)\n"));
        assert!(output.contains(
            "- **Returns**: An object with the following fields:\n    - `message_seq`: Sequence (int64)"
        ));
    }

    #[test]
    fn test_degraded_return_is_omitted() {
        let output = generate();
        let start = output.find("### `delete_message()`").unwrap();
        let rest = &output[start..];
        let end = rest[1..].find("### ").map_or(rest.len(), |i| i + 1);
        let section = &rest[..end];
        assert!(!section.contains("**Returns**"));
    }

    #[test]
    fn test_static_sections() {
        let output = generate();
        assert!(output.starts_with("# Milky API Reference"));
        assert!(output.contains("(protocol version `1.0`)"));
        assert!(output.contains("## Low-level calls"));
        assert!(output.contains("`Segment::mention_all()`"));
    }
}
