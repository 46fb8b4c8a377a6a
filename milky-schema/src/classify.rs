//! Naming conventions of the Milky API description.
//!
//! Every rule that depends on a definition, field or path name lives here.

use crate::type_map::TypeName;

/// Field that carries a segment-like variant's payload.
pub const PAYLOAD_FIELD: &str = "data";

/// Parameter that carries message content.
pub const MESSAGE_PARAMETER: &str = "message";

/// Definitions that only wrap requests, responses or events.
const INTERNAL_DEFINITIONS: [&str; 3] = ["Event", "ApiResponse", "ApiEmptyObject"];

/// Documentation bucket of a named definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefinitionKind {
    /// Request/response wrapper, not documented.
    Internal,
    /// Core entity.
    Entity,
    /// Incoming or outgoing message envelope.
    MessageEnvelope,
    /// Message segment.
    Segment,
}

impl DefinitionKind {
    /// Classifies a definition by name.
    ///
    /// Rules apply in order: internal wrappers (`Api_*`, `Event`,
    /// `ApiResponse`, `ApiEmptyObject`), then names containing `Segment`,
    /// then `Incoming*Message` / `Outgoing*Message`, then everything else.
    #[must_use]
    pub fn of(name: &str) -> Self {
        if name.starts_with("Api_") || INTERNAL_DEFINITIONS.contains(&name) {
            Self::Internal
        } else if name.contains("Segment") {
            Self::Segment
        } else if (name.starts_with("Incoming") || name.starts_with("Outgoing"))
            && name.ends_with("Message")
        {
            Self::MessageEnvelope
        } else {
            Self::Entity
        }
    }

    /// Returns true if definitions of this kind appear in the reference.
    #[must_use]
    pub const fn is_documented(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

/// Returns true if a parameter carries message content and accepts plain
/// text as well as a segment sequence.
#[must_use]
pub fn is_message_content(name: &str, value_type: &TypeName) -> bool {
    name == MESSAGE_PARAMETER && value_type.is_sequence()
}

/// Derives an operation name from its path: the last non-empty segment.
#[must_use]
pub fn operation_name_from_path(path: &str) -> Option<&str> {
    path.rsplit('/').find(|segment| !segment.is_empty())
}
