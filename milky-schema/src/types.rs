//! API description document types.
//!
//! This module contains the data structures the OpenAPI description is
//! decoded into: the document root, path items, operations and schema nodes.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Prefix every supported reference string starts with.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Media type of request and response bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Status code of the success response.
pub const SUCCESS_STATUS: &str = "200";

/// Complete API description document.
///
/// Constructed once by [`crate::parse_document`] and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata.
    #[serde(default)]
    pub info: Info,
    /// Path table, in declaration order.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components.
    #[serde(default)]
    pub components: Components,
}

impl Document {
    /// Returns the definition table.
    #[must_use]
    pub fn definitions(&self) -> &IndexMap<String, SchemaNode> {
        &self.components.schemas
    }

    /// Looks up a definition by name.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&SchemaNode> {
        self.components.schemas.get(name)
    }

    /// Returns true if a definition with the given name exists.
    #[must_use]
    pub fn has_definition(&self, name: &str) -> bool {
        self.components.schemas.contains_key(name)
    }
}

/// Document metadata (`info`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// API version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Reusable components (`components`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Named schema definitions, in declaration order.
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
}

/// Per-verb operations of one path.
///
/// Only `post` is callable in this protocol; other verbs are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// The callable operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationObject>,
}

/// One operation descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationObject {
    /// Operation identifier, used as the method name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// One-line summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category tags; the first one groups the operation in documentation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Body>,
    /// Responses keyed by status code.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Body>,
}

impl OperationObject {
    /// Returns the JSON schema of the request body, if declared.
    #[must_use]
    pub fn request_schema(&self) -> Option<&SchemaNode> {
        self.request_body.as_ref().and_then(Body::json_schema)
    }

    /// Returns the JSON schema of the success response, if declared.
    #[must_use]
    pub fn success_schema(&self) -> Option<&SchemaNode> {
        self.responses.get(SUCCESS_STATUS).and_then(Body::json_schema)
    }
}

/// A request body or response object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Body {
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content keyed by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl Body {
    /// Returns the `application/json` schema.
    #[must_use]
    pub fn json_schema(&self) -> Option<&SchemaNode> {
        self.content
            .get(JSON_MEDIA_TYPE)
            .and_then(|media| media.schema.as_ref())
    }
}

/// One media type entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema of the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
}

/// Primitive kind of a schema node (`type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// UTF-8 text.
    String,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Number,
    /// Boolean.
    Boolean,
    /// Array of `items`.
    Array,
    /// Object with `properties`.
    Object,
    /// JSON null.
    Null,
}

impl SchemaKind {
    /// Returns true for the scalar kinds.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::String | Self::Integer | Self::Number | Self::Boolean
        )
    }
}

/// One schema definition or inline schema.
///
/// Equality is structural: the declaration order of `properties` and
/// `required` does not take part in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Reference to a named definition.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Primitive kind.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<SchemaKind>,
    /// Object properties, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,
    /// Names of required properties.
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub required: IndexSet<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    /// Allowed literal values.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    /// Alternative shapes.
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,
    /// Shapes merged into this one.
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,
    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Primary discriminant of a schema node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Points at another definition.
    Reference(&'a str),
    /// Closed set of alternatives.
    OneOf(&'a [SchemaNode]),
    /// Single-branch composition wrapper without fields of its own.
    Wrapper(&'a SchemaNode),
    /// Plain kind.
    Kind(SchemaKind),
    /// Composition without a declared kind.
    Composite,
    /// No constraint at all.
    Any,
}

impl SchemaNode {
    /// Creates a node of the given kind.
    #[must_use]
    pub fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Creates a reference node pointing at the named definition.
    #[must_use]
    pub fn reference_to(name: &str) -> Self {
        Self {
            reference: Some(format!("{SCHEMA_REF_PREFIX}{name}")),
            ..Default::default()
        }
    }

    /// Classifies this node by its primary discriminant.
    #[must_use]
    pub fn shape(&self) -> Shape<'_> {
        if let Some(reference) = self.reference.as_deref() {
            return Shape::Reference(reference);
        }
        if !self.one_of.is_empty() {
            return Shape::OneOf(&self.one_of);
        }
        if let [single] = self.all_of.as_slice() {
            if self.properties.is_empty() {
                return Shape::Wrapper(single);
            }
        }
        match self.kind {
            Some(kind) => Shape::Kind(kind),
            None if !self.all_of.is_empty() || !self.properties.is_empty() => Shape::Composite,
            None => Shape::Any,
        }
    }

    /// Returns true if the named property is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Returns the single allowed literal, if this node is a one-value enumeration.
    #[must_use]
    pub fn single_literal(&self) -> Option<&Value> {
        match self.enum_values.as_slice() {
            [value] => Some(value),
            _ => None,
        }
    }
}

/// Accepts either a single type name or an array of them (OpenAPI 3.1),
/// keeping the first non-null member of an array.
fn deserialize_kind<'de, D>(deserializer: D) -> Result<Option<SchemaKind>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KindField {
        One(SchemaKind),
        Many(Vec<SchemaKind>),
    }

    Ok(match Option::<KindField>::deserialize(deserializer)? {
        None => None,
        Some(KindField::One(kind)) => Some(kind),
        Some(KindField::Many(kinds)) => kinds
            .iter()
            .copied()
            .find(|kind| *kind != SchemaKind::Null)
            .or_else(|| kinds.first().copied()),
    })
}

/// Renders a literal the way it appears in enumerations and defaults:
/// strings quoted, everything else in JSON form.
#[must_use]
pub fn render_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

/// Renders a literal without quoting strings.
#[must_use]
pub fn render_bare_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> SchemaNode {
        serde_json::from_value(value).expect("valid schema node")
    }

    #[test]
    fn test_shape_reference_wins() {
        let n = node(json!({"$ref": "#/components/schemas/A", "type": "object"}));
        assert_eq!(n.shape(), Shape::Reference("#/components/schemas/A"));
    }

    #[test]
    fn test_shape_variants() {
        assert_eq!(
            node(json!({"type": "integer"})).shape(),
            Shape::Kind(SchemaKind::Integer)
        );
        assert!(matches!(
            node(json!({"oneOf": [{"type": "string"}]})).shape(),
            Shape::OneOf(_)
        ));
        assert!(matches!(
            node(json!({"allOf": [{"type": "string"}]})).shape(),
            Shape::Wrapper(_)
        ));
        assert_eq!(
            node(json!({"allOf": [{"type": "string"}, {"type": "string"}]})).shape(),
            Shape::Composite
        );
        assert_eq!(node(json!({})).shape(), Shape::Any);
    }

    #[test]
    fn test_kind_array_form() {
        let n = node(json!({"type": ["null", "integer"]}));
        assert_eq!(n.kind, Some(SchemaKind::Integer));
        let n = node(json!({"type": ["null"]}));
        assert_eq!(n.kind, Some(SchemaKind::Null));
    }

    #[test]
    fn test_structural_equality_ignores_order() {
        let a = node(json!({
            "type": "object",
            "properties": {"x": {"type": "string"}, "y": {"type": "integer"}},
            "required": ["x", "y"]
        }));
        let b = node(json!({
            "type": "object",
            "properties": {"y": {"type": "integer"}, "x": {"type": "string"}},
            "required": ["y", "x"]
        }));
        assert_eq!(a, b);

        let c = node(json!({
            "type": "object",
            "properties": {"y": {"type": "integer"}, "x": {"type": "string", "description": "d"}},
            "required": ["y", "x"]
        }));
        assert_ne!(a, c);
    }

    #[test]
    fn test_single_literal() {
        assert_eq!(
            node(json!({"type": "string", "enum": ["text"]})).single_literal(),
            Some(&json!("text"))
        );
        assert_eq!(
            node(json!({"type": "string", "enum": ["a", "b"]})).single_literal(),
            None
        );
    }

    #[test]
    fn test_render_literal() {
        assert_eq!(render_literal(&json!("normal")), "\"normal\"");
        assert_eq!(render_literal(&json!(false)), "false");
        assert_eq!(render_literal(&json!(20)), "20");
        assert_eq!(render_bare_literal(&json!("text")), "text");
    }

    #[test]
    fn test_operation_schemas() {
        let op: OperationObject = serde_json::from_value(json!({
            "operationId": "get_login_info",
            "requestBody": {"content": {"application/json": {"schema": {"type": "object"}}}},
            "responses": {"200": {"content": {"application/json": {"schema": {"type": "object"}}}}}
        }))
        .expect("valid operation");
        assert!(op.request_schema().is_some());
        assert!(op.success_schema().is_some());
    }
}
