//! Reference resolution and `allOf` flattening.
//!
//! References are followed with an explicit loop and a trail of visited
//! definition names, so reference cycles are reported instead of recursing.

use crate::error::SchemaError;
use crate::types::{Document, SCHEMA_REF_PREFIX, SchemaNode, Shape};
use indexmap::{IndexMap, IndexSet};

/// Extracts the definition name from a reference string.
///
/// # Errors
/// Returns `SchemaError::InvalidReference` if the reference does not point
/// into `#/components/schemas/`.
pub fn definition_name(reference: &str) -> Result<&str, SchemaError> {
    match reference.strip_prefix(SCHEMA_REF_PREFIX) {
        Some(name) if !name.is_empty() && !name.contains('/') => Ok(name),
        _ => Err(SchemaError::invalid_reference(reference)),
    }
}

/// Merged field listing of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape<'a> {
    /// Fields in output order.
    pub properties: IndexMap<&'a str, &'a SchemaNode>,
    /// Names of required fields.
    pub required: IndexSet<&'a str>,
}

impl<'a> ObjectShape<'a> {
    /// Returns true if the shape has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns true if the named field is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Returns the field names, required ones first, each group in
    /// declaration order.
    #[must_use]
    pub fn required_first(&self) -> Vec<&'a str> {
        let (mut required, optional): (Vec<&'a str>, Vec<&'a str>) = self
            .properties
            .keys()
            .copied()
            .partition(|name| self.required.contains(name));
        required.extend(optional);
        required
    }
}

/// Resolves references against a document.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    document: &'a Document,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given document.
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Looks up a definition by name.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownDefinition` if no such definition exists.
    pub fn definition(&self, name: &str) -> Result<&'a SchemaNode, SchemaError> {
        self.document
            .definition(name)
            .ok_or_else(|| SchemaError::unknown(name))
    }

    /// Follows references and single-branch `allOf` wrappers until a node
    /// with its own structure is reached.
    ///
    /// # Errors
    /// Returns `SchemaError` on dangling, malformed or circular references.
    pub fn resolve<'n>(&self, node: &'n SchemaNode) -> Result<&'n SchemaNode, SchemaError>
    where
        'a: 'n,
    {
        let mut trail = Vec::new();
        self.resolve_along(node, &mut trail)
    }

    /// Like [`Resolver::resolve`], but continues an existing trail of
    /// followed definitions. Names followed here are appended to `trail`.
    ///
    /// # Errors
    /// Returns `SchemaError` on dangling, malformed or circular references.
    pub fn resolve_along<'n>(
        &self,
        node: &'n SchemaNode,
        trail: &mut Vec<&'n str>,
    ) -> Result<&'n SchemaNode, SchemaError>
    where
        'a: 'n,
    {
        let mut current = node;
        loop {
            match current.shape() {
                Shape::Reference(reference) => {
                    let name = definition_name(reference)?;
                    if trail.contains(&name) {
                        return Err(SchemaError::circular(trail.as_slice(), name));
                    }
                    trail.push(name);
                    current = self.definition(name)?;
                }
                Shape::Wrapper(inner) => current = inner,
                _ => return Ok(current),
            }
        }
    }

    /// Resolves a node and merges its `allOf` parts into one field listing.
    ///
    /// Own properties come first; each part is merged in order, later values
    /// replacing earlier ones at their existing position.
    ///
    /// # Errors
    /// Returns `SchemaError` on dangling, malformed or circular references.
    pub fn flatten<'n>(&self, node: &'n SchemaNode) -> Result<ObjectShape<'n>, SchemaError>
    where
        'a: 'n,
    {
        let mut trail = Vec::new();
        let mut shape = ObjectShape::default();
        self.flatten_into(node, &mut trail, &mut shape)?;
        Ok(shape)
    }

    fn flatten_into<'n>(
        &self,
        node: &'n SchemaNode,
        trail: &mut Vec<&'n str>,
        shape: &mut ObjectShape<'n>,
    ) -> Result<(), SchemaError>
    where
        'a: 'n,
    {
        let resolved = self.resolve_along(node, trail)?;

        for (name, field) in &resolved.properties {
            shape.properties.insert(name.as_str(), field);
        }
        shape
            .required
            .extend(resolved.required.iter().map(String::as_str));

        for part in &resolved.all_of {
            let mark = trail.len();
            self.flatten_into(part, trail, shape)?;
            trail.truncate(mark);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SchemaKind;
    use serde_json::json;

    fn document(schemas: serde_json::Value) -> Document {
        serde_json::from_value(json!({"components": {"schemas": schemas}}))
            .expect("valid document")
    }

    #[test]
    fn test_definition_name() {
        assert_eq!(definition_name("#/components/schemas/Group"), Ok("Group"));
        assert!(matches!(
            definition_name("#/definitions/Group"),
            Err(SchemaError::InvalidReference { .. })
        ));
        assert!(definition_name("#/components/schemas/").is_err());
    }

    #[test]
    fn test_resolve_chain() {
        let doc = document(json!({
            "A": {"$ref": "#/components/schemas/B"},
            "B": {"$ref": "#/components/schemas/C"},
            "C": {"type": "integer"}
        }));
        let resolver = Resolver::new(&doc);
        let node = SchemaNode::reference_to("A");
        let resolved = resolver.resolve(&node).unwrap();
        assert_eq!(resolved.kind, Some(SchemaKind::Integer));
    }

    #[test]
    fn test_resolve_through_single_all_of() {
        let doc = document(json!({
            "Group": {"type": "object", "properties": {"group_id": {"type": "integer"}}}
        }));
        let resolver = Resolver::new(&doc);
        let node: SchemaNode = serde_json::from_value(json!({
            "allOf": [{"$ref": "#/components/schemas/Group"}],
            "description": "wrapped"
        }))
        .unwrap();
        let resolved = resolver.resolve(&node).unwrap();
        assert!(resolved.properties.contains_key("group_id"));
    }

    #[test]
    fn test_resolve_leaves_plain_nodes() {
        let doc = Document::default();
        let resolver = Resolver::new(&doc);
        let node = SchemaNode::of_kind(SchemaKind::String);
        assert!(std::ptr::eq(resolver.resolve(&node).unwrap(), &node));
    }

    #[test]
    fn test_resolve_unknown_definition() {
        let doc = Document::default();
        let resolver = Resolver::new(&doc);
        let node = SchemaNode::reference_to("Missing");
        assert_eq!(
            resolver.resolve(&node),
            Err(SchemaError::unknown("Missing"))
        );
    }

    #[test]
    fn test_resolve_self_cycle() {
        let doc = document(json!({"A": {"$ref": "#/components/schemas/A"}}));
        let resolver = Resolver::new(&doc);
        let node = SchemaNode::reference_to("A");
        assert_eq!(
            resolver.resolve(&node),
            Err(SchemaError::circular(&["A"], "A"))
        );
    }

    #[test]
    fn test_resolve_transitive_cycle_through_wrapper() {
        let doc = document(json!({
            "A": {"$ref": "#/components/schemas/B"},
            "B": {"allOf": [{"$ref": "#/components/schemas/A"}]}
        }));
        let resolver = Resolver::new(&doc);
        let node = SchemaNode::reference_to("A");
        assert_eq!(
            resolver.resolve(&node),
            Err(SchemaError::circular(&["A", "B"], "A"))
        );
    }

    #[test]
    fn test_flatten_merges_all_of() {
        let doc = document(json!({
            "FriendCategory": {
                "type": "object",
                "properties": {
                    "category_id": {"type": "integer"},
                    "category_name": {"type": "string"}
                },
                "required": ["category_id"]
            },
            "Friend": {
                "type": "object",
                "properties": {"user_id": {"type": "integer"}},
                "required": ["user_id"],
                "allOf": [
                    {"$ref": "#/components/schemas/FriendCategory"},
                    {"type": "object", "properties": {"remark": {"type": "string"}}}
                ]
            }
        }));
        let resolver = Resolver::new(&doc);
        let node = SchemaNode::reference_to("Friend");
        let shape = resolver.flatten(&node).unwrap();

        let names: Vec<&str> = shape.properties.keys().copied().collect();
        assert_eq!(names, ["user_id", "category_id", "category_name", "remark"]);
        assert!(shape.is_required("user_id"));
        assert!(shape.is_required("category_id"));
        assert!(!shape.is_required("remark"));
    }

    #[test]
    fn test_flatten_cycle_through_parts() {
        let doc = document(json!({
            "A": {"type": "object", "allOf": [
                {"$ref": "#/components/schemas/B"},
                {"type": "object"}
            ]},
            "B": {"type": "object", "allOf": [
                {"$ref": "#/components/schemas/A"},
                {"type": "object"}
            ]}
        }));
        let resolver = Resolver::new(&doc);
        let node = SchemaNode::reference_to("A");
        assert!(matches!(
            resolver.flatten(&node),
            Err(SchemaError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_flatten_repeated_sibling_is_not_a_cycle() {
        let doc = document(json!({
            "Base": {"type": "object", "properties": {"id": {"type": "integer"}}},
            "Both": {"type": "object", "allOf": [
                {"$ref": "#/components/schemas/Base"},
                {"$ref": "#/components/schemas/Base"}
            ]}
        }));
        let resolver = Resolver::new(&doc);
        let node = SchemaNode::reference_to("Both");
        let shape = resolver.flatten(&node).unwrap();
        assert_eq!(shape.properties.len(), 1);
    }

    #[test]
    fn test_required_first() {
        let doc = Document::default();
        let resolver = Resolver::new(&doc);
        let node: SchemaNode = serde_json::from_value(json!({
            "type": "object",
            "properties": {
                "reason": {"type": "string"},
                "user_id": {"type": "integer"},
                "message": {"type": "array"}
            },
            "required": ["message", "user_id"]
        }))
        .unwrap();
        let shape = resolver.flatten(&node).unwrap();
        assert_eq!(shape.required_first(), ["user_id", "message", "reason"]);
    }
}
