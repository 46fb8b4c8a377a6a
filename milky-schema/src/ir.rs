//! Intermediate representation for code generation.
//!
//! This module turns the path table of a [`Document`] into normalized
//! [`Operation`] records that the client and documentation emitters consume.

use crate::classify::{PAYLOAD_FIELD, is_message_content, operation_name_from_path};
use crate::error::SchemaError;
use crate::resolve::Resolver;
use crate::type_map::{TypeMapper, TypeName};
use crate::types::{Document, OperationObject, SchemaNode, render_literal};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Path prefix of callable operations.
pub const DEFAULT_PATH_PREFIX: &str = "/api/";

/// Tag of operations that declare none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Intermediate representation of an API description for code generation.
#[derive(Debug, Clone, Default)]
pub struct ApiIr {
    /// API title.
    pub title: Option<String>,
    /// API version.
    pub version: Option<String>,
    /// Operations, in path declaration order.
    pub operations: Vec<Operation>,
}

impl ApiIr {
    /// Extracts the operations under [`DEFAULT_PATH_PREFIX`].
    ///
    /// # Errors
    /// Returns `SchemaError` if a request body cannot be resolved or two
    /// paths declare the same operation name.
    pub fn from_document(document: &Document) -> Result<Self, SchemaError> {
        Self::with_prefix(document, DEFAULT_PATH_PREFIX)
    }

    /// Extracts the operations whose path starts with `prefix`.
    ///
    /// Paths without a `post` entry are skipped.
    ///
    /// # Errors
    /// Returns `SchemaError` if a request body cannot be resolved or two
    /// paths declare the same operation name.
    pub fn with_prefix(document: &Document, prefix: &str) -> Result<Self, SchemaError> {
        let extractor = OperationExtractor::new(Resolver::new(document));
        let mut operations: Vec<Operation> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (path, item) in &document.paths {
            if !path.starts_with(prefix) {
                continue;
            }
            let Some(object) = item.post.as_ref() else {
                continue;
            };
            let Some(name) = operation_name(path, object) else {
                continue;
            };

            if let Some(&index) = seen.get(&name) {
                return Err(SchemaError::DuplicateOperation {
                    name,
                    first: operations[index].path.clone(),
                    second: path.clone(),
                });
            }

            let operation = extractor.extract(name, path, object)?;
            seen.insert(operation.name.clone(), operations.len());
            operations.push(operation);
        }

        Ok(Self {
            title: document.info.title.clone(),
            version: document.info.version.clone(),
            operations,
        })
    }

    /// Gets an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// Groups items by the tag of their operation. Tags are sorted, and so are
/// the items within each tag, by operation name.
pub fn group_by_tag<'o, T, F>(items: &'o [T], operation: F) -> BTreeMap<&'o str, Vec<&'o T>>
where
    F: Fn(&'o T) -> &'o Operation,
{
    let mut groups: BTreeMap<&'o str, Vec<&'o T>> = BTreeMap::new();
    for item in items {
        groups
            .entry(operation(item).tag_or_default())
            .or_default()
            .push(item);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| operation(*a).name.cmp(&operation(*b).name));
    }
    groups
}

/// One callable operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Operation name (the `operationId`).
    pub name: String,
    /// Declaring path.
    pub path: String,
    /// One-line summary.
    pub summary: Option<String>,
    /// First declared tag.
    pub tag: Option<String>,
    /// Parameters, required ones first.
    pub parameters: Vec<Parameter>,
    /// Shape of the returned payload.
    pub return_shape: ReturnShape,
}

impl Operation {
    /// Returns the tag, or [`UNCATEGORIZED`].
    #[must_use]
    pub fn tag_or_default(&self) -> &str {
        self.tag.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Returns the summary, or an empty string.
    #[must_use]
    pub fn summary_or_empty(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    /// Returns the required parameters.
    pub fn required_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.required)
    }

    /// Returns the optional parameters.
    pub fn optional_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| !p.required)
    }
}

/// One request body field of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Field name.
    pub name: String,
    /// Type for documentation.
    pub display_type: TypeName,
    /// Resolved type for the client signature.
    pub value_type: TypeName,
    /// Whether the field is required.
    pub required: bool,
    /// Default value.
    pub default: Option<Value>,
    /// Description, with allowed literals appended for enumerations.
    pub description: String,
    /// Whether the field carries message content.
    pub message_content: bool,
}

/// Shape of an operation's returned payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnShape {
    /// No payload is declared.
    Absent,
    /// The payload schema, as declared.
    Present(SchemaNode),
    /// The response schema could not be resolved.
    Unresolvable {
        /// Why resolution failed.
        reason: String,
    },
}

impl ReturnShape {
    /// Returns the payload schema, if present.
    #[must_use]
    pub fn schema(&self) -> Option<&SchemaNode> {
        match self {
            Self::Present(schema) => Some(schema),
            _ => None,
        }
    }
}

/// Derives the operation name: `operationId`, else the last path segment.
fn operation_name(path: &str, object: &OperationObject) -> Option<String> {
    object
        .operation_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .or_else(|| operation_name_from_path(path))
        .map(str::to_string)
}

/// Builds [`Operation`] records from operation descriptors.
#[derive(Debug, Clone, Copy)]
pub struct OperationExtractor<'a> {
    resolver: Resolver<'a>,
    types: TypeMapper<'a>,
}

impl<'a> OperationExtractor<'a> {
    /// Creates an extractor over the given resolver.
    #[must_use]
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self {
            resolver,
            types: TypeMapper::new(resolver),
        }
    }

    /// Builds one operation.
    ///
    /// # Errors
    /// Returns `SchemaError` if the request body cannot be resolved.
    pub fn extract(
        &self,
        name: String,
        path: &str,
        object: &OperationObject,
    ) -> Result<Operation, SchemaError> {
        let parameters = match object.request_schema() {
            Some(schema) => self.parameters(schema)?,
            None => Vec::new(),
        };

        Ok(Operation {
            name,
            path: path.to_string(),
            summary: object.summary.clone(),
            tag: object.tags.first().cloned(),
            parameters,
            return_shape: self.return_shape(object),
        })
    }

    fn parameters(&self, schema: &SchemaNode) -> Result<Vec<Parameter>, SchemaError> {
        let shape = self.resolver.flatten(schema)?;
        let mut parameters = Vec::with_capacity(shape.properties.len());

        for name in shape.required_first() {
            let declared = shape.properties[name];
            let resolved = self.resolver.resolve(declared)?;
            let value_type = self.types.value_type(declared)?;
            let message_content = is_message_content(name, &value_type);

            let display_type = if message_content {
                let element = self.types.display_type(declared)?;
                TypeName::Either(vec![element, TypeName::Text])
            } else {
                self.types.display_type(declared)?
            };

            let description = declared
                .description
                .as_deref()
                .or(resolved.description.as_deref())
                .unwrap_or("");

            parameters.push(Parameter {
                name: name.to_string(),
                display_type,
                value_type,
                required: shape.is_required(name),
                default: declared.default.clone().or_else(|| resolved.default.clone()),
                description: enrich_description(description, &resolved.enum_values),
                message_content,
            });
        }

        Ok(parameters)
    }

    fn return_shape(&self, object: &OperationObject) -> ReturnShape {
        let Some(schema) = object.success_schema() else {
            return ReturnShape::Absent;
        };
        match self.resolver.flatten(schema) {
            Ok(envelope) => match envelope.properties.get(PAYLOAD_FIELD) {
                Some(&data) => ReturnShape::Present(data.clone()),
                None => ReturnShape::Absent,
            },
            Err(err) => ReturnShape::Unresolvable {
                reason: err.to_string(),
            },
        }
    }
}

/// Appends the allowed literals of an enumeration to a description.
#[must_use]
pub fn enrich_description(description: &str, values: &[Value]) -> String {
    if values.is_empty() {
        return description.to_string();
    }
    let literals = values
        .iter()
        .map(render_literal)
        .collect::<Vec<_>>()
        .join(" | ");
    if description.is_empty() {
        format!("({literals})")
    } else {
        format!("{description} ({literals})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use serde_json::json;

    const DOCUMENT: &str = r##"{
  "info": {"title": "Milky", "version": "1.0"},
  "paths": {
    "/api/send_group_message": {
      "post": {
        "operationId": "send_group_message",
        "summary": "Send a group message",
        "tags": ["Message"],
        "requestBody": {"content": {"application/json": {"schema": {
          "$ref": "#/components/schemas/Api_send_group_message_Input"
        }}}},
        "responses": {"200": {"content": {"application/json": {"schema": {
          "allOf": [
            {"$ref": "#/components/schemas/ApiResponse"},
            {"type": "object", "properties": {"data": {"$ref": "#/components/schemas/SendResult"}}}
          ]
        }}}}}
      }
    },
    "/api/kick_group_member": {
      "post": {
        "operationId": "kick_group_member",
        "tags": ["Group"],
        "requestBody": {"content": {"application/json": {"schema": {
          "type": "object",
          "properties": {
            "reason": {"type": "string", "description": "Reason"},
            "user_id": {"type": "integer", "description": "Member"},
            "message": {"type": "array", "items": {"type": "string"}},
            "reject_add_request": {"type": "boolean", "default": false},
            "mode": {"$ref": "#/components/schemas/KickMode"}
          },
          "required": ["message", "user_id"]
        }}}}
      }
    },
    "/api/get_login_info": {
      "post": {
        "responses": {"200": {"content": {"application/json": {"schema": {
          "$ref": "#/components/schemas/Missing"
        }}}}}
      }
    },
    "/api/get_version": {"get": {}},
    "/internal/debug": {"post": {"operationId": "debug"}}
  },
  "components": {"schemas": {
    "ApiResponse": {
      "type": "object",
      "properties": {"status": {"type": "string"}, "retcode": {"type": "integer"}}
    },
    "SendResult": {"type": "object", "properties": {"message_seq": {"type": "integer"}}},
    "KickMode": {"type": "string", "enum": ["soft", "hard"], "description": "Kick mode", "default": "soft"},
    "OutgoingSegment": {"type": "object"},
    "Api_send_group_message_Input": {
      "type": "object",
      "properties": {
        "group_id": {"type": "integer", "description": "Group number"},
        "message": {"type": "array", "items": {"$ref": "#/components/schemas/OutgoingSegment"}}
      },
      "required": ["group_id", "message"]
    }
  }}
}"##;

    fn ir() -> ApiIr {
        let document = parse_document(DOCUMENT).expect("Failed to parse document");
        ApiIr::from_document(&document).expect("Failed to extract operations")
    }

    #[test]
    fn test_extracts_callable_operations_in_order() {
        let ir = ir();
        let names: Vec<&str> = ir.operations.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, ["send_group_message", "kick_group_member", "get_login_info"]);
        assert_eq!(ir.title.as_deref(), Some("Milky"));
    }

    #[test]
    fn test_name_falls_back_to_path() {
        let ir = ir();
        let op = ir.operation("get_login_info").unwrap();
        assert_eq!(op.path, "/api/get_login_info");
        assert!(op.parameters.is_empty());
    }

    #[test]
    fn test_parameter_ordering() {
        let ir = ir();
        let op = ir.operation("kick_group_member").unwrap();
        let names: Vec<&str> = op.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["user_id", "message", "reason", "reject_add_request", "mode"]
        );
        assert_eq!(op.required_parameters().count(), 2);
        assert_eq!(op.optional_parameters().count(), 3);
    }

    #[test]
    fn test_parameter_details() {
        let ir = ir();
        let op = ir.operation("kick_group_member").unwrap();

        let reject = &op.parameters[3];
        assert_eq!(reject.display_type, TypeName::Bool);
        assert_eq!(reject.default, Some(json!(false)));

        let mode = &op.parameters[4];
        assert_eq!(mode.display_type, TypeName::Named("KickMode".into()));
        assert_eq!(mode.value_type, TypeName::Text);
        assert_eq!(mode.default, Some(json!("soft")));
        assert_eq!(mode.description, "Kick mode (\"soft\" | \"hard\")");
    }

    #[test]
    fn test_message_content_parameter() {
        let ir = ir();
        let op = ir.operation("send_group_message").unwrap();
        let message = &op.parameters[1];
        assert!(message.message_content);
        assert_eq!(message.display_type.to_string(), "sequence<OutgoingSegment> | text");
        assert_eq!(message.value_type, TypeName::sequence(TypeName::Record));
        assert_eq!(op.parameters[0].display_type, TypeName::Int64);
    }

    #[test]
    fn test_return_shapes() {
        let ir = ir();
        let sent = ir.operation("send_group_message").unwrap();
        assert_eq!(
            sent.return_shape,
            ReturnShape::Present(SchemaNode::reference_to("SendResult"))
        );
        assert_eq!(
            ir.operation("kick_group_member").unwrap().return_shape,
            ReturnShape::Absent
        );
        assert!(matches!(
            ir.operation("get_login_info").unwrap().return_shape,
            ReturnShape::Unresolvable { .. }
        ));
    }

    #[test]
    fn test_group_by_tag() {
        let ir = ir();
        let groups = group_by_tag(&ir.operations, |op| op);
        let tags: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(tags, ["Group", "Message", UNCATEGORIZED]);
        for group in groups.values() {
            assert!(group.windows(2).all(|pair| pair[0].name <= pair[1].name));
        }
    }

    #[test]
    fn test_custom_prefix() {
        let document = parse_document(DOCUMENT).unwrap();
        let ir = ApiIr::with_prefix(&document, "/internal/").unwrap();
        assert_eq!(ir.operations.len(), 1);
        assert_eq!(ir.operations[0].name, "debug");
    }

    #[test]
    fn test_duplicate_operation() {
        let document = parse_document(
            r#"{"paths": {
                "/api/a": {"post": {"operationId": "same"}},
                "/api/b": {"post": {"operationId": "same"}}
            }}"#,
        )
        .unwrap();
        assert_eq!(
            ApiIr::from_document(&document).unwrap_err(),
            SchemaError::DuplicateOperation {
                name: "same".into(),
                first: "/api/a".into(),
                second: "/api/b".into(),
            }
        );
    }

    #[test]
    fn test_enrich_description() {
        assert_eq!(
            enrich_description("Sex", &[json!("male"), json!("female")]),
            "Sex (\"male\" | \"female\")"
        );
        assert_eq!(enrich_description("", &[json!(1)]), "(1)");
        assert_eq!(enrich_description("Plain", &[]), "Plain");
    }
}
