//! Return value descriptions.
//!
//! Describing a return payload is best effort: when the payload schema cannot
//! be resolved, the operation keeps an empty return section and a
//! [`Warning`] is recorded instead of failing the run.

use milky_schema::ir::enrich_description;
use milky_schema::{
    ApiIr, Operation, Resolver, ReturnShape, SchemaError, SchemaKind, SchemaNode, Shape,
    TypeMapper, TypeName,
};
use std::fmt;
use tracing::warn;

/// One field of an object payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnField {
    /// Field name.
    pub name: String,
    /// Display type.
    pub display_type: TypeName,
    /// Description, with allowed literals for enumerations.
    pub description: String,
}

/// Description of an operation's returned payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnDoc {
    /// Nothing is returned.
    Absent,
    /// An object with the listed fields.
    Fields(Vec<ReturnField>),
    /// A single value.
    Value {
        /// Display type.
        display_type: TypeName,
        /// Description.
        description: String,
    },
    /// The payload could not be described.
    Degraded {
        /// Why.
        reason: String,
    },
}

impl ReturnDoc {
    /// Returns true if there is something to document.
    #[must_use]
    pub fn is_documented(&self) -> bool {
        matches!(self, Self::Fields(_) | Self::Value { .. })
    }
}

/// A non-fatal problem found while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Operation the warning is about.
    pub operation: String,
    /// What went wrong.
    pub reason: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "return value of '{}' left undocumented: {}",
            self.operation, self.reason
        )
    }
}

/// An operation together with its return description.
#[derive(Debug, Clone)]
pub struct DescribedOperation<'a> {
    /// The operation.
    pub operation: &'a Operation,
    /// Its return description.
    pub returns: ReturnDoc,
}

/// Builds return descriptions.
#[derive(Debug, Clone, Copy)]
pub struct ReturnDescriber<'a> {
    resolver: Resolver<'a>,
    types: TypeMapper<'a>,
}

impl<'a> ReturnDescriber<'a> {
    /// Creates a describer over the given resolver.
    #[must_use]
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self {
            resolver,
            types: TypeMapper::new(resolver),
        }
    }

    /// Describes the return payload of an operation.
    #[must_use]
    pub fn describe(&self, operation: &Operation) -> ReturnDoc {
        match &operation.return_shape {
            ReturnShape::Absent => ReturnDoc::Absent,
            ReturnShape::Unresolvable { reason } => ReturnDoc::Degraded {
                reason: reason.clone(),
            },
            ReturnShape::Present(schema) => {
                self.describe_schema(schema)
                    .unwrap_or_else(|err| ReturnDoc::Degraded {
                        reason: err.to_string(),
                    })
            }
        }
    }

    /// Describes every operation of an API, collecting warnings for the
    /// ones that degraded.
    #[must_use]
    pub fn describe_all<'o>(&self, ir: &'o ApiIr) -> (Vec<DescribedOperation<'o>>, Vec<Warning>) {
        let mut described = Vec::with_capacity(ir.operations.len());
        let mut warnings = Vec::new();

        for operation in &ir.operations {
            let returns = self.describe(operation);
            if let ReturnDoc::Degraded { reason } = &returns {
                warn!(operation = %operation.name, %reason, "return value left undocumented");
                warnings.push(Warning {
                    operation: operation.name.clone(),
                    reason: reason.clone(),
                });
            }
            described.push(DescribedOperation { operation, returns });
        }

        (described, warnings)
    }

    fn describe_schema(&self, schema: &SchemaNode) -> Result<ReturnDoc, SchemaError> {
        let display_type = self.types.display_type(schema)?;
        let resolved = self.resolver.resolve(schema)?;

        if matches!(resolved.shape(), Shape::Kind(SchemaKind::Object) | Shape::Composite) {
            let shape = self.resolver.flatten(schema)?;
            if !shape.is_empty() {
                let mut fields = Vec::with_capacity(shape.properties.len());
                for (&name, &field) in &shape.properties {
                    let field_resolved = self.resolver.resolve(field)?;
                    let description = field
                        .description
                        .as_deref()
                        .or(field_resolved.description.as_deref())
                        .unwrap_or("");
                    fields.push(ReturnField {
                        name: name.to_string(),
                        display_type: self.types.display_type(field)?,
                        description: enrich_description(description, &field_resolved.enum_values),
                    });
                }
                return Ok(ReturnDoc::Fields(fields));
            }
        }

        let description = schema
            .description
            .as_deref()
            .or(resolved.description.as_deref())
            .unwrap_or("");
        Ok(ReturnDoc::Value {
            display_type,
            description: enrich_description(description, &resolved.enum_values),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milky_schema::parse_document;

    const DOCUMENT: &str = r##"{
  "paths": {
    "/api/get_login_info": {"post": {"responses": {"200": {"content": {"application/json": {"schema": {
      "type": "object",
      "properties": {"data": {"$ref": "#/components/schemas/LoginInfo"}}
    }}}}}}},
    "/api/get_cookies": {"post": {"responses": {"200": {"content": {"application/json": {"schema": {
      "type": "object",
      "properties": {"data": {"type": "string", "description": "Cookie string"}}
    }}}}}}},
    "/api/set_avatar": {"post": {"responses": {"200": {"content": {"application/json": {"schema": {
      "type": "object",
      "properties": {"data": {"$ref": "#/components/schemas/ApiEmptyObject"}}
    }}}}}}},
    "/api/broken": {"post": {"responses": {"200": {"content": {"application/json": {"schema": {
      "type": "object",
      "properties": {"data": {"$ref": "#/components/schemas/Missing"}}
    }}}}}}},
    "/api/unresolvable": {"post": {"responses": {"200": {"content": {"application/json": {"schema": {
      "$ref": "#/components/schemas/AlsoMissing"
    }}}}}}},
    "/api/noop": {"post": {}}
  },
  "components": {"schemas": {
    "LoginInfo": {
      "type": "object",
      "properties": {
        "uin": {"type": "integer", "description": "Account"},
        "sex": {"type": "string", "enum": ["male", "female"], "description": "Sex"}
      }
    },
    "ApiEmptyObject": {"type": "object"}
  }}
}"##;

    fn describe(name: &str) -> ReturnDoc {
        let document = parse_document(DOCUMENT).expect("Failed to parse document");
        let ir = ApiIr::from_document(&document).expect("Failed to extract operations");
        let describer = ReturnDescriber::new(Resolver::new(&document));
        describer.describe(ir.operation(name).unwrap())
    }

    #[test]
    fn test_object_payload() {
        let ReturnDoc::Fields(fields) = describe("get_login_info") else {
            panic!("expected fields");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "uin");
        assert_eq!(fields[0].display_type, TypeName::Int64);
        assert_eq!(fields[1].description, "Sex (\"male\" | \"female\")");
    }

    #[test]
    fn test_value_payload() {
        assert_eq!(
            describe("get_cookies"),
            ReturnDoc::Value {
                display_type: TypeName::Text,
                description: "Cookie string".into(),
            }
        );
    }

    #[test]
    fn test_empty_object_payload() {
        assert_eq!(
            describe("set_avatar"),
            ReturnDoc::Value {
                display_type: TypeName::Named("ApiEmptyObject".into()),
                description: String::new(),
            }
        );
    }

    #[test]
    fn test_absent_payload() {
        assert_eq!(describe("noop"), ReturnDoc::Absent);
        assert!(!ReturnDoc::Absent.is_documented());
    }

    #[test]
    fn test_degraded_payloads() {
        assert!(matches!(describe("broken"), ReturnDoc::Degraded { .. }));
        assert!(matches!(describe("unresolvable"), ReturnDoc::Degraded { .. }));
    }

    #[test]
    fn test_describe_all_collects_warnings() {
        let document = parse_document(DOCUMENT).unwrap();
        let ir = ApiIr::from_document(&document).unwrap();
        let describer = ReturnDescriber::new(Resolver::new(&document));
        let (described, warnings) = describer.describe_all(&ir);

        assert_eq!(described.len(), ir.operations.len());
        let operations: Vec<&str> = warnings.iter().map(|w| w.operation.as_str()).collect();
        assert_eq!(operations, ["broken", "unresolvable"]);
        assert!(warnings[0].to_string().starts_with("return value of 'broken' left undocumented"));
    }
}
