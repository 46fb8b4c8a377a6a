//! Type name mapping.
//!
//! Schema nodes map to a small neutral type vocabulary ([`TypeName`]). Two
//! modes exist: display mode keeps references as the definition's name, and
//! value mode resolves them down to their concrete shape.

use crate::error::SchemaError;
use crate::resolve::{Resolver, definition_name};
use crate::types::{SchemaKind, SchemaNode, Shape};
use std::fmt;

/// Neutral type name of a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// UTF-8 text.
    Text,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit float.
    Float64,
    /// Boolean.
    Bool,
    /// Object without further structure.
    Record,
    /// Unconstrained value, or one of several alternatives.
    Any,
    /// Named definition.
    Named(String),
    /// Homogeneous sequence.
    Sequence(Box<TypeName>),
    /// Either of the listed types.
    Either(Vec<TypeName>),
}

impl TypeName {
    /// Creates a sequence of the given element type.
    #[must_use]
    pub fn sequence(element: TypeName) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// Returns true for sequence types.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Maps a primitive kind. Composite kinds map to [`TypeName::Record`]
    /// or [`TypeName::Any`].
    #[must_use]
    pub fn from_kind(kind: Option<SchemaKind>) -> Self {
        match kind {
            Some(SchemaKind::String) => Self::Text,
            Some(SchemaKind::Integer) => Self::Int64,
            Some(SchemaKind::Number) => Self::Float64,
            Some(SchemaKind::Boolean) => Self::Bool,
            Some(SchemaKind::Object) => Self::Record,
            Some(SchemaKind::Array | SchemaKind::Null) | None => Self::Any,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Int64 => f.write_str("int64"),
            Self::Float64 => f.write_str("float64"),
            Self::Bool => f.write_str("bool"),
            Self::Record => f.write_str("record"),
            Self::Any => f.write_str("any"),
            Self::Named(name) => f.write_str(name),
            Self::Sequence(element) => write!(f, "sequence<{element}>"),
            Self::Either(options) => {
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{option}")?;
                }
                Ok(())
            }
        }
    }
}

/// Maps schema nodes to type names.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    resolver: Resolver<'a>,
}

impl<'a> TypeMapper<'a> {
    /// Creates a type mapper over the given resolver.
    #[must_use]
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    /// Returns the display type of a node.
    ///
    /// References map to the referenced definition's name, unless that
    /// definition is a bare primitive alias, which maps to the primitive.
    ///
    /// # Errors
    /// Returns `SchemaError` if a reference cannot be resolved.
    pub fn display_type(&self, node: &SchemaNode) -> Result<TypeName, SchemaError> {
        match node.shape() {
            Shape::Reference(reference) => {
                let name = definition_name(reference)?;
                let target = self.resolver.resolve(node)?;
                match target.shape() {
                    Shape::Kind(kind) if kind.is_primitive() && target.enum_values.is_empty() => {
                        Ok(TypeName::from_kind(Some(kind)))
                    }
                    _ => Ok(TypeName::Named(name.to_string())),
                }
            }
            Shape::Wrapper(inner) => self.display_type(inner),
            Shape::OneOf(_) => Ok(TypeName::Any),
            Shape::Kind(SchemaKind::Array) => {
                let element = match node.items.as_deref() {
                    Some(items) => self.display_type(items)?,
                    None => TypeName::Any,
                };
                Ok(TypeName::sequence(element))
            }
            Shape::Kind(kind) => Ok(TypeName::from_kind(Some(kind))),
            Shape::Composite => Ok(TypeName::Record),
            Shape::Any => Ok(TypeName::Any),
        }
    }

    /// Returns the concrete type of a node, resolving every reference.
    ///
    /// # Errors
    /// Returns `SchemaError` if a reference cannot be resolved, including a
    /// definition that contains itself through array items.
    pub fn value_type(&self, node: &SchemaNode) -> Result<TypeName, SchemaError> {
        let mut trail = Vec::new();
        self.value_type_along(node, &mut trail)
    }

    fn value_type_along<'n>(
        &self,
        node: &'n SchemaNode,
        trail: &mut Vec<&'n str>,
    ) -> Result<TypeName, SchemaError>
    where
        'a: 'n,
    {
        let resolved = self.resolver.resolve_along(node, trail)?;
        match resolved.shape() {
            Shape::OneOf(_) | Shape::Any => Ok(TypeName::Any),
            Shape::Composite => Ok(TypeName::Record),
            Shape::Kind(SchemaKind::Array) => {
                let element = match resolved.items.as_deref() {
                    Some(items) => self.value_type_along(items, trail)?,
                    None => TypeName::Any,
                };
                Ok(TypeName::sequence(element))
            }
            Shape::Kind(kind) => Ok(TypeName::from_kind(Some(kind))),
            // resolve_along never stops on a reference or a wrapper
            Shape::Reference(_) | Shape::Wrapper(_) => Ok(TypeName::Any),
        }
    }
}
