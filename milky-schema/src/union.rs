//! Discriminated union analysis.
//!
//! A `oneOf` carries no explicit discriminator annotation. The analyzer
//! compares the flattened alternatives field by field and partitions the
//! shared field names into common fields and at most one discriminator.

use crate::classify::PAYLOAD_FIELD;
use crate::error::SchemaError;
use crate::resolve::{ObjectShape, Resolver};
use crate::types::{SchemaKind, SchemaNode, Shape, render_bare_literal};
use serde_json::Value;

/// One field of a union or of one of its variants.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionField<'a> {
    /// Field name.
    pub name: &'a str,
    /// Field schema, as declared.
    pub schema: &'a SchemaNode,
    /// Whether the field is required.
    pub required: bool,
    /// Fields of the payload object, for an expanded payload carrier.
    pub expanded: Vec<UnionField<'a>>,
}

impl<'a> UnionField<'a> {
    fn plain(name: &'a str, schema: &'a SchemaNode, required: bool) -> Self {
        Self {
            name,
            schema,
            required,
            expanded: Vec::new(),
        }
    }

    /// Returns true if this field was expanded one level.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.expanded.is_empty()
    }
}

/// The field that tells variants apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Discriminator {
    /// Field name.
    pub field: String,
    /// Literal value per variant, in variant order.
    pub values: Vec<Value>,
}

/// One alternative of a union.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant<'a> {
    /// Variant name.
    pub name: String,
    /// Caption, when the alternative's title differs from the name.
    pub title: Option<String>,
    /// Fields specific to this variant, in declaration order.
    pub own_fields: Vec<UnionField<'a>>,
}

/// Result of analyzing a `oneOf`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionAnalysis<'a> {
    /// Fields identical in every variant, in the first variant's order.
    pub common_fields: Vec<UnionField<'a>>,
    /// The discriminator, if exactly one field qualifies.
    pub discriminator: Option<Discriminator>,
    /// Variants, in declaration order.
    pub variants: Vec<Variant<'a>>,
}

impl UnionAnalysis<'_> {
    /// Returns true if the union has no alternatives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Analyzes `oneOf` alternatives.
#[derive(Debug, Clone, Copy)]
pub struct UnionAnalyzer<'a> {
    resolver: Resolver<'a>,
}

impl<'a> UnionAnalyzer<'a> {
    /// Creates a union analyzer over the given resolver.
    #[must_use]
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    /// Analyzes the alternatives of a `oneOf`.
    ///
    /// An empty slice gives an empty analysis.
    ///
    /// # Errors
    /// Returns `SchemaError` if an alternative or one of its fields cannot be
    /// resolved.
    pub fn analyze<'n>(
        &self,
        alternatives: &'n [SchemaNode],
    ) -> Result<UnionAnalysis<'n>, SchemaError>
    where
        'a: 'n,
    {
        let shapes = alternatives
            .iter()
            .map(|alternative| self.resolver.flatten(alternative))
            .collect::<Result<Vec<_>, _>>()?;

        let Some(first) = shapes.first() else {
            return Ok(UnionAnalysis::default());
        };

        let shared: Vec<&'n str> = first
            .properties
            .keys()
            .copied()
            .filter(|name| shapes.iter().all(|shape| shape.properties.contains_key(name)))
            .collect();

        let mut common_fields = Vec::new();
        let mut candidates = Vec::new();
        for name in shared {
            let resolved = shapes
                .iter()
                .map(|shape| self.resolver.resolve(shape.properties[name]))
                .collect::<Result<Vec<_>, _>>()?;

            if resolved.iter().all(|node| *node == resolved[0]) {
                common_fields.push(UnionField::plain(
                    name,
                    first.properties[name],
                    first.is_required(name),
                ));
            } else if let Some(values) = distinct_literals(&resolved) {
                candidates.push(Discriminator {
                    field: name.to_string(),
                    values,
                });
            }
        }

        let discriminator = match candidates.len() {
            1 => candidates.pop(),
            _ => None,
        };

        let mut variants = Vec::with_capacity(shapes.len());
        for (index, (alternative, shape)) in alternatives.iter().zip(&shapes).enumerate() {
            let title = self.title_of(alternative)?;
            let name = match &discriminator {
                Some(d) => render_bare_literal(&d.values[index]),
                None => title.clone().unwrap_or_else(|| format!("Variant{}", index + 1)),
            };

            let mut own_fields = Vec::new();
            for (&field, &schema) in &shape.properties {
                let is_common = common_fields.iter().any(|c| c.name == field);
                let is_discriminator = discriminator.as_ref().is_some_and(|d| d.field == field);
                if is_common || is_discriminator {
                    continue;
                }
                own_fields.push(self.own_field(field, schema, shape)?);
            }

            variants.push(Variant {
                title: title.filter(|t| *t != name),
                name,
                own_fields,
            });
        }

        Ok(UnionAnalysis {
            common_fields,
            discriminator,
            variants,
        })
    }

    fn title_of(&self, alternative: &SchemaNode) -> Result<Option<String>, SchemaError> {
        if alternative.title.is_some() {
            return Ok(alternative.title.clone());
        }
        Ok(self.resolver.resolve(alternative)?.title.clone())
    }

    fn own_field<'n>(
        &self,
        name: &'n str,
        schema: &'n SchemaNode,
        shape: &ObjectShape<'n>,
    ) -> Result<UnionField<'n>, SchemaError>
    where
        'a: 'n,
    {
        let mut field = UnionField::plain(name, schema, shape.is_required(name));
        if name != PAYLOAD_FIELD {
            return Ok(field);
        }

        let resolved = self.resolver.resolve(schema)?;
        if !matches!(resolved.shape(), Shape::Kind(SchemaKind::Object) | Shape::Composite) {
            return Ok(field);
        }

        let payload = self.resolver.flatten(schema)?;
        field.expanded = payload
            .properties
            .iter()
            .map(|(&inner, &inner_schema)| {
                UnionField::plain(inner, inner_schema, payload.is_required(inner))
            })
            .collect();
        Ok(field)
    }
}

/// Returns the per-variant values if every node is a one-value enumeration
/// and the values are pairwise distinct.
fn distinct_literals(nodes: &[&SchemaNode]) -> Option<Vec<Value>> {
    let values = nodes
        .iter()
        .map(|node| node.single_literal().cloned())
        .collect::<Option<Vec<_>>>()?;

    let distinct = values
        .iter()
        .enumerate()
        .all(|(i, value)| !values[..i].contains(value));
    distinct.then_some(values)
}
