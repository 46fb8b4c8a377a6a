//! Data structure reference page generation.
//!
//! Definitions are bucketed by [`DefinitionKind`]. Object definitions render
//! as field tables over their `allOf`-merged properties; `oneOf` definitions
//! render through [`UnionAnalyzer`] as base fields plus one sub-section per
//! variant.

use super::{escape_cell, field_item};
use milky_schema::ir::enrich_description;
use milky_schema::types::render_bare_literal;
use milky_schema::{
    DefinitionKind, Document, Resolver, SchemaError, SchemaNode, Shape, TypeMapper,
    UnionAnalysis, UnionAnalyzer, UnionField,
};

const HEADER: &str = "# Milky Data Structure Reference

This page lists the core data structures and message segments of the Milky
protocol with their JSON fields. Every structure is handled as a raw
`serde_json::Value`, so fields are accessed directly by name.

---

## Core Entities

Core entities are the composite JSON objects returned by API calls or pushed
with events.
";

const OPTIONAL: &str = "(optional)";

/// Generator for the data structure reference page.
pub struct StructsDocEmitter<'a> {
    document: &'a Document,
    resolver: Resolver<'a>,
    types: TypeMapper<'a>,
    unions: UnionAnalyzer<'a>,
}

impl<'a> StructsDocEmitter<'a> {
    /// Creates a new data structure reference emitter.
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        let resolver = Resolver::new(document);
        Self {
            document,
            resolver,
            types: TypeMapper::new(resolver),
            unions: UnionAnalyzer::new(resolver),
        }
    }

    /// Generates the complete page.
    ///
    /// # Errors
    /// Returns `SchemaError` if a definition cannot be resolved.
    pub fn generate(&self) -> Result<String, SchemaError> {
        let mut entities = Vec::new();
        let mut envelopes = Vec::new();
        let mut segments = Vec::new();

        for name in self.document.definitions().keys() {
            match DefinitionKind::of(name) {
                DefinitionKind::Internal => {}
                DefinitionKind::Entity => entities.push(name.as_str()),
                DefinitionKind::MessageEnvelope => envelopes.push(name.as_str()),
                DefinitionKind::Segment => segments.push(name.as_str()),
            }
        }
        entities.sort_unstable();
        envelopes.sort_unstable();
        segments.sort_unstable();

        let mut content = vec![HEADER.to_string()];
        for name in entities {
            content.push(self.generate_definition(name)?);
        }

        content.push("---\n".to_string());
        content.push("## Message Structures\n".to_string());
        for name in envelopes {
            content.push(self.generate_definition(name)?);
        }

        content.push("---\n".to_string());
        content.push("## Message Segments\n".to_string());
        for name in segments {
            content.push(self.generate_definition(name)?);
        }

        Ok(content.join("\n"))
    }

    /// Generates the section of one definition.
    fn generate_definition(&self, name: &str) -> Result<String, SchemaError> {
        let schema = self.resolver.definition(name)?;
        let mut lines = Vec::new();

        match schema.title.as_deref().filter(|title| *title != name) {
            Some(title) => lines.push(format!("### `{name}` ({title})")),
            None => lines.push(format!("### `{name}`")),
        }
        if let Some(description) = schema
            .description
            .as_deref()
            .filter(|d| !d.is_empty() && Some(*d) != schema.title.as_deref() && *d != name)
        {
            lines.push(format!("{description}\n"));
        }

        let resolved = self.resolver.resolve(schema)?;
        match resolved.shape() {
            Shape::OneOf(alternatives) => {
                let analysis = self.unions.analyze(alternatives)?;
                self.union_lines(&analysis, &mut lines)?;
            }
            Shape::Kind(kind) if kind.is_primitive() => {
                lines.push(format!("- **Type**: `{}`", self.types.value_type(schema)?));
                if !resolved.enum_values.is_empty() {
                    let values = resolved
                        .enum_values
                        .iter()
                        .map(|v| format!("`{}`", render_bare_literal(v)))
                        .collect::<Vec<_>>()
                        .join(", ");
                    lines.push(format!("- **Values**: {values}"));
                }
                lines.push(String::new());
            }
            _ => self.table_lines(schema, &mut lines)?,
        }

        Ok(lines.join("\n"))
    }

    /// Renders an object as a field table.
    fn table_lines(
        &self,
        schema: &SchemaNode,
        lines: &mut Vec<String>,
    ) -> Result<(), SchemaError> {
        let shape = self.resolver.flatten(schema)?;
        lines.push("| Field | Type | Description |".to_string());
        lines.push("| :--- | :--- | :--- |".to_string());

        for (&name, &field) in &shape.properties {
            let type_name = self.types.display_type(field)?;
            let description = self.describe(field, shape.is_required(name))?;
            lines.push(format!(
                "| `{name}` | `{}` | {} |",
                escape_cell(&type_name.to_string()),
                escape_cell(&description)
            ));
        }

        lines.push(String::new());
        Ok(())
    }

    /// Renders a union as base fields plus one sub-section per variant.
    fn union_lines(
        &self,
        analysis: &UnionAnalysis<'_>,
        lines: &mut Vec<String>,
    ) -> Result<(), SchemaError> {
        if !analysis.common_fields.is_empty() || analysis.discriminator.is_some() {
            lines.push("A union type. Every variant carries these base fields:".to_string());
            for field in &analysis.common_fields {
                lines.push(format!("- {}", self.field_line(field)?));
            }
            if let Some(discriminator) = &analysis.discriminator {
                let values = discriminator
                    .values
                    .iter()
                    .map(|v| format!("`{}`", render_bare_literal(v)))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("- `{}`: variant tag ({values})", discriminator.field));
            }
            lines.push(String::new());
        }

        lines.push("Variants:".to_string());
        lines.push(String::new());

        for variant in &analysis.variants {
            match &variant.title {
                Some(title) => lines.push(format!("#### `{}` ({title})", variant.name)),
                None => lines.push(format!("#### `{}`", variant.name)),
            }

            if variant.own_fields.is_empty() {
                lines.push("No specific fields.".to_string());
            }
            for field in &variant.own_fields {
                if field.is_expanded() {
                    self.payload_lines(field, lines)?;
                } else {
                    lines.push(format!("- {}", self.field_line(field)?));
                }
            }
            lines.push(String::new());
        }

        Ok(())
    }

    /// Renders an expanded payload field: a one-line shape, then one line
    /// per inner field.
    fn payload_lines(
        &self,
        field: &UnionField<'_>,
        lines: &mut Vec<String>,
    ) -> Result<(), SchemaError> {
        let mut parts = Vec::with_capacity(field.expanded.len());
        let mut inner = Vec::new();
        for entry in &field.expanded {
            parts.push(format!("\"{}\": {}", entry.name, self.types.display_type(entry.schema)?));
            let description = self.describe(entry.schema, entry.required)?;
            if !description.is_empty() {
                inner.push(format!("    - `{}`: {description}", entry.name));
            }
        }
        lines.push(format!("- **{}**: `{{{}}}`", field.name, parts.join(", ")));
        lines.extend(inner);
        Ok(())
    }

    fn field_line(&self, field: &UnionField<'_>) -> Result<String, SchemaError> {
        let type_name = self.types.display_type(field.schema)?;
        let description = self.describe(field.schema, field.required)?;
        Ok(field_item(field.name, &description, &type_name.to_string()))
    }

    /// Returns the description of a field, with allowed literals and the
    /// optional marker.
    fn describe(&self, field: &SchemaNode, required: bool) -> Result<String, SchemaError> {
        let resolved = self.resolver.resolve(field)?;
        let description = field
            .description
            .as_deref()
            .or(resolved.description.as_deref())
            .unwrap_or("");
        let description = enrich_description(description, &resolved.enum_values);

        Ok(match (required, description.is_empty()) {
            (true, _) => description,
            (false, true) => OPTIONAL.to_string(),
            (false, false) => format!("{description} {OPTIONAL}"),
        })
    }
}
