//! Document validation utilities.
//!
//! Generation must fail before anything is written, so every reference
//! reachable from the definition table and from request bodies is resolved
//! here up front.

use crate::error::SchemaError;
use crate::ir::ApiIr;
use crate::resolve::{Resolver, definition_name};
use crate::types::{Document, SchemaNode};

/// Validates a parsed document for generation.
///
/// # Arguments
/// * `document` - The document to validate
/// * `prefix` - Path prefix of callable operations
///
/// # Returns
/// The extracted operations if the document is valid.
///
/// # Errors
/// Returns `SchemaError` on dangling, malformed or circular references, and
/// on duplicate operation names.
pub fn validate_document(document: &Document, prefix: &str) -> Result<ApiIr, SchemaError> {
    validate_definitions(document)?;
    ApiIr::with_prefix(document, prefix)
}

/// Validates all definitions in the document.
fn validate_definitions(document: &Document) -> Result<(), SchemaError> {
    let resolver = Resolver::new(document);
    for (name, definition) in document.definitions() {
        validate_node(&resolver, name, definition)
            .map_err(|err| err.within(format!("definition '{name}'")))?;
    }
    Ok(())
}

/// Checks every reference under a definition, then resolves the definition
/// by name so that a cycle is reported starting from it.
fn validate_node(
    resolver: &Resolver<'_>,
    name: &str,
    node: &SchemaNode,
) -> Result<(), SchemaError> {
    let mut pending = vec![node];
    while let Some(current) = pending.pop() {
        if let Some(reference) = current.reference.as_deref() {
            resolver.definition(definition_name(reference)?)?;
        }
        pending.extend(current.properties.values());
        pending.extend(current.items.as_deref());
        pending.extend(&current.one_of);
        pending.extend(&current.all_of);
    }

    let entry = SchemaNode::reference_to(name);
    resolver.resolve(&entry)?;
    if !node.all_of.is_empty() {
        resolver.flatten(&entry)?;
    }
    Ok(())
}
