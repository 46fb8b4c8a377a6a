//! # Milky Codegen
//!
//! Client method and reference documentation generation from the Milky
//! OpenAPI description.
//!
//! This crate provides:
//! - Rust client method generation (`milky-client/src/api.rs`)
//! - API reference page generation (`docs/api.md`)
//! - Data structure reference page generation (`docs/structs.md`)
//! - Atomic write-out of every artifact, driven by [`GeneratorConfig`]

pub mod error;
pub mod generator;
pub mod markdown;
pub mod returns;
pub mod rust;
pub mod signature;

pub use error::CodegenError;
pub use generator::{Artifact, GenerationReport, Generator, GeneratorConfig, Rendered};
pub use returns::{ReturnDoc, Warning};

use generator::render_document;
use milky_schema::ir::DEFAULT_PATH_PREFIX;

/// Renders one artifact from an API description string.
fn generate(json: &str, artifact: Artifact) -> Result<String, CodegenError> {
    let document = milky_schema::parse_document(json)?;
    let mut rendered = render_document(&document, DEFAULT_PATH_PREFIX, &[artifact])?;
    Ok(rendered
        .artifacts
        .pop()
        .map(|(_, content)| content)
        .unwrap_or_default())
}

/// Generates the client method file from an API description string.
///
/// # Arguments
/// * `json` - OpenAPI document content
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing or validation fails.
pub fn generate_client(json: &str) -> Result<String, CodegenError> {
    generate(json, Artifact::Client)
}

/// Generates the API reference page from an API description string.
///
/// # Errors
/// Returns `CodegenError` if parsing or validation fails.
pub fn generate_api_doc(json: &str) -> Result<String, CodegenError> {
    generate(json, Artifact::ApiDoc)
}

/// Generates the data structure reference page from an API description
/// string.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation or rendering fails.
pub fn generate_structs_doc(json: &str) -> Result<String, CodegenError> {
    generate(json, Artifact::StructsDoc)
}

/// Generates the client method file from an API description file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_client_from_file(path: &std::path::Path) -> Result<String, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_client(&json)
}
