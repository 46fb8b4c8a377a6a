//! # Milky Schema
//!
//! OpenAPI document model and analysis for the Milky bot protocol.
//!
//! This crate provides:
//! - Loading of the API description with located parse errors
//! - Reference resolution and `allOf` flattening with cycle detection
//! - Neutral type names for documentation and code generation
//! - Structural discriminated-union analysis of `oneOf` definitions
//! - Document validation and an intermediate representation of operations

pub mod classify;
pub mod error;
pub mod ir;
pub mod parser;
pub mod resolve;
pub mod type_map;
pub mod types;
pub mod union;
pub mod validation;

pub use classify::DefinitionKind;
pub use error::{ParseError, SchemaError};
pub use ir::{ApiIr, Operation, Parameter, ReturnShape};
pub use parser::{parse_document, parse_document_file};
pub use resolve::{ObjectShape, Resolver};
pub use type_map::{TypeMapper, TypeName};
pub use types::{Document, SchemaKind, SchemaNode, Shape};
pub use union::{Discriminator, UnionAnalysis, UnionAnalyzer, UnionField, Variant};
pub use validation::validate_document;
