//! Prelude module for convenient imports.
//!
//! ```ignore
//! use milky::prelude::*;
//! ```

// Client types
pub use milky_client::{
    ClientBuilder, ClientError, Event, ImageSubType, MessageContent, MilkyClient,
    ReconnectConfig, Segment, extract_text,
};

// Generator types
pub use milky_codegen::{Artifact, CodegenError, Generator, GeneratorConfig};

// Schema types
pub use milky_schema::{ApiIr, Document, Operation, parse_document, validate_document};
