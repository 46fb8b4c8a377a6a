//! # Milky
//!
//! Client for the Milky bot protocol, plus the generators that derive its
//! method surface and reference documentation from the protocol's OpenAPI
//! description.
//!
//! ## Quick Start
//!
//! ```ignore
//! use milky::prelude::*;
//!
//! let client = ClientBuilder::from_env()?.build()?;
//!
//! client.subscribe("message_receive", |client, event| async move {
//!     let peer_id = event.data["peer_id"].as_i64().unwrap_or_default();
//!     let _ = client.send_private_message(peer_id, "hello").await;
//! });
//!
//! client.run().await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - OpenAPI document model, reference resolution, type mapping
//! - [`codegen`] - Client and documentation generation
//! - [`client`] - HTTP calls, the event loop and message segments

pub mod prelude;

/// OpenAPI document model and resolution.
pub mod schema {
    pub use milky_schema::*;
}

/// Client and documentation generation.
pub mod codegen {
    pub use milky_codegen::*;
}

/// Network client.
pub mod client {
    pub use milky_client::*;
}

// Re-export commonly used items at the crate root
pub use milky_client::{
    ClientBuilder, ClientError, Event, MessageContent, MilkyClient, Segment, extract_text,
};
pub use milky_codegen::{Generator, GeneratorConfig};
