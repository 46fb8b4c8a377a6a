//! # Milky Client
//!
//! Client for the Milky bot protocol.
//!
//! This crate provides:
//! - Client builder with configuration from code or the environment
//! - The `call` primitive over HTTP
//! - The WebSocket event loop with automatic reconnection
//! - Message segment constructors
//!
//! With the `api` feature, one typed method per protocol API is generated
//! onto [`MilkyClient`].

#[cfg(feature = "api")]
mod api;
pub mod builder;
pub mod client;
pub mod error;
pub mod event;
pub mod reconnect;
pub mod segment;
pub mod session;

pub use builder::ClientBuilder;
pub use client::MilkyClient;
pub use error::ClientError;
pub use event::Event;
pub use reconnect::ReconnectConfig;
pub use segment::{ImageSubType, MessageContent, Segment, extract_text};
