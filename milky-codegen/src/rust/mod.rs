//! Rust code generation modules.

pub mod client;
pub mod types;

pub use client::ClientEmitter;
pub use types::{RustType, rust_ident};
