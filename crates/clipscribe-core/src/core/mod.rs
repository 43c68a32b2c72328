//! ClipScribe Core Engine
//!
//! Core transcript engine module.
//! Handles the caption data model, canonical document codec, subtitle-track
//! emission, format importers, and editing-session state.

pub mod document;
pub mod formats;
pub mod session;
pub mod transcript;
pub mod video;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
