//! # Cookbook Common
//!
//! Common types shared by the Sulfur cookbook crates:
//! - Recipe identifiers and slug generation
//! - Error types for the I/O edges
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
