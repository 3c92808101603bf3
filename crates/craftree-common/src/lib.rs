//! # Craftree Common
//!
//! Common types shared by every Craftree crate:
//! - Error taxonomy for recipe handling and file operations
//! - Schema versions for the persisted workspace document
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::version::*;
}

pub use prelude::*;
