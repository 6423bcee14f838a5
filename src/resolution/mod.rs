//! Import resolution module.
//!
//! Builds the path/alias identity of imported packages across every file
//! that contributed methods, and recognizes imports of the output package.
mod imports;

pub use imports::{ImportRegistry, Registration};
