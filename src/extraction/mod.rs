//! Tree-sitter based extraction of struct methods from Go source.
//!
//! `parser` turns source bytes into a compilation unit with typed top-level
//! declarations, `printer` re-prints type expressions, and `collector`
//! gathers the qualifying methods across files.
pub mod collector;
pub mod parser;
pub mod printer;

pub use collector::MethodCollector;
pub use parser::{CompilationUnit, Decl, GoParser, ImportName, ImportSpec, MethodDecl};
pub use printer::{PrintError, TypePrinter};
