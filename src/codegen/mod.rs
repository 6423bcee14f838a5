/// Renders the interface declaration as Go source.
pub mod renderer;

/// Post-format pass over the rendered source.
pub mod formatter;

pub use formatter::{CodeFormatter, CommandFormatter, GoFormatter};
pub use renderer::{render_interface, GENERATED_HEADER};
