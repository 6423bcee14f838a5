use thiserror::Error;

/// Errors that can occur while generating an interface.
///
/// Every variant is terminal: the run stops at the first error and no
/// partial interface is produced.
#[derive(Error, Debug)]
pub enum IfaceError {
    #[error("parsing file failed: {message} (file: {file}, line: {line:?})")]
    Parse {
        message: String,
        file: String,
        line: Option<u32>,
    },

    #[error("failed printing {what}: {message} (file: {file})")]
    SignatureRender {
        what: String,
        message: String,
        file: String,
    },

    #[error("parsing import `{literal}` failed (file: {file})")]
    ImportPath { literal: String, file: String },

    #[error("Package {path:?} imported multiple times with different aliases: {existing}, {found}")]
    ImportAliasConflict {
        path: String,
        existing: String,
        found: String,
    },

    #[error("Import alias {alias} already in use")]
    ImportAliasInUse { alias: String },

    #[error("Failed to format generated code. This could be a bug in ifacemaker. The generated code was:\n{code}\nError: {message}")]
    Format { message: String, code: String },

    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `IfaceError`.
pub type Result<T> = std::result::Result<T, IfaceError>;
