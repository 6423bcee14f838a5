use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{IfaceError, Result};

/// Configuration for one interface generation run.
///
/// Every field may be given in a JSON config file; command-line flags
/// override file values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakerConfig {
    /// Name of the struct whose methods become the interface.
    pub struct_name: String,
    /// Name of the generated interface.
    pub iface_name: String,
    /// Package clause of the generated file.
    pub pkg_name: String,
    /// Whether to copy method doc comments into the interface.
    pub copy_docs: bool,
    /// Path of the generated file. Only used to recognize imports of the
    /// output package; when absent every import is treated as foreign.
    pub output: Option<PathBuf>,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            struct_name: String::new(),
            iface_name: String::new(),
            pkg_name: String::new(),
            copy_docs: true,
            output: None,
        }
    }
}

impl MakerConfig {
    pub fn new(
        struct_name: impl Into<String>,
        iface_name: impl Into<String>,
        pkg_name: impl Into<String>,
    ) -> Self {
        Self {
            struct_name: struct_name.into(),
            iface_name: iface_name.into(),
            pkg_name: pkg_name.into(),
            ..Self::default()
        }
    }

    pub fn with_copy_docs(mut self, copy_docs: bool) -> Self {
        self.copy_docs = copy_docs;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Checks that the required names are present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("struct name", &self.struct_name),
            ("interface name", &self.iface_name),
            ("package name", &self.pkg_name),
        ];
        for (what, value) in required {
            if value.trim().is_empty() {
                return Err(IfaceError::Config {
                    message: format!("{what} is required"),
                });
            }
        }
        Ok(())
    }

    /// Directory the generated file will be written into.
    pub fn target_dir(&self) -> Option<PathBuf> {
        self.output
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

/// Loads a configuration file from disk.
pub fn load_config(path: &Path) -> Result<MakerConfig> {
    let contents = fs::read_to_string(path).map_err(|e| IfaceError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    let config: MakerConfig =
        serde_json::from_str(&contents).map_err(|e| IfaceError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?;

    Ok(config)
}
