use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::errors::{IfaceError, Result};
use crate::extraction::{ImportName, ImportSpec};
use crate::types::ImportedPackage;

/// Outcome of registering one import spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First sighting of this path; appended to the import list.
    Added,
    /// Path already registered with the same alias.
    Existing,
    /// Dot import, never registered.
    Dot,
    /// The import points at the output package itself. Carries the
    /// explicit alias, if one was written.
    SelfImport(Option<String>),
}

/// Tracks the identity of imported packages across processed files.
///
/// Keeps a path index and an alias index over an append-only list, so the
/// generated import block follows first-registration order.
pub struct ImportRegistry {
    /// Directory the generated file will live in; enables self-import detection.
    target_dir: Option<PathBuf>,
    by_path: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    imports: Vec<ImportedPackage>,
}

/// Formats the alias for error messages, replacing "no alias" with `<none>`.
fn error_alias(alias: Option<&str>) -> String {
    alias.unwrap_or("<none>").to_string()
}

impl ImportRegistry {
    pub fn new(target_dir: Option<PathBuf>) -> Self {
        Self {
            target_dir,
            by_path: HashMap::new(),
            by_alias: HashMap::new(),
            imports: Vec::new(),
        }
    }

    /// Registers one import spec.
    ///
    /// Fails when the path is already known under another alias, or when
    /// the alias is already bound to another path.
    pub fn register(&mut self, spec: &ImportSpec) -> Result<Registration> {
        // Without parsing the imported package we cannot tell which of its
        // names the struct uses, so dot imports are left out entirely.
        if spec.name == ImportName::Dot {
            return Ok(Registration::Dot);
        }
        let alias = spec.name.as_written();

        if self.is_self_import(&spec.path) {
            debug!(path = %spec.path, alias = ?alias, "import refers to the output package");
            return Ok(Registration::SelfImport(alias.map(str::to_string)));
        }

        if let Some(&index) = self.by_path.get(&spec.path) {
            let existing = &self.imports[index];
            if existing.alias.as_deref() != alias {
                return Err(IfaceError::ImportAliasConflict {
                    path: spec.path.clone(),
                    existing: error_alias(existing.alias.as_deref()),
                    found: error_alias(alias),
                });
            }
            return Ok(Registration::Existing);
        }

        if let Some(alias) = alias {
            if self.by_alias.contains_key(alias) {
                return Err(IfaceError::ImportAliasInUse {
                    alias: alias.to_string(),
                });
            }
        }

        let index = self.imports.len();
        self.imports.push(ImportedPackage {
            path: spec.path.clone(),
            alias: alias.map(str::to_string),
        });
        self.by_path.insert(spec.path.clone(), index);
        if let Some(alias) = alias {
            self.by_alias.insert(alias.to_string(), index);
        }
        debug!(path = %spec.path, alias = ?alias, "registered import");
        Ok(Registration::Added)
    }

    /// Returns `true` if `import_path` names the directory the generated
    /// file is written into.
    ///
    /// The path's segments must match the trailing components of the
    /// target directory. Always `false` without a target directory.
    pub fn is_self_import(&self, import_path: &str) -> bool {
        match &self.target_dir {
            Some(dir) => path_names_dir(import_path, dir),
            None => false,
        }
    }

    /// Registered imports in first-registration order.
    pub fn imports(&self) -> &[ImportedPackage] {
        &self.imports
    }
}

fn path_names_dir(import_path: &str, dir: &Path) -> bool {
    let segments: Vec<&str> = import_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return false;
    }

    let mut components: Vec<String> = Vec::new();
    for component in dir.components() {
        match component {
            Component::Normal(part) => components.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                components.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    components.len() >= segments.len()
        && components[components.len() - segments.len()..]
            .iter()
            .zip(&segments)
            .all(|(component, segment)| component == segment)
}
