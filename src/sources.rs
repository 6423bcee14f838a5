use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::{IfaceError, Result};

/// Extension of the files picked up from directory arguments.
pub const GO_EXTENSION: &str = "go";

/// Expands command-line inputs into the ordered list of files to process.
///
/// - a directory yields its immediate `.go` entries (not recursive), sorted
///   by name;
/// - an argument with glob metacharacters yields its matching files, sorted;
/// - anything else is taken as a file and must exist.
///
/// Argument order is preserved across inputs.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if is_glob(input) {
            files.extend(expand_glob(input)?);
            continue;
        }

        let path = PathBuf::from(input);
        let metadata = fs::metadata(&path).map_err(|e| IfaceError::File {
            message: e.to_string(),
            path: input.clone(),
        })?;
        if metadata.is_dir() {
            files.extend(dir_sources(&path)?);
        } else {
            files.push(path);
        }
    }
    debug!(count = files.len(), "expanded inputs");
    Ok(files)
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| IfaceError::File {
        message: format!("invalid glob pattern: {e}"),
        path: pattern.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IfaceError::File {
            message: e.error().to_string(),
            path: e.path().display().to_string(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(IfaceError::File {
            message: "pattern matched no files".to_string(),
            path: pattern.to_string(),
        });
    }
    files.sort();
    Ok(files)
}

/// Lists the Go files directly inside `dir`, sorted by name.
fn dir_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| IfaceError::File {
            message: e.to_string(),
            path: dir.display().to_string(),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let is_go = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == GO_EXTENSION);
        if is_go {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Reads a source file.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| IfaceError::File {
        message: e.to_string(),
        path: path.display().to_string(),
    })
}

/// Writes the generated code to `path`.
pub fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| IfaceError::File {
        message: format!("failed to write output: {e}"),
        path: path.display().to_string(),
    })
}

/// Logical filename handed to the parser: the file's base name.
pub fn logical_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "package p\n").unwrap();
    }

    #[test]
    fn test_directory_expansion_is_flat_and_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.go");
        touch(dir.path(), "a.go");
        touch(dir.path(), "notes.txt");
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "c.go");

        let files = expand_inputs(&[dir.path().display().to_string()]).unwrap();
        let names: Vec<_> = files.iter().map(|p| logical_name(p)).collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
    }

    #[test]
    fn test_argument_order_is_kept() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "z.go");
        touch(dir.path(), "a.go");
        let inputs = vec![
            dir.path().join("z.go").display().to_string(),
            dir.path().join("a.go").display().to_string(),
        ];
        let names: Vec<_> = expand_inputs(&inputs)
            .unwrap()
            .iter()
            .map(|p| logical_name(p))
            .collect();
        assert_eq!(names, vec!["z.go", "a.go"]);
    }

    #[test]
    fn test_glob_expansion() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "foo_b.go");
        touch(dir.path(), "foo_a.go");
        touch(dir.path(), "bar.go");
        let pattern = dir.path().join("foo_*.go").display().to_string();
        let names: Vec<_> = expand_inputs(&[pattern])
            .unwrap()
            .iter()
            .map(|p| logical_name(p))
            .collect();
        assert_eq!(names, vec!["foo_a.go", "foo_b.go"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.go").display().to_string();
        assert!(matches!(
            expand_inputs(&[missing]),
            Err(IfaceError::File { .. })
        ));
    }
}
