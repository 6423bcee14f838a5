use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;
use tree_sitter::Node as TsNode;

use crate::errors::{IfaceError, Result};
use crate::extraction::parser::find_child_by_kind;
use crate::extraction::{CompilationUnit, GoParser, TypePrinter};

/// Final canonicalization pass over rendered Go code.
///
/// A failure here means the renderer produced invalid code; the error
/// carries the unformatted text.
pub trait CodeFormatter {
    fn format(&self, code: &str) -> Result<String>;
}

/// Built-in formatter backed by tree-sitter-go.
///
/// Re-parses the code, rejects any syntax error, and prints a canonical
/// layout: one blank line between top-level declarations, tab indentation
/// for import specs and interface members, empty import blocks dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoFormatter;

impl CodeFormatter for GoFormatter {
    fn format(&self, code: &str) -> Result<String> {
        let fail = |message: String| IfaceError::Format {
            message,
            code: code.to_string(),
        };
        let mut parser = GoParser::new().map_err(|e| fail(e.to_string()))?;
        let unit = parser
            .parse(code.as_bytes(), "<generated>")
            .map_err(|e| fail(e.to_string()))?;
        Layout { unit: &unit, code }.render()
    }
}

struct Layout<'a> {
    unit: &'a CompilationUnit,
    code: &'a str,
}

impl Layout<'_> {
    fn fail(&self, message: impl ToString) -> IfaceError {
        IfaceError::Format {
            message: message.to_string(),
            code: self.code.to_string(),
        }
    }

    fn text(&self, node: TsNode<'_>) -> Result<&str> {
        self.unit.node_text(node).map_err(|e| self.fail(e))
    }

    fn print(&self, node: TsNode<'_>) -> Result<String> {
        TypePrinter::new(self.unit.source())
            .print(node)
            .map_err(|e| self.fail(e))
    }

    fn render(&self) -> Result<String> {
        let root = self.unit.root();
        let mut out = String::new();
        let mut prev: Option<TsNode<'_>> = None;
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            let Some(text) = self.top_level(node)? else {
                continue;
            };
            if let Some(p) = prev {
                // A comment on the line right above a node stays attached.
                let attached = p.kind() == "comment"
                    && node.start_position().row == p.end_position().row + 1;
                if !attached {
                    out.push('\n');
                }
            }
            out.push_str(&text);
            out.push('\n');
            prev = Some(node);
        }
        Ok(out)
    }

    fn top_level(&self, node: TsNode<'_>) -> Result<Option<String>> {
        match node.kind() {
            "comment" => Ok(Some(self.text(node)?.trim_end().to_string())),
            "package_clause" => {
                let name = find_child_by_kind(node, "package_identifier")
                    .ok_or_else(|| self.fail("package clause without a name"))?;
                Ok(Some(format!("package {}", self.text(name)?)))
            }
            "import_declaration" => self.imports(node),
            "type_declaration" => self.type_declaration(node).map(Some),
            _ => self.print(node).map(Some),
        }
    }

    fn imports(&self, node: TsNode<'_>) -> Result<Option<String>> {
        let mut specs = Vec::new();
        let mut grouped = false;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => specs.push(self.import_spec(child)?),
                "import_spec_list" => {
                    grouped = true;
                    let mut inner = child.walk();
                    for spec in child.named_children(&mut inner) {
                        if spec.kind() == "import_spec" {
                            specs.push(self.import_spec(spec)?);
                        }
                    }
                }
                _ => {}
            }
        }

        if specs.is_empty() {
            return Ok(None);
        }
        if !grouped {
            return Ok(Some(format!("import {}", specs[0])));
        }
        let mut out = String::from("import (\n");
        for spec in &specs {
            out.push('\t');
            out.push_str(spec);
            out.push('\n');
        }
        out.push(')');
        Ok(Some(out))
    }

    fn import_spec(&self, node: TsNode<'_>) -> Result<String> {
        let path = node
            .child_by_field_name("path")
            .ok_or_else(|| self.fail("import spec without a path"))?;
        let path = self.text(path)?;
        match node.child_by_field_name("name") {
            Some(name) => Ok(format!("{} {}", self.text(name)?, path)),
            None => Ok(path.to_string()),
        }
    }

    fn type_declaration(&self, node: TsNode<'_>) -> Result<String> {
        let mut cursor = node.walk();
        let specs: Vec<TsNode<'_>> = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect();
        if let [spec] = specs.as_slice() {
            return Ok(format!("type {}", self.type_spec(*spec, 0)?));
        }

        let mut out = String::from("type (\n");
        for spec in specs {
            out.push('\t');
            out.push_str(&self.type_spec(spec, 1)?);
            out.push('\n');
        }
        out.push(')');
        Ok(out)
    }

    fn type_spec(&self, node: TsNode<'_>, depth: usize) -> Result<String> {
        if node.kind() != "type_spec" {
            return self.print(node);
        }
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| self.fail("type spec without a name"))?;
        let ty = node
            .child_by_field_name("type")
            .ok_or_else(|| self.fail("type spec without a type"))?;
        let params = match node.child_by_field_name("type_parameters") {
            Some(params) => self.print(params)?,
            None => String::new(),
        };
        let body = if ty.kind() == "interface_type" {
            self.interface(ty, depth)?
        } else {
            self.print(ty)?
        };
        Ok(format!("{}{} {}", self.text(name)?, params, body))
    }

    fn interface(&self, node: TsNode<'_>, depth: usize) -> Result<String> {
        let mut cursor = node.walk();
        let members: Vec<TsNode<'_>> = node.named_children(&mut cursor).collect();
        if members.is_empty() {
            return Ok("interface{}".to_string());
        }

        let indent = "\t".repeat(depth + 1);
        let mut out = String::from("interface {\n");
        for member in members {
            out.push_str(&indent);
            if member.kind() == "comment" {
                out.push_str(self.text(member)?.trim_end());
            } else {
                out.push_str(&self.print(member)?);
            }
            out.push('\n');
        }
        out.push_str(&"\t".repeat(depth));
        out.push('}');
        Ok(out)
    }
}

/// Formatter that pipes the code through an external program such as
/// `gofmt` or `goimports`, reading the result from its stdout.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn gofmt() -> Self {
        Self::new("gofmt", Vec::new())
    }

    pub fn goimports() -> Self {
        Self::new("goimports", Vec::new())
    }
}

impl CodeFormatter for CommandFormatter {
    fn format(&self, code: &str) -> Result<String> {
        let fail = |message: String| IfaceError::Format {
            message,
            code: code.to_string(),
        };
        debug!(program = %self.program, "running external formatter");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| fail(format!("failed to run {}: {e}", self.program)))?;

        // Feed stdin from another thread so a full stdout pipe cannot stall us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| fail(format!("{} has no stdin", self.program)))?;
        let input = code.as_bytes().to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&input));

        let output = child
            .wait_with_output()
            .map_err(|e| fail(format!("failed to wait for {}: {e}", self.program)))?;
        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(fail(format!("failed to write to {}: {e}", self.program))),
            Err(_) => return Err(fail(format!("stdin writer for {} panicked", self.program))),
        }

        if !output.status.success() {
            return Err(fail(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| fail(format!("{} produced invalid utf-8: {e}", self.program)))
    }
}
