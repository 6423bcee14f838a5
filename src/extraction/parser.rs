//! Tree-sitter based Go parser adapter.
//!
//! Turns raw source bytes into a `CompilationUnit` and exposes its
//! top-level declarations as a closed `Decl` sum type.
use tree_sitter::{Node as TsNode, Parser, Tree};

use crate::errors::{IfaceError, Result};

/// Reusable Go parser. One instance serves every file of a run.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Creates a parser with the Go grammar loaded.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_go::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| IfaceError::Parse {
                message: format!("failed to load Go grammar: {e}"),
                file: "<grammar>".to_string(),
                line: None,
            })?;
        Ok(Self { parser })
    }

    /// Parses `source` into a syntax tree.
    ///
    /// `filename` is used for diagnostics only. Any syntax error in the file
    /// fails the parse; there is no partial-file recovery. A missing final
    /// newline is supplied, since the grammar requires one after the last
    /// declaration.
    pub fn parse(&mut self, source: &[u8], filename: &str) -> Result<CompilationUnit> {
        let mut source = source.to_vec();
        if source.last().is_some_and(|&b| b != b'\n') {
            source.push(b'\n');
        }
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| IfaceError::Parse {
                message: "tree-sitter parse returned None".to_string(),
                file: filename.to_string(),
                line: None,
            })?;

        let root = tree.root_node();
        if root.has_error() {
            let (message, line) = match first_error(root) {
                Some(bad) => {
                    let pos = bad.start_position();
                    let what = if bad.is_missing() {
                        format!("missing {}", bad.kind())
                    } else {
                        "syntax error".to_string()
                    };
                    (
                        format!("{what} at {}:{}", pos.row + 1, pos.column + 1),
                        Some(pos.row as u32 + 1),
                    )
                }
                None => {
                    // Missing terminators at end of input have no error node.
                    let pos = root.end_position();
                    (
                        format!("unexpected end of file at {}:{}", pos.row + 1, pos.column + 1),
                        Some(pos.row as u32 + 1),
                    )
                }
            };
            return Err(IfaceError::Parse {
                message,
                file: filename.to_string(),
                line,
            });
        }

        Ok(CompilationUnit {
            filename: filename.to_string(),
            source,
            tree,
        })
    }
}

/// Depth-first search for the first error or missing node.
fn first_error(node: TsNode<'_>) -> Option<TsNode<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

/// A parsed Go source file: logical name, source bytes and syntax tree.
pub struct CompilationUnit {
    filename: String,
    source: Vec<u8>,
    tree: Tree,
}

/// A top-level declaration of a compilation unit.
pub enum Decl<'a> {
    /// A function declaration with a receiver.
    Method(MethodDecl<'a>),
    /// An import declaration, single or grouped.
    Import(Vec<ImportSpec>),
    /// Anything else: plain functions, types, consts, vars.
    Other,
}

/// A method declaration, borrowed from the unit's syntax tree.
pub struct MethodDecl<'a> {
    pub name: String,
    /// The receiver `parameter_list` node.
    pub receiver: TsNode<'a>,
    /// The `parameter_list` node of the method's parameters.
    pub parameters: TsNode<'a>,
    /// The result node: a `parameter_list` or a bare type.
    pub result: Option<TsNode<'a>>,
    /// Doc comment lines, verbatim.
    pub docs: Vec<String>,
}

/// How an import names its package in the importing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportName {
    /// `import "path"`
    Default,
    /// `import . "path"`
    Dot,
    /// `import _ "path"`
    Blank,
    /// `import alias "path"`
    Alias(String),
}

impl ImportName {
    /// The alias as written, or `None` for the default name.
    pub fn as_written(&self) -> Option<&str> {
        match self {
            ImportName::Default => None,
            ImportName::Dot => Some("."),
            ImportName::Blank => Some("_"),
            ImportName::Alias(alias) => Some(alias),
        }
    }
}

/// One import spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: ImportName,
    /// Unquoted import path.
    pub path: String,
}

impl CompilationUnit {
    /// Logical filename given at parse time.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Raw source bytes.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Root node of the syntax tree.
    pub fn root(&self) -> TsNode<'_> {
        self.tree.root_node()
    }

    /// Gets the text of a tree-sitter node from the source.
    pub fn node_text(&self, node: TsNode<'_>) -> Result<&str> {
        node.utf8_text(&self.source).map_err(|e| IfaceError::Parse {
            message: format!("invalid utf-8 in {}: {e}", node.kind()),
            file: self.filename.clone(),
            line: Some(node.start_position().row as u32 + 1),
        })
    }

    /// The name from the package clause, if present.
    pub fn package_name(&self) -> Option<String> {
        let root = self.root();
        let mut cursor = root.walk();
        let clause = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_clause")?;
        let ident = find_child_by_kind(clause, "package_identifier")?;
        self.node_text(ident).ok().map(str::to_string)
    }

    /// Top-level declarations in source order.
    pub fn decls(&self) -> Result<Vec<Decl<'_>>> {
        let root = self.root();
        let mut decls = Vec::new();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "method_declaration" => decls.push(self.method_decl(node)?),
                "import_declaration" => decls.push(Decl::Import(self.import_specs(node)?)),
                "comment" | "package_clause" => {}
                _ => decls.push(Decl::Other),
            }
        }
        Ok(decls)
    }

    fn method_decl<'a>(&'a self, node: TsNode<'a>) -> Result<Decl<'a>> {
        let missing = |field: &str| IfaceError::Parse {
            message: format!("method declaration without {field}"),
            file: self.filename.clone(),
            line: Some(node.start_position().row as u32 + 1),
        };
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| missing("name"))?;
        let receiver = node
            .child_by_field_name("receiver")
            .ok_or_else(|| missing("receiver"))?;
        let parameters = node
            .child_by_field_name("parameters")
            .ok_or_else(|| missing("parameters"))?;

        Ok(Decl::Method(MethodDecl {
            name: self.node_text(name)?.to_string(),
            receiver,
            parameters,
            result: node.child_by_field_name("result"),
            docs: self.doc_comments(node)?,
        }))
    }

    /// Collects the specs of `import "x"` and `import ( ... )` forms.
    fn import_specs(&self, node: TsNode<'_>) -> Result<Vec<ImportSpec>> {
        let mut specs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => specs.push(self.import_spec(child)?),
                "import_spec_list" => {
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
        Ok(specs)
    }

    fn import_spec(&self, node: TsNode<'_>) -> Result<ImportSpec> {
        let name = match node.child_by_field_name("name") {
            None => ImportName::Default,
            Some(n) => match n.kind() {
                "dot" => ImportName::Dot,
                "blank_identifier" => ImportName::Blank,
                _ => ImportName::Alias(self.node_text(n)?.to_string()),
            },
        };
        let literal_node = node
            .child_by_field_name("path")
            .ok_or_else(|| IfaceError::Parse {
                message: "import spec without path".to_string(),
                file: self.filename.clone(),
                line: Some(node.start_position().row as u32 + 1),
            })?;
        let literal = self.node_text(literal_node)?;
        let path = unquote(literal).ok_or_else(|| IfaceError::ImportPath {
            literal: literal.to_string(),
            file: self.filename.clone(),
        })?;
        Ok(ImportSpec { name, path })
    }

    /// Extract the doc comment group directly above a declaration.
    ///
    /// The group's last comment ends on the line just before the
    /// declaration and its comments sit on consecutive lines. A comment
    /// trailing another node on the same line ends the group.
    fn doc_comments(&self, node: TsNode<'_>) -> Result<Vec<String>> {
        let mut comments = Vec::new();
        let mut next_row = node.start_position().row;
        let mut first = true;
        let mut current = node.prev_named_sibling();
        while let Some(sibling) = current {
            if sibling.kind() != "comment" {
                break;
            }
            let gap = next_row.saturating_sub(sibling.end_position().row);
            if (first && gap != 1) || gap > 1 || sibling.end_position().row > next_row {
                break;
            }
            let previous = sibling.prev_named_sibling();
            if let Some(before) = previous {
                if before.kind() != "comment"
                    && before.end_position().row == sibling.start_position().row
                {
                    break;
                }
            }
            comments.push(self.node_text(sibling)?.trim_end_matches('\r').to_string());
            next_row = sibling.start_position().row;
            first = false;
            current = previous;
        }
        // Collected closest first.
        comments.reverse();
        Ok(comments)
    }
}

/// Find the first child of a node with a given kind.
pub fn find_child_by_kind<'a>(node: TsNode<'a>, kind: &str) -> Option<TsNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Unquotes a Go string literal (interpreted or raw).
///
/// Returns `None` when the literal is malformed.
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        return Some(raw.replace('\r', ""));
    }

    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escaped = match chars.next()? {
                    'a' => '\u{7}',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\u{b}',
                    '\\' => '\\',
                    '"' => '"',
                    'x' => hex_escape(&mut chars, 2)?,
                    'u' => hex_escape(&mut chars, 4)?,
                    'U' => hex_escape(&mut chars, 8)?,
                    d @ '0'..='7' => {
                        let mut value = d.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        char::from_u32(value).filter(|_| value <= 0xff)?
                    }
                    _ => return None,
                };
                out.push(escaped);
            }
            c => out.push(c),
        }
    }
    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}
