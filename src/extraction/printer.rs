use thiserror::Error;
use tree_sitter::Node as TsNode;

/// Reasons a syntax fragment cannot be printed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrintError {
    #[error("syntax error at line {line}")]
    Syntax { line: usize },

    #[error("missing {kind} at line {line}")]
    Missing { kind: String, line: usize },

    #[error("invalid utf-8 at line {line}")]
    Utf8 { line: usize },
}

/// Structural pretty-printer for Go type expressions and signatures.
///
/// Walks the token leaves of a syntax node and joins them with canonical
/// spacing, so `map [string]  *T` prints as `map[string]*T`. When a source
/// package alias is set, every `alias.Name` qualified type prints as the
/// bare `Name`, at any nesting depth.
pub struct TypePrinter<'a> {
    source: &'a [u8],
    strip_alias: Option<&'a str>,
}

struct Token {
    text: String,
    start: usize,
    end: usize,
}

impl<'a> TypePrinter<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            strip_alias: None,
        }
    }

    /// Rewrites `alias.Name` to `Name`. An empty alias disables stripping.
    pub fn strip_qualifier(mut self, alias: &'a str) -> Self {
        self.strip_alias = Some(alias).filter(|a| !a.is_empty());
        self
    }

    /// Prints `node` on a single line.
    pub fn print(&self, node: TsNode<'_>) -> Result<String, PrintError> {
        let mut tokens = Vec::new();
        self.collect(node, &mut tokens)?;
        Ok(self.join(&tokens))
    }

    fn text(&self, node: TsNode<'_>) -> Result<&'a str, PrintError> {
        std::str::from_utf8(&self.source[node.start_byte()..node.end_byte()]).map_err(|_| {
            PrintError::Utf8 {
                line: node.start_position().row + 1,
            }
        })
    }

    fn collect(&self, node: TsNode<'_>, tokens: &mut Vec<Token>) -> Result<(), PrintError> {
        let line = node.start_position().row + 1;
        if node.is_missing() {
            return Err(PrintError::Missing {
                kind: node.kind().to_string(),
                line,
            });
        }
        if node.is_error() {
            return Err(PrintError::Syntax { line });
        }

        match node.kind() {
            "comment" => return Ok(()),
            "qualified_type" => {
                if let Some(name) = self.stripped_name(node)? {
                    tokens.push(Token {
                        text: name.to_string(),
                        start: node.start_byte(),
                        end: node.end_byte(),
                    });
                    return Ok(());
                }
            }
            "interpreted_string_literal" | "raw_string_literal" | "rune_literal" => {
                self.push_leaf(node, tokens)?;
                return Ok(());
            }
            _ => {}
        }

        if node.child_count() == 0 {
            return self.push_leaf(node, tokens);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect(child, tokens)?;
        }
        Ok(())
    }

    fn push_leaf(&self, node: TsNode<'_>, tokens: &mut Vec<Token>) -> Result<(), PrintError> {
        let text = self.text(node)?;
        // Newline terminators carry no text of their own.
        if !text.trim().is_empty() {
            tokens.push(Token {
                text: text.to_string(),
                start: node.start_byte(),
                end: node.end_byte(),
            });
        }
        Ok(())
    }

    fn stripped_name(&self, node: TsNode<'_>) -> Result<Option<&'a str>, PrintError> {
        let Some(alias) = self.strip_alias else {
            return Ok(None);
        };
        let (Some(package), Some(name)) = (
            node.child_by_field_name("package"),
            node.child_by_field_name("name"),
        ) else {
            return Ok(None);
        };
        if self.text(package)? == alias {
            Ok(Some(self.text(name)?))
        } else {
            Ok(None)
        }
    }

    fn join(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        let mut prev: Option<&Token> = None;
        for (i, token) in tokens.iter().enumerate() {
            let trailing_comma = token.text == ","
                && tokens
                    .get(i + 1)
                    .is_some_and(|next| next.text == ")" || next.text == "]");
            if trailing_comma {
                continue;
            }
            if let Some(p) = prev {
                let gap = &self.source[p.end..token.start];
                out.push_str(separator(&p.text, &token.text, gap));
            }
            out.push_str(&token.text);
            prev = Some(token);
        }
        out
    }
}

/// Spacing between two adjacent tokens, given the source bytes between them.
fn separator(prev: &str, cur: &str, gap: &[u8]) -> &'static str {
    if matches!(cur, "," | ")" | "]" | "." | ";") {
        return "";
    }
    if matches!(prev, "(" | "[" | "]" | "." | "*" | "...") {
        return "";
    }
    if prev == "," || prev == ";" {
        return " ";
    }
    if cur == "(" && prev == "func" {
        return "";
    }
    if cur == "[" && prev == "map" {
        return "";
    }
    if cur == "{" && matches!(prev, "struct" | "interface") {
        return "";
    }
    if gap.contains(&b'\n') {
        return match (prev, cur) {
            ("{", "}") => "",
            ("{", _) | (_, "}") => " ",
            // A line break ends a field or method; keep it on one line.
            _ => "; ",
        };
    }
    if gap.is_empty() {
        ""
    } else {
        " "
    }
}
