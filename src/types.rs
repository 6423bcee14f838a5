/// A method collected from the target struct, ready to become an
/// interface member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Method name; unique across one run.
    pub name: String,
    /// `Name(params) results`, with same-package qualifiers stripped.
    pub signature: String,
    /// Doc comment lines, verbatim including the comment markers.
    pub docs: Vec<String>,
}

impl Method {
    /// Returns the rendered lines for this method: docs, then the signature.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.docs.clone();
        lines.push(self.signature.clone());
        lines
    }
}

/// An import carried into the generated file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportedPackage {
    /// Unquoted import path.
    pub path: String,
    /// Explicit alias as written in the source, if any.
    pub alias: Option<String>,
}

impl ImportedPackage {
    /// Returns the alias, or an empty string when the import is unaliased.
    pub fn alias_str(&self) -> &str {
        self.alias.as_deref().unwrap_or("")
    }

    /// Renders the import spec line: `<alias-or-empty> "<path>"`.
    pub fn line(&self) -> String {
        format!("{} {}", self.alias_str(), quote_go_string(&self.path))
    }
}

/// Quotes a string as a Go interpreted string literal.
pub fn quote_go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Determine Go visibility: a name is exported when its first character is
/// an uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}
