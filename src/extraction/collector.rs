use std::collections::HashSet;

use tracing::{debug, trace};
use tree_sitter::Node as TsNode;

use crate::errors::{IfaceError, Result};
use crate::extraction::parser::{CompilationUnit, Decl, MethodDecl};
use crate::extraction::printer::{PrintError, TypePrinter};
use crate::types::{is_exported, Method};

/// Collects the exported methods of one struct type across files.
///
/// Methods keep discovery order (file order, then declaration order) and
/// are unique by name: the first declaration seen wins, later ones are
/// dropped without error.
pub struct MethodCollector {
    struct_name: String,
    copy_docs: bool,
    names: HashSet<String>,
    methods: Vec<Method>,
}

impl MethodCollector {
    pub fn new(struct_name: impl Into<String>, copy_docs: bool) -> Self {
        Self {
            struct_name: struct_name.into(),
            copy_docs,
            names: HashSet::new(),
            methods: Vec::new(),
        }
    }

    /// Returns the declarations in `decls` that would add a method: receiver
    /// of the target type, exported name, name not yet collected.
    pub fn qualifying<'d, 'u>(
        &self,
        decls: &'d [Decl<'u>],
        unit: &CompilationUnit,
    ) -> Vec<&'d MethodDecl<'u>> {
        decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Method(method) => Some(method),
                Decl::Import(_) | Decl::Other => None,
            })
            .filter(|method| {
                let receiver = receiver_type_name(unit, method.receiver);
                if receiver.as_deref() != Some(self.struct_name.as_str()) {
                    return false;
                }
                if !is_exported(&method.name) {
                    trace!(method = %method.name, "skipping unexported method");
                    return false;
                }
                !self.names.contains(&method.name)
            })
            .collect()
    }

    /// Renders each declaration and appends it unless its name was already
    /// collected. `source_alias` is stripped from qualified types.
    ///
    /// Returns the number of methods added.
    pub fn collect(
        &mut self,
        unit: &CompilationUnit,
        methods: &[&MethodDecl<'_>],
        source_alias: &str,
    ) -> Result<usize> {
        let printer = TypePrinter::new(unit.source()).strip_qualifier(source_alias);
        let mut added = 0;
        for decl in methods {
            if self.names.contains(&decl.name) {
                trace!(method = %decl.name, "skipping duplicate method");
                continue;
            }
            let signature = render_signature(unit, &printer, decl)?;
            let docs = if self.copy_docs {
                decl.docs.clone()
            } else {
                Vec::new()
            };
            debug!(file = unit.filename(), method = %decl.name, %signature, "collected method");
            self.names.insert(decl.name.clone());
            self.methods.push(Method {
                name: decl.name.clone(),
                signature,
                docs,
            });
            added += 1;
        }
        Ok(added)
    }

    /// Collected methods in discovery order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

/// `Name(params) results`, with results printed exactly as written.
fn render_signature(
    unit: &CompilationUnit,
    printer: &TypePrinter<'_>,
    decl: &MethodDecl<'_>,
) -> Result<String> {
    let failure = |what: &str, e: PrintError| IfaceError::SignatureRender {
        what: what.to_string(),
        message: e.to_string(),
        file: unit.filename().to_string(),
    };
    let params = printer
        .print(decl.parameters)
        .map_err(|e| failure("parameters", e))?;
    let mut signature = format!("{}{}", decl.name, params);
    if let Some(result) = decl.result {
        let results = printer
            .print(result)
            .map_err(|e| failure("return values", e))?;
        signature.push(' ');
        signature.push_str(&results);
    }
    Ok(signature)
}

/// Extract the type name from a receiver list.
///
/// Matches only a single binding whose type is `T` or `*T`; embedded,
/// generic, parenthesized or multi-binding receivers yield `None`.
fn receiver_type_name(unit: &CompilationUnit, receiver: TsNode<'_>) -> Option<String> {
    let mut cursor = receiver.walk();
    let params: Vec<TsNode<'_>> = receiver
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect();
    let [param] = params.as_slice() else {
        return None;
    };
    if param.kind() != "parameter_declaration" {
        return None;
    }
    let mut name_cursor = param.walk();
    if param.children_by_field_name("name", &mut name_cursor).count() > 1 {
        return None;
    }

    let mut ty = param.child_by_field_name("type")?;
    if ty.kind() == "pointer_type" {
        ty = ty.named_child(0)?;
    }
    if ty.kind() != "type_identifier" {
        return None;
    }
    unit.node_text(ty).ok().map(str::to_string)
}
