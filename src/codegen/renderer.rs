use crate::types::{ImportedPackage, Method};

/// Marker comment placed at the top of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by ifacemaker. DO NOT EDIT.";

/// Renders the unformatted interface declaration.
///
/// Imports and methods are emitted in the order given; nothing is sorted
/// or pruned. The import block is always present, even when empty, and
/// the post-format pass is expected to tidy it. The text ends with a
/// newline, which the Go grammar requires after the last declaration.
pub fn render_interface(
    pkg_name: &str,
    iface_name: &str,
    imports: &[ImportedPackage],
    methods: &[Method],
) -> String {
    let mut output = vec![
        GENERATED_HEADER.to_string(),
        String::new(),
        format!("package {pkg_name}"),
        "import (".to_string(),
    ];
    output.extend(imports.iter().map(ImportedPackage::line));
    output.push(")".to_string());
    output.push(format!("type {iface_name} interface {{"));
    for method in methods {
        output.extend(method.lines());
    }
    output.push("}".to_string());
    output.push(String::new());

    output.join("\n")
}
