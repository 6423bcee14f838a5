use tracing::{debug, info};

use crate::codegen::{render_interface, CodeFormatter, GoFormatter};
use crate::config::MakerConfig;
use crate::errors::Result;
use crate::extraction::{Decl, GoParser, MethodCollector};
use crate::resolution::{ImportRegistry, Registration};
use crate::types::{ImportedPackage, Method};

/// Generates an interface from the methods of a struct.
///
/// Feed every source file through [`Maker::parse_source`], in the order the
/// methods should appear, then call [`Maker::make_interface`] once. Rendering
/// consumes the maker, so a rendered run can neither be extended nor
/// rendered again. A maker is driven by one caller at a time; it holds no
/// locks.
pub struct Maker {
    config: MakerConfig,
    parser: GoParser,
    collector: MethodCollector,
    imports: ImportRegistry,
    /// Alias under which the struct's own package is referred to; qualified
    /// types using it are printed bare.
    source_alias: String,
    files_processed: usize,
}

impl Maker {
    /// Creates an engine for one run. Fails if a required name is missing.
    pub fn new(config: MakerConfig) -> Result<Self> {
        config.validate()?;
        let collector = MethodCollector::new(config.struct_name.clone(), config.copy_docs);
        let imports = ImportRegistry::new(config.target_dir());
        let source_alias = config.pkg_name.clone();
        Ok(Self {
            parser: GoParser::new()?,
            collector,
            imports,
            source_alias,
            files_processed: 0,
            config,
        })
    }

    /// Parses the source code in `src`.
    ///
    /// `filename` is used for diagnostics only. Imports of a file are only
    /// examined when the file contributes at least one method, so unrelated
    /// files cannot cause alias conflicts.
    pub fn parse_source(&mut self, src: &[u8], filename: &str) -> Result<()> {
        let unit = self.parser.parse(src, filename)?;
        let decls = unit.decls()?;
        self.files_processed += 1;
        debug!(
            file = filename,
            package = unit.package_name().as_deref().unwrap_or(""),
            decls = decls.len(),
            "parsed file"
        );

        let found = self.collector.qualifying(&decls, &unit);
        if found.is_empty() {
            debug!(file = filename, "no methods for {}", self.config.struct_name);
            return Ok(());
        }

        for decl in &decls {
            let Decl::Import(specs) = decl else {
                continue;
            };
            for spec in specs {
                if let Registration::SelfImport(Some(alias)) = self.imports.register(spec)? {
                    debug!(file = filename, %alias, "using source package alias");
                    self.source_alias = alias;
                }
            }
        }

        let added = self.collector.collect(&unit, &found, &self.source_alias)?;
        debug!(file = filename, added, "processed file");
        Ok(())
    }

    /// Methods collected so far, in discovery order.
    pub fn methods(&self) -> &[Method] {
        self.collector.methods()
    }

    /// Imports registered so far, in registration order.
    pub fn imports(&self) -> &[ImportedPackage] {
        self.imports.imports()
    }

    /// The alias currently stripped from qualified types.
    pub fn source_package_alias(&self) -> &str {
        &self.source_alias
    }

    /// Creates the Go file with the generated interface, formatted by the
    /// built-in formatter.
    pub fn make_interface(self) -> Result<Vec<u8>> {
        self.make_interface_with(&GoFormatter)
    }

    /// Creates the Go file with the generated interface, formatted by
    /// `formatter`.
    pub fn make_interface_with(self, formatter: &dyn CodeFormatter) -> Result<Vec<u8>> {
        let unformatted = render_interface(
            &self.config.pkg_name,
            &self.config.iface_name,
            self.imports.imports(),
            self.collector.methods(),
        );
        let formatted = formatter.format(&unformatted)?;
        info!(
            files = self.files_processed,
            methods = self.collector.methods().len(),
            imports = self.imports.imports().len(),
            "generated interface {}",
            self.config.iface_name
        );
        Ok(formatted.into_bytes())
    }
}
