use clap::{ArgAction, Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ifacemaker::codegen::{CodeFormatter, CommandFormatter, GoFormatter};
use ifacemaker::config::{load_config, MakerConfig};
use ifacemaker::sources::{expand_inputs, logical_name, read_source, write_output};
use ifacemaker::Maker;

/// Generate a Go interface from the exported methods of a struct.
#[derive(Parser)]
#[command(
    name = "ifacemaker",
    version,
    about = "Generate a Go interface from the exported methods of a struct"
)]
struct Cli {
    /// Go source file, directory or glob pattern to read
    #[arg(short = 'f', long = "file", required = true, num_args = 1..)]
    files: Vec<String>,
    /// Generate an interface for this structure name
    #[arg(short = 's', long = "struct")]
    struct_type: Option<String>,
    /// Name of the generated interface
    #[arg(short = 'i', long = "iface")]
    iface_name: Option<String>,
    /// Package name for the generated interface
    #[arg(short = 'p', long = "pkg")]
    pkg_name: Option<String>,
    /// Copy docs from methods [default: true]
    #[arg(
        short = 'd',
        long = "doc",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    copy_docs: Option<bool>,
    /// Output file name. If not provided, result will be printed to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
    /// JSON config file providing defaults for the options above
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
    /// Post-format pass applied to the generated code
    #[arg(long, value_enum, default_value_t = FormatterKind::Builtin)]
    formatter: FormatterKind,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatterKind {
    /// Built-in tree-sitter formatter
    Builtin,
    /// Pipe through `gofmt`
    Gofmt,
    /// Pipe through `goimports`
    Goimports,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only the generated code.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> ifacemaker::errors::Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MakerConfig::default(),
    };
    if let Some(struct_type) = cli.struct_type {
        config.struct_name = struct_type;
    }
    if let Some(iface_name) = cli.iface_name {
        config.iface_name = iface_name;
    }
    if let Some(pkg_name) = cli.pkg_name {
        config.pkg_name = pkg_name;
    }
    if let Some(copy_docs) = cli.copy_docs {
        config.copy_docs = copy_docs;
    }
    if let Some(output) = cli.output {
        config.output = Some(output);
    }
    // The engine only compares directories; resolve relative paths here.
    if let Some(output) = config.output.take() {
        let absolute = if output.is_absolute() {
            output
        } else {
            std::env::current_dir()?.join(output)
        };
        config.output = Some(absolute);
    }
    let output = config.output.clone();

    let files = expand_inputs(&cli.files)?;
    let mut maker = Maker::new(config)?;
    for file in &files {
        let src = read_source(file)?;
        maker.parse_source(&src, &logical_name(file))?;
    }

    let formatter: Box<dyn CodeFormatter> = match cli.formatter {
        FormatterKind::Builtin => Box::new(GoFormatter),
        FormatterKind::Gofmt => Box::new(CommandFormatter::gofmt()),
        FormatterKind::Goimports => Box::new(CommandFormatter::goimports()),
    };
    let result = maker.make_interface_with(formatter.as_ref())?;

    match output {
        Some(path) => {
            write_output(&path, &result)?;
            info!(path = %path.display(), "wrote interface");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&result)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
