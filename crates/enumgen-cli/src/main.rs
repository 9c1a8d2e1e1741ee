use anyhow::Context;
use clap::{Parser, ValueEnum};
use enumgen_core::codegen::{assemble, check_static_names, generate_type_code, Emit};
use enumgen_core::config::{CliOverrides, GeneratorConfig, Visibility};
use enumgen_core::diagnostics::{ConsoleDiagnosticHandler, Diagnostic, DiagnosticHandler};
use enumgen_core::extract::{Manifest, ManifestSource, TrimPrefix};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "enumgen.yaml";

/// enumgen - label lookups and validity checks for integer constant types
#[derive(Parser, Debug, Clone)]
#[command(name = "enumgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Declaration manifest (YAML, or JSON by extension)
    #[arg(short, long, value_name = "FILE", required_unless_present = "init")]
    manifest: Option<PathBuf>,

    /// Type to generate for; repeatable. Defaults to every declared type
    #[arg(short = 't', long = "type", value_name = "NAME")]
    types: Vec<String>,

    /// Output file. Generated code goes to stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to enumgen.yaml configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Generate only one of the two fragments
    #[arg(long, value_enum, value_name = "FRAGMENT")]
    only: Option<Only>,

    /// Strip this prefix from constant names when deriving labels
    #[arg(long, value_name = "PREFIX")]
    trim_prefix: Option<String>,

    /// Spaces per indentation level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Visibility of generated methods
    #[arg(long, value_enum, value_name = "VIS")]
    visibility: Option<VisibilityArg>,

    /// Name of the generated validity method
    #[arg(long, value_name = "NAME")]
    valid_method: Option<String>,

    /// Name of the generated reverse lookup
    #[arg(long, value_name = "NAME")]
    from_label_method: Option<String>,

    /// Omit the generated-code banner
    #[arg(long)]
    no_header: bool,

    /// Omit doc comments on generated items
    #[arg(long)]
    no_docs: bool,

    /// Write a default enumgen.yaml and exit
    #[arg(long)]
    init: bool,

    /// Pretty print diagnostics
    #[arg(long)]
    pretty: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Only {
    Valid,
    FromLabel,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum VisibilityArg {
    Pub,
    Crate,
    Private,
}

impl From<VisibilityArg> for Visibility {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::Pub => Visibility::Public,
            VisibilityArg::Crate => Visibility::Crate,
            VisibilityArg::Private => Visibility::Private,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Stdout carries generated code, so logs go to stderr.
    // Set RUST_LOG=debug to see run and strategy decisions; unset means info.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.init {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
        GeneratorConfig::init_file(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Created {}", path.display());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let Some(manifest_path) = cli.manifest.as_deref() else {
        anyhow::bail!("No manifest specified. Use --help for usage information.");
    };
    let source = load_source(manifest_path, &config)?;

    let types: Vec<String> = if cli.types.is_empty() {
        source.type_names().map(str::to_string).collect()
    } else {
        cli.types.clone()
    };
    let emit = match cli.only {
        None => Emit::All,
        Some(Only::Valid) => Emit::Valid,
        Some(Only::FromLabel) => Emit::FromLabel,
    };

    info!("Generating {} type(s) from {}", types.len(), manifest_path.display());
    let code = generate(&source, &types, &config, emit, cli.pretty)?;

    match cli.output {
        Some(ref path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &code)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Generated: {}", path.display());
        }
        None => print!("{}", code),
    }

    Ok(())
}

/// Load the configuration file, if any, and apply command-line overrides
fn load_config(cli: &Cli) -> anyhow::Result<GeneratorConfig> {
    let mut config = if let Some(ref path) = cli.config {
        GeneratorConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config file: {}", e))?
    } else {
        let default_path = PathBuf::from(DEFAULT_CONFIG);
        if default_path.exists() {
            GeneratorConfig::from_file(&default_path)
                .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", DEFAULT_CONFIG, e))?
        } else {
            GeneratorConfig::default()
        }
    };

    let overrides = CliOverrides {
        indent: cli.indent,
        visibility: cli.visibility.map(Visibility::from),
        valid_method: cli.valid_method.clone(),
        from_label_method: cli.from_label_method.clone(),
        doc_comments: cli.no_docs.then_some(false),
        header: cli.no_header.then_some(false),
        trim_prefix: cli.trim_prefix.clone(),
    };
    config.merge(&overrides);
    debug!("Effective configuration: {:?}", config);

    Ok(config)
}

fn load_source(path: &Path, config: &GeneratorConfig) -> anyhow::Result<ManifestSource> {
    let manifest = Manifest::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load manifest {}: {}", path.display(), e))?;
    let source = ManifestSource::new(manifest)?
        .with_stringify(TrimPrefix::new(config.trim_prefix.clone()));
    Ok(source)
}

/// Generate every requested type in parallel, then assemble in request order.
///
/// Every failing type is reported before the run is aborted.
fn generate(
    source: &ManifestSource,
    types: &[String],
    config: &GeneratorConfig,
    emit: Emit,
    pretty: bool,
) -> anyhow::Result<String> {
    use rayon::prelude::*;

    check_static_names(types)?;

    let results: Vec<_> = types
        .par_iter()
        .map(|type_name| generate_type_code(source, type_name, config, emit))
        .collect();

    let handler = ConsoleDiagnosticHandler::new(pretty);
    let mut fragments = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(fragment) => fragments.push(fragment),
            Err(err) => handler.report(Diagnostic::from(&err)),
        }
    }

    if handler.has_errors() {
        anyhow::bail!(
            "generation failed for {} of {} type(s)",
            handler.error_count(),
            types.len()
        );
    }

    Ok(assemble(&fragments, config))
}
