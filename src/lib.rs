pub mod bar;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod display;
pub mod filter;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

pub use bar::{FilterBar, FilterBarState, SelectModifier, Selection, Separator};
pub use catalog::{FieldCatalog, FieldSpec, FieldType};
pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use config::{CompilerConfig, ConfigError, load_config};
pub use filter::{
    Clause, ExplicitGroup, FilterError, InvalidGroupError, LogicOp, Node, OperatorKind,
    PreviewRenderer, QueryCompiler, ValidationError, build_implicit, build_with_groups, compile,
    render_preview, to_query_document,
};

/// Default log filter for the verbosity flags: `-q` error, none warn,
/// `-v` info, `-vv` and up debug
pub fn default_log_level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    }
}

/// Initialize `env_logger`; `RUST_LOG` wins over the verbosity flags
pub fn init_logger(verbose: u8, quiet: bool) {
    let default_level = default_log_level(verbose, quiet);
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

/// Load a stored filter bar state and check its groups
pub fn load_filter_bar(path: &Path) -> Result<FilterBar> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file '{}'", path.display()))?;
    let state = FilterBarState::from_json(&raw)
        .with_context(|| format!("Failed to parse state file '{}'", path.display()))?;
    FilterBar::from_state(state)
        .with_context(|| format!("Invalid filter bar state in '{}'", path.display()))
}

fn load_catalog(path: Option<&Path>, config: &CompilerConfig) -> Result<FieldCatalog> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog '{}'", path.display()))?;
            FieldCatalog::from_json(&raw)
                .with_context(|| format!("Failed to parse catalog '{}'", path.display()))
        }
        None => Ok(config.field_catalog()),
    }
}

fn write_output_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

fn print_warnings<'a>(warnings: impl Iterator<Item = &'a FilterError>) {
    for warning in warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }
}

pub fn run() -> Result<()> {
    let cli = cli_parse();
    init_logger(cli.verbose, cli.quiet);

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
    // Files never get escape codes.
    if cli.output.is_some() && cli.color != ColorMode::Always {
        colored::control::set_override(false);
    }

    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    log::debug!("Config profile: {}", config.profile_name);

    let compiler = QueryCompiler::from_config(&config);
    let renderer = PreviewRenderer::from_config(&config);

    let text = match &cli.command {
        Commands::Compile { state, compact } => {
            let bar = load_filter_bar(state)?;
            let compilation = compiler.compile_with_diagnostics(bar.ast().as_ref());
            if !cli.quiet {
                print_warnings(compilation.warnings());
            }
            let body = if *compact {
                serde_json::to_string(&compilation.query)
            } else {
                serde_json::to_string_pretty(&compilation.query)
            }
            .context("Failed to serialize query document")?;
            format!("{body}\n")
        }
        Commands::Preview { state } => {
            let bar = load_filter_bar(state)?;
            let preview = bar.preview_with(&renderer);
            match cli.format {
                OutputFormat::Text => format!("{preview}\n"),
                OutputFormat::Json => {
                    format!("{}\n", serde_json::json!({ "preview": preview }))
                }
            }
        }
        Commands::Explain { state } => {
            let bar = load_filter_bar(state)?;
            let ast = bar.ast();
            let preview = renderer.render_preview(ast.as_ref());
            let compilation = compiler.compile_with_diagnostics(ast.as_ref());
            match cli.format {
                OutputFormat::Text => display::format_explain_text(&bar, &preview, &compilation),
                OutputFormat::Json => {
                    format!("{}\n", display::format_explain_json(&bar, &preview, &compilation))
                }
            }
        }
        Commands::Fields { catalog, field } => {
            let catalog = load_catalog(catalog.as_deref(), &config)?;
            let fields: Vec<&FieldSpec> = catalog
                .fields()
                .iter()
                .filter(|spec| field.as_deref().is_none_or(|name| spec.name == name))
                .collect();
            if let Some(name) = field
                && fields.is_empty()
                && !cli.quiet
            {
                eprintln!(
                    "{} field '{}' is not in the catalog; every operator applies",
                    "Warning:".yellow().bold(),
                    name
                );
            }
            match cli.format {
                OutputFormat::Text => display::format_fields_text(&fields),
                OutputFormat::Json => format!("{}\n", display::format_fields_json(&fields)),
            }
        }
    };

    print!("{text}");
    if let Some(path) = &cli.output {
        write_output_file(path, &text)?;
    }

    Ok(())
}
