//! Form Schema CLI
//!
//! Command-line interface for compiling, checking, merging, and translating
//! form schemas.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use form_schema::{
    compile, from_standard, load_schema, merge, to_standard, validate, AdapterOptions,
    CompileOptions, Severity,
};

#[derive(Parser)]
#[command(name = "form-schema")]
#[command(about = "Compile and translate declarative form schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema into a flat field map
    Compile {
        /// Schema file to compile
        schema: PathBuf,

        /// Default decorator for non-void fields
        #[arg(long, default_value = "FormItem")]
        decorator: String,

        /// Fallback component for unknown types
        #[arg(long, default_value = "Input")]
        fallback: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check a schema for structural problems
    Check {
        /// Schema file to check
        schema: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show errors in text output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Import a standard JSON Schema into the form dialect
    Import {
        /// Standard JSON Schema file
        schema: PathBuf,

        /// Emit oneOf branches instead of reactions for if/then/else
        #[arg(long)]
        one_of: bool,

        /// Derive titles from property keys when no title is present
        #[arg(long)]
        humanize: bool,

        /// Mirror descriptions into placeholder hints
        #[arg(long)]
        placeholder: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export a form schema as a standard JSON Schema
    Export {
        /// Form schema file
        schema: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Merge overlay schemas onto a base schema, left to right
    Merge {
        /// Base schema file
        base: PathBuf,

        /// Overlay schema files, applied in order
        #[arg(required = true)]
        overlays: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            schema,
            decorator,
            fallback,
            output,
            pretty,
        } => run_compile(&schema, &decorator, &fallback, output, pretty),

        Commands::Check {
            schema,
            format,
            strict,
            quiet,
        } => run_check(&schema, &format, strict, quiet),

        Commands::Import {
            schema,
            one_of,
            humanize,
            placeholder,
            output,
            pretty,
        } => run_import(&schema, one_of, humanize, placeholder, output, pretty),

        Commands::Export {
            schema,
            output,
            pretty,
        } => run_export(&schema, output, pretty),

        Commands::Merge {
            base,
            overlays,
            output,
            pretty,
        } => run_merge(&base, &overlays, output, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn load(path: &Path) -> Result<serde_json::Value, u8> {
    load_schema(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn emit<T: serde::Serialize>(value: &T, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let json_output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_compile(
    schema_path: &Path,
    decorator: &str,
    fallback: &str,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let schema = load(schema_path)?;
    let options = CompileOptions::default()
        .decorator(decorator)
        .fallback(fallback);

    let compiled = compile(&schema, &options);
    emit(&compiled, output, pretty)
}

fn run_check(schema_path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    let schema = load(schema_path)?;
    let report = validate(&schema);

    if format == "json" {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return Err(2);
            }
        }
    } else {
        let shown: Vec<_> = if quiet {
            report.errors.iter().collect()
        } else {
            report.errors.iter().chain(report.warnings.iter()).collect()
        };
        for diag in shown {
            let (color, label) = match diag.severity {
                Severity::Error => ("\x1b[31m", "error"),
                Severity::Warning => ("\x1b[33m", "warning"),
            };
            let path = if diag.path.is_empty() {
                "(root)"
            } else {
                diag.path.as_str()
            };
            println!("  {}{}\x1b[0m: {} - {}", color, label, path, diag.message);
        }

        if report.valid && (!strict || report.warnings.is_empty()) {
            println!(
                "\x1b[32m✓ schema ok ({} warnings)\x1b[0m",
                report.warnings.len()
            );
        } else {
            println!(
                "\x1b[31m✗ {} errors, {} warnings\x1b[0m",
                report.errors.len(),
                report.warnings.len()
            );
        }
    }

    if report.valid && (!strict || report.warnings.is_empty()) {
        Ok(())
    } else {
        Err(1)
    }
}

fn run_import(
    schema_path: &Path,
    one_of: bool,
    humanize: bool,
    placeholder: bool,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let standard = load(schema_path)?;

    let mut options = AdapterOptions::new().placeholder_from_description(placeholder);
    if one_of {
        options = options.one_of_mode();
    }
    if humanize {
        options = options.humanize_labels();
    }

    let converted = from_standard(&standard, &options);
    emit(&converted, output, pretty)
}

fn run_export(schema_path: &Path, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let schema = load(schema_path)?;
    let standard = to_standard(&schema);
    emit(&standard, output, pretty)
}

fn run_merge(
    base_path: &Path,
    overlay_paths: &[PathBuf],
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let mut result = load(base_path)?;
    for overlay_path in overlay_paths {
        let overlay = load(overlay_path)?;
        result = merge(&result, &overlay);
    }
    emit(&result, output, pretty)
}
