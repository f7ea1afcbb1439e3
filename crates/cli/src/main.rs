//! docgen CLI
//!
//! Command-line interface for validating SDK example metadata and building
//! the documentation inputs derived from it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use docgen_checkin::{progress_report, run_checks, write_csv, CheckinConfig};
use docgen_generator::{write_json, ReadmeGenerator};
use docgen_metadata::{DocGen, DocGenLayout, ValidationOptions};
use docgen_snippets::{find_snippets, write_snippets, ScanOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "docgen")]
#[command(version, about = "Validate SDK example metadata and build documentation inputs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate metadata, snippets and their cross references
    #[command(after_help = "EXAMPLES:\n  \
        # Validate the repository in the current directory\n  \
        docgen validate\n\n  \
        # Fail on unused snippets too, and export the model\n  \
        docgen validate --root ./aws-doc-sdk-examples --strict --write-json model.json")]
    Validate {
        /// Repository root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Write the resolved model as JSON
        #[arg(long)]
        write_json: Option<PathBuf>,
    },

    /// Extract tagged snippets into one file per snippet
    #[command(after_help = "EXAMPLES:\n  \
        docgen snippets --root . --output ./.snippets")]
    Snippets {
        /// Repository root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "./.snippets")]
        output: PathBuf,
    },

    /// Render per-service README listings for one SDK version
    #[command(after_help = "EXAMPLES:\n  \
        # Every service with Python v3 examples\n  \
        docgen readme --language Python --sdk-version 3\n\n  \
        # Only S3 and SQS\n  \
        docgen readme \\\n    \
        --language Python \\\n    \
        --sdk-version 3 \\\n    \
        --services s3,sqs \\\n    \
        --output ./readmes")]
    Readme {
        /// Repository root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// SDK language name as declared in sdks.yaml (e.g., "Python")
        #[arg(short, long)]
        language: String,

        /// SDK major version
        #[arg(long)]
        sdk_version: u32,

        /// Comma-separated list of service ids (all services with examples if not specified)
        #[arg(long, value_delimiter = ',')]
        services: Option<Vec<String>>,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },

    /// Check files for secrets, denied words and broken snippet markers
    #[command(after_help = "EXAMPLES:\n  \
        docgen lint --root .\n\n  \
        # Custom deny list and size limit\n  \
        docgen lint --root . --config checkin.yaml")]
    Lint {
        /// Repository root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Lint configuration YAML (built-in defaults if not specified)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Report how many source files are free of legacy metadata comments
    #[command(after_help = "EXAMPLES:\n  \
        docgen progress --root . --output progress.csv --depth 1")]
    Progress {
        /// Repository root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// CSV output path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of leading directories that form a group
        #[arg(long, default_value_t = 1)]
        depth: usize,

        /// Lint configuration YAML, for ignored directories and extensions
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::Validate {
            root,
            strict,
            write_json,
        } => validate_command(&root, strict, write_json.as_deref(), cli.verbose),
        Commands::Snippets { root, output } => snippets_command(&root, &output),
        Commands::Readme {
            root,
            language,
            sdk_version,
            services,
            output,
        } => readme_command(&root, &language, sdk_version, services.as_deref(), &output),
        Commands::Lint { root, config } => lint_command(&root, config.as_deref()),
        Commands::Progress {
            root,
            output,
            depth,
            config,
        } => progress_command(&root, &output, depth, config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<CheckinConfig> {
    match path {
        Some(path) => CheckinConfig::load(path)
            .with_context(|| format!("Failed to load lint config {}", path.display())),
        None => Ok(CheckinConfig::default()),
    }
}

fn load_doc_gen(root: &Path, strict: bool) -> Result<(DocGen, docgen_metadata::ValidationReport)> {
    println!("{} Loading metadata from: {}", "→".cyan(), root.display());
    let options = ValidationOptions {
        strict,
        ..Default::default()
    };
    DocGen::load(DocGenLayout::new(root), &options).context("Failed to load metadata")
}

fn validate_command(root: &Path, strict: bool, json: Option<&Path>, verbose: bool) -> Result<()> {
    let (doc_gen, report) = load_doc_gen(root, strict)?;

    println!(
        "{} Loaded {} SDKs, {} services, {} examples, {} snippets",
        "✓".green(),
        doc_gen.sdks.len(),
        doc_gen.services.len(),
        doc_gen.examples.len(),
        doc_gen.snippets.snippets.len()
    );

    if verbose {
        for (name, sdk) in &doc_gen.sdks {
            let versions: Vec<String> = sdk.versions.iter().map(|v| v.version.to_string()).collect();
            println!("  • {} (v{})", name.cyan(), versions.join(", v"));
        }
    }

    for warning in &report.warnings {
        println!("{} {}", "!".yellow(), warning);
    }
    for error in &report.errors {
        println!("{} {}", "✗".red(), error);
    }

    if let Some(path) = json {
        write_json(&doc_gen, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} Wrote model to {}", "✓".green(), path.display());
    }

    if !report.is_ok() {
        anyhow::bail!("Validation found {} errors", report.errors.len());
    }

    println!(
        "\n{}",
        format!("✓ Validation passed with {} warnings", report.warnings.len())
            .green()
            .bold()
    );
    Ok(())
}

fn snippets_command(root: &Path, output: &Path) -> Result<()> {
    println!("{} Scanning for snippets: {}", "→".cyan(), root.display());
    let (index, errors) = find_snippets(root, &ScanOptions::default());

    if !errors.is_empty() {
        for error in &errors {
            println!("{} {}", "✗".red(), error);
        }
        anyhow::bail!("Snippet scan found {} errors", errors.len());
    }

    let written = write_snippets(&index, output)
        .with_context(|| format!("Failed to write snippets to {}", output.display()))?;

    println!(
        "\n{}",
        format!("✓ Wrote {} snippets to {}", written.len(), output.display())
            .green()
            .bold()
    );
    Ok(())
}

fn readme_command(
    root: &Path,
    language: &str,
    sdk_version: u32,
    services: Option<&[String]>,
    output: &Path,
) -> Result<()> {
    let (doc_gen, report) = load_doc_gen(root, false)?;
    if !report.is_ok() {
        for error in &report.errors {
            println!("{} {}", "✗".red(), error);
        }
        anyhow::bail!(
            "Metadata has {} errors; run `docgen validate` first",
            report.errors.len()
        );
    }

    println!(
        "{} Rendering READMEs for {} v{}",
        "→".cyan(),
        language.yellow(),
        sdk_version
    );
    let generator = ReadmeGenerator::new(&doc_gen).context("Failed to create generator")?;
    let written = generator
        .generate_to_directory(language, sdk_version, services, output)
        .context("Failed to generate READMEs")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for path in &written {
        println!("  📄 {}", path.display());
    }
    Ok(())
}

fn lint_command(root: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    debug!("Lint config: {:?}", config);

    println!("{} Checking files under: {}", "→".cyan(), root.display());
    let report = run_checks(root, &config).context("Failed to check files")?;

    for violation in &report.violations {
        println!("{} {}", "✗".red(), violation);
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} violations in {} files checked",
            report.violations.len(),
            report.files_checked
        );
    }

    println!(
        "\n{}",
        format!("✓ {} files checked, no violations", report.files_checked)
            .green()
            .bold()
    );
    Ok(())
}

fn progress_command(root: &Path, output: &Path, depth: usize, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;

    println!("{} Measuring cleanup progress: {}", "→".cyan(), root.display());
    let report = progress_report(root, depth, &config).context("Failed to build progress report")?;

    for group in &report.groups {
        println!(
            "  {:<40} {:>5} / {:<5} {:>5.1}%",
            group.group,
            group.clean,
            group.total,
            group.percent_clean()
        );
    }

    write_csv(&report, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let totals = report.totals();
    println!(
        "\n{}",
        format!(
            "✓ {} of {} files clean ({:.1}%), written to {}",
            totals.clean,
            totals.total,
            totals.percent_clean(),
            output.display()
        )
        .green()
        .bold()
    );
    Ok(())
}
