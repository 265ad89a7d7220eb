//! setup-order CLI - statement order linter for Vue `<script setup>` blocks

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use setup_order_core::config;
use setup_order_core::{lint_path, render_json, render_text, FileReport, LintOptions};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "setup-order")]
#[command(about = "Enforce import / declaration / function / lifecycle order in Vue <script setup>")]
#[command(version = env!("SETUP_ORDER_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log progress (info level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log debug details
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check statement order in .vue, .ts and .js files
    Check {
        /// Path to source file or directory
        path: PathBuf,

        /// Reorder statements in place
        #[arg(long)]
        fix: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only report errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Validate a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without linting
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    match cli.command {
        Commands::Check {
            path,
            fix,
            format,
            config: config_path,
            quiet,
        } => {
            if !path.exists() {
                anyhow::bail!("Path does not exist: {}", path.display());
            }

            let project_root = find_project_root(&path)?;
            let resolved_config = config::load_and_resolve(&project_root, config_path.as_deref())
                .context("failed to load configuration")?;
            if let Some(config_path) = &resolved_config.config_path {
                tracing::info!("Using config: {}", config_path.display());
            }

            let mut reports = lint_path(&path, &resolved_config, &LintOptions { fix })?;
            if quiet {
                drop_warnings(&mut reports);
            }

            match format {
                OutputFormat::Text => print!("{}", render_text(&reports)),
                OutputFormat::Json => println!("{}", render_json(&reports)),
            }

            let errors: usize = reports.iter().map(FileReport::error_count).sum();
            if errors > 0 {
                std::process::exit(1);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;

                println!("Configuration:");
                if let Some(ref p) = resolved.config_path {
                    println!("  Source: {}", p.display());
                } else {
                    println!("  Source: defaults (no config file found)");
                }
                println!();
                println!("Rule:");
                println!("  severity: {}", resolved.severity.as_str());
                println!();
                println!("Spacing (blank lines):");
                println!("  within_group: {}", resolved.spacing.within_group);
                println!("  between_groups: {}", resolved.spacing.between_groups);
                println!();
                println!("Filters:");
                println!(
                    "  include: {}",
                    if resolved.include.is_some() {
                        "custom patterns"
                    } else {
                        "all files"
                    }
                );
                println!(
                    "  exclude: active ({} patterns)",
                    if resolved.default_excludes {
                        "default"
                    } else {
                        "custom"
                    }
                );
            }
        },
    }

    Ok(())
}

/// Remove warning-severity diagnostics from every report
fn drop_warnings(reports: &mut [FileReport]) {
    for report in reports {
        report
            .diagnostics
            .retain(|d| d.severity == setup_order_core::Severity::Error);
    }
}

/// Find the project root by searching up for `package.json` or `.git`
///
/// Falls back to the starting directory when neither is found.
fn find_project_root(start_path: &Path) -> anyhow::Result<PathBuf> {
    let absolute = if start_path.is_relative() {
        std::env::current_dir()?.join(start_path)
    } else {
        start_path.to_path_buf()
    };
    let start = if absolute.is_file() {
        absolute
            .parent()
            .ok_or_else(|| anyhow::anyhow!("invalid file path"))?
            .to_path_buf()
    } else {
        absolute
    };

    let mut current = start.as_path();
    loop {
        if current.join("package.json").exists() || current.join(".git").exists() {
            return Ok(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Ok(start),
        }
    }
}
