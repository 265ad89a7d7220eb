//! setup-order core library - statement order checking and fixing for Vue `<script setup>`

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Analysis is strictly per script unit
// - No global mutable state
// - Canonical order is Import < Declaration < Function < Lifecycle
// - A fix never moves unclassified statements and never overlaps itself
// - Identical input yields byte-for-byte identical output

pub mod analysis;
pub mod ast;
pub mod classify;
pub mod comments;
pub mod config;
pub mod fix;
pub mod language;
pub mod order;
pub mod parser;
pub mod report;
pub mod sfc;

pub use analysis::{fix_source, lint_file, lint_source};
pub use classify::Category;
pub use config::ResolvedConfig;
pub use fix::{apply_fixes, Fix, Spacing, TextEdit};
pub use report::{render_json, render_text, sort_reports, Diagnostic, FileReport, Severity};

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct LintOptions {
    /// Rewrite files in place
    pub fix: bool,
}

/// Lint every eligible file at `path` (a file or a directory)
///
/// Files that cannot be read or parsed are skipped with a warning.
pub fn lint_path(path: &Path, config: &ResolvedConfig, options: &LintOptions) -> Result<Vec<FileReport>> {
    let files: Vec<PathBuf> = collect_source_files(path)?
        .into_iter()
        .filter(|file| config.should_include(file))
        .collect();
    tracing::debug!(files = files.len(), "collected source files");

    let results: Vec<(PathBuf, Result<FileReport>)> = files
        .into_par_iter()
        .map(|file| {
            let result = analysis::lint_file(&file, config, options.fix);
            (file, result)
        })
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    let mut skipped_files: usize = 0;
    for (file, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::warn!("skipping file {}: {:#}", file.display(), e);
                skipped_files += 1;
            }
        }
    }
    if skipped_files > 0 {
        tracing::warn!("Skipped {} file(s) due to errors", skipped_files);
    }

    Ok(sort_reports(reports))
}

/// Check if a file is a supported source file
fn is_supported_source_file(path: &Path) -> bool {
    language::Language::from_path(path).is_some()
}

/// Collect all supported source files from a path (file or directory)
///
/// Supported extensions:
/// - Vue components: .vue
/// - TypeScript: .ts, .mts, .cts, .tsx (excludes .d.ts declaration files)
/// - JavaScript: .js, .mjs, .cjs, .jsx
fn collect_source_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_supported_source_file(path) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        collect_source_files_recursive(path, &mut files)?;
    } else {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    // Sort files for deterministic order
    files.sort();

    Ok(files)
}

/// Returns true for directory names that should not be traversed
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.')
        || name == "node_modules"
        || name == "dist"
        || name == "unpackage"
        || name == "uni_modules"
        || name == "coverage"
}

/// Process one directory entry, pushing source files or recursing into dirs
fn process_dir_entry(path: PathBuf, metadata: std::fs::Metadata, files: &mut Vec<PathBuf>) -> Result<()> {
    if metadata.is_symlink() {
        return Ok(());
    }

    if metadata.is_dir() {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if is_skipped_dir(name) {
                return Ok(());
            }
        }
        collect_source_files_recursive(&path, files)?;
    } else if metadata.is_file() && is_supported_source_file(&path) {
        files.push(path);
    }

    Ok(())
}

/// Recursively collect supported source files from a directory
fn collect_source_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry_result in
        std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry_result?;
        let path = entry.path();
        let metadata = std::fs::symlink_metadata(&path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
        process_dir_entry(path, metadata, files)?;
    }

    Ok(())
}
