//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::classify::Category;
use crate::fix::Fix;
use serde::{Deserialize, Serialize};

/// Name reported with every diagnostic
pub const RULE_NAME: &str = "script-setup-order";

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One ordering diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub rule: String,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

/// Lint result for one file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FileReport {
    pub file: String,
    pub diagnostics: Vec<Diagnostic>,
    /// The file was rewritten by `--fix`
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub fixed: bool,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.fix.is_some()).count()
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Sort diagnostics by position
pub fn sort_diagnostics(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.column.cmp(&b.column))
            .then_with(|| a.message.cmp(&b.message))
    });
    diagnostics
}

/// Sort file reports by path
pub fn sort_reports(mut reports: Vec<FileReport>) -> Vec<FileReport> {
    reports.sort_by(|a, b| a.file.cmp(&b.file));
    reports
}

/// Render reports as text output
///
/// Files without diagnostics are omitted; the summary line is always present.
pub fn render_text(reports: &[FileReport]) -> String {
    let mut output = String::new();
    let mut errors = 0;
    let mut warnings = 0;
    let mut fixable = 0;
    let mut fixed_files = 0;

    for report in reports {
        errors += report.error_count();
        warnings += report.warning_count();
        fixable += report.fixable_count();
        if report.fixed {
            fixed_files += 1;
        }
        if report.diagnostics.is_empty() {
            continue;
        }

        output.push_str(&format!("{}\n", report.file));
        for d in &report.diagnostics {
            let location = format!("{}:{}", d.line, d.column + 1);
            output.push_str(&format!(
                "  {:<8} {:<8} {:<40} {}\n",
                location,
                d.severity.as_str(),
                d.message,
                d.rule
            ));
        }
        output.push('\n');
    }

    let total = errors + warnings;
    if total == 0 {
        output.push_str("No ordering problems found");
    } else {
        output.push_str(&format!(
            "{} problem{} ({} error{}, {} warning{})",
            total,
            plural(total),
            errors,
            plural(errors),
            warnings,
            plural(warnings)
        ));
    }
    if fixed_files > 0 {
        output.push_str(&format!(", fixed {} file{}", fixed_files, plural(fixed_files)));
    }
    output.push('\n');
    if fixable > 0 {
        output.push_str(&format!(
            "{} problem{} potentially fixable with the `--fix` option\n",
            fixable,
            plural(fixable)
        ));
    }

    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[FileReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
