//! Analysis orchestration - ties together extraction, parsing, validation, and fixing

use crate::ast::{ScriptUnit, SourceModel};
use crate::classify::group;
use crate::config::ResolvedConfig;
use crate::fix::{apply_fixes, rewrite, Fix, Spacing};
use crate::language::{Language, LineIndex};
use crate::order::{validate, Violation};
use crate::report::{sort_diagnostics, Diagnostic, FileReport, RULE_NAME};
use crate::sfc;
use anyhow::{Context, Result};
use std::path::Path;

/// Outcome of checking one script unit
#[derive(Debug, Clone, Default)]
pub struct UnitCheck {
    pub violations: Vec<Violation>,
    /// Whole-unit reorder fix, absent when nothing moves or edits would overlap
    pub fix: Option<Fix>,
}

/// Validate one script unit and compute its fix
pub fn check_unit<M: SourceModel + ?Sized>(model: &M, spacing: Spacing) -> UnitCheck {
    let statements = model.statements();
    let groups = group(statements);
    let violations = validate(statements, &groups);
    let fix = if violations.is_empty() {
        None
    } else {
        rewrite(model, &groups, spacing)
    };

    tracing::debug!(
        statements = statements.len(),
        classified = groups.len(),
        violations = violations.len(),
        fixable = fix.is_some(),
        "checked script unit"
    );

    UnitCheck { violations, fix }
}

/// The lintable slice of a file: its text and where it starts in the file
struct UnitSource<'a> {
    offset: usize,
    text: &'a str,
    language: Language,
}

/// Locate the script unit of a file, if it has one
fn unit_source<'a>(source: &'a str, filename: &str) -> Result<Option<UnitSource<'a>>> {
    let language = Language::from_path(Path::new(filename))
        .ok_or_else(|| anyhow::anyhow!("Unsupported file type: {}", filename))?;

    if language != Language::Vue {
        return Ok(Some(UnitSource {
            offset: 0,
            text: source,
            language,
        }));
    }

    Ok(sfc::script_setup_block(source).map(|block| UnitSource {
        offset: block.offset,
        text: block.content,
        language: block.language(),
    }))
}

/// Lint one file's contents
///
/// `filename` selects the dialect by extension. Component files without a
/// `<script setup>` block yield no diagnostics. Positions and fixes refer to
/// the whole file.
pub fn lint_source(source: &str, filename: &str, config: &ResolvedConfig) -> Result<Vec<Diagnostic>> {
    let Some(unit) = unit_source(source, filename)? else {
        tracing::debug!(file = filename, "no <script setup> block");
        return Ok(Vec::new());
    };

    let script = ScriptUnit::parse(unit.text, filename, unit.language)?;
    let UnitCheck { violations, fix } = check_unit(&script, config.spacing);

    let fix = fix.filter(|f| {
        let sound = fix_is_sound(unit.text, f, filename, unit.language);
        if !sound {
            tracing::warn!(file = filename, "reordered script does not verify; fix withheld");
        }
        sound
    });

    let lines = LineIndex::new(source);
    let statements = script.statements();
    let mut fix = fix.map(|f| f.shifted(unit.offset));

    let diagnostics = violations
        .into_iter()
        .map(|v| {
            let range = &statements[v.statement].range;
            let span = lines.span(range.start + unit.offset..range.end + unit.offset);
            Diagnostic {
                file: filename.to_string(),
                line: span.start_line,
                column: span.start_col,
                end_line: span.end_line,
                rule: RULE_NAME.to_string(),
                severity: config.severity,
                category: v.category,
                message: v.message,
                // One fix per unit, carried by its first diagnostic
                fix: fix.take(),
            }
        })
        .collect();

    Ok(sort_diagnostics(diagnostics))
}

/// A fix is kept only if the rewritten unit parses and is in canonical order
fn fix_is_sound(text: &str, fix: &Fix, filename: &str, language: Language) -> bool {
    let Some(fixed) = apply_fixes(text, std::slice::from_ref(fix)) else {
        return false;
    };
    match ScriptUnit::parse(&fixed, filename, language) {
        Ok(unit) => {
            let statements = unit.statements();
            validate(statements, &group(statements)).is_empty()
        }
        Err(e) => {
            tracing::debug!("reordered script failed to parse: {:#}", e);
            false
        }
    }
}

/// Return `source` with every available fix applied
///
/// Returns the input unchanged when there is nothing to fix or the fixes no
/// longer apply.
pub fn fix_source(source: &str, filename: &str, config: &ResolvedConfig) -> Result<String> {
    let diagnostics = lint_source(source, filename, config)?;
    let fixes: Vec<Fix> = diagnostics.into_iter().filter_map(|d| d.fix).collect();
    if fixes.is_empty() {
        return Ok(source.to_string());
    }

    match apply_fixes(source, &fixes) {
        Some(fixed) => Ok(fixed),
        None => {
            tracing::warn!(file = filename, "fix edits do not apply; file left unchanged");
            Ok(source.to_string())
        }
    }
}

/// Lint a file on disk, optionally rewriting it in place
///
/// After a rewrite the file is linted again so the report reflects what is
/// left on disk.
pub fn lint_file(path: &Path, config: &ResolvedConfig, fix: bool) -> Result<FileReport> {
    let filename = path.to_string_lossy().to_string();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let diagnostics = lint_source(&source, &filename, config)?;
    if !fix || diagnostics.iter().all(|d| d.fix.is_none()) {
        return Ok(FileReport {
            file: filename,
            diagnostics,
            fixed: false,
        });
    }

    let fixes: Vec<Fix> = diagnostics.iter().filter_map(|d| d.fix.clone()).collect();
    let Some(fixed) = apply_fixes(&source, &fixes) else {
        tracing::warn!(file = %filename, "fix edits do not apply; file left unchanged");
        return Ok(FileReport {
            file: filename,
            diagnostics,
            fixed: false,
        });
    };

    std::fs::write(path, &fixed)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    tracing::info!(file = %filename, "reordered script setup statements");

    let remaining = lint_source(&fixed, &filename, config)?;
    Ok(FileReport {
        file: filename,
        diagnostics: remaining,
        fixed: true,
    })
}
