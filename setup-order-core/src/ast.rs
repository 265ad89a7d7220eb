//! AST adapter layer for top-level statements
//!
//! Turns an SWC module into the flat statement model the ordering core
//! works on. The core never sees SWC types; everything it needs (statement
//! shape, byte ranges, attached comments, source text) goes through the
//! `SourceModel` trait.
//!
//! Global invariants enforced:
//! - Statements are listed in source order
//! - Byte ranges are relative to the script unit text, not the file
//! - Only top-level statements are modelled

use crate::language::Language;
use crate::parser;
use anyhow::Result;
use std::ops::Range;
use swc_common::comments::{Comment, CommentKind, Comments, SingleThreadedComments};
use swc_common::{sync::Lrc, BytePos, SourceMap, Span, Spanned};
use swc_ecma_ast::{Callee, Decl, Expr, ModuleDecl, ModuleItem, Stmt};

/// Syntactic kind of a variable binding's initializer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    /// Arrow function or function expression
    FunctionLike,
    /// Any other expression
    Value,
    /// `let x;`
    Absent,
}

/// Syntactic shape of a top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Import,
    FunctionDecl,
    /// `var` / `let` / `const`; only the first binding's initializer is kept
    Variable { first_initializer: InitializerKind },
    /// Expression statement whose expression is a call.
    /// `callee` is set only when the callee is a plain identifier.
    Call { callee: Option<String> },
    Other,
}

/// One top-level statement of a script unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub range: Range<usize>,
}

impl Statement {
    pub fn new(kind: StatementKind, range: Range<usize>) -> Self {
        Statement { kind, range }
    }
}

/// Comment flavour, needed to keep `//` comments terminated after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Line,
    Block,
}

/// Byte range of one comment in the script unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRange {
    pub range: Range<usize>,
    pub style: CommentStyle,
}

/// Everything the ordering core consumes from a parsed script unit
pub trait SourceModel {
    /// Top-level statements in source order
    fn statements(&self) -> &[Statement];

    /// Comments directly before statement `index`, in source order
    fn leading_comments(&self, index: usize) -> &[CommentRange];

    /// Comments directly after statement `index` on its last line, in source order
    fn trailing_comments(&self, index: usize) -> &[CommentRange];

    /// Full text of the script unit
    fn text(&self) -> &str;

    /// Literal text of a byte range (empty if the range is out of bounds)
    fn slice(&self, range: Range<usize>) -> &str {
        self.text().get(range).unwrap_or("")
    }
}

/// Parsed script unit backed by SWC
#[derive(Debug, Clone)]
pub struct ScriptUnit {
    text: String,
    statements: Vec<Statement>,
    leading: Vec<Vec<CommentRange>>,
    trailing: Vec<Vec<CommentRange>>,
}

impl ScriptUnit {
    /// Parse `text` as one script unit of the given dialect
    pub fn parse(text: &str, filename: &str, language: Language) -> Result<Self> {
        let source_map: Lrc<SourceMap> = Default::default();
        let comments = SingleThreadedComments::default();
        let module = parser::parse_source(
            text,
            &source_map,
            filename,
            language,
            Some(&comments as &dyn Comments),
        )?;

        let offset = |pos: BytePos| source_map.lookup_byte_offset(pos).pos.0 as usize;
        let comment_ranges = |found: Option<Vec<Comment>>| -> Vec<CommentRange> {
            found
                .unwrap_or_default()
                .iter()
                .map(|c| CommentRange {
                    range: offset(c.span.lo)..offset(c.span.hi),
                    style: match c.kind {
                        CommentKind::Line => CommentStyle::Line,
                        CommentKind::Block => CommentStyle::Block,
                    },
                })
                .collect()
        };

        let items = collect_items(&module.body);

        let mut unit = ScriptUnit {
            text: text.to_string(),
            statements: Vec::with_capacity(items.len()),
            leading: Vec::with_capacity(items.len()),
            trailing: Vec::with_capacity(items.len()),
        };
        for (kind, span) in items {
            unit.leading.push(comment_ranges(comments.get_leading(span.lo)));
            unit.trailing.push(comment_ranges(comments.get_trailing(span.hi)));
            unit.statements
                .push(Statement::new(kind, offset(span.lo)..offset(span.hi)));
        }

        Ok(unit)
    }
}

impl SourceModel for ScriptUnit {
    fn statements(&self) -> &[Statement] {
        &self.statements
    }

    fn leading_comments(&self, index: usize) -> &[CommentRange] {
        self.leading.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    fn trailing_comments(&self, index: usize) -> &[CommentRange] {
        self.trailing.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// Flatten module items into (kind, span) pairs
///
/// An empty statement that directly follows another statement (`function
/// f(){};`) is folded into it; any other empty statement is dropped.
fn collect_items(body: &[ModuleItem]) -> Vec<(StatementKind, Span)> {
    let mut items: Vec<(StatementKind, Span)> = Vec::with_capacity(body.len());
    for item in body {
        let span = item.span();
        if let ModuleItem::Stmt(Stmt::Empty(_)) = item {
            if let Some((_, prev)) = items.last_mut() {
                if prev.hi == span.lo {
                    prev.hi = span.hi;
                }
            }
            continue;
        }
        items.push((statement_kind(item), span));
    }
    items
}

fn statement_kind(item: &ModuleItem) -> StatementKind {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(_)) => StatementKind::Import,
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => decl_kind(&export.decl),
        ModuleItem::ModuleDecl(_) => StatementKind::Other,
        ModuleItem::Stmt(Stmt::Decl(decl)) => decl_kind(decl),
        ModuleItem::Stmt(Stmt::Expr(expr_stmt)) => match &*expr_stmt.expr {
            Expr::Call(call) => StatementKind::Call {
                callee: callee_name(&call.callee),
            },
            _ => StatementKind::Other,
        },
        ModuleItem::Stmt(_) => StatementKind::Other,
    }
}

fn decl_kind(decl: &Decl) -> StatementKind {
    match decl {
        Decl::Fn(_) => StatementKind::FunctionDecl,
        Decl::Var(var) => StatementKind::Variable {
            first_initializer: var
                .decls
                .first()
                .and_then(|d| d.init.as_deref())
                .map(initializer_kind)
                .unwrap_or(InitializerKind::Absent),
        },
        _ => StatementKind::Other,
    }
}

fn initializer_kind(expr: &Expr) -> InitializerKind {
    match expr {
        Expr::Arrow(_) | Expr::Fn(_) => InitializerKind::FunctionLike,
        Expr::Paren(paren) => initializer_kind(&paren.expr),
        Expr::TsAs(ts_as) => initializer_kind(&ts_as.expr),
        Expr::TsSatisfies(satisfies) => initializer_kind(&satisfies.expr),
        _ => InitializerKind::Value,
    }
}

fn callee_name(callee: &Callee) -> Option<String> {
    match callee {
        Callee::Expr(expr) => match &**expr {
            Expr::Ident(ident) => Some(ident.sym.to_string()),
            _ => None,
        },
        _ => None,
    }
}
