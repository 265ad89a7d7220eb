//! TypeScript and JavaScript parser using SWC
//!
//! Global invariants enforced:
//! - Deterministic parsing order
//! - Comments are collected into the caller's store, never dropped

use crate::language::Language;
use anyhow::Result;
use swc_common::comments::Comments;
use swc_common::{sync::Lrc, FileName, SourceFile, SourceMap};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

/// Determine the parser syntax for an ECMAScript dialect
///
/// `Language::Vue` never reaches the parser directly; a script block carries
/// its own dialect. It is treated as plain JavaScript here.
fn syntax_for(language: Language) -> Syntax {
    if language.is_typescript() {
        Syntax::Typescript(swc_ecma_parser::TsSyntax {
            tsx: language.has_jsx(),
            decorators: false, // No experimental decorators
            dts: false,
            ..Default::default()
        })
    } else {
        Syntax::Es(swc_ecma_parser::EsSyntax {
            jsx: language.has_jsx(),
            decorators: false, // No experimental decorators
            ..Default::default()
        })
    }
}

/// Parse one script unit into an AST module
///
/// Comments encountered by the lexer are recorded in `comments` (when
/// given) so the AST adapter can attach them to statements afterwards.
///
/// Returns an error if parse errors occur.
pub fn parse_source(
    src: &str,
    source_map: &Lrc<SourceMap>,
    filename: &str,
    language: Language,
    comments: Option<&dyn Comments>,
) -> Result<Module> {
    let syntax = syntax_for(language);

    // Create SourceFile for the source code
    let source_file: Lrc<SourceFile> = source_map.new_source_file(
        FileName::Custom(filename.into()).into(),
        src.to_string(),
    );

    let input = StringInput::from(&*source_file);
    let lexer = Lexer::new(syntax, EsVersion::Es2022, input, comments);
    let mut parser = Parser::new_from(lexer);

    parser.parse_module().map_err(|e| {
        let error_msg = e.kind().msg();
        anyhow::anyhow!("Parse error: {}", error_msg)
            .context(format!("Failed to parse script in: {}", filename))
    })
}
