//! Language detection for lintable files
//!
//! A `.vue` single-file component is only eligible through its
//! `<script setup>` block; plain ECMAScript files are one script unit each.

pub mod span;

use std::path::Path;

pub use span::{LineIndex, SourceSpan};

/// Supported file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Vue single-file component (.vue)
    Vue,
    /// TypeScript (.ts, .mts, .cts)
    TypeScript,
    /// TypeScript with JSX (.tsx, .mtsx, .ctsx)
    TypeScriptReact,
    /// JavaScript (.js, .mjs, .cjs)
    JavaScript,
    /// JavaScript with JSX (.jsx, .mjsx, .cjsx)
    JavaScriptReact,
}

impl Language {
    /// Detect language from file extension
    ///
    /// Returns `None` if the extension is not recognized.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "vue" => Some(Language::Vue),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" | "mtsx" | "ctsx" => Some(Language::TypeScriptReact),
            "js" | "mjs" | "cjs" => Some(Language::JavaScript),
            "jsx" | "mjsx" | "cjsx" => Some(Language::JavaScriptReact),
            _ => None,
        }
    }

    /// Detect language from file path
    ///
    /// TypeScript declaration files (`.d.ts`) are never eligible.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".d.ts") {
            return None;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Dialect selected by a Vue `<script lang="...">` attribute
    ///
    /// A missing or unknown `lang` falls back to plain JavaScript, which is
    /// what the Vue compiler does.
    pub fn from_script_lang(lang: Option<&str>) -> Self {
        match lang.map(str::trim) {
            Some("ts") | Some("typescript") => Language::TypeScript,
            Some("tsx") => Language::TypeScriptReact,
            Some("jsx") => Language::JavaScriptReact,
            _ => Language::JavaScript,
        }
    }

    /// Get the canonical name of the language
    pub fn name(&self) -> &'static str {
        match self {
            Language::Vue => "Vue",
            Language::TypeScript => "TypeScript",
            Language::TypeScriptReact => "TypeScript React",
            Language::JavaScript => "JavaScript",
            Language::JavaScriptReact => "JavaScript React",
        }
    }

    /// Check if this is a TypeScript variant
    pub fn is_typescript(&self) -> bool {
        matches!(self, Language::TypeScript | Language::TypeScriptReact)
    }

    /// Check if this dialect accepts JSX
    pub fn has_jsx(&self) -> bool {
        matches!(self, Language::TypeScriptReact | Language::JavaScriptReact)
    }
}
