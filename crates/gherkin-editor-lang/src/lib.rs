#![warn(missing_docs)]
//! `gherkin-editor-lang` - data-driven language configuration for the Gherkin editor.
//!
//! This crate stays lightweight and does **not** know about tokenizing engines, editor widgets,
//! or host applications. It provides the small structs a host installs alongside a tokenizer:
//!
//! - [`TokenTag`] - the semantic categories produced by the tokenizer
//! - [`CommentConfig`] - comment tokens (and line comment toggling)
//! - [`IndentPolicy`] - per-line auto-indent hints
//! - [`CompletionCatalog`] - the static completion list
//! - [`Theme`] - the tag-to-color mapping

pub mod completion;
pub mod indent;
pub mod theme;

pub use completion::{
    CompletionCatalog, CompletionEntry, CompletionItem, CompletionKind, CompletionRange,
};
pub use indent::{
    GHERKIN_STEP_INDENT_PATTERN, IndentDecision, IndentDirection, IndentPolicy, IndentRule,
};
pub use theme::Theme;

use serde::{Deserialize, Serialize};

/// Semantic category assigned to a span of text by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenTag {
    /// Structural keyword (`Feature`, `Scenario`, `Given`, ...).
    Keyword,
    /// Quoted string literal.
    String,
    /// Line comment, from the marker to end of line.
    Comment,
    /// Anything else.
    Text,
}

impl TokenTag {
    /// All tags, in a stable order.
    pub const ALL: [TokenTag; 4] = [
        TokenTag::Keyword,
        TokenTag::String,
        TokenTag::Comment,
        TokenTag::Text,
    ];

    /// The token name used by editor widgets (`"keyword"`, `"string"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenTag::Keyword => "keyword",
            TokenTag::String => "string",
            TokenTag::Comment => "comment",
            TokenTag::Text => "text",
        }
    }
}

/// Comment tokens/config for a given language.
///
/// Editor widgets use this for comment toggling. Gherkin only has line comments (`#`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `#`).
    pub line: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
        }
    }

    /// The Gherkin comment configuration (`#` line comments).
    pub fn gherkin() -> Self {
        Self::line("#")
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Toggle line comments on every line of `text`.
    ///
    /// If every non-blank line already starts (after its indentation) with the line token, the
    /// token and one following space are removed. Otherwise `"<token> "` is inserted after the
    /// indentation of each non-blank line. Blank lines are left untouched.
    ///
    /// Returns `None` when no line comment token is configured.
    pub fn toggle_line_comments(&self, text: &str) -> Option<String> {
        let token = self.line.as_deref().filter(|s| !s.is_empty())?;

        let lines: Vec<&str> = text.split('\n').collect();
        let mut non_blank = lines.iter().filter(|l| !l.trim().is_empty()).peekable();
        if non_blank.peek().is_none() {
            return Some(text.to_string());
        }
        let all_commented = non_blank.all(|l| l.trim_start().starts_with(token));

        let toggled: Vec<String> = lines
            .iter()
            .map(|line| {
                if line.trim().is_empty() {
                    return (*line).to_string();
                }
                let body = line.trim_start();
                let indent = &line[..line.len() - body.len()];
                if all_commented {
                    let rest = &body[token.len()..];
                    let rest = rest.strip_prefix(' ').unwrap_or(rest);
                    format!("{indent}{rest}")
                } else {
                    format!("{indent}{token} {body}")
                }
            })
            .collect();

        Some(toggled.join("\n"))
    }
}
