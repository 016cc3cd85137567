//! Language definitions: tokenizer + theme + language configuration + completions.

use crate::error::LanguageError;
use gherkin_editor_highlight::{Token, TokenRuleSet};
use gherkin_editor_lang::{
    CommentConfig, CompletionCatalog, CompletionItem, CompletionRange, IndentDecision,
    IndentPolicy, Theme,
};
use std::sync::Arc;

/// Language identifier of the Gherkin definition.
pub const GHERKIN_LANGUAGE_ID: &str = "gherkin";
/// Theme identifier of the Gherkin definition.
pub const GHERKIN_THEME_ID: &str = "gherkin-theme";

/// Editor behavior settings installed with a language (comments + indentation).
#[derive(Debug, Clone, Default)]
pub struct LanguageConfiguration {
    /// Comment tokens.
    pub comments: CommentConfig,
    /// Auto-indent rules.
    pub indent: IndentPolicy,
}

/// Everything an editor needs to support one language, as a single registrable unit.
///
/// The parts are reference counted so a registry can install them as independent providers
/// without copying.
#[derive(Debug, Clone)]
pub struct LanguageDefinition {
    id: String,
    tokenizer: Arc<TokenRuleSet>,
    theme: Arc<Theme>,
    configuration: Arc<LanguageConfiguration>,
    completions: Arc<CompletionCatalog>,
}

impl LanguageDefinition {
    /// Compose a definition from its parts.
    pub fn new(
        id: impl Into<String>,
        tokenizer: TokenRuleSet,
        theme: Theme,
        configuration: LanguageConfiguration,
        completions: CompletionCatalog,
    ) -> Self {
        Self {
            id: id.into(),
            tokenizer: Arc::new(tokenizer),
            theme: Arc::new(theme),
            configuration: Arc::new(configuration),
            completions: Arc::new(completions),
        }
    }

    /// The Gherkin language.
    pub fn gherkin() -> Result<Self, LanguageError> {
        Ok(Self::new(
            GHERKIN_LANGUAGE_ID,
            TokenRuleSet::gherkin_default()?,
            Theme::gherkin_default(GHERKIN_THEME_ID),
            LanguageConfiguration {
                comments: CommentConfig::gherkin(),
                indent: IndentPolicy::gherkin_default()?,
            },
            CompletionCatalog::gherkin_default(),
        ))
    }

    /// Language identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Theme identifier.
    pub fn theme_id(&self) -> &str {
        self.theme.id()
    }

    /// Line tokenizer.
    pub fn tokenizer(&self) -> &Arc<TokenRuleSet> {
        &self.tokenizer
    }

    /// Tag-to-color theme.
    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    /// Comment + indentation configuration.
    pub fn configuration(&self) -> &Arc<LanguageConfiguration> {
        &self.configuration
    }

    /// Completion provider.
    pub fn completions(&self) -> &Arc<CompletionCatalog> {
        &self.completions
    }

    /// Tokenize one line.
    pub fn tokenize_line(&self, line: &str) -> Vec<Token> {
        self.tokenizer.tokenize_line(line)
    }

    /// Indentation hints for one line.
    pub fn indent(&self, line: &str) -> IndentDecision {
        self.configuration.indent.evaluate(line)
    }

    /// Completion items for the word range at the cursor.
    pub fn provide_completions(&self, range: CompletionRange) -> Vec<CompletionItem> {
        self.completions.provide(range)
    }
}
