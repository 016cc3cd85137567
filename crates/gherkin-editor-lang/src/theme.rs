//! Tag-to-color theme mapping.

use crate::TokenTag;
use std::collections::BTreeMap;

/// A named color theme layered on a base theme.
///
/// Tags without an explicit color fall back to the base theme when `inherit` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    id: String,
    base: String,
    inherit: bool,
    colors: BTreeMap<TokenTag, String>,
}

impl Theme {
    /// Create an empty theme inheriting from `base`.
    pub fn new(id: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base: base.into(),
            inherit: true,
            colors: BTreeMap::new(),
        }
    }

    /// Set the foreground color (`#RRGGBB`) for a tag.
    pub fn with_color(mut self, tag: TokenTag, color: impl Into<String>) -> Self {
        self.colors.insert(tag, color.into());
        self
    }

    /// Disable fallback to the base theme.
    pub fn without_inherit(mut self) -> Self {
        self.inherit = false;
        self
    }

    /// Theme identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Base theme identifier.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether unmapped tags inherit from the base theme.
    pub fn inherits(&self) -> bool {
        self.inherit
    }

    /// Explicit color for `tag`, if any.
    pub fn color_for(&self, tag: TokenTag) -> Option<&str> {
        self.colors.get(&tag).map(String::as_str)
    }

    /// All explicit `(tag, color)` pairs, ordered by tag.
    pub fn colors(&self) -> impl Iterator<Item = (TokenTag, &str)> {
        self.colors.iter().map(|(t, c)| (*t, c.as_str()))
    }

    /// The Gherkin theme on top of the light `vs` base. `text` is left to the base theme.
    pub fn gherkin_default(id: impl Into<String>) -> Self {
        Self::new(id, "vs")
            .with_color(TokenTag::Keyword, "#0000FF")
            .with_color(TokenTag::String, "#A31515")
            .with_color(TokenTag::Comment, "#008000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gherkin_theme_colors() {
        let theme = Theme::gherkin_default("gherkin-theme");

        assert_eq!(theme.id(), "gherkin-theme");
        assert_eq!(theme.base(), "vs");
        assert!(theme.inherits());
        assert_eq!(theme.color_for(TokenTag::Comment), Some("#008000"));
        assert_eq!(theme.color_for(TokenTag::Text), None);
        assert_eq!(theme.colors().count(), 3);
    }
}
