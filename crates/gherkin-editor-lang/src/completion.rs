//! Static completion catalog.
//!
//! The catalog does not look at the document: every request returns the full entry list. The
//! insertion range (the word around the cursor) is computed by the editor widget and passed in;
//! prefix filtering is also left to the widget.
//!
//! Items serialize to the LSP/Monaco `CompletionItem` shape (`label`, `kind`, `insertText`,
//! `range`), with `kind` encoded as the LSP `CompletionItemKind` number.

use serde::{Serialize, Serializer};

/// Kind of a completion entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    /// A language keyword.
    Keyword,
    /// A multi-token template.
    Snippet,
}

impl CompletionKind {
    /// The LSP `CompletionItemKind` value.
    pub fn lsp_kind(&self) -> u32 {
        match self {
            CompletionKind::Keyword => 14,
            CompletionKind::Snippet => 15,
        }
    }
}

impl Serialize for CompletionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.lsp_kind())
    }
}

/// Word range at the cursor, in the editor widget's coordinates (1-based lines/columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRange {
    /// First line of the range.
    pub start_line_number: u32,
    /// Last line of the range.
    pub end_line_number: u32,
    /// Start column (inclusive).
    pub start_column: u32,
    /// End column (exclusive).
    pub end_column: u32,
}

impl CompletionRange {
    /// A single-line range covering `start_column..end_column` on `line`.
    pub fn word(line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            start_line_number: line,
            end_line_number: line,
            start_column,
            end_column,
        }
    }
}

/// A static catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    /// Text shown in the suggestion list.
    pub label: String,
    /// Entry kind.
    pub kind: CompletionKind,
    /// Literal text inserted at the cursor (may span lines).
    pub insert_text: String,
}

impl CompletionEntry {
    /// A keyword entry inserting `"<label> "`.
    pub fn keyword(label: &str) -> Self {
        Self {
            label: label.to_string(),
            kind: CompletionKind::Keyword,
            insert_text: format!("{label} "),
        }
    }

    /// A snippet entry inserting `insert_text` verbatim.
    pub fn snippet(label: impl Into<String>, insert_text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: CompletionKind::Snippet,
            insert_text: insert_text.into(),
        }
    }
}

/// A catalog entry bound to the range it replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    #[serde(flatten)]
    /// The catalog entry.
    pub entry: CompletionEntry,
    /// Range replaced when the item is accepted.
    pub range: CompletionRange,
}

/// Keyword entries of the Gherkin catalog, in presentation order.
pub const GHERKIN_KEYWORDS: [&str; 12] = [
    "Feature",
    "Background",
    "Scenario",
    "ScenarioOutline",
    "ScenarioTemplate",
    "Examples",
    "Rule",
    "Given",
    "When",
    "Then",
    "And",
    "But",
];

/// Insert text of the Gherkin `Datatable` snippet.
pub const DATATABLE_SNIPPET: &str =
    "Examples:\n    | column | column |\n    |    x   |    x   |\n    |    x   |    x   |";

/// The static completion list for a language.
#[derive(Debug, Clone, Default)]
pub struct CompletionCatalog {
    entries: Vec<CompletionEntry>,
}

impl CompletionCatalog {
    /// Create a catalog from entries (order is preserved in results).
    pub fn new(entries: Vec<CompletionEntry>) -> Self {
        Self { entries }
    }

    /// All entries.
    pub fn entries(&self) -> &[CompletionEntry] {
        &self.entries
    }

    /// Look an entry up by label.
    pub fn find(&self, label: &str) -> Option<&CompletionEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Return every entry bound to `range`.
    pub fn provide(&self, range: CompletionRange) -> Vec<CompletionItem> {
        self.entries
            .iter()
            .cloned()
            .map(|entry| CompletionItem { entry, range })
            .collect()
    }

    /// The Gherkin catalog: the structural keywords plus a `Datatable` snippet.
    pub fn gherkin_default() -> Self {
        let mut entries: Vec<CompletionEntry> = GHERKIN_KEYWORDS
            .iter()
            .map(|k| CompletionEntry::keyword(k))
            .collect();
        entries.push(CompletionEntry::snippet("Datatable", DATATABLE_SNIPPET));
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provide_returns_full_list_for_any_range() {
        let catalog = CompletionCatalog::gherkin_default();

        let a = catalog.provide(CompletionRange::word(1, 1, 1));
        let b = catalog.provide(CompletionRange::word(40, 5, 9));

        assert_eq!(a.len(), 13);
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(&b).all(|(x, y)| x.entry == y.entry));
        assert!(b.iter().all(|i| i.range == CompletionRange::word(40, 5, 9)));
    }

    #[test]
    fn test_keyword_entries_insert_trailing_space() {
        let catalog = CompletionCatalog::gherkin_default();
        let given = catalog.find("Given").unwrap();

        assert_eq!(given.kind, CompletionKind::Keyword);
        assert_eq!(given.insert_text, "Given ");
    }

    #[test]
    fn test_datatable_is_multiline_snippet() {
        let catalog = CompletionCatalog::gherkin_default();
        let table = catalog.entries().last().unwrap();

        assert_eq!(table.label, "Datatable");
        assert_eq!(table.kind, CompletionKind::Snippet);
        assert_eq!(table.insert_text.lines().count(), 4);
    }
}
