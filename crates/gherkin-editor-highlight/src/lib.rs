//! `gherkin-editor-highlight` - regex line tokenizer for the Gherkin editor.
//!
//! Tokenization is lexical only: a [`TokenRuleSet`] walks a line once, trying its rules in
//! priority order at every position that is not yet covered. The first rule that matches *at*
//! the current position claims the matched span; characters no rule claims become
//! [`TokenTag::Text`]. Rule order is therefore part of the grammar.
//!
//! Every rule sees the whole line (matching starts at the scan position, but `^` and look-behind
//! context still refer to the raw line), so line-anchored rules only ever fire at column 0.

use gherkin_editor_lang::TokenTag;
use regex::Regex;

/// A single regex tokenizer rule.
#[derive(Debug, Clone)]
pub struct TokenRule {
    regex: Regex,
    tag: TokenTag,
    capture_group: Option<usize>,
}

impl TokenRule {
    pub fn new(pattern: &str, tag: TokenTag) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            tag,
            capture_group: None,
        })
    }

    /// Tag only a capture group of each match.
    ///
    /// The rest of the match is still consumed and emitted as [`TokenTag::Text`].
    ///
    /// Example (keyword after indentation):
    /// - pattern: `^\\s*(Given)\\b`
    /// - capture_group: `1` (the keyword)
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    pub fn tag(&self) -> TokenTag {
        self.tag
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// The leftmost usable match starting at or after `from`.
    ///
    /// Empty matches, and matches without the tagged group, are skipped.
    fn next_match(&self, line: &str, mut from: usize) -> Option<RuleMatch> {
        while from <= line.len() {
            let caps = self.regex.captures_at(line, from)?;
            let whole = caps.get(0)?;
            let tagged = match self.capture_group {
                Some(group) => caps.get(group),
                None => Some(whole),
            };
            match tagged {
                Some(tagged) if !whole.is_empty() => {
                    return Some(RuleMatch {
                        start: whole.start(),
                        tag_start: tagged.start(),
                        tag_end: tagged.end(),
                        end: whole.end(),
                        tag: self.tag,
                    });
                }
                _ => {
                    from = whole.start()
                        + line[whole.start()..]
                            .chars()
                            .next()
                            .map_or(1, char::len_utf8);
                }
            }
        }
        None
    }
}

/// A tagged span of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Start byte offset in the line.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Start column (chars).
    pub start_column: usize,
    /// End column (chars, exclusive).
    pub end_column: usize,
    /// Semantic tag.
    pub tag: TokenTag,
}

impl Token {
    /// The token's text within `line`.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Ordered tokenizer rules.
#[derive(Debug, Clone, Default)]
pub struct TokenRuleSet {
    rules: Vec<TokenRule>,
}

/// Structural keywords, in priority order. Longer keywords precede their prefixes.
pub const GHERKIN_KEYWORDS: [&str; 15] = [
    "Feature",
    "Background",
    "ScenarioOutline",
    "ScenarioTemplate",
    "Scenario Outline",
    "Scenario Template",
    "Scenario",
    "Examples",
    "Example",
    "Rule",
    "Given",
    "When",
    "Then",
    "And",
    "But",
];

impl TokenRuleSet {
    pub fn new(rules: Vec<TokenRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// Tokenize one line (without its line terminator).
    ///
    /// The returned tokens are contiguous and cover the whole line; adjacent text is merged.
    /// Each rule remembers its next match, so a line is scanned in linear time.
    pub fn tokenize_line(&self, line: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut ahead = vec![Lookahead::Unknown; self.rules.len()];
        let mut pos = 0;
        let mut col = 0;

        while pos < line.len() {
            for (rule, slot) in self.rules.iter().zip(ahead.iter_mut()) {
                let stale = match slot {
                    Lookahead::Unknown => true,
                    Lookahead::Found(m) => m.start < pos,
                    Lookahead::Exhausted => false,
                };
                if stale {
                    *slot = match rule.next_match(line, pos) {
                        Some(m) => Lookahead::Found(m),
                        None => Lookahead::Exhausted,
                    };
                }
            }

            let hit = ahead.iter().find_map(|slot| match slot {
                Lookahead::Found(m) if m.start == pos => Some(*m),
                _ => None,
            });
            let Some(m) = hit else {
                let next = ahead
                    .iter()
                    .filter_map(|slot| match slot {
                        Lookahead::Found(m) => Some(m.start),
                        _ => None,
                    })
                    .min()
                    .unwrap_or(line.len());
                col = push_token(&mut tokens, line, pos, next, col, TokenTag::Text);
                pos = next;
                continue;
            };

            col = push_token(&mut tokens, line, pos, m.tag_start, col, TokenTag::Text);
            col = push_token(&mut tokens, line, m.tag_start, m.tag_end, col, m.tag);
            col = push_token(&mut tokens, line, m.tag_end, m.end, col, TokenTag::Text);
            pos = m.end;
        }

        tokens
    }

    /// Tokenize a whole document, one token list per line (`\n` or `\r\n` terminated).
    pub fn tokenize_text(&self, text: &str) -> Vec<Vec<Token>> {
        text.split('\n')
            .map(|line| self.tokenize_line(line.strip_suffix('\r').unwrap_or(line)))
            .collect()
    }

    /// The Gherkin rules: line-anchored keywords, then quoted strings, then `#` comments.
    pub fn gherkin_default() -> Result<Self, regex::Error> {
        let mut rules = Vec::with_capacity(GHERKIN_KEYWORDS.len() + 3);
        for keyword in GHERKIN_KEYWORDS {
            let pattern = format!(r"^\s*({})\b", regex::escape(keyword));
            rules.push(TokenRule::new(&pattern, TokenTag::Keyword)?.with_capture_group(1));
        }
        // Quoted strings never cross the line end.
        rules.push(TokenRule::new(r"'[^'\r\n]+'", TokenTag::String)?);
        rules.push(TokenRule::new(r#""[^"\r\n]+""#, TokenTag::String)?);
        rules.push(TokenRule::new(r"#.*", TokenTag::Comment)?);
        Ok(Self::new(rules))
    }
}

#[derive(Debug, Clone, Copy)]
struct RuleMatch {
    start: usize,
    tag_start: usize,
    tag_end: usize,
    end: usize,
    tag: TokenTag,
}

/// A rule's next match during one line scan.
#[derive(Debug, Clone, Copy)]
enum Lookahead {
    Unknown,
    Found(RuleMatch),
    Exhausted,
}

/// Append `start..end` (bytes) to `tokens`, merging with a preceding text token.
///
/// Returns the end column.
fn push_token(
    tokens: &mut Vec<Token>,
    line: &str,
    start: usize,
    end: usize,
    start_column: usize,
    tag: TokenTag,
) -> usize {
    if start >= end || end > line.len() {
        return start_column;
    }
    let end_column = start_column + line[start..end].chars().count();

    if let Some(last) = tokens.last_mut()
        && last.tag == TokenTag::Text
        && tag == TokenTag::Text
        && last.end == start
    {
        last.end = end;
        last.end_column = end_column;
        return end_column;
    }

    tokens.push(Token {
        start,
        end,
        start_column,
        end_column,
        tag,
    });
    end_column
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(set: &TokenRuleSet, line: &str) -> Vec<(String, TokenTag)> {
        set.tokenize_line(line)
            .iter()
            .map(|t| (t.text(line).to_string(), t.tag))
            .collect()
    }

    #[test]
    fn test_keyword_after_indentation() {
        let set = TokenRuleSet::gherkin_default().unwrap();
        assert_eq!(
            tags(&set, "  Given a precondition"),
            vec![
                ("  ".to_string(), TokenTag::Text),
                ("Given".to_string(), TokenTag::Keyword),
                (" a precondition".to_string(), TokenTag::Text),
            ]
        );
    }

    #[test]
    fn test_empty_and_plain_lines() {
        let set = TokenRuleSet::gherkin_default().unwrap();
        assert!(set.tokenize_line("").is_empty());

        let tokens = set.tokenize_line("just some words");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].tag, TokenTag::Text);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 15));
    }

    #[test]
    fn test_columns_count_chars() {
        let set = TokenRuleSet::gherkin_default().unwrap();
        let line = "Given 'café' # ü";
        let tokens = set.tokenize_line(line);

        let string = tokens.iter().find(|t| t.tag == TokenTag::String).unwrap();
        assert_eq!((string.start_column, string.end_column), (6, 12));
        assert_eq!(string.text(line), "'café'");

        let comment = tokens.last().unwrap();
        assert_eq!(comment.tag, TokenTag::Comment);
        assert_eq!(comment.end_column, line.chars().count());
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let set = TokenRuleSet::gherkin_default().unwrap();
        assert_eq!(
            tags(&set, "Scenarios are plural"),
            vec![("Scenarios are plural".to_string(), TokenTag::Text)]
        );
    }
}
