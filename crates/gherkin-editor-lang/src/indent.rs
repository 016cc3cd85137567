//! Auto-indent hints.
//!
//! An [`IndentPolicy`] is an ordered list of [`IndentRule`]s. Each rule is matched against a
//! single line independently; the result only assists the editor's auto-indent and is never used
//! for validation.

use regex::Regex;

/// Pattern used by the Gherkin policy for both increase and decrease rules.
///
/// Both directions share this pattern, so a step line reports [`IndentDecision::BOTH`].
pub const GHERKIN_STEP_INDENT_PATTERN: &str = r"^(\s)*(Given|When|Then)";

/// Which way a matching line moves the indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentDirection {
    /// Indent the line after the matching line.
    Increase,
    /// Outdent the matching line itself.
    Decrease,
}

/// A single regex indentation rule.
#[derive(Debug, Clone)]
pub struct IndentRule {
    pattern: Regex,
    direction: IndentDirection,
}

impl IndentRule {
    /// Compile a rule from a regex pattern.
    pub fn new(pattern: &str, direction: IndentDirection) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            direction,
        })
    }

    /// Rule that indents the line after a match.
    pub fn increase(pattern: &str) -> Result<Self, regex::Error> {
        Self::new(pattern, IndentDirection::Increase)
    }

    /// Rule that outdents the matching line.
    pub fn decrease(pattern: &str) -> Result<Self, regex::Error> {
        Self::new(pattern, IndentDirection::Decrease)
    }

    /// Direction applied when the rule matches.
    pub fn direction(&self) -> IndentDirection {
        self.direction
    }

    /// The source regex pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns `true` if `line` matches the rule.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// The indentation effects recorded for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndentDecision {
    /// Some increase rule matched.
    pub increase: bool,
    /// Some decrease rule matched.
    pub decrease: bool,
}

impl IndentDecision {
    /// No rule matched.
    pub const NONE: Self = Self {
        increase: false,
        decrease: false,
    };

    /// Both an increase and a decrease rule matched.
    pub const BOTH: Self = Self {
        increase: true,
        decrease: true,
    };

    /// Returns `true` if no rule matched.
    pub fn is_noop(&self) -> bool {
        !self.increase && !self.decrease
    }

    /// Collapse the decision into a single level change (`-1`, `0` or `1`).
    ///
    /// A line that matched both directions nets out to `0`.
    pub fn net_delta(&self) -> i8 {
        i8::from(self.increase) - i8::from(self.decrease)
    }
}

/// Ordered indentation rules for a language.
#[derive(Debug, Clone, Default)]
pub struct IndentPolicy {
    rules: Vec<IndentRule>,
}

impl IndentPolicy {
    /// Create a policy from ordered rules.
    pub fn new(rules: Vec<IndentRule>) -> Self {
        Self { rules }
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[IndentRule] {
        &self.rules
    }

    /// Evaluate every rule against `line` and record all matching directions.
    pub fn evaluate(&self, line: &str) -> IndentDecision {
        let mut decision = IndentDecision::NONE;
        for rule in &self.rules {
            if !rule.matches(line) {
                continue;
            }
            match rule.direction {
                IndentDirection::Increase => decision.increase = true,
                IndentDirection::Decrease => decision.decrease = true,
            }
        }
        decision
    }

    /// The Gherkin policy: `Given`/`When`/`Then` lines trigger both increase and decrease.
    pub fn gherkin_default() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            IndentRule::increase(GHERKIN_STEP_INDENT_PATTERN)?,
            IndentRule::decrease(GHERKIN_STEP_INDENT_PATTERN)?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_lines_record_both_directions() {
        let policy = IndentPolicy::gherkin_default().unwrap();

        assert_eq!(policy.evaluate("Given a user"), IndentDecision::BOTH);
        assert_eq!(policy.evaluate("    When it runs"), IndentDecision::BOTH);
        assert_eq!(policy.evaluate("\tThen it passes"), IndentDecision::BOTH);
        assert_eq!(policy.evaluate("Given x").net_delta(), 0);
    }

    #[test]
    fn test_other_lines_are_noop() {
        let policy = IndentPolicy::gherkin_default().unwrap();

        for line in ["", "Feature: x", "  And more", "# Given in a comment"] {
            assert!(policy.evaluate(line).is_noop(), "{line:?}");
        }
    }

    #[test]
    fn test_distinct_rules_net_delta() {
        let policy = IndentPolicy::new(vec![
            IndentRule::increase(r"^\s*Scenario").unwrap(),
            IndentRule::decrease(r"^\s*Feature").unwrap(),
        ]);

        assert_eq!(policy.evaluate("Scenario: a").net_delta(), 1);
        assert_eq!(policy.evaluate("Feature: a").net_delta(), -1);
        assert_eq!(policy.rules()[0].direction(), IndentDirection::Increase);
    }
}
