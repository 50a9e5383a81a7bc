//! Deterministic substitutions applied to every merged text
//!
//! The same list is spelled out to the model in the system message and
//! enforced locally afterwards, in order.

use std::sync::LazyLock;

use regex::Regex;

/// One dictation-to-drafting substitution
#[derive(Debug)]
pub struct SubstitutionRule {
    /// Instruction line sent to the model
    pub instruction: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl SubstitutionRule {
    fn new(instruction: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            instruction,
            pattern: Regex::new(pattern).expect("must be valid regex"),
            replacement,
        }
    }

    /// Replace every match; `$1`-style groups in the replacement are expanded
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }

    /// Whether `text` still contains this rule's trigger
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

static RULES: LazyLock<[SubstitutionRule; 5]> = LazyLock::new(|| {
    [
        SubstitutionRule::new(r#"Replace "oblique" with "/"."#, r"\boblique\b", "/"),
        // Also catches the British spelling and a standalone "Hon." so that
        // dotted tokens such as "hon.secretary@court.in" are left alone
        SubstitutionRule::new(
            r#"Replace "honorable" (case-insensitive) with "Hon'ble"."#,
            r"(?i)\bhon(?:ou?rable\b|\.(\s|$))",
            "Hon'ble${1}",
        ),
        SubstitutionRule::new(
            r#"Replace "under section" (case-insensitive) with "U/s"."#,
            r"(?i)\bunder\s+section\b",
            "U/s",
        ),
        SubstitutionRule::new(r#"Replace "Breaket open" with "("."#, r"\bBreaket open\b", "("),
        SubstitutionRule::new(r#"Replace "Breaket close" with ")"."#, r"\bBreaket close\b", ")"),
    ]
});

/// The ordered rule set
pub fn rules() -> &'static [SubstitutionRule] {
    RULES.as_slice()
}

/// Apply every rule, in order
pub fn apply_rules(text: &str) -> String {
    rules().iter().fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

/// Strip exactly one leading and one trailing double quote
///
/// Each side is handled independently and only once: `"""abc"""` becomes
/// `""abc""`.
pub fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Turn raw model output into merged text
///
/// Returns `None` when nothing but whitespace is left.
pub fn post_process(raw: &str) -> Option<String> {
    let merged = apply_rules(strip_quotes(raw.trim()));

    if merged.trim().is_empty() { None } else { Some(merged) }
}
