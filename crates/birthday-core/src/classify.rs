//! Date-heading classification heuristics.
//!
//! Four rules are evaluated in precedence order with first-match-wins
//! semantics; a line matching none of them is a name line. Each rule is a
//! pure extractor: given a line it either produces the date label or passes.

use crate::extract::Line;
use regex::Regex;
use std::sync::LazyLock;

/// Full English month names.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Standard month abbreviations (lowercase). "sept" is listed before "sep" so
/// the regex alternation prefers the longer form.
pub const MONTH_ABBREVS: [&str; 13] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sept", "sep", "oct", "nov", "dec",
];

fn month_alternation() -> String {
    let mut alts: Vec<&str> = MONTH_NAMES.to_vec();
    alts.extend(MONTH_ABBREVS);
    alts.join("|")
}

/// Entire line is "Month day" with an optional year, optionally wrapped in
/// emphasis markers.
static RE_STRICT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\**\s*(?:{})\s+\d{{1,2}}(?:\s*[,.]?\s*\d{{4}})?\s*\**$",
        month_alternation()
    ))
    .expect("regex is compile-time constant")
});

/// Line starts with "Month day" (1-2 digit day), trailing content allowed.
/// The `(?:\D|$)` guard keeps a longer number from passing as a day.
static RE_PREFIX_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\**\s*((?:{})\s+\d{{1,2}})(?:\D|$)",
        month_alternation()
    ))
    .expect("regex is compile-time constant")
});

/// Classification outcome for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// A date heading with its extracted label. The label can be empty for a
    /// bold line that strips to nothing; the grouper discards such labels
    /// without closing the current group.
    Date(String),
    /// A name belonging to the most recently opened group.
    Name,
}

type DateExtractor = fn(&Line) -> Option<String>;

/// Ordered date-heading rules, first match wins. The names appear in the
/// diagnostic log.
pub(crate) const DATE_RULES: [(&str, DateExtractor); 4] = [
    ("bold-led", bold_led_label),
    ("strict-month-day", strict_date_label),
    ("prefix-month-day", prefix_date_label),
    ("token-pair", token_pair_label),
];

/// Classify one line as a date heading or a name.
#[must_use]
pub fn classify_line(line: &Line) -> LineClass {
    matched_rule(line).map_or(LineClass::Name, |(_, label)| LineClass::Date(label))
}

/// First matching rule and the label it extracts, or `None` for a name line.
pub(crate) fn matched_rule(line: &Line) -> Option<(&'static str, String)> {
    DATE_RULES
        .iter()
        .find_map(|&(name, rule)| rule(line).map(|label| (name, label)))
}

/// Strip surrounding emphasis markers (asterisks used as bold markup) and
/// whitespace.
fn strip_emphasis(text: &str) -> &str {
    text.trim_matches(|c: char| c == '*' || c.is_whitespace())
}

/// Rule 1: the leading run is bold, or its bold state is unset and inherits
/// from the style. The label may strip to empty (e.g. a line of asterisks).
fn bold_led_label(line: &Line) -> Option<String> {
    line.leading_run_bold
        .counts_as_bold()
        .then(|| strip_emphasis(&line.normalized_text).to_string())
}

/// Rule 2: the whole line is a month-day(-year) date.
fn strict_date_label(line: &Line) -> Option<String> {
    RE_STRICT_DATE
        .is_match(&line.normalized_text)
        .then(|| strip_emphasis(&line.normalized_text).to_string())
}

/// Rule 3: the line begins with month-day; trailing garbage the normalizer
/// missed does not disqualify it.
fn prefix_date_label(line: &Line) -> Option<String> {
    RE_PREFIX_DATE
        .captures(&line.normalized_text)
        .map(|caps| strip_emphasis(&caps[1]).to_string())
}

/// Rule 4: tokenize on whitespace after replacing non-alphanumerics with
/// spaces; month token followed by a 1-2 digit token. Original casing of the
/// two tokens is preserved in the label.
fn token_pair_label(line: &Line) -> Option<String> {
    let sanitized: String = line
        .normalized_text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens = sanitized.split_whitespace();
    let first = tokens.next()?;
    let second = tokens.next()?;

    if !is_month_token(first) {
        return None;
    }
    if second.is_empty() || second.len() > 2 || !second.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{first} {second}"))
}

fn is_month_token(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    MONTH_ABBREVS.contains(&lower.as_str())
        || MONTH_NAMES.iter().any(|m| m.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BoldState;

    fn plain(text: &str) -> Line {
        Line::new(text, BoldState::NotBold)
    }

    fn bold(text: &str) -> Line {
        Line::new(text, BoldState::Bold)
    }

    fn expect_date(line: &Line, label: &str) {
        assert_eq!(classify_line(line), LineClass::Date(label.to_string()));
    }

    #[test]
    fn test_bold_line_is_always_a_date() {
        expect_date(&bold("September 8"), "September 8");
        expect_date(&bold("Team Events"), "Team Events");
    }

    #[test]
    fn test_inherited_bold_counts_as_bold() {
        let line = Line::new("Anything at all", BoldState::Inherited);
        expect_date(&line, "Anything at all");
    }

    #[test]
    fn test_bold_label_strips_emphasis_markers() {
        expect_date(&bold("**September 8**"), "September 8");
        let LineClass::Date(label) = classify_line(&bold("*** March 14 ***")) else {
            panic!("expected date");
        };
        assert!(!label.contains('*'));
        assert_eq!(label, "March 14");
    }

    #[test]
    fn test_bold_all_asterisks_yields_empty_label() {
        assert_eq!(classify_line(&bold("***")), LineClass::Date(String::new()));
    }

    #[test]
    fn test_strict_full_month() {
        expect_date(&plain("September 8"), "September 8");
        expect_date(&plain("september 8"), "september 8");
    }

    #[test]
    fn test_strict_abbreviated_month() {
        expect_date(&plain("Mar 2"), "Mar 2");
        expect_date(&plain("Sept 30"), "Sept 30");
    }

    #[test]
    fn test_strict_with_year() {
        expect_date(&plain("September 8, 1990"), "September 8, 1990");
        expect_date(&plain("Mar 2 2001"), "Mar 2 2001");
    }

    #[test]
    fn test_strict_with_emphasis_markers_but_plain_run() {
        expect_date(&plain("**September 8**"), "September 8");
    }

    #[test]
    fn test_prefix_survives_trailing_garbage() {
        expect_date(&plain("September 8 xyz"), "September 8");
        expect_date(&plain("July 4th"), "July 4");
    }

    #[test]
    fn test_prefix_rejects_three_digit_number() {
        assert_eq!(classify_line(&plain("September 123")), LineClass::Name);
    }

    #[test]
    fn test_token_pair_fallback() {
        // Punctuation between month and day defeats the regex rules; the
        // token fallback still catches it.
        expect_date(&plain("Mar: 2"), "Mar 2");
        expect_date(&plain("OCT, 31."), "OCT 31");
    }

    #[test]
    fn test_token_pair_preserves_original_casing() {
        expect_date(&plain("sEpT? 8"), "sEpT 8");
    }

    #[test]
    fn test_token_pair_rejects_non_digit_day() {
        assert_eq!(classify_line(&plain("March second")), LineClass::Name);
    }

    #[test]
    fn test_plain_names_are_names() {
        assert_eq!(classify_line(&plain("Alice")), LineClass::Name);
        assert_eq!(classify_line(&plain("Maya Jones")), LineClass::Name);
        // "May" alone has no day token.
        assert_eq!(classify_line(&plain("May")), LineClass::Name);
    }

    #[test]
    fn test_rule_precedence_bold_wins() {
        // Bold rule extracts the whole stripped line, not just the month-day
        // prefix a later rule would take.
        expect_date(&bold("September 8 and friends"), "September 8 and friends");
    }

    #[test]
    fn test_rule_names_are_stable() {
        let names: Vec<&str> = DATE_RULES.iter().map(|&(n, _)| n).collect();
        assert_eq!(
            names,
            [
                "bold-led",
                "strict-month-day",
                "prefix-month-day",
                "token-pair"
            ]
        );
    }
}
