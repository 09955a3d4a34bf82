//! Grouping state machine: classified lines to an ordered date → names map.

use crate::classify::matched_rule;
use crate::document::DecodedDocument;
use crate::extract::{lines, Line};
use serde::Serialize;
use std::collections::HashMap;

/// Options controlling grouping behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// When a date label recurs, merge new names into the existing group
    /// instead of re-opening it as a fresh empty group. The default (off)
    /// keeps the historical behavior, which discards names collected earlier
    /// under that label; see DESIGN.md.
    pub merge_duplicate_labels: bool,

    /// Record a per-line classification log in the result, for troubleshooting
    /// documents that unexpectedly produce no groups.
    pub collect_diagnostics: bool,
}

/// One date label and the names listed under it, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BirthdayGroup {
    pub label: String,
    pub names: Vec<String>,
}

/// One classified line, recorded when diagnostics are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Normalized line text.
    pub text: String,
    /// Date rule that matched, or `None` for a name line.
    pub rule: Option<&'static str>,
    /// Extracted label for date lines.
    pub label: Option<String>,
}

/// Ordered mapping from date label to [`BirthdayGroup`], preserving first-seen
/// label order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    groups: Vec<BirthdayGroup>,
    index: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Groups in first-seen label order.
    #[must_use]
    pub fn groups(&self) -> &[BirthdayGroup] {
        &self.groups
    }

    /// Look up a group by its exact label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&BirthdayGroup> {
        self.index.get(label).map(|&idx| &self.groups[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Labels are never stored empty, so the mapping is empty exactly when it
    /// holds no groups at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// First label in mapping order.
    #[must_use]
    pub fn first_label(&self) -> Option<&str> {
        self.groups.first().map(|g| g.label.as_str())
    }

    /// Last label in mapping order.
    #[must_use]
    pub fn last_label(&self) -> Option<&str> {
        self.groups.last().map(|g| g.label.as_str())
    }

    /// Classification log, empty unless [`ParseOptions::collect_diagnostics`]
    /// was set.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Open (or re-open) the group for `label`, returning its position.
    ///
    /// Re-encountering a label does not create a duplicate entry: the group
    /// keeps its original position. Without `merge`, re-opening clears the
    /// names collected earlier, matching the historical overwrite behavior.
    fn open_group(&mut self, label: String, merge: bool) -> usize {
        if let Some(&idx) = self.index.get(&label) {
            if !merge {
                self.groups[idx].names.clear();
            }
            return idx;
        }
        let idx = self.groups.len();
        self.index.insert(label.clone(), idx);
        self.groups.push(BirthdayGroup {
            label,
            names: Vec::new(),
        });
        idx
    }
}

/// Parse a decoded document into its date → names mapping.
#[must_use]
pub fn parse_document(doc: &DecodedDocument, options: &ParseOptions) -> ParseResult {
    parse_lines(lines(doc), options)
}

/// Run the grouping state machine over an ordered line sequence.
///
/// State: the most recently opened group ("current"), plus a staging buffer
/// for name lines seen before any heading. Staged names are dropped at end of
/// input — the upstream behavior this parser preserves — but they are logged
/// and appear in the diagnostic record, so they are never lost silently.
#[must_use]
pub fn parse_lines(input: impl Iterator<Item = Line>, options: &ParseOptions) -> ParseResult {
    let mut result = ParseResult::default();
    let mut current: Option<usize> = None;
    let mut staged: Vec<String> = Vec::new();

    for line in input {
        match matched_rule(&line) {
            Some((rule, label)) => {
                if options.collect_diagnostics {
                    result.diagnostics.push(Diagnostic {
                        text: line.normalized_text.clone(),
                        rule: Some(rule),
                        label: Some(label.clone()),
                    });
                }
                // A label that strips to nothing is never recorded; the
                // current group stays open for the names that follow.
                if label.is_empty() {
                    continue;
                }
                current = Some(result.open_group(label, options.merge_duplicate_labels));
            }
            None => {
                if options.collect_diagnostics {
                    result.diagnostics.push(Diagnostic {
                        text: line.normalized_text.clone(),
                        rule: None,
                        label: None,
                    });
                }
                match current {
                    Some(idx) => result.groups[idx].names.push(line.normalized_text),
                    None => staged.push(line.normalized_text),
                }
            }
        }
    }

    if !staged.is_empty() {
        log::debug!(
            "dropping {} name line(s) seen before the first date heading: {staged:?}",
            staged.len()
        );
    }
    result
}
