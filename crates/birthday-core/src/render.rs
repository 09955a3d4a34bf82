//! HTML card rendering: the output contract the parser honors with its
//! consumer. Pure template expansion, no parsing logic.

use crate::parse::ParseResult;
use serde::Serialize;

/// Shown when the document produced no groups at all.
const EMPTY_MESSAGE: &str = "<p class=\"text-muted\">No birthday data found. \
Use bold dates (e.g. <strong>September 8</strong>) or lines like \
\"September 8\" with names listed below each date.</p>";

/// Labels per rendered row; cards use Bootstrap col-md-3 columns.
const CARDS_PER_ROW: usize = 4;

/// Render the mapping as rows of up to four cards, one card per date label,
/// names joined with a line-break separator. An empty mapping yields the
/// fixed "no birthday data found" message.
#[must_use]
pub fn render_cards(result: &ParseResult) -> String {
    if result.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut html_parts = Vec::new();
    for row in result.groups().chunks(CARDS_PER_ROW) {
        html_parts.push("<div class=\"row\">".to_string());
        for group in row {
            let names_html = group.names.join(" <br/> ");
            html_parts.push(format!(
                "  <div class=\"col-md-3\">\n    <h3>{}<br/></h3>\n    <p>{}</p>\n  </div>",
                group.label, names_html
            ));
        }
        html_parts.push("</div>".to_string());
    }
    html_parts.join("\n")
}

/// Page title derived from the first and last labels in mapping order, or the
/// bare fallback when the mapping is empty.
#[must_use]
pub fn page_title(result: &ParseResult) -> String {
    match (result.first_label(), result.last_label()) {
        (Some(first), Some(last)) => format!("{first} - {last} Birthdays"),
        _ => "Birthdays".to_string(),
    }
}

/// JSON payload returned to the upload client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub html: String,
    pub title: String,
}

impl UploadResponse {
    /// Success payload for a parsed document.
    #[must_use]
    pub fn from_result(result: &ParseResult) -> Self {
        Self {
            success: true,
            html: render_cards(result),
            title: page_title(result),
        }
    }
}
