//! Line text normalization applied before classification.

/// Invisible, zero-width and no-break characters that word processors smuggle
/// into otherwise-plain lines. Each occurrence is replaced with a regular
/// space so the surrounding whitespace collapse removes it.
const INVISIBLE_CHARS: [char; 7] = [
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // zero-width no-break space / BOM
    '\u{00A0}', // no-break space
    '\u{00AD}', // soft hyphen
];

/// Normalize raw line text: replace invisible characters with spaces, collapse
/// whitespace runs to a single space, trim both ends.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|ch| if INVISIBLE_CHARS.contains(&ch) { ' ' } else { ch })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
