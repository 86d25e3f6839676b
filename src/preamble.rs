//! Title and version extraction from the document preamble.
//!
//! The preamble is expected to look like:
//!
//! ```text
//! ---
//! any: metadata        (optional block, skipped entirely)
//! ---
//!
//! # Document Title
//!
//! **Version 1.0.0** | Status: Draft
//!
//! anything else is discarded
//! ```
//!
//! This is a formatting contract on the source document, not something to
//! fail on: a missing piece comes back as an empty string and the caller
//! decides whether that deserves a diagnostic.

/// Line that opens and closes the leading metadata block.
pub const METADATA_DELIMITER: &str = "---";

const TITLE_MARKER: &str = "# ";
const BOLD_MARKER: &str = "**";

/// The two preamble lines carried into the framing page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// The `# Title` line, verbatim. Empty when absent.
    pub title_line: String,
    /// The first bold line after the title, verbatim. Empty when absent.
    pub version_line: String,
}

impl Preamble {
    /// Title and version separated by a blank line.
    pub fn framing(&self) -> String {
        format!("{}\n\n{}", self.title_line, self.version_line)
    }

    pub fn is_complete(&self) -> bool {
        !self.title_line.is_empty() && !self.version_line.is_empty()
    }
}

/// Extract the title and version lines from preamble text.
pub fn extract_preamble(text: &str) -> Preamble {
    let lines: Vec<&str> = text.split('\n').collect();

    let Some(start) = content_start(&lines) else {
        return Preamble::default();
    };

    let mut preamble = Preamble::default();
    for line in &lines[start..] {
        if preamble.title_line.is_empty() {
            if line.starts_with(TITLE_MARKER) {
                preamble.title_line = (*line).to_string();
            }
            continue;
        }
        if line.starts_with(BOLD_MARKER) {
            preamble.version_line = (*line).to_string();
            break;
        }
    }
    preamble
}

/// Index of the first line after the metadata block, or 0 when there is none.
///
/// `None` means the block was opened and never closed, so nothing after it
/// can be trusted as preamble content.
fn content_start(lines: &[&str]) -> Option<usize> {
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Some(0);
    };
    if lines[first].trim() != METADATA_DELIMITER {
        return Some(0);
    }
    lines[first + 1..]
        .iter()
        .position(|l| l.trim() == METADATA_DELIMITER)
        .map(|offset| first + offset + 2)
}
