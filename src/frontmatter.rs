//! Front-matter extraction.
//!
//! A front-matter block is a YAML mapping fenced by `---` lines at the very
//! start of a file:
//!
//! ```text
//! ---
//! title: Hi
//! draft: true
//! ---
//! ## Hello
//! ```
//!
//! Parsing strips the block and returns its key/value pairs plus the
//! remaining body. A file that does not open with the delimiter has no
//! front-matter and is returned untouched; a file that opens a block but
//! closes it badly (or fences something that is not a YAML mapping) is a
//! content error, kept distinct from I/O failures so the loader never
//! re-wraps it.

use crate::document::Metadata;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("front-matter block is never closed")]
    Unterminated,
    #[error("front-matter is not a YAML mapping: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The outcome of scanning a text buffer for a front-matter block.
#[derive(Debug, PartialEq)]
pub struct Parsed {
    /// Key/value pairs from the block. Empty for an empty block.
    pub metadata: Metadata,
    /// Everything after the closing delimiter line.
    pub body: String,
}

const DELIMITER: &str = "---";

/// Parse a leading front-matter block out of `text`.
///
/// Returns `Ok(None)` when the text does not begin with a delimiter line —
/// the file is plain content. Returns an error when a block is opened but
/// malformed.
pub fn parse(text: &str) -> Result<Option<Parsed>, FrontmatterError> {
    let Some(rest) = strip_delimiter_line(text) else {
        return Ok(None);
    };

    // Find the closing delimiter at the start of a line.
    let mut offset = 0;
    let (block, body) = loop {
        if let Some(after) = strip_delimiter_line(&rest[offset..]) {
            break (&rest[..offset], after);
        }
        match rest[offset..].find('\n') {
            Some(nl) => offset += nl + 1,
            None => return Err(FrontmatterError::Unterminated),
        }
    };

    let metadata = if block.trim().is_empty() {
        Metadata::new()
    } else {
        serde_yaml::from_str(block)?
    };

    Ok(Some(Parsed {
        metadata,
        body: body.to_string(),
    }))
}

/// If `text` starts with a `---` line, return the remainder after it.
///
/// Accepts both `\n` and `\r\n` line endings, and a final `---` with no
/// trailing newline.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    if let Some(after) = rest.strip_prefix('\n') {
        Some(after)
    } else if let Some(after) = rest.strip_prefix("\r\n") {
        Some(after)
    } else if rest.is_empty() {
        Some("")
    } else {
        // `----` or `--- trailing` is not a delimiter line.
        None
    }
}
