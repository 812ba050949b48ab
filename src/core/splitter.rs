// Linewright - core/splitter.rs
//
// Delimiter normalisation and the one-shot document split.

use crate::core::document::Document;
use crate::core::model::TransformConfig;
use crate::util::error::TransformError;
use std::borrow::Cow;

/// Replace every occurrence of each delimiter in `delimiters` with
/// `canonical`, in list order.
///
/// Empty delimiters and delimiters equal to `canonical` are skipped.
pub fn normalize<'a>(text: &'a str, delimiters: &[String], canonical: &str) -> Cow<'a, str> {
    let mut out = Cow::Borrowed(text);
    for delim in delimiters {
        if delim.is_empty() || delim == canonical || !out.contains(delim.as_str()) {
            continue;
        }
        out = Cow::Owned(out.replace(delim.as_str(), canonical));
    }
    out
}

/// Splits documents according to the delimiter settings of a config.
#[derive(Debug, Clone, Copy)]
pub struct LineSplitter<'a> {
    line_separator: &'a str,
    field_separator: &'a str,
    line_delimiters: &'a [String],
    field_delimiters: &'a [String],
}

impl<'a> LineSplitter<'a> {
    pub fn new(config: &'a TransformConfig) -> Self {
        Self {
            line_separator: &config.line_separator,
            field_separator: &config.field_separator,
            line_delimiters: &config.line_delimiters,
            field_delimiters: &config.field_delimiters,
        }
    }

    /// Normalise line delimiters, then field delimiters.
    pub fn normalize_text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let lines = normalize(text, self.line_delimiters, self.line_separator);
        if let Cow::Owned(fields) = normalize(&lines, self.field_delimiters, self.field_separator) {
            return Cow::Owned(fields);
        }
        lines
    }

    /// Split normalised text on the canonical line separator.
    ///
    /// Empty text yields no lines at all, so empty input stays empty.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        text.split(self.line_separator).map(str::to_string).collect()
    }

    /// Normalise and split `doc`, returning the number of lines.
    ///
    /// May run once per document. A second call returns
    /// `TransformError::AlreadySplit` and leaves the lines untouched.
    pub fn split(&self, doc: &mut Document) -> Result<usize, TransformError> {
        if doc.is_split() {
            return Err(TransformError::AlreadySplit);
        }
        let normalized = self.normalize_text(doc.input());
        let lines = self.split_text(&normalized);
        let count = lines.len();
        doc.set_lines(lines)?;
        Ok(count)
    }
}
