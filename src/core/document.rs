// Linewright - core/document.rs
//
// Working state for one pipeline run: the original text, the line sequence
// (populated exactly once), and the output accumulator.
// Lifecycle is linear: load -> split -> transform -> emit.

use crate::util::constants;
use crate::util::error::TransformError;
use std::io::{self, Read};

/// A single text payload moving through the pipeline.
#[derive(Debug, Default)]
pub struct Document {
    input: String,
    lines: Vec<String>,
    split: bool,
    output: String,
}

impl Document {
    /// Create a document from text already in memory.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Read the whole payload from `reader`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Payloads larger than
    /// `MAX_INPUT_BYTES` fail with `InvalidData`; every other read failure is
    /// returned as-is.
    pub fn from_reader<R: Read>(reader: R) -> io::Result<Self> {
        let mut bytes = Vec::new();
        reader
            .take(constants::MAX_INPUT_BYTES + 1)
            .read_to_end(&mut bytes)?;

        if bytes.len() as u64 > constants::MAX_INPUT_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "input exceeds maximum of {} bytes",
                    constants::MAX_INPUT_BYTES
                ),
            ));
        }

        let input = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!("Input is not valid UTF-8; using lossy conversion");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Self::new(input))
    }

    /// The original text. Never modified after load.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Lines produced by the split, empty before it.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_split(&self) -> bool {
        self.split
    }

    /// Populate the line sequence. Fails without touching the existing
    /// lines if the document was already split.
    pub fn set_lines(&mut self, lines: Vec<String>) -> Result<(), TransformError> {
        if self.split {
            return Err(TransformError::AlreadySplit);
        }
        self.lines = lines;
        self.split = true;
        Ok(())
    }

    /// Take the lines out for per-line processing, leaving the document
    /// marked as split.
    pub(crate) fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Append text to the output accumulator.
    pub fn emit(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consume the document, returning the accumulated output.
    pub fn into_output(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_from_reader_reads_everything() {
        let doc = Document::from_reader("one\ntwo".as_bytes()).unwrap();
        assert_eq!(doc.input(), "one\ntwo");
        assert!(!doc.is_split());
        assert!(doc.lines().is_empty());
    }

    #[test]
    fn test_from_reader_propagates_failure_unchanged() {
        let err = Document::from_reader(FailingReader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "pipe closed");
    }

    #[test]
    fn test_from_reader_is_lossy_on_bad_utf8() {
        let doc = Document::from_reader(&b"ok \xFF end"[..]).unwrap();
        assert_eq!(doc.input(), "ok \u{FFFD} end");
    }

    #[test]
    fn test_set_lines_only_once() {
        let mut doc = Document::new("a\nb");
        doc.set_lines(vec!["a".into(), "b".into()]).unwrap();

        let second = doc.set_lines(vec!["z".into()]);
        assert!(matches!(second, Err(TransformError::AlreadySplit)));
        assert_eq!(doc.lines(), ["a", "b"]);
    }

    #[test]
    fn test_empty_split_still_counts() {
        let mut doc = Document::new("");
        doc.set_lines(Vec::new()).unwrap();
        assert!(doc.is_split());
        assert!(doc.set_lines(Vec::new()).is_err());
    }

    #[test]
    fn test_emit_accumulates() {
        let mut doc = Document::new("x");
        doc.emit("a");
        doc.emit("b");
        assert_eq!(doc.output(), "ab");
        assert_eq!(doc.into_output(), "ab");
    }
}
