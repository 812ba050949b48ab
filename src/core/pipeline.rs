// Linewright - core/pipeline.rs
//
// Orchestrates one document through the transform:
//   normalise -> split -> per line -> rejoin -> output.
// Per-line order is fixed: strip affixes, remove cuts, apply replacements,
// apply case, add affixes.
// Core layer: accepts Read trait objects, never touches the filesystem.

use crate::core::affix::{add_affixes, strip_affixes};
use crate::core::cache::{LineMemo, MapStrategy, MemoStats};
use crate::core::document::Document;
use crate::core::model::{CaseSelection, CaseStyle, TransformConfig};
use crate::core::splitter::LineSplitter;
use crate::core::substring::{apply_replacements, remove_cuts};
use crate::util::error::TransformError;
use crate::util::trace::RunTracer;
use std::io::Read;

/// Result of a traced run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// The transformed text.
    pub text: String,
    /// Lines produced by the split.
    pub lines_in: usize,
    /// Lines written after skip filtering.
    pub lines_out: usize,
}

/// A configured transform. Cheap to share across threads; the only
/// interior mutability is the optional memo.
#[derive(Debug)]
pub struct Pipeline {
    config: TransformConfig,
    memo: Option<LineMemo>,
}

impl Pipeline {
    pub fn new(config: TransformConfig) -> Self {
        match &config.case {
            CaseSelection::Known(CaseStyle::None) => tracing::warn!(
                "Case style 'none' discards line content; output lines will be empty \
                 apart from added affixes"
            ),
            CaseSelection::Known(CaseStyle::SnakeAllCaps) => tracing::warn!(
                "Case style 'snake-all-caps' lower-cases the first character of each line \
                 after upper-casing (e.g. \"nOW_IS\"); use 'upper' with replacements for \
                 SCREAMING_SNAKE keys"
            ),
            CaseSelection::Unrecognized(name) => tracing::warn!(
                style = %name,
                "Unrecognized case style; lines pass through with their case unchanged"
            ),
            CaseSelection::Known(_) => {}
        }

        tracing::debug!(
            case = %config.case,
            line_delimiters = config.line_delimiters.len(),
            field_delimiters = config.field_delimiters.len(),
            cuts = config.cut.len(),
            replacements = config.replace.len(),
            "Pipeline configured"
        );

        Self { config, memo: None }
    }

    /// Cache per-line results in a map built with `strategy`.
    pub fn with_memo(mut self, strategy: MapStrategy) -> Self {
        self.memo = Some(LineMemo::new(strategy));
        self
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Strategy of the memo map, or `None` when memoisation is off.
    pub fn memo_strategy(&self) -> Option<MapStrategy> {
        self.memo.as_ref().map(LineMemo::strategy)
    }

    /// Memo counters, or `None` when memoisation is off.
    pub fn memo_stats(&self) -> Option<MemoStats> {
        self.memo.as_ref().map(LineMemo::stats)
    }

    /// Apply the per-line steps to one line. Never consults the memo.
    pub fn transform_line(&self, line: &str) -> String {
        let c = &self.config;
        let stripped = strip_affixes(line, &c.remove_prefix, &c.remove_suffix);
        let cut = remove_cuts(stripped, &c.cut);
        let replaced = apply_replacements(&cut, &c.replace);
        let cased = c.case.apply(&replaced);
        add_affixes(&cased, &c.add_prefix, &c.add_suffix)
    }

    fn process_line(&self, line: &str) -> String {
        match &self.memo {
            Some(memo) => memo.get_or_compute(line, |l| self.transform_line(l)),
            None => self.transform_line(line),
        }
    }

    fn is_skipped(&self, line: &str) -> bool {
        self.config
            .skip_prefixes
            .iter()
            .any(|p| !p.is_empty() && line.starts_with(p.as_str()))
    }

    /// Transform `doc` and return its output.
    ///
    /// Fails with `AlreadySplit` if the document was split before being
    /// handed over.
    pub fn run(&self, doc: Document) -> Result<String, TransformError> {
        let mut tracer = RunTracer::new("document");
        self.run_traced(doc, &mut tracer).map(|out| out.text)
    }

    /// Transform in-memory text.
    pub fn run_str(&self, text: &str) -> Result<String, TransformError> {
        self.run(Document::new(text))
    }

    /// Read the full payload from `reader`, then transform it.
    ///
    /// Read failures come back as `TransformError::Read` carrying the
    /// original `io::Error`.
    pub fn run_reader<R: Read>(&self, reader: R) -> Result<String, TransformError> {
        let doc = Document::from_reader(reader)?;
        self.run(doc)
    }

    /// Transform `doc`, recording stage snapshots on `tracer`.
    pub fn run_traced(
        &self,
        mut doc: Document,
        tracer: &mut RunTracer,
    ) -> Result<RunOutput, TransformError> {
        tracer.snap("loaded", doc.input().len());

        let splitter = LineSplitter::new(&self.config);
        let lines_in = splitter.split(&mut doc)?;
        tracer.snap("split", lines_in);

        let lines = doc.take_lines();
        let mut lines_out = 0;
        for line in lines.iter().filter(|l| !self.is_skipped(l)) {
            if lines_out > 0 {
                doc.emit(&self.config.line_separator);
            }
            doc.emit(&self.process_line(line));
            lines_out += 1;
        }
        tracer.snap("transformed", lines_out);

        let text = doc.into_output();
        tracer.snap("emitted", text.len());
        tracer.emit();

        Ok(RunOutput {
            text,
            lines_in,
            lines_out,
        })
    }
}
