// Linewright - app/batch.rs
//
// Runs one pipeline over stdin or a list of files.
//
// Architecture:
//   - The pipeline is shared by reference across rayon workers; its only
//     interior state is the optional memo map, which is thread-safe.
//   - Each input gets its own Document and RunTracer.
//   - Results come back in argument order regardless of completion order.
//   - A failing input is reported in its summary and never stops the others.

use crate::core::cache::MemoStats;
use crate::core::document::Document;
use crate::core::model::RunSummary;
use crate::core::pipeline::Pipeline;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{LinewrightError, Result};
use crate::util::trace::RunTracer;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Name used for standard input in summaries.
pub const STDIN_NAME: &str = "-";

/// Outcome of one input.
#[derive(Debug)]
pub struct InputResult {
    pub summary: RunSummary,
    /// Transformed text, when it was not written to an output directory.
    pub text: Option<String>,
}

impl InputResult {
    fn failed(input: &str, error: &dyn std::fmt::Display) -> Self {
        Self {
            summary: RunSummary {
                input: input.to_string(),
                started_at: None,
                lines_in: 0,
                lines_out: 0,
                bytes_in: 0,
                bytes_out: 0,
                error: Some(error.to_string()),
                timeline: Vec::new(),
            },
            text: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.summary.error.is_none()
    }
}

/// Whole-run report printed by `--summary`.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub profile: Option<String>,
    pub case: String,
    pub cache: Option<String>,
    pub memo: Option<MemoStats>,
    pub inputs: Vec<RunSummary>,
}

impl BatchReport {
    pub fn new(pipeline: &Pipeline, profile: Option<&str>, results: &[InputResult]) -> Self {
        Self {
            profile: profile.map(str::to_string),
            case: pipeline.config().case.to_string(),
            cache: pipeline.memo_strategy().map(|s| s.name().to_string()),
            memo: pipeline.memo_stats(),
            inputs: results.iter().map(|r| r.summary.clone()).collect(),
        }
    }

    pub fn failed(&self) -> usize {
        self.inputs.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Transform everything `reader` yields.
pub fn run_reader<R: Read>(pipeline: &Pipeline, name: &str, reader: R) -> InputResult {
    let doc = match Document::from_reader(reader) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::error!(input = name, error = %e, "Failed to read input");
            return InputResult::failed(name, &e);
        }
    };

    let bytes_in = doc.input().len();
    let mut tracer = RunTracer::new(name);
    match pipeline.run_traced(doc, &mut tracer) {
        Ok(out) => {
            tracing::info!(
                input = name,
                lines_in = out.lines_in,
                lines_out = out.lines_out,
                elapsed_ms = tracer.elapsed().as_millis() as u64,
                "Input transformed"
            );
            InputResult {
                summary: RunSummary {
                    input: name.to_string(),
                    started_at: Some(tracer.started_at()),
                    lines_in: out.lines_in,
                    lines_out: out.lines_out,
                    bytes_in,
                    bytes_out: out.text.len(),
                    error: None,
                    timeline: tracer.into_timeline(),
                },
                text: Some(out.text),
            }
        }
        Err(e) => {
            let err = LinewrightError::from(e);
            tracing::error!(input = name, error = %err, "Transform failed");
            InputResult::failed(name, &err)
        }
    }
}

/// Transform one file, writing into `output_dir` when given.
pub fn run_file(pipeline: &Pipeline, path: &Path, output_dir: Option<&Path>) -> InputResult {
    let name = path.display().to_string();

    let file = match fs::open_input(path) {
        Ok(f) => f,
        Err(e) => {
            let err = LinewrightError::Io {
                path: path.to_path_buf(),
                operation: "open input",
                source: e,
            };
            tracing::error!(error = %err, "Cannot open input");
            return InputResult::failed(&name, &err);
        }
    };

    let mut result = run_reader(pipeline, &name, file);
    let Some(dir) = output_dir else {
        return result;
    };
    let Some(text) = result.text.take() else {
        return result;
    };

    let written = fs::output_path(path, dir).and_then(|out| {
        fs::write_output(&out, &text)?;
        Ok(out)
    });
    match written {
        Ok(out) => {
            tracing::debug!(input = %name, output = %out.display(), "Output written");
        }
        Err(e) => {
            let err = LinewrightError::Io {
                path: dir.to_path_buf(),
                operation: "write output",
                source: e,
            };
            tracing::error!(error = %err, "Cannot write output");
            result.summary.error = Some(err.to_string());
        }
    }
    result
}

/// Transform `paths` in parallel. Results are in the order of `paths`.
///
/// Fails without running anything when the batch is too large, or when two
/// inputs would be written to the same file in `output_dir`.
pub fn run_files(
    pipeline: &Pipeline,
    paths: &[PathBuf],
    output_dir: Option<&Path>,
) -> Result<Vec<InputResult>> {
    if paths.len() > constants::MAX_BATCH_FILES {
        return Err(LinewrightError::Usage(format!(
            "{} input files exceeds the maximum of {}",
            paths.len(),
            constants::MAX_BATCH_FILES
        )));
    }

    if output_dir.is_some() {
        let mut seen = HashSet::new();
        for path in paths {
            if let Some(name) = path.file_name() {
                if !seen.insert(name) {
                    return Err(LinewrightError::Usage(format!(
                        "more than one input is named '{}'; outputs would overwrite each other",
                        name.to_string_lossy()
                    )));
                }
            }
        }
    }

    tracing::info!(files = paths.len(), "Batch started");

    let results: Vec<InputResult> = paths
        .par_iter()
        .map(|path| run_file(pipeline, path, output_dir))
        .collect();

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(files = results.len(), failed, "Batch complete");

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MapStrategy;
    use crate::core::model::{CaseStyle, TransformConfig};
    use tempfile::TempDir;

    fn upper() -> Pipeline {
        Pipeline::new(TransformConfig {
            case: CaseStyle::Upper.into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_run_reader_fills_summary() {
        let result = run_reader(&upper(), STDIN_NAME, "ab\ncd".as_bytes());
        assert!(result.is_ok());
        assert_eq!(result.text.as_deref(), Some("AB\nCD"));

        let s = &result.summary;
        assert_eq!(s.input, "-");
        assert_eq!((s.lines_in, s.lines_out), (2, 2));
        assert_eq!((s.bytes_in, s.bytes_out), (5, 5));
        assert_eq!(s.timeline.len(), 4);
    }

    #[test]
    fn test_results_keep_argument_order() {
        let tmp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..20)
            .map(|i| {
                let p = tmp.path().join(format!("in{i}.txt"));
                std::fs::write(&p, format!("line {i}")).unwrap();
                p
            })
            .collect();

        let pipeline = upper().with_memo(MapStrategy::CopyOnWrite);
        let results = run_files(&pipeline, &paths, None).unwrap();

        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.text.as_deref(), Some(format!("LINE {i}").as_str()));
        }
    }

    #[test]
    fn test_missing_file_does_not_stop_batch() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.txt");
        std::fs::write(&good, "ok").unwrap();
        let missing = tmp.path().join("missing.txt");

        let results = run_files(&upper(), &[missing, good], None).unwrap();
        assert!(!results[0].is_ok());
        assert!(results[0].summary.error.as_ref().unwrap().contains("open input"));
        assert_eq!(results[1].text.as_deref(), Some("OK"));
    }

    #[test]
    fn test_output_dir_receives_files() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("names.txt");
        std::fs::write(&input, "x\ny").unwrap();
        let out_dir = tmp.path().join("out");

        let results = run_files(&upper(), &[input], Some(&out_dir)).unwrap();
        assert!(results[0].is_ok());
        assert!(results[0].text.is_none());
        assert_eq!(
            std::fs::read_to_string(out_dir.join("names.txt")).unwrap(),
            "X\nY"
        );
    }

    #[test]
    fn test_report_serialises() {
        let pipeline = upper().with_memo(MapStrategy::RwLock);
        let results = vec![run_reader(&pipeline, STDIN_NAME, "a\na".as_bytes())];
        let report = BatchReport::new(&pipeline, Some("shout"), &results);
        assert_eq!(report.failed(), 0);

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["case"], "upper");
        assert_eq!(json["cache"], "rwlock");
        assert_eq!(json["memo"]["hits"], 1);
        assert_eq!(json["inputs"][0]["lines_out"], 2);
    }

    #[test]
    fn test_duplicate_names_rejected_with_output_dir() {
        let tmp = TempDir::new().unwrap();
        let paths = [PathBuf::from("a/same.txt"), PathBuf::from("b/same.txt")];
        let err = run_files(&upper(), &paths, Some(tmp.path())).unwrap_err();
        assert!(matches!(err, LinewrightError::Usage(_)));
        assert!(err.to_string().contains("same.txt"));
        assert!(run_files(&upper(), &paths, None).is_ok());
    }
}
