// Linewright - util/trace.rs
//
// Per-run event timeline. Each tracer owns its own start time; there is no
// process-wide clock. Callers construct one per run and hand it to whatever
// needs to record snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

/// One timestamped point in a run.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Microseconds since the tracer was created.
    pub offset_micros: u64,
    /// Stage name, e.g. "normalized" or "split".
    pub label: String,
    /// Stage-specific quantity (bytes, lines, ...).
    pub count: usize,
}

/// Named run with an explicit start time and an ordered timeline.
#[derive(Debug, Clone)]
pub struct RunTracer {
    name: String,
    started_at: DateTime<Utc>,
    start: Instant,
    timeline: Vec<Snapshot>,
}

impl RunTracer {
    /// Start a new run clock.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started_at: Utc::now(),
            start: Instant::now(),
            timeline: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wall-clock time the run started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time elapsed since the run started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record a snapshot at the current instant.
    ///
    /// Offsets are monotonic, so the timeline stays ordered by time.
    pub fn snap(&mut self, label: &str, count: usize) {
        let offset_micros = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.timeline.push(Snapshot {
            offset_micros,
            label: label.to_string(),
            count,
        });
    }

    pub fn timeline(&self) -> &[Snapshot] {
        &self.timeline
    }

    /// Emit every snapshot at debug level.
    pub fn emit(&self) {
        for snap in &self.timeline {
            tracing::debug!(
                run = %self.name,
                stage = %snap.label,
                count = snap.count,
                offset_us = snap.offset_micros,
                "Run snapshot"
            );
        }
    }

    /// Consume the tracer, returning its timeline.
    pub fn into_timeline(self) -> Vec<Snapshot> {
        self.timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshots_are_ordered() {
        let mut tracer = RunTracer::new("ordering");
        tracer.snap("first", 1);
        tracer.snap("second", 2);
        tracer.snap("third", 3);

        let offsets: Vec<u64> = tracer.timeline().iter().map(|s| s.offset_micros).collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(tracer.timeline()[1].label, "second");
    }

    #[test]
    fn test_each_tracer_has_its_own_start() {
        let a = RunTracer::new("a");
        std::thread::sleep(Duration::from_millis(5));
        let b = RunTracer::new("b");
        assert!(a.started_at() <= b.started_at());
        assert!(a.elapsed() >= b.elapsed());
        assert_eq!(b.name(), "b");
    }
}
