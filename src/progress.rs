//! Build progress reporting.
//!
//! The similarity matrix is an `O(n²·d)` one-time build that can take a
//! while on a full movie corpus. Progress is emitted on **stderr** so
//! stdout stays parseable (e.g. `cinematch recommend --json`).

use std::io::Write;
use std::ops::ControlFlow;

use cinematch_core::similarity::BuildObserver;

/// A single progress event for the recommender build.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildProgressEvent {
    /// Corpus file(s) parsed; `items` rows kept.
    Loaded { items: u64 },
    /// Descriptions are being tokenized and weighted.
    Vectorizing { items: u64 },
    /// `n` of `total` similarity rows computed.
    Scoring { n: u64, total: u64 },
}

/// Reports build progress. Implementations write to stderr (human or JSON).
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: BuildProgressEvent);
}

/// Human-friendly progress on stderr: "build  scoring  1,234 / 4,800 rows".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: BuildProgressEvent) {
        let line = match &event {
            BuildProgressEvent::Loaded { items } => {
                format!("build  loaded  {} items\n", format_number(*items))
            }
            BuildProgressEvent::Vectorizing { items } => {
                format!("build  vectorizing  {} descriptions\n", format_number(*items))
            }
            BuildProgressEvent::Scoring { n, total } => format!(
                "build  scoring  {} / {} rows\n",
                format_number(*n),
                format_number(*total)
            ),
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: BuildProgressEvent) {
        let obj = match &event {
            BuildProgressEvent::Loaded { items } => serde_json::json!({
                "event": "progress",
                "phase": "loaded",
                "items": items
            }),
            BuildProgressEvent::Vectorizing { items } => serde_json::json!({
                "event": "progress",
                "phase": "vectorizing",
                "items": items
            }),
            BuildProgressEvent::Scoring { n, total } => serde_json::json!({
                "event": "progress",
                "phase": "scoring",
                "n": n,
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: BuildProgressEvent) {}
}

/// Adapts a [`ProgressReporter`] to the core [`BuildObserver`], emitting a
/// `Scoring` event roughly every `every` rows and on the last row.
pub struct ScoringObserver<'a> {
    reporter: &'a dyn ProgressReporter,
    every: usize,
}

impl<'a> ScoringObserver<'a> {
    pub fn new(reporter: &'a dyn ProgressReporter, total: usize) -> Self {
        Self {
            reporter,
            every: (total / 20).max(1),
        }
    }
}

impl BuildObserver for ScoringObserver<'_> {
    fn row_done(&mut self, row: usize, total: usize) -> ControlFlow<()> {
        let n = row + 1;
        if n % self.every == 0 || n == total {
            self.reporter.report(BuildProgressEvent::Scoring {
                n: n as u64,
                total: total as u64,
            });
        }
        ControlFlow::Continue(())
    }
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<BuildProgressEvent>>);

    impl ProgressReporter for Recording {
        fn report(&self, event: BuildProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn format_number_comma() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn scoring_observer_throttles_and_reports_last_row() {
        let rec = Recording::default();
        let mut obs = ScoringObserver::new(&rec, 45);
        for row in 0..45 {
            assert!(obs.row_done(row, 45).is_continue());
        }
        let events = rec.0.lock().unwrap();
        // every = 2 → rows 2, 4, …, 44 plus the final row 45.
        assert_eq!(events.len(), 23);
        assert_eq!(
            events.last(),
            Some(&BuildProgressEvent::Scoring { n: 45, total: 45 })
        );
    }
}
