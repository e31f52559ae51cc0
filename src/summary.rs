use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::executor::DeletionTally;
use crate::sink::LogSink;

/// Counters for one pass. Outside dry-run, `picked == ignored + deleted + failed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub picked: usize,
    pub ignored: usize,
    pub deleted: usize,
    pub failed: usize,
}

pub struct SummaryReporter {
    sink: Arc<dyn LogSink>,
}

impl SummaryReporter {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// `picked` is the age-eligible count before ignore filtering.
    pub fn report(&self, picked: usize, candidate_count: usize, tally: DeletionTally) -> RunSummary {
        let summary = RunSummary {
            picked,
            ignored: picked.saturating_sub(candidate_count),
            deleted: tally.deleted,
            failed: tally.failed,
        };
        self.sink.info(&render(&summary));
        summary
    }
}

fn render(s: &RunSummary) -> String {
    format!(
        "Summary:\n  Picked: {}\n  Deleted: {}\n  Ignored: {}\n  Failed: {}",
        s.picked, s.deleted, s.ignored, s.failed
    )
}
