use anyhow::Context;
use load_util::BatchOutcome;
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, serde::Serialize)]
pub struct RunStatistics {
    pub elapsed_secs: u64,
    pub record_count: u64,
    /// Records per second over the whole run, truncated.
    pub throughput: u64,
    pub batches: Vec<BatchOutcome>,
}

impl RunStatistics {
    #[must_use]
    pub fn calculate(elapsed: Duration, record_count: u64, mut batches: Vec<BatchOutcome>) -> Self {
        let elapsed_secs = whole_seconds(elapsed);
        batches.sort_by_key(|outcome| outcome.batch.index);
        Self {
            elapsed_secs,
            record_count,
            throughput: record_count / elapsed_secs,
            batches,
        }
    }

    #[inline]
    #[must_use]
    pub fn failed(&self) -> usize {
        self.batches
            .iter()
            .filter(|outcome| outcome.status.is_failure())
            .count()
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(self).context("Failed to serialize run summary")?;
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write run summary to {}", path.display()))
    }
}

/// Rounds up to whole seconds, never below one so throughput stays finite.
#[inline]
#[must_use]
pub fn whole_seconds(elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs() + u64::from(elapsed.subsec_nanos() > 0);
    secs.max(1)
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Finished in {} seconds ({} op/s)",
            self.elapsed_secs, self.throughput
        )?;
        let failed = self.failed();
        if failed > 0 {
            write!(f, "\n{failed} of {} batches failed", self.batches.len())?;
        }
        Ok(())
    }
}
