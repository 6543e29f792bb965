pub mod sink;

use std::fmt;

/// One contiguous slice of the record range, loaded by exactly one child process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Batch {
    pub index: usize,
    pub start_record: u64,
    pub count: u64,
}

impl Batch {
    /// First record past this batch.
    #[inline]
    #[must_use]
    pub fn end_record(&self) -> u64 {
        self.start_record + self.count
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}, {})",
            self.index,
            self.start_record,
            self.end_record()
        )
    }
}

/// Splits `[start_record, start_record + record_count)` into `split_factor` contiguous batches.
///
/// Batch `i` starts at `start_record + floor(i * record_count / split_factor)`, so truncation
/// never accumulates and the last batch always ends exactly at the upper bound.
/// Callers are expected to have checked `record_count >= split_factor > 1`.
#[must_use]
pub fn partition(record_count: u64, split_factor: usize, start_record: u64) -> Vec<Batch> {
    if split_factor == 0 {
        return Vec::new();
    }
    let total = u128::from(record_count);
    let parts = split_factor as u128;
    let offset = |i: usize| -> u64 {
        // i <= parts, so the quotient never exceeds record_count
        (i as u128 * total / parts) as u64
    };
    (0..split_factor)
        .map(|index| {
            let lo = offset(index);
            let hi = offset(index + 1);
            Batch {
                index,
                start_record: start_record + lo,
                count: hi - lo,
            }
        })
        .collect()
}

/// Round-robin assignment of endpoints to batches by index.
#[derive(Debug, Clone, Default)]
pub struct EndpointRotation {
    endpoints: Vec<String>,
}

impl EndpointRotation {
    #[must_use]
    pub fn new(endpoints: Vec<String>) -> Self {
        Self { endpoints }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn endpoint_for(&self, batch_index: usize) -> Option<&str> {
        if self.endpoints.is_empty() {
            return None;
        }
        Some(self.endpoints[batch_index % self.endpoints.len()].as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatchStatus {
    DryRun,
    Exited { code: Option<i32> },
    SpawnFailed { error: String },
    WaitFailed { error: String },
}

impl BatchStatus {
    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            BatchStatus::DryRun => false,
            BatchStatus::Exited { code } => *code != Some(0),
            BatchStatus::SpawnFailed { .. } | BatchStatus::WaitFailed { .. } => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchOutcome {
    #[serde(flatten)]
    pub batch: Batch,
    pub endpoint: Option<String>,
    pub status: BatchStatus,
}

impl BatchOutcome {
    #[must_use]
    pub fn new(batch: Batch, endpoint: Option<&str>, status: BatchStatus) -> Self {
        Self {
            batch,
            endpoint: endpoint.map(str::to_owned),
            status,
        }
    }
}
