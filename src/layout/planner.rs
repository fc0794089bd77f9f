use serde::Serialize;
use std::ops::Range;

pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_MEMORY_CEILING_MB: usize = 100;

/// How a transaction list is cut into per-table batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchPlan {
    pub batch_size: usize,
    pub batch_count: usize,
    pub total: usize,
    /// Informational only; the monitor warns above it but never aborts.
    pub memory_ceiling_mb: usize,
}

/// Plans batches for `transaction_count` records.
///
/// Larger lists get smaller batches: more than 100 records caps the size at
/// 15, more than 50 caps it at 18. A base smaller than the cap is kept.
pub fn plan(transaction_count: usize, base_batch_size: usize, memory_ceiling_mb: usize) -> BatchPlan {
    let base = base_batch_size.max(1);
    let batch_size = if transaction_count > 100 {
        base.min(15)
    } else if transaction_count > 50 {
        base.min(18)
    } else {
        base
    };
    let batch_count = transaction_count.div_ceil(batch_size).max(1);

    log::debug!(
        "Planned {} transactions into {} batch(es) of {}.",
        transaction_count,
        batch_count,
        batch_size
    );
    BatchPlan {
        batch_size,
        batch_count,
        total: transaction_count,
        memory_ceiling_mb,
    }
}

impl BatchPlan {
    /// The `[start, end)` range of every batch. Zero records yield one empty range.
    pub fn batches(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.batch_count).map(move |i| {
            let start = (i * self.batch_size).min(self.total);
            let end = (start + self.batch_size).min(self.total);
            start..end
        })
    }

    /// Checks that the batches partition exactly `records` rows, each batch
    /// holding at least one row unless there are none.
    pub fn check_covers(&self, records: usize) -> Result<(), String> {
        if self.total != records {
            return Err(format!(
                "plan covers {} transaction(s) but {} were supplied",
                self.total, records
            ));
        }
        if self.batch_size == 0 {
            return Err("plan has a batch size of zero".to_string());
        }
        let expected = records.div_ceil(self.batch_size).max(1);
        if self.batch_count != expected {
            return Err(format!(
                "plan has {} batch(es) where {} rows in batches of {} need {}",
                self.batch_count, records, self.batch_size, expected
            ));
        }
        Ok(())
    }

    pub fn is_multi_batch(&self) -> bool {
        self.batch_count > 1
    }
}
