//! Timing and memory sampling around named pipeline operations.
//!
//! A single [`PerfMonitor`] may be shared (via `Arc`) by every render in the
//! process. In-flight samples are keyed by `(operation, thread)`, so concurrent
//! renders timing the same operation name never overwrite each other.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::thread::{self, ThreadId};
use std::time::Instant;

const MB: f64 = 1024.0 * 1024.0;

/// Resident memory of the process in megabytes, or 0 when unavailable.
pub fn current_memory_mb() -> f64 {
    memory_stats::memory_stats()
        .map(|usage| usage.physical_mem as f64 / MB)
        .unwrap_or(0.0)
}

/// Accumulated figures for one operation name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationMetrics {
    /// Duration of the most recent completed call.
    pub duration_ms: f64,
    pub memory_change_mb: f64,
    pub end_memory_mb: f64,
    pub calls: u64,
    pub total_duration_ms: f64,
}

#[derive(Debug)]
struct InFlight {
    started: Instant,
    start_memory_mb: f64,
}

#[derive(Debug, Default)]
pub struct PerfMonitor {
    in_flight: Mutex<HashMap<(String, ThreadId), InFlight>>,
    completed: Mutex<BTreeMap<String, OperationMetrics>>,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing `operation` on the calling thread.
    pub fn start(&self, operation: &str) {
        let sample = InFlight {
            started: Instant::now(),
            start_memory_mb: current_memory_mb(),
        };
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.insert((operation.to_string(), thread::current().id()), sample);
        }
    }

    /// Ends timing `operation` on the calling thread. Ending an operation that
    /// was never started on this thread is a no-op.
    pub fn end(&self, operation: &str) -> Option<OperationMetrics> {
        let key = (operation.to_string(), thread::current().id());
        let sample = self.in_flight.lock().ok()?.remove(&key)?;

        let end_memory_mb = current_memory_mb();
        let duration_ms = sample.started.elapsed().as_secs_f64() * 1000.0;
        let memory_change_mb = end_memory_mb - sample.start_memory_mb;
        log::debug!(
            "Operation '{}' finished in {:.2}ms (memory change {:+.2}MB).",
            operation,
            duration_ms,
            memory_change_mb
        );

        let mut completed = self.completed.lock().ok()?;
        let entry = completed.entry(operation.to_string()).or_default();
        entry.duration_ms = duration_ms;
        entry.memory_change_mb = memory_change_mb;
        entry.end_memory_mb = end_memory_mb;
        entry.calls += 1;
        entry.total_duration_ms += duration_ms;
        Some(entry.clone())
    }

    /// Starts `operation` and returns a guard that ends it when dropped.
    pub fn span<'a>(&'a self, operation: impl Into<String>) -> PerfSpan<'a> {
        let operation = operation.into();
        self.start(&operation);
        PerfSpan {
            monitor: self,
            operation,
        }
    }

    /// Logs a warning when resident memory exceeds `ceiling_mb`.
    pub fn check_pressure(&self, ceiling_mb: usize) -> bool {
        let current = current_memory_mb();
        let over = current > ceiling_mb as f64;
        if over {
            log::warn!(
                "Memory usage {:.1}MB exceeds ceiling of {}MB.",
                current,
                ceiling_mb
            );
        }
        over
    }

    pub fn snapshot(&self) -> BTreeMap<String, OperationMetrics> {
        self.completed
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn reset(&self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.clear();
        }
        if let Ok(mut completed) = self.completed.lock() {
            completed.clear();
        }
    }

    pub fn log_summary(&self) {
        for (operation, m) in self.snapshot() {
            log::info!(
                "{}: {} call(s), last {:.2}ms, total {:.2}ms, end memory {:.1}MB",
                operation,
                m.calls,
                m.duration_ms,
                m.total_duration_ms,
                m.end_memory_mb
            );
        }
    }
}

/// Ends its operation on drop, including on early returns and unwinding.
#[must_use = "the operation ends when the span is dropped"]
pub struct PerfSpan<'a> {
    monitor: &'a PerfMonitor,
    operation: String,
}

impl PerfSpan<'_> {
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Drop for PerfSpan<'_> {
    fn drop(&mut self) {
        self.monitor.end(&self.operation);
    }
}
