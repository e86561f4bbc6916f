//! Executor: the host side of the row contract.
//!
//! A processor knows how to convert one row; an executor decides how a
//! batch of rows is driven through it (sequentially, or in parallel with
//! the `parallel` feature) and how end-of-stream is signaled.

use crate::converter::ConvertError;
use crate::processor::{RowOutcome, RowProcessor};
use crate::properties::Row;
use std::time::{Duration, Instant};

/// Statistics from processing a batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Total execution duration.
    pub duration: Duration,
    /// Rows seen.
    pub rows: usize,
    /// Rows whose output column was written.
    pub converted: usize,
    /// Rows with an empty or absent input field.
    pub skipped_empty: usize,
    /// Rows whose input was not a numeral in the source radix.
    pub skipped_no_match: usize,
}

impl ExecutionStats {
    fn record(&mut self, outcome: RowOutcome) {
        self.rows += 1;
        match outcome {
            RowOutcome::Converted => self.converted += 1,
            RowOutcome::SkippedEmpty => self.skipped_empty += 1,
            RowOutcome::SkippedNoMatch => self.skipped_no_match += 1,
        }
    }
}

/// Processed rows, in input order, with statistics.
#[derive(Debug)]
pub struct BatchResult {
    pub rows: Vec<Row>,
    pub stats: ExecutionStats,
}

/// Errors that can occur while driving rows through a processor.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("conversion failed at row {row}: {source}")]
    Conversion {
        row: usize,
        #[source]
        source: ConvertError,
    },

    #[error("row sink failed: {0}")]
    Sink(String),
}

/// Receiver of processed rows.
pub trait RowSink {
    /// Accept one processed row.
    fn emit_row(&mut self, row: Row) -> Result<(), ExecuteError>;

    /// Called once after the last row.
    fn last_row_emitted(&mut self) -> Result<(), ExecuteError> {
        Ok(())
    }
}

/// A sink collecting rows in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    pub rows: Vec<Row>,
    pub finished: bool,
}

impl RowSink for VecSink {
    fn emit_row(&mut self, row: Row) -> Result<(), ExecuteError> {
        self.rows.push(row);
        Ok(())
    }

    fn last_row_emitted(&mut self) -> Result<(), ExecuteError> {
        self.finished = true;
        Ok(())
    }
}

/// Process rows one at a time, emitting each to `sink` in order.
///
/// Every row is emitted, converted or not. `last_row_emitted` is called once
/// the input is exhausted. Stops at the first error.
pub fn stream_rows<I, S>(
    processor: &dyn RowProcessor,
    rows: I,
    sink: &mut S,
) -> Result<ExecutionStats, ExecuteError>
where
    I: IntoIterator<Item = Row>,
    S: RowSink + ?Sized,
{
    let start = Instant::now();
    let mut stats = ExecutionStats::default();

    for (idx, mut row) in rows.into_iter().enumerate() {
        let outcome = processor
            .process_row(&mut row)
            .map_err(|source| ExecuteError::Conversion { row: idx, source })?;
        stats.record(outcome);
        sink.emit_row(row)?;
    }
    sink.last_row_emitted()?;

    stats.duration = start.elapsed();
    tracing::debug!(
        rows = stats.rows,
        converted = stats.converted,
        skipped = stats.skipped_empty + stats.skipped_no_match,
        "stream finished"
    );
    Ok(stats)
}

/// Executor determines HOW a batch of rows is processed.
///
/// - `SimpleExecutor`: sequential (default)
/// - `ParallelExecutor`: rayon worker pool (requires `parallel` feature)
///
/// All executors share the processor by reference; processors hold no
/// mutable state, so no locking is involved.
pub trait Executor: Send + Sync {
    /// Process every row of `rows`, preserving order.
    fn execute_batch(
        &self,
        processor: &dyn RowProcessor,
        rows: Vec<Row>,
    ) -> Result<BatchResult, ExecuteError>;
}

/// Sequential executor.
#[derive(Debug, Clone, Default)]
pub struct SimpleExecutor;

impl SimpleExecutor {
    /// Create a new simple executor.
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SimpleExecutor {
    fn execute_batch(
        &self,
        processor: &dyn RowProcessor,
        rows: Vec<Row>,
    ) -> Result<BatchResult, ExecuteError> {
        let mut sink = VecSink {
            rows: Vec::with_capacity(rows.len()),
            finished: false,
        };
        let stats = stream_rows(processor, rows, &mut sink)?;
        Ok(BatchResult {
            rows: sink.rows,
            stats,
        })
    }
}

// ============================================================================
// Parallel Executor (requires "parallel" feature)
// ============================================================================

/// Parallel executor for large batches.
///
/// Uses rayon; rows are processed in place and keep their order.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Default)]
pub struct ParallelExecutor {
    /// Worker thread count; rayon's global pool when `None`.
    pub parallelism: Option<usize>,
}

#[cfg(feature = "parallel")]
impl ParallelExecutor {
    /// Create a new parallel executor on the global pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parallelism limit.
    pub fn with_parallelism(mut self, jobs: usize) -> Self {
        self.parallelism = Some(jobs);
        self
    }
}

#[cfg(feature = "parallel")]
impl Executor for ParallelExecutor {
    fn execute_batch(
        &self,
        processor: &dyn RowProcessor,
        mut rows: Vec<Row>,
    ) -> Result<BatchResult, ExecuteError> {
        use rayon::prelude::*;

        let start = Instant::now();

        let pool = self.parallelism.and_then(|n| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .ok()
        });

        let run = |rows: &mut Vec<Row>| -> Result<Vec<RowOutcome>, ExecuteError> {
            rows.par_iter_mut()
                .enumerate()
                .map(|(idx, row)| {
                    processor
                        .process_row(row)
                        .map_err(|source| ExecuteError::Conversion { row: idx, source })
                })
                .collect()
        };

        let outcomes = match pool {
            Some(pool) => pool.install(|| run(&mut rows)),
            None => run(&mut rows),
        }?;

        let mut stats = ExecutionStats::default();
        for outcome in outcomes {
            stats.record(outcome);
        }
        stats.duration = start.elapsed();

        Ok(BatchResult { rows, stats })
    }
}
