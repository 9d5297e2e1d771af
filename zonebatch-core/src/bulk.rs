//! Bulk operation engine
//!
//! Splits a list of work items into fixed-size batches, runs each batch's
//! items concurrently, and reports progress after every item settlement.
//! Supports dry-run simulation, continue-on-error vs abort-on-first-error,
//! and a fixed inter-batch delay as the only pacing mechanism.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};

/// Progress callback, invoked synchronously after every item settlement.
///
/// Invocations never overlap: the runner processes settlements one at a time
/// on its own task.
pub type ProgressCallback = Arc<dyn Fn(&BulkProgress) + Send + Sync>;

/// Options for one bulk run.
///
/// Constructed per invocation and consumed entirely within it.
#[derive(Clone)]
pub struct BulkOptions {
    /// Maximum number of items in flight at any instant. Values below 1 are
    /// treated as 1. Default: 5.
    pub concurrency: usize,
    /// Simulate: synthesize results without performing any network mutation.
    /// Default: false.
    pub dry_run: bool,
    /// Keep starting new batches after an item fails. When false, the batch
    /// containing the first failure still settles completely, but no further
    /// batch starts. Default: false.
    pub continue_on_error: bool,
    /// Fixed pause between batches in milliseconds (not after the last).
    /// Default: 0.
    pub delay_ms: u64,
    /// Optional progress callback.
    pub progress: Option<ProgressCallback>,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            concurrency: 5,
            dry_run: false,
            continue_on_error: false,
            delay_ms: 0,
            progress: None,
        }
    }
}

impl std::fmt::Debug for BulkOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkOptions")
            .field("concurrency", &self.concurrency)
            .field("dry_run", &self.dry_run)
            .field("continue_on_error", &self.continue_on_error)
            .field("delay_ms", &self.delay_ms)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// One failed item: a human-readable descriptor plus the error message,
/// captured verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkError {
    /// Descriptor of the failed item (e.g. `"A www.example.com"`).
    pub item: String,
    /// Error message.
    pub error: String,
}

/// Mutable progress snapshot handed to the callback after every settlement.
///
/// `completed == succeeded + failed` holds at every invocation; `total` never
/// changes once the run starts.
#[derive(Debug, Clone, Serialize)]
pub struct BulkProgress {
    /// Number of items in the run.
    pub total: usize,
    /// Items settled so far.
    pub completed: usize,
    /// Items settled successfully.
    pub succeeded: usize,
    /// Items settled with an error.
    pub failed: usize,
    /// Descriptor of the most recently settled item.
    pub current: Option<String>,
    /// Errors accumulated so far, in settlement order.
    pub errors: Vec<BulkError>,
}

impl BulkProgress {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            failed: 0,
            current: None,
            errors: Vec::new(),
        }
    }
}

/// Terminal snapshot of a bulk run.
#[derive(Debug, Clone, Serialize)]
pub struct BulkResult<T> {
    /// True iff zero items failed.
    pub success: bool,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Number of items in the run.
    pub total: usize,
    /// Items that settled (equals `total` unless the run aborted early).
    pub completed: usize,
    /// Items that settled successfully.
    pub succeeded: usize,
    /// Items that settled with an error.
    pub failed: usize,
    /// Produced values, in completion order — concurrent items may settle out
    /// of submission order.
    pub items: Vec<T>,
    /// Errors, in settlement order.
    pub errors: Vec<BulkError>,
}

/// Run `op` over `items` in sequential batches of at most
/// `options.concurrency` items, each batch's items concurrently.
///
/// A batch always drains: a failure does not cancel in-flight siblings, it
/// only (when `continue_on_error` is false) prevents the next batch from
/// starting. The per-item error is whatever `op` returns, captured verbatim.
pub(crate) async fn run_batched<I, T, Op, Fut>(
    items: Vec<I>,
    options: &BulkOptions,
    describe: impl Fn(&I) -> String,
    op: Op,
) -> BulkResult<T>
where
    Op: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    let total = items.len();
    let concurrency = options.concurrency.max(1);

    let mut progress = BulkProgress::new(total);
    let mut produced: Vec<T> = Vec::new();
    let mut remaining = items.into_iter();

    loop {
        let batch: Vec<I> = remaining.by_ref().take(concurrency).collect();
        if batch.is_empty() {
            break;
        }

        // Launch the whole batch; settlements are handled in completion order.
        let mut in_flight: FuturesUnordered<_> = batch
            .into_iter()
            .map(|item| {
                let label = describe(&item);
                let fut = op(item);
                async move { (label, fut.await) }
            })
            .collect();

        let mut batch_failed = false;
        while let Some((label, outcome)) = in_flight.next().await {
            progress.completed += 1;
            progress.current = Some(label.clone());
            match outcome {
                Ok(value) => {
                    progress.succeeded += 1;
                    produced.push(value);
                }
                Err(message) => {
                    progress.failed += 1;
                    progress.errors.push(BulkError {
                        item: label,
                        error: message,
                    });
                    batch_failed = true;
                }
            }
            if let Some(callback) = &options.progress {
                callback(&progress);
            }
        }

        if batch_failed && !options.continue_on_error {
            break;
        }

        if options.delay_ms > 0 && remaining.len() > 0 {
            tokio::time::sleep(Duration::from_millis(options.delay_ms)).await;
        }
    }

    BulkResult {
        success: progress.failed == 0,
        dry_run: options.dry_run,
        total,
        completed: progress.completed,
        succeeded: progress.succeeded,
        failed: progress.failed,
        items: produced,
        errors: progress.errors,
    }
}
