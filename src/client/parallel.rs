//! Bounded parallel execution for per-network API work.
//!
//! Runs one future per input with at most `max_concurrent` in flight and
//! returns the outputs in input order, so concurrency never changes what a
//! run produces.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

/// Type alias for boxed futures used in parallel execution
type IndexedFuture<'a, T> = Pin<Box<dyn Future<Output = (usize, T)> + Send + 'a>>;

/// Run `task` over every input with bounded concurrency.
///
/// # Arguments
///
/// * `inputs` - Work items, one future each
/// * `task` - Async function producing the output for one input
/// * `max_concurrent` - Maximum number of futures in flight (0 is treated as 1)
///
/// # Returns
///
/// Outputs in the same order as `inputs`.
///
/// # Example
///
/// ```ignore
/// let snapshots = run_bounded(networks, |net| fetch_network(api, net), 4).await;
/// ```
pub async fn run_bounded<'a, I, T, F, Fut>(inputs: Vec<I>, task: F, max_concurrent: usize) -> Vec<T>
where
    I: 'a,
    T: Send + 'a,
    F: Fn(I) -> Fut,
    Fut: Future<Output = T> + Send + 'a,
{
    if inputs.is_empty() {
        return Vec::new();
    }

    let max_concurrent = max_concurrent.max(1);
    let total = inputs.len();
    debug!("Running {} tasks with max {} concurrent", total, max_concurrent);

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut futures: FuturesUnordered<IndexedFuture<'a, T>> = FuturesUnordered::new();
    let mut pending = inputs.into_iter().enumerate();

    // Helper to create a boxed future
    let make_future = |index: usize, input: I| -> IndexedFuture<'a, T> {
        let fut = task(input);
        Box::pin(async move { (index, fut.await) })
    };

    // Seed initial batch up to max_concurrent
    for (index, input) in pending.by_ref().take(max_concurrent) {
        futures.push(make_future(index, input));
    }

    // Process results and spawn new work to maintain concurrency
    while let Some((index, output)) = futures.next().await {
        slots[index] = Some(output);

        if let Some((next, input)) = pending.next() {
            futures.push(make_future(next, input));
        }
    }

    slots.into_iter().flatten().collect()
}
