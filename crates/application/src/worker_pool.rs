//! Bounded fan-out of a unit-of-work function over an input list
//! (spec.md §4.3), the async analogue of the original tool's
//! `ThreadPoolExecutor`-backed `Pool.map`.
//!
//! Work units are independent tokio tasks; a `Semaphore` bounds how many
//! run concurrently. `None` results are filtered out. Stage-specific
//! `validate_results`/`show_start_info` behaviour stays with the caller —
//! this function only owns the fan-out/collect mechanics, so it is not
//! tied to any one stage's argument or result types.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::warn;

pub async fn run_stage<Arg, Item, F, Fut>(args: Vec<Arg>, concurrency: usize, work: F) -> Vec<Item>
where
    Arg: Send + 'static,
    Item: Send + 'static,
    F: Fn(Arg) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Item>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let work = Arc::new(work);
    let mut tasks = FuturesUnordered::new();

    for arg in args {
        let semaphore = Arc::clone(&semaphore);
        let work = Arc::clone(&work);
        tasks.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("worker pool semaphore never closes");
            work(arg).await
        }));
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(Some(item)) => results.push(item),
            Ok(None) => {}
            Err(join_error) => warn!(error = %join_error, "worker task panicked"),
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn filters_out_none_results() {
        let results = run_stage(vec![1, 2, 3, 4], 2, |n| async move {
            if n % 2 == 0 {
                Some(n)
            } else {
                None
            }
        })
        .await;
        let mut sorted = results;
        sorted.sort_unstable();
        assert_eq!(sorted, vec![2, 4]);
    }

    #[tokio::test]
    async fn respects_concurrency_bound() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_observed = Arc::new(AtomicUsize::new(0));
        let items: Vec<usize> = (0..20).collect();

        let in_flight_for_closure = Arc::clone(&in_flight);
        let max_observed_for_closure = Arc::clone(&max_observed);
        run_stage::<_, (), _, _>(items, 4, move |_| {
            let in_flight = Arc::clone(&in_flight_for_closure);
            let max_observed = Arc::clone(&max_observed_for_closure);
            async move {
                let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_observed.fetch_max(current, Ordering::SeqCst);
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                None
            }
        })
        .await;

        assert!(max_observed.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let results: Vec<i32> = run_stage(vec![], 4, |_: i32| async { Some(1) }).await;
        assert!(results.is_empty());
    }
}
