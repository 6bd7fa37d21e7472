//! Bounded worker pool for per-candidate work.
//!
//! Each item runs on the blocking thread pool behind a semaphore permit.
//! Results come back in input order. Cancelling the token aborts every
//! outstanding task and the whole call fails with [`Error::Interrupted`];
//! a partial result list is never returned.
//!
//! A blocking call cannot be aborted from outside. Items that have not
//! started yet are never run, and the worker function receives the token
//! so a long item can stop between its own steps. An item already inside an
//! external call finishes that call and its result is discarded.

use sp_core::{Error, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Run `f` over `items` with at most `workers` running at once.
pub async fn run_pool<T, R, F>(
    items: Vec<T>,
    workers: usize,
    cancel: CancellationToken,
    f: F,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, &CancellationToken) -> R + Send + Sync + 'static,
{
    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let f = Arc::new(f);
    let mut tasks = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let sem = semaphore.clone();
        let f = f.clone();
        let token = cancel.clone();

        tasks.spawn(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|e| Error::Internal(format!("worker pool closed: {e}")))?;

            if token.is_cancelled() {
                return Err(Error::Interrupted("cancelled before start".into()));
            }
            tokio::task::spawn_blocking(move || f(item, &token))
                .await
                .map(|result| (index, result))
                .map_err(|e| Error::Internal(format!("worker failed: {e}")))
        });
    }

    let mut results = Vec::with_capacity(total);
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tasks.abort_all();
                return Err(Error::Interrupted(format!(
                    "{} of {} items finished before cancellation",
                    results.len(),
                    total
                )));
            }
            next = tasks.join_next() => match next {
                None => break,
                Some(Ok(Ok(pair))) => results.push(pair),
                Some(Ok(Err(e))) => {
                    tasks.abort_all();
                    return Err(e);
                }
                Some(Err(e)) => {
                    tasks.abort_all();
                    return Err(Error::Internal(format!("worker task failed: {e}")));
                }
            }
        }
    }

    debug!(total, workers, "worker pool finished");
    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn results_keep_input_order() {
        let items: Vec<u64> = (0..20).collect();
        let out = run_pool(items, 4, CancellationToken::new(), |n, _| {
            // Later items finish first
            std::thread::sleep(Duration::from_millis(20 - n));
            n * 10
        })
        .await
        .unwrap();
        assert_eq!(out, (0..20).map(|n| n * 10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (r, p) = (running.clone(), peak.clone());

        let items: Vec<i32> = (0..16).collect();
        run_pool(items, 3, CancellationToken::new(), move |_, _| {
            let now = r.fetch_add(1, Ordering::SeqCst) + 1;
            p.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(10));
            r.fetch_sub(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn empty_input() {
        let out: Vec<i32> = run_pool(Vec::<i32>::new(), 4, CancellationToken::new(), |n, _| n)
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn cancellation_is_interrupted_not_truncated() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        let items: Vec<u64> = (0..8).collect();
        let handle = tokio::spawn(run_pool(items, 2, cancel, |n, _| {
            std::thread::sleep(Duration::from_millis(200));
            n
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();

        let result = handle.await.unwrap();
        assert_matches!(result, Err(Error::Interrupted(_)));
    }

    #[tokio::test]
    async fn running_items_see_cancellation() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let started = Arc::new(AtomicUsize::new(0));
        let stopped = Arc::new(AtomicUsize::new(0));
        let (s, t) = (started.clone(), stopped.clone());

        let handle = tokio::spawn(run_pool(
            (0..6).collect::<Vec<u32>>(),
            2,
            cancel,
            move |n, token| {
                s.fetch_add(1, Ordering::SeqCst);
                while !token.is_cancelled() {
                    std::thread::sleep(Duration::from_millis(5));
                }
                t.fetch_add(1, Ordering::SeqCst);
                n
            },
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();

        let result = handle.await.unwrap();
        assert_matches!(result, Err(Error::Interrupted(_)));

        // Running items wind down on their own; queued ones never start.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert_eq!(stopped.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn already_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = run_pool(vec![1, 2, 3], 4, cancel, |n, _| n).await;
        assert_matches!(result, Err(Error::Interrupted(_)));
    }
}
