//! Bounded-batch work scheduling.
//!
//! The read and write phases both funnel their file operations through
//! [`run_batched`]: the work list is split into consecutive slices of the
//! concurrency bound, each slice runs concurrently on the rayon pool, and a
//! slice must finish completely before the next one starts. This is
//! admission control, not throughput tuning — the point is to cap the number
//! of simultaneously open file descriptors.
//!
//! Results come back in input order regardless of intra-batch completion
//! order. On failure, the members of the failing batch are allowed to
//! finish, then the first failure in input order is surfaced; later batches
//! never start.

use rayon::prelude::*;

/// Execute `worker` over `items` in fixed-size concurrent batches.
///
/// `concurrency` caps simultaneous worker invocations; `None` runs the whole
/// list as a single batch. Output order equals input order. The first
/// failure (in input order) aborts the remaining batches and propagates.
pub fn run_batched<T, R, E, F>(
    items: &[T],
    concurrency: Option<usize>,
    worker: F,
) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync,
{
    let batch_size = match concurrency {
        Some(n) => n.max(1),
        None => items.len().max(1),
    };

    let mut results = Vec::with_capacity(items.len());
    for batch in items.chunks(batch_size) {
        let outcomes: Vec<Result<R, E>> = batch.par_iter().map(&worker).collect();
        for outcome in outcomes {
            results.push(outcome?);
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn preserves_input_order() {
        let items: Vec<u32> = (0..37).collect();
        let results = run_batched(&items, Some(5), |n| {
            // Stagger so later items in a batch often finish first.
            std::thread::sleep(Duration::from_millis((5 - (n % 5)) as u64));
            Ok::<_, ()>(n * 2)
        })
        .unwrap();
        let expected: Vec<u32> = (0..37).map(|n| n * 2).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn never_exceeds_concurrency_bound() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let items: Vec<u32> = (0..40).collect();

        run_batched(&items, Some(3), |_| {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok::<_, ()>(())
        })
        .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn batch_boundaries_are_strict() {
        // Record which batch each item observed itself in; with a bound of
        // 4, item i must run after every item of batch i/4 - 1 completed.
        let completed = AtomicUsize::new(0);
        let items: Vec<usize> = (0..12).collect();

        run_batched(&items, Some(4), |&i| {
            let done_before = completed.load(Ordering::SeqCst);
            // Everything in earlier batches has already completed.
            assert!(done_before >= (i / 4) * 4);
            std::thread::sleep(Duration::from_millis(1));
            completed.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(())
        })
        .unwrap();
    }

    #[test]
    fn unbounded_runs_single_batch() {
        let items: Vec<u32> = (0..10).collect();
        let results = run_batched(&items, None, |n| Ok::<_, ()>(*n)).unwrap();
        assert_eq!(results, items);
    }

    #[test]
    fn first_failure_in_input_order_wins() {
        let items: Vec<u32> = (0..10).collect();
        let err = run_batched(&items, Some(10), |&n| {
            if n >= 4 { Err(n) } else { Ok(n) }
        })
        .unwrap_err();
        // 4..10 all fail concurrently; input order decides.
        assert_eq!(err, 4);
    }

    #[test]
    fn failure_stops_later_batches() {
        let ran = Mutex::new(Vec::new());
        let items: Vec<u32> = (0..9).collect();

        let result = run_batched(&items, Some(3), |&n| {
            ran.lock().unwrap().push(n);
            if n == 4 { Err("boom") } else { Ok(n) }
        });

        assert_eq!(result.unwrap_err(), "boom");
        let ran = ran.lock().unwrap();
        // Batches 0-2 and 3-5 ran; 6-8 never started.
        assert_eq!(ran.len(), 6);
        assert!(!ran.contains(&6));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let items: Vec<u32> = Vec::new();
        let results = run_batched(&items, Some(3), |&n| Ok::<_, ()>(n)).unwrap();
        assert!(results.is_empty());
    }
}
