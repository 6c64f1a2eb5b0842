use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

fn hit_counts(pool: &DispatchPool, count: usize) -> Vec<usize> {
    let hits: Vec<AtomicUsize> = (0..count).map(|_| AtomicUsize::new(0)).collect();
    pool.dispatch(count, |i, _| {
        hits[i].fetch_add(1, Ordering::Relaxed);
    });
    hits.into_iter().map(AtomicUsize::into_inner).collect()
}

#[test]
fn every_index_runs_exactly_once() {
    for threads in [1usize, 2, 3, 4, 8] {
        let pool = DispatchPool::new(threads);
        for count in [0usize, 1, 2, 7, 64, 1000, 4099] {
            let hits = hit_counts(&pool, count);
            assert_eq!(hits.len(), count);
            assert!(
                hits.iter().all(|&h| h == 1),
                "threads={threads} count={count}"
            );
        }
    }
}

#[test]
fn local_ids_stay_below_size() {
    let pool = DispatchPool::new(4);
    let max_seen = AtomicUsize::new(0);
    pool.dispatch(10_000, |_, local| {
        max_seen.fetch_max(local, Ordering::Relaxed);
    });
    assert!(max_seen.into_inner() < pool.size());
}

#[test]
fn size_is_clamped_and_fixed() {
    assert_eq!(DispatchPool::new(0).size(), 1);
    assert_eq!(DispatchPool::new(1).size(), 1);
    let pool = DispatchPool::new(6);
    assert_eq!(pool.size(), 6);
    pool.dispatch(100, |_, _| {});
    assert_eq!(pool.size(), 6);
}

#[test]
fn below_threshold_runs_serially_on_caller() {
    let pool = DispatchPool::new(4);
    let caller = std::thread::current().id();
    let calls = AtomicUsize::new(0);
    let foreign = AtomicUsize::new(0);
    pool.dispatch_threshold(500, false, |_, local| {
        calls.fetch_add(1, Ordering::Relaxed);
        if local != 0 || std::thread::current().id() != caller {
            foreign.fetch_add(1, Ordering::Relaxed);
        }
    });
    assert_eq!(calls.into_inner(), 500);
    assert_eq!(foreign.into_inner(), 0);
}

#[test]
fn above_threshold_behaves_like_dispatch() {
    let pool = DispatchPool::new(3);
    let calls = AtomicUsize::new(0);
    pool.dispatch_threshold(300, true, |_, _| {
        calls.fetch_add(1, Ordering::Relaxed);
    });
    assert_eq!(calls.into_inner(), 300);
}

#[test]
fn single_thread_pool_uses_only_local_zero() {
    let pool = DispatchPool::new(1);
    let nonzero = AtomicUsize::new(0);
    pool.dispatch(257, |_, local| {
        if local != 0 {
            nonzero.fetch_add(1, Ordering::Relaxed);
        }
    });
    assert_eq!(nonzero.into_inner(), 0);
}

#[test]
fn function_may_borrow_caller_state() {
    let pool = DispatchPool::new(4);
    let input: Vec<usize> = (0..512).collect();
    let out: Vec<AtomicUsize> = (0..512).map(|_| AtomicUsize::new(0)).collect();
    pool.dispatch(input.len(), |i, _| {
        out[i].store(input[i] * 2, Ordering::Relaxed);
    });
    for (i, v) in out.iter().enumerate() {
        assert_eq!(v.load(Ordering::Relaxed), i * 2);
    }
}

#[test]
fn drop_joins_workers_promptly() {
    let pool = DispatchPool::new(8);
    pool.dispatch(64, |_, _| {});
    let started = Instant::now();
    drop(pool);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn panic_is_reraised_and_pool_stays_usable() {
    let pool = DispatchPool::new(4);
    let calls = AtomicUsize::new(0);
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        pool.dispatch(100, |i, _| {
            calls.fetch_add(1, Ordering::Relaxed);
            if i == 37 {
                panic!("job 37 failed");
            }
        });
    }));
    let payload = result.expect_err("dispatch should re-raise the job panic");
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"job 37 failed"));
    // The rest of the batch still ran.
    assert_eq!(calls.into_inner(), 100);

    let hits = hit_counts(&pool, 50);
    assert!(hits.iter().all(|&h| h == 1));
}

#[test]
fn debug_reports_size() {
    let pool = DispatchPool::new(2);
    assert!(format!("{pool:?}").contains("size: 2"));
}
