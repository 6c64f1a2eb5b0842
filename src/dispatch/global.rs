use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::pool::DispatchPool;

/// Thread count used when nothing has been configured.
pub const DEFAULT_DISPATCH_THREADS: usize = 4;

static NUM_DISPATCH_THREADS: AtomicUsize = AtomicUsize::new(DEFAULT_DISPATCH_THREADS);

struct GlobalPool {
    // The configured count the pool was built for; may differ from `pool.size()` only when
    // worker spawning failed.
    configured: usize,
    pool: Arc<DispatchPool>,
}

static GLOBAL_POOL: Mutex<Option<GlobalPool>> = Mutex::new(None);

// Serializes unit tests that change the configured thread count.
#[cfg(test)]
pub(crate) static THREAD_COUNT_TEST_LOCK: Mutex<()> = Mutex::new(());

/// Set the thread count used for the shared pool.
///
/// Takes effect on the next [`get_global_dispatch_pool`] call; dispatches already holding the
/// previous pool keep using it.
pub fn set_num_dispatch_threads(num_dispatch_threads: usize) {
    NUM_DISPATCH_THREADS.store(num_dispatch_threads, Ordering::Relaxed);
}

/// Currently configured thread count for the shared pool.
pub fn num_dispatch_threads() -> usize {
    NUM_DISPATCH_THREADS.load(Ordering::Relaxed)
}

/// Shared process-wide pool, built lazily on first use and rebuilt when the configured thread
/// count changes.
pub fn get_global_dispatch_pool() -> Arc<DispatchPool> {
    let size = num_dispatch_threads();
    let mut global = GLOBAL_POOL.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(existing) = global.as_ref()
        && existing.configured == size
    {
        return Arc::clone(&existing.pool);
    }

    tracing::debug!(
        previous = global.as_ref().map(|g| g.configured),
        size,
        "building global dispatch pool"
    );
    let pool = Arc::new(DispatchPool::new(size));
    // A replaced pool is joined once the last in-flight user releases it.
    *global = Some(GlobalPool {
        configured: size,
        pool: Arc::clone(&pool),
    });
    pool
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/global.rs"]
mod tests;
