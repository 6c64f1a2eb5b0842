use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// 0-based counter value of a job within one dispatch.
pub type GlobalId = usize;
/// 0-based index of the thread running a job; always `< DispatchPool::size()`.
pub type LocalId = usize;

type DispatchFn<'a> = dyn Fn(GlobalId, LocalId) + Sync + 'a;
type PanicPayload = Box<dyn Any + Send + 'static>;

struct State {
    available_work: usize,
    completed_work: usize,
    target_work: usize,
    shutdown: bool,
    // Only `Some` between the start of a dispatch and its completion barrier.
    function: Option<&'static DispatchFn<'static>>,
    panic: Option<PanicPayload>,
}

struct Shared {
    state: Mutex<State>,
    available_cv: Condvar,
    completed_cv: Condvar,
}

/// General-purpose parallel dispatch over a counter.
///
/// A dispatch is a compute job parameterized by an index, i.e. a parallel `for` loop:
///
/// ```
/// # use rasterfx::DispatchPool;
/// # use std::sync::atomic::{AtomicUsize, Ordering};
/// let pool = DispatchPool::new(4);
/// let sum = AtomicUsize::new(0);
/// pool.dispatch(100, |i, _local_id| {
///     sum.fetch_add(i, Ordering::Relaxed);
/// });
/// assert_eq!(sum.into_inner(), 4950);
/// ```
///
/// Work is handed out by advancing a shared counter rather than through a queue, so dispatching
/// millions of jobs (one per pixel row of a large image) costs constant memory.
///
/// The thread count is fixed at construction. The calling thread always participates as local
/// id `0`, so `size()` is the number of spawned workers plus one; per-thread scratch buffers can
/// be sized with it and indexed by the local id.
///
/// Only one dispatch runs at a time. Calling [`DispatchPool::dispatch`] from several threads is
/// safe; the calls are serialized. Calling it from inside a dispatched function deadlocks.
///
/// A panic inside the function does not poison the pool: it is caught on the thread that ran the
/// job, the rest of the batch still runs, and the first payload is re-raised from `dispatch` on
/// the calling thread once every thread has left the function.
///
/// Workers are long-lived while the dispatched function borrows from the caller's stack, so its
/// lifetime is erased for the duration of one dispatch. This is the only `unsafe` in the crate and
/// the reason it uses `deny(unsafe_code)` rather than `forbid`; the completion barrier, reached
/// even when the function panics, bounds every use of the borrow.
pub struct DispatchPool {
    shared: Arc<Shared>,
    dispatch_lock: Mutex<()>,
    threads: Vec<JoinHandle<()>>,
}

impl DispatchPool {
    /// Spawn `max(size, 1) - 1` workers.
    ///
    /// If the OS refuses to spawn a worker the pool keeps the ones it got; `size()` reports the
    /// effective thread count.
    pub fn new(size: usize) -> Self {
        let num_threads = size.max(1) - 1;
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                available_work: 0,
                completed_work: 0,
                target_work: 0,
                shutdown: false,
                function: None,
                panic: None,
            }),
            available_cv: Condvar::new(),
            completed_cv: Condvar::new(),
        });

        let mut threads = Vec::with_capacity(num_threads);
        for i in 0..num_threads {
            let shared = Arc::clone(&shared);
            // The calling thread is always local id 0.
            let id = i + 1;
            let spawned = thread::Builder::new()
                .name(format!("rasterfx-dispatch-{id}"))
                .spawn(move || shared.thread_func(id, num_threads + 1));
            match spawned {
                Ok(handle) => threads.push(handle),
                Err(err) => {
                    tracing::warn!(requested = size, spawned = i, %err, "failed to spawn dispatch worker");
                    break;
                }
            }
        }

        // Workers that started before a spawn failure still compute batch sizes from the
        // requested count; that only makes their chunks smaller, never overlapping.
        Self {
            shared,
            dispatch_lock: Mutex::new(()),
            threads,
        }
    }

    /// Number of threads taking part in a dispatch, including the caller.
    pub fn size(&self) -> usize {
        self.threads.len() + 1
    }

    /// Run `function(i, local_id)` exactly once for every `i` in `[0, count)`.
    ///
    /// Returns after every invocation has finished. Invocation order across threads is
    /// unspecified, so `function` must tolerate concurrent calls for distinct indices.
    pub fn dispatch<F>(&self, count: usize, function: F)
    where
        F: Fn(GlobalId, LocalId) + Sync,
    {
        let _serial = lock(&self.dispatch_lock);
        tracing::trace!(count, threads = self.size(), "dispatch");

        let function: &DispatchFn<'_> = &function;
        // SAFETY: the reference is published in `State::function` only until the completion
        // barrier below. Workers copy it when claiming a chunk and stop using it before adding
        // that chunk to `completed_work`; panics are caught on every thread, so the barrier is
        // always reached before this frame (and the borrow) ends.
        #[allow(unsafe_code)]
        let function: &'static DispatchFn<'static> = unsafe {
            std::mem::transmute::<&DispatchFn<'_>, &'static DispatchFn<'static>>(function)
        };

        let mut st = lock(&self.shared.state);
        st.available_work = 0;
        st.completed_work = 0;
        st.target_work = count;
        st.function = Some(function);
        st.panic = None;

        // Execute the caller's share; this also wakes the first waiting worker.
        st = self.shared.execute_batch(st, 0, self.size());

        st = self
            .shared
            .completed_cv
            .wait_while(st, |s| s.completed_work != s.target_work)
            .unwrap_or_else(PoisonError::into_inner);

        st.function = None;
        let panic = st.panic.take();
        drop(st);

        if let Some(payload) = panic {
            panic::resume_unwind(payload);
        }
    }

    /// Like [`DispatchPool::dispatch`], but runs every job serially on the calling thread with
    /// local id `0` when `threshold` is `false`.
    pub fn dispatch_threshold<F>(&self, count: usize, threshold: bool, function: F)
    where
        F: Fn(GlobalId, LocalId) + Sync,
    {
        if threshold {
            self.dispatch(count, function);
        } else {
            for i in 0..count {
                function(i, 0);
            }
        }
    }
}

impl Shared {
    fn thread_func(&self, id: LocalId, thread_count: usize) {
        let mut st = lock(&self.state);
        loop {
            st = self
                .available_cv
                .wait_while(st, |s| !s.shutdown && s.available_work >= s.target_work)
                .unwrap_or_else(PoisonError::into_inner);

            if st.shutdown {
                return;
            }

            st = self.execute_batch(st, id, thread_count);
        }
    }

    fn execute_batch<'g>(
        &'g self,
        mut st: MutexGuard<'g, State>,
        id: LocalId,
        thread_count: usize,
    ) -> MutexGuard<'g, State> {
        let batch_size = st.target_work.div_ceil(thread_count);
        let start = st.available_work;
        let end = (start + batch_size).min(st.target_work);
        st.available_work = end;
        let function = st.function;
        drop(st);

        // Now that the lock is released, let the next waiting thread claim its own chunk.
        self.available_cv.notify_one();

        let mut first_panic = None;
        if let Some(function) = function {
            for index in start..end {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| function(index, id)))
                    && first_panic.is_none()
                {
                    first_panic = Some(payload);
                }
            }
        }

        let mut st = lock(&self.state);
        st.completed_work += end - start;
        if st.panic.is_none() {
            st.panic = first_panic;
        }
        if st.completed_work == st.target_work {
            self.completed_cv.notify_one();
        }
        st
    }
}

impl Drop for DispatchPool {
    /// Stops and joins every worker. No dispatch may be in flight.
    fn drop(&mut self) {
        lock(&self.shared.state).shutdown = true;
        self.shared.available_cv.notify_all();

        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("dispatch worker exited with a panic");
            }
        }
    }
}

impl std::fmt::Debug for DispatchPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchPool")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/pool.rs"]
mod tests;
