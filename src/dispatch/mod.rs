//! Fixed-size parallel dispatch and the process-wide shared pool.

pub mod global;
pub mod pool;

pub use global::{
    DEFAULT_DISPATCH_THREADS, get_global_dispatch_pool, num_dispatch_threads,
    set_num_dispatch_threads,
};
pub use pool::{DispatchPool, GlobalId, LocalId};
