#![deny(missing_docs)]
//! 一个简单的固定大小工作线程池库。

pub use error::{PoolError, Result};
pub use pool::{BatchHandle, WorkerPool};
pub use registry::{PoolRegistry, DEFAULT_POOL_ID};
pub use deferred::DeferredQueue;

#[macro_use]
extern crate slog;

mod error;
mod registry;
mod deferred;
pub mod pool;
