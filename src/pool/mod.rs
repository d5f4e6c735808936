//! 固定大小的工作线程池
//!
//! 一个池由三部分组成:一个无界任务队列、一对"有任务/终止"信号、
//! 以及固定数量的长驻工作线程。线程数在创建时确定,池的生命周期内不变。
//! 提交操作从不阻塞;只有批句柄的wait、工作线程的信号等待
//! 和shutdown的join会阻塞。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use slog::Logger;

use crate::error::{PoolError, Result};

mod batch;
mod queue;
mod signal;
mod worker;

pub use batch::BatchHandle;

use batch::BatchCounter;
use queue::{TaskQueue, WorkItem};
use signal::SignalPair;
use worker::WorkerContext;

// 池状态机:Running -> Terminating -> Terminated,不可逆
const RUNNING: usize = 0;
const TERMINATING: usize = 1;
const TERMINATED: usize = 2;

/// 按硬件并行度推导的默认工作线程数:可用核数的一半,至少为1。
pub fn default_threads() -> u32 {
    (num_cpus::get() / 2).max(1) as u32
}

/// 固定大小的工作线程池
///
/// 所有工作线程在构造时立即启动,只在shutdown时退出。
/// 任务内部的panic被工作线程捕获并丢弃,不会影响线程池运行;
/// 若构造时给定了logger,panic会通过它记录。
pub struct WorkerPool {
    queue: TaskQueue,
    signal: Arc<SignalPair>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    state: AtomicUsize,
    threads: u32,
    logger: Logger,
}

impl WorkerPool {
    /// 创建线程池并立即启动给定数量的工作线程
    ///
    /// # Errors
    ///
    /// `threads`为0时返回错误;任一线程启动失败时,
    /// 所有已启动线程会被终止,然后返回错误。
    pub fn new(threads: u32) -> Result<WorkerPool> {
        WorkerPool::with_logger(threads, Logger::root(slog::Discard, o!()))
    }

    /// 创建默认大小的线程池,线程数由硬件并行度推导
    pub fn with_default_size() -> Result<WorkerPool> {
        WorkerPool::new(default_threads())
    }

    /// 创建线程池,任务panic等事件通过给定logger记录
    pub fn with_logger(threads: u32, logger: Logger) -> Result<WorkerPool> {
        if threads == 0 {
            return Err(PoolError::StringError(
                "Argument 'threads' must be positive".to_string(),
            ));
        }

        let queue = TaskQueue::new();
        let signal = Arc::new(SignalPair::new());
        let mut handles = Vec::with_capacity(threads as usize);

        for id in 0..threads {
            let ctx = WorkerContext {
                queue: queue.clone(),
                signal: Arc::clone(&signal),
                logger: logger.new(o!("worker" => id)),
            };
            match thread::Builder::new().spawn(move || worker::run(ctx)) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // 任一线程启动失败时终止所有已启动线程
                    signal.set_terminate();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Io(e));
                }
            }
        }

        debug!(logger, "worker pool started"; "threads" => threads);

        Ok(WorkerPool {
            queue,
            signal,
            workers: Mutex::new(handles),
            state: AtomicUsize::new(RUNNING),
            threads,
            logger,
        })
    }

    /// 池中工作线程的数量
    pub fn thread_count(&self) -> u32 {
        self.threads
    }

    /// 提交一个即发即弃的任务
    ///
    /// 立即返回,不保证与其他提交之间的执行顺序,没有可观察的结果。
    /// 任意线程可调用,包括正在执行的任务内部。
    ///
    /// # Errors
    ///
    /// 线程池已关闭时返回`PoolError::PoolShutDown`
    pub fn submit<F>(&self, action: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.ensure_running()?;
        self.queue.enqueue(WorkItem::new(Box::new(action), None));
        self.signal.set_work_available();
        Ok(())
    }

    /// 提交一批任务,返回联合完成句柄
    ///
    /// 句柄在批内全部任务执行完毕(无论成功还是panic)后被解析,
    /// 与执行顺序和执行线程无关。空批的句柄在返回前即被解析,
    /// 不入队任何任务。
    ///
    /// # Errors
    ///
    /// 线程池已关闭时返回`PoolError::PoolShutDown`
    pub fn submit_batch<I>(&self, actions: I) -> Result<BatchHandle>
    where
        I: IntoIterator,
        I::Item: FnOnce() + Send + 'static,
    {
        self.ensure_running()?;

        let actions: Vec<_> = actions.into_iter().collect();
        let (counter, handle) = BatchCounter::new(actions.len());

        for action in actions {
            let item = WorkItem::new(Box::new(action), Some(counter.completion_callback()));
            self.queue.enqueue(item);
            self.signal.set_work_available();
        }

        Ok(handle)
    }

    /// 关闭线程池
    ///
    /// 置terminate信号,阻塞直到每个工作线程退出。
    /// 已入队但未被取走的任务不会被执行。
    /// 正在执行的任务不会被打断,会运行到结束。
    ///
    /// # Errors
    ///
    /// 线程池已关闭时返回`PoolError::PoolShutDown`
    pub fn shutdown(&self) -> Result<()> {
        if self
            .state
            .compare_exchange(RUNNING, TERMINATING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PoolError::PoolShutDown);
        }

        self.signal.set_terminate();

        let handles: Vec<_> = {
            let mut workers = self
                .workers
                .lock()
                .expect("worker handles mutex poisoned");
            workers.drain(..).collect()
        };
        for handle in handles {
            if handle.join().is_err() {
                error!(self.logger, "worker thread panicked during shutdown");
            }
        }

        self.state.store(TERMINATED, Ordering::SeqCst);
        debug!(self.logger, "worker pool terminated");
        Ok(())
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state.load(Ordering::SeqCst) != RUNNING {
            return Err(PoolError::PoolShutDown);
        }
        Ok(())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.state.load(Ordering::SeqCst) == RUNNING {
            let _ = self.shutdown();
        }
    }
}
