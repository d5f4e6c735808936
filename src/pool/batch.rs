use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use super::queue::Job;
use crate::error::{PoolError, Result};

/// 一批任务的联合完成句柄
///
/// 批内全部任务执行完毕(无论成功还是panic)时句柄被解析,且只解析一次;
/// 解析由最后一个将计数减到零的工作线程完成。
pub struct BatchHandle {
    done: Receiver<()>,
    resolved: AtomicBool,
}

impl BatchHandle {
    fn new(done: Receiver<()>) -> BatchHandle {
        BatchHandle {
            done,
            resolved: AtomicBool::new(false),
        }
    }

    /// 阻塞直到批内全部任务完成。可重复调用,解析后立即返回。
    ///
    /// # Errors
    ///
    /// 若线程池在批完成前被销毁,返回`PoolError::BatchAbandoned`
    pub fn wait(&self) -> Result<()> {
        if self.resolved.load(Ordering::Acquire) {
            return Ok(());
        }
        match self.done.recv() {
            Ok(()) => {
                self.resolved.store(true, Ordering::Release);
                Ok(())
            }
            Err(_) => Err(PoolError::BatchAbandoned),
        }
    }

    /// 至多等待timeout。批已完成返回Ok(true),超时返回Ok(false)。
    ///
    /// # Errors
    ///
    /// 若线程池在批完成前被销毁,返回`PoolError::BatchAbandoned`
    pub fn wait_timeout(&self, timeout: Duration) -> Result<bool> {
        if self.resolved.load(Ordering::Acquire) {
            return Ok(true);
        }
        match self.done.recv_timeout(timeout) {
            Ok(()) => {
                self.resolved.store(true, Ordering::Release);
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => Err(PoolError::BatchAbandoned),
        }
    }
}

/// 批完成计数器
///
/// 初值为批大小,批内每个WorkItem的完成回调原子递减一次,
/// 减到零的那一次解析配对的句柄。
pub(crate) struct BatchCounter {
    remaining: Arc<AtomicUsize>,
    done: Sender<()>,
}

impl BatchCounter {
    /// 创建计数器与其配对的句柄。count为0时句柄在返回前即被解析。
    pub(crate) fn new(count: usize) -> (BatchCounter, BatchHandle) {
        let (tx, rx) = bounded(1);
        if count == 0 {
            // 空批:不入队任何任务,直接解析
            let _ = tx.send(());
        }
        let counter = BatchCounter {
            remaining: Arc::new(AtomicUsize::new(count)),
            done: tx,
        };
        (counter, BatchHandle::new(rx))
    }

    /// 生成一个完成回调,批内每个WorkItem各持有一个。
    pub(crate) fn completion_callback(&self) -> Job {
        let remaining = Arc::clone(&self.remaining);
        let done = self.done.clone();
        Box::new(move || {
            // 只有减到零的那个回调解析句柄
            if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                let _ = done.send(());
            }
        })
    }
}
