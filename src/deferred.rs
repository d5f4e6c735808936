//! 同步延迟队列
//!
//! 与工作线程池无关的FIFO队列:任意线程可投递零参动作,
//! 由调用drain的线程在给定时间预算内就地逐个执行。

use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};

type DeferredAction = Box<dyn FnOnce() + Send + 'static>;

/// 延迟执行队列
pub struct DeferredQueue {
    tx: Sender<DeferredAction>,
    rx: Receiver<DeferredAction>,
}

impl DeferredQueue {
    /// 创建空队列
    pub fn new() -> DeferredQueue {
        let (tx, rx) = unbounded();
        DeferredQueue { tx, rx }
    }

    /// 投递一个动作。任意线程可调用,立即返回。
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // 队列自身持有接收端,发送不会失败
        self.tx
            .send(Box::new(action))
            .expect("deferred queue disconnected");
    }

    /// 在调用线程上按FIFO逐个执行排队的动作
    ///
    /// 每次取出动作前检查自调用开始起的耗时,达到预算即停止;
    /// 正在执行的动作不会被打断,即使它超出预算。
    /// 返回本次执行的动作数量,剩余动作留待下一次drain。
    pub fn drain(&self, budget: Duration) -> usize {
        let start = Instant::now();
        let mut ran = 0;
        while start.elapsed() < budget {
            match self.rx.try_recv() {
                Ok(action) => {
                    action();
                    ran += 1;
                }
                Err(_) => break,
            }
        }
        ran
    }

    /// 当前排队的动作数量
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for DeferredQueue {
    fn default() -> DeferredQueue {
        DeferredQueue::new()
    }
}
