use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::{unbounded, Receiver, Sender};
use slog::Logger;

/// 提交到线程池的任务闭包
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// 一次提交的工作单元:任务闭包加可选的完成回调
pub(crate) struct WorkItem {
    action: Job,
    on_complete: Option<Job>,
}

impl WorkItem {
    pub(crate) fn new(action: Job, on_complete: Option<Job>) -> WorkItem {
        WorkItem { action, on_complete }
    }

    /// 执行任务,随后调用完成回调。
    ///
    /// 任务内部的panic在此被捕获并丢弃,只通过给定logger记录;
    /// 无论任务成功与否,完成回调都会被调用。
    pub(crate) fn run(self, logger: &Logger) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(self.action)) {
            error!(logger, "submitted task panicked: {}", panic_reason(&payload));
        }
        if let Some(on_complete) = self.on_complete {
            on_complete();
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}

/// 多生产者多消费者的无界任务队列
///
/// 入队顺序即出队顺序,但不同提交方并发入队时的先后不作保证。
#[derive(Clone)]
pub(crate) struct TaskQueue {
    tx: Sender<WorkItem>,
    rx: Receiver<WorkItem>,
}

impl TaskQueue {
    pub(crate) fn new() -> TaskQueue {
        let (tx, rx) = unbounded();
        TaskQueue { tx, rx }
    }

    /// 入队,任意线程可并发调用,不阻塞。
    pub(crate) fn enqueue(&self, item: WorkItem) {
        // 队列自身持有接收端,发送不会失败
        self.tx.send(item).expect("task queue disconnected");
    }

    /// 非阻塞出队。队列为空时立即返回None。
    /// 同一个WorkItem不会被交付给两个取队方。
    pub(crate) fn try_dequeue(&self) -> Option<WorkItem> {
        self.rx.try_recv().ok()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
