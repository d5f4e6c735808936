use std::sync::{Condvar, Mutex, MutexGuard};

/// 工作线程被唤醒的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wakeup {
    /// 队列中可能有任务
    Work,
    /// 线程池正在关闭
    Terminate,
}

struct SignalState {
    work_available: bool,
    terminate: bool,
}

/// "有任务"与"终止"信号对
///
/// 同一个池的全部工作线程共享一个信号对:
/// - `work_available` 由提交方在入队后置位,由取队失败的工作线程清除;
/// - `terminate` 由shutdown置位,置位后不再清除,线程池不可重启。
///
/// 两个信号是联合观察的:工作线程阻塞到任一信号置位为止,
/// 醒来后先检查terminate,再检查work_available。
pub(crate) struct SignalPair {
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl SignalPair {
    pub(crate) fn new() -> SignalPair {
        SignalPair {
            state: Mutex::new(SignalState {
                work_available: false,
                terminate: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// 阻塞直到任一信号置位,返回唤醒原因。
    ///
    /// terminate优先于work_available:关闭期间队列中残留的任务被丢弃,
    /// 而不是被继续执行。
    pub(crate) fn wait(&self) -> Wakeup {
        let mut state = self.lock();
        loop {
            if state.terminate {
                return Wakeup::Terminate;
            }
            if state.work_available {
                return Wakeup::Work;
            }
            state = self
                .cond
                .wait(state)
                .expect("signal mutex poisoned");
        }
    }

    pub(crate) fn set_work_available(&self) {
        let mut state = self.lock();
        state.work_available = true;
        drop(state);
        self.cond.notify_one();
    }

    /// 仅在取队失败(队列观察为空)后调用。
    pub(crate) fn clear_work_available(&self) {
        self.lock().work_available = false;
    }

    pub(crate) fn set_terminate(&self) {
        let mut state = self.lock();
        state.terminate = true;
        drop(state);
        self.cond.notify_all();
    }

    fn lock(&self) -> MutexGuard<SignalState> {
        self.state.lock().expect("signal mutex poisoned")
    }
}
