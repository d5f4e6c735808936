use std::sync::Arc;
use std::thread;
use std::time::Duration;

use slog::Logger;

use super::queue::TaskQueue;
use super::signal::{SignalPair, Wakeup};

/// 每执行完一个任务后让出的固定时长。
///
/// 在突发提交下抑制热循环的CPU占用,是延迟与CPU开销之间的可调权衡。
pub(crate) const POST_RUN_YIELD: Duration = Duration::from_millis(5);

/// 单个工作线程运行所需的共享状态
pub(crate) struct WorkerContext {
    pub(crate) queue: TaskQueue,
    pub(crate) signal: Arc<SignalPair>,
    pub(crate) logger: Logger,
}

/// 工作线程主循环。
///
/// 取队成功后work_available保持置位,下一次wait立即返回,
/// 该线程无需再次被唤醒即可继续检查队列;
/// 只有观察到队列为空的线程才清除信号。
pub(crate) fn run(ctx: WorkerContext) {
    loop {
        match ctx.signal.wait() {
            Wakeup::Terminate => break,
            Wakeup::Work => match ctx.queue.try_dequeue() {
                Some(item) => {
                    item.run(&ctx.logger);
                    thread::sleep(POST_RUN_YIELD);
                }
                None => {
                    ctx.signal.clear_work_available();
                    // 清信号与并发入队存在竞争:清除后队列若已非空,
                    // 恢复信号,使该任务不必等到下一次入队
                    if !ctx.queue.is_empty() {
                        ctx.signal.set_work_available();
                    }
                }
            },
        }
    }
    debug!(ctx.logger, "worker exited");
}
