use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use workpool::DeferredQueue;

#[test]
fn drain_runs_in_fifo_order() {
    let queue = DeferredQueue::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..5 {
        let order = Arc::clone(&order);
        queue.schedule(move || {
            order.lock().unwrap().push(i);
        });
    }

    let ran = queue.drain(Duration::from_secs(1));
    assert_eq!(ran, 5);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    assert!(queue.is_empty());
}

#[test]
fn drain_on_empty_queue_returns_immediately() {
    let queue = DeferredQueue::new();
    assert_eq!(queue.drain(Duration::from_secs(1)), 0);
}

#[test]
fn drain_respects_time_budget() {
    let queue = DeferredQueue::new();
    for _ in 0..2 {
        queue.schedule(|| thread::sleep(Duration::from_millis(30)));
    }

    // 第一个动作取出后运行超出预算:它不被打断,但第二个动作留在队列中
    assert_eq!(queue.drain(Duration::from_millis(10)), 1);
    assert_eq!(queue.len(), 1);

    // 剩余动作由下一次drain接手
    assert_eq!(queue.drain(Duration::from_millis(10)), 1);
    assert!(queue.is_empty());
}

#[test]
fn schedule_from_multiple_threads() {
    let queue = Arc::new(DeferredQueue::new());
    let mut producers = Vec::new();

    for _ in 0..4 {
        let queue = Arc::clone(&queue);
        producers.push(thread::spawn(move || {
            for _ in 0..25 {
                queue.schedule(|| {});
            }
        }));
    }
    for producer in producers {
        producer.join().unwrap();
    }

    assert_eq!(queue.len(), 100);
    assert_eq!(queue.drain(Duration::from_secs(5)), 100);
}

#[test]
fn drain_only_runs_on_the_calling_thread() {
    let queue = DeferredQueue::new();
    let drained_by = Arc::new(Mutex::new(None));

    let recorded = Arc::clone(&drained_by);
    queue.schedule(move || {
        *recorded.lock().unwrap() = Some(thread::current().id());
    });

    let counter = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&counter);
    queue.schedule(move || {
        counted.fetch_add(1, Ordering::SeqCst);
    });

    queue.drain(Duration::from_secs(1));
    assert_eq!(*drained_by.lock().unwrap(), Some(thread::current().id()));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
