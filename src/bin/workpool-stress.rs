use clap::Parser;
use slog::{info, o, Drain, Logger};
use std::process::exit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use workpool::{DeferredQueue, Result, WorkerPool};

#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        author = env!("CARGO_PKG_AUTHORS"),
        about = env!("CARGO_PKG_DESCRIPTION"))]
struct Cli {
    /// 工作线程数,0表示按硬件并行度推导
    #[arg(long, default_value_t = 0)]
    threads: u32,

    /// 即发即弃任务的数量
    #[arg(long, default_value_t = 1000)]
    tasks: u32,

    /// 批提交任务的数量
    #[arg(long, default_value_t = 100)]
    batch: u32,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let logger = Logger::root(drain, o!());

    let threads = if cli.threads == 0 {
        workpool::pool::default_threads()
    } else {
        cli.threads
    };
    let pool = WorkerPool::with_logger(threads, logger.new(o!("pool" => 1)))?;
    info!(logger, "pool started"; "threads" => threads);

    let start = Instant::now();

    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..cli.tasks {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            completed.fetch_add(1, Ordering::Relaxed);
        })?;
    }

    let batch_completed = Arc::new(AtomicUsize::new(0));
    let actions: Vec<_> = (0..cli.batch)
        .map(|_| {
            let batch_completed = Arc::clone(&batch_completed);
            move || {
                batch_completed.fetch_add(1, Ordering::Relaxed);
            }
        })
        .collect();
    let handle = pool.submit_batch(actions)?;
    handle.wait()?;
    info!(logger, "batch completed";
        "tasks" => cli.batch,
        "elapsed_ms" => start.elapsed().as_millis() as u64);

    while completed.load(Ordering::Relaxed) < cli.tasks as usize {
        thread::sleep(Duration::from_millis(5));
    }
    info!(logger, "fire-and-forget tasks completed"; "tasks" => cli.tasks);

    let deferred = DeferredQueue::new();
    let drained = Arc::new(AtomicUsize::new(0));
    for _ in 0..16 {
        let drained = Arc::clone(&drained);
        deferred.schedule(move || {
            drained.fetch_add(1, Ordering::Relaxed);
        });
    }
    let ran = deferred.drain(Duration::from_millis(50));
    info!(logger, "deferred queue drained"; "ran" => ran, "left" => deferred.len());

    pool.shutdown()?;

    let total = completed.load(Ordering::Relaxed) + batch_completed.load(Ordering::Relaxed);
    println!("completed {} tasks in {:?}", total, start.elapsed());
    Ok(())
}
