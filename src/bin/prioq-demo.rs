//! Load demo for the prioq priority queue.
//!
//! Spawns producer threads that offer items across the five-level priority
//! scale and consumer threads that poll them back, then prints the queue's
//! counters. Limits come from `prioq.toml` (or `--config`) plus `PRIOQ_*`
//! environment overrides.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};

use prioq::logging::init_logging;
use prioq::{DefaultPriorityQueue, Priority, PriorityQueue, QueueConfig, QueueError};

/// Command-line interface for the demo.
#[derive(Debug, Parser)]
#[command(
    name = "prioq-demo",
    version,
    about = "Drive a bounded priority queue with concurrent producers and consumers"
)]
struct Cli {
    /// Path to a TOML or YAML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Number of producer threads
    #[arg(short, long, default_value_t = 4)]
    producers: usize,

    /// Number of consumer threads
    #[arg(short = 'n', long, default_value_t = 2)]
    consumers: usize,

    /// Items offered by each producer
    #[arg(short, long, default_value_t = 10_000)]
    items: u64,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let config = QueueConfig::load(cli.config.as_deref())?;
    info!(?config, producers = cli.producers, consumers = cli.consumers, "starting demo");

    let queue: DefaultPriorityQueue<u64> = PriorityQueue::new(Priority::domain(), config)?;
    let producers_done = AtomicBool::new(false);
    let per_priority: [AtomicU64; 5] = Default::default();

    let (queue, producers_done, per_priority) = (&queue, &producers_done, &per_priority);
    let items = cli.items;

    let started = Instant::now();
    thread::scope(|s| -> anyhow::Result<()> {
        let consumers: Vec<_> = (0..cli.consumers)
            .map(|_| {
                s.spawn(move || loop {
                    match queue.poll_wait(true) {
                        Ok(Some(item)) => {
                            let level = Priority::ALL[(item % 5) as usize];
                            per_priority[level.ordinal()].fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(None) if producers_done.load(Ordering::Acquire) && queue.is_empty() => {
                            break
                        }
                        Ok(None) | Err(QueueError::PollTimeout) => {}
                        Err(e) => {
                            warn!(error = %e, "consumer stopped");
                            break;
                        }
                    }
                })
            })
            .collect();

        let producers: Vec<_> = (0..cli.producers)
            .map(|p| {
                s.spawn(move || -> Result<u64, QueueError> {
                    let mut rejected = 0;
                    for i in 0..items {
                        let item = p as u64 * items + i;
                        match queue.offer_with_priority(item, Priority::ALL[(item % 5) as usize]) {
                            Ok(()) => {}
                            Err(e) if e.is_timeout() => rejected += 1,
                            Err(e) => return Err(e),
                        }
                    }
                    Ok(rejected)
                })
            })
            .collect();

        let mut rejected = 0;
        for handle in producers {
            rejected += handle
                .join()
                .map_err(|_| anyhow::anyhow!("producer thread panicked"))??;
        }
        producers_done.store(true, Ordering::Release);
        for handle in consumers {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;
        }
        info!(rejected, "producers and consumers finished");
        Ok(())
    })?;

    info!(elapsed_ms = started.elapsed().as_millis() as u64, "demo complete");
    for level in Priority::ALL.iter().rev() {
        println!(
            "{:<8} {}",
            format!("{level:?}"),
            per_priority[level.ordinal()].load(Ordering::Relaxed)
        );
    }
    print!("{}", queue.stats().snapshot().render());
    Ok(())
}
