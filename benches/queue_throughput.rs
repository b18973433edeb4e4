use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::thread;
use std::time::Duration;

use prioq::{
    CustomPriorityQueue, DefaultPriorityQueue, IntegerRangePriorityQueue, Priority, PriorityDomain,
    PriorityQueue, QueueConfig,
};

const NUM_MESSAGES: usize = 10_000;

fn config() -> QueueConfig {
    QueueConfig::default()
        .with_max_queue_depth(NUM_MESSAGES)
        .with_put_wait(Duration::from_secs(1))
}

fn bench_offer_then_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("offer_then_drain");
    group.throughput(Throughput::Elements(NUM_MESSAGES as u64));

    group.bench_function("five_level_indexed", |b| {
        b.iter_batched(
            || -> DefaultPriorityQueue<usize> {
                PriorityQueue::new(Priority::domain(), config()).unwrap()
            },
            |q| {
                for i in 0..NUM_MESSAGES {
                    q.offer_with_priority(i, Priority::ALL[i % 5]).unwrap();
                }
                while q.poll().unwrap().is_some() {}
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("int_range_100_indexed", |b| {
        b.iter_batched(
            || -> IntegerRangePriorityQueue<usize> {
                PriorityQueue::new(PriorityDomain::range(0, 99).unwrap(), config()).unwrap()
            },
            |q| {
                for i in 0..NUM_MESSAGES {
                    q.offer_with_priority(i, (i % 100) as i32).unwrap();
                }
                while q.poll().unwrap().is_some() {}
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("int_range_100_mapped", |b| {
        b.iter_batched(
            || -> CustomPriorityQueue<usize, i32> {
                PriorityQueue::new(PriorityDomain::range(0, 99).unwrap(), config()).unwrap()
            },
            |q| {
                for i in 0..NUM_MESSAGES {
                    q.offer_with_priority(i, (i % 100) as i32).unwrap();
                }
                while q.poll().unwrap().is_some() {}
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");
    group.throughput(Throughput::Elements(NUM_MESSAGES as u64));
    group.sample_size(20);

    group.bench_function("2p_2c_capacity_64", |b| {
        b.iter(|| {
            let cfg = config().with_max_queue_depth(64);
            let q: DefaultPriorityQueue<usize> =
                PriorityQueue::new(Priority::domain(), cfg).unwrap();
            let q = &q;
            thread::scope(|s| {
                for p in 0..2 {
                    s.spawn(move || {
                        for i in 0..NUM_MESSAGES / 2 {
                            q.offer_with_priority(i, Priority::ALL[(i + p) % 5]).unwrap();
                        }
                    });
                }
                for _ in 0..2 {
                    s.spawn(move || {
                        let mut got = 0;
                        while got < NUM_MESSAGES / 2 {
                            if let Ok(Some(_)) = q.poll_timeout(Duration::from_millis(10)) {
                                got += 1;
                            }
                        }
                    });
                }
            });
        })
    });

    group.finish();
}

criterion_group!(benches, bench_offer_then_drain, bench_contended);
criterion_main!(benches);
