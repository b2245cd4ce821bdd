use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;

use governor::Quota;
use governor::RateLimiter;
use governor::clock::QuantaClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use tokio::runtime::Builder;
use tokio::task::JoinSet;

use quota_gate::QuotaGate;
use quota_gate::RateLimit;

type Governor = RateLimiter<NotKeyed, InMemoryState, QuantaClock>;

/// Both admission paths of a limiter, so the gate and governor run through the same harness.
trait Limiter: Send + Sync + 'static {
    fn try_admit(&self) -> bool;

    fn wait(&self) -> impl Future<Output = ()> + Send + '_;
}

impl Limiter for QuotaGate {
    fn try_admit(&self) -> bool {
        self.try_acquire().is_continue()
    }

    fn wait(&self) -> impl Future<Output = ()> + Send + '_ {
        self.acquire()
    }
}

impl Limiter for Governor {
    fn try_admit(&self) -> bool {
        self.check().is_ok()
    }

    fn wait(&self) -> impl Future<Output = ()> + Send + '_ {
        async move { self.until_ready().await }
    }
}

fn bench_try_acquire<L: Limiter>(group_name: &str, c: &mut Criterion, limiter: &L) {
    let mut group = c.benchmark_group(group_name);
    group.bench_function("try-acquire", |b| {
        b.iter(|| black_box(limiter).try_admit())
    });
    group.finish();
}

/// Tasks spread over `workers` runtime threads all queue on one limiter.
fn bench_acquire<L: Limiter>(group_name: &str, c: &mut Criterion, limiter: Arc<L>) {
    let mut group = c.benchmark_group(group_name);

    for workers in [1, 2, 4, 8] {
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_time()
            .build()
            .unwrap();

        group.bench_with_input(
            BenchmarkId::new("acquire", format!("{workers}-workers")),
            &workers,
            |b, &workers| {
                b.iter_custom(|iters| {
                    let tasks = workers * 4;
                    let per_task = (iters / tasks as u64).max(1);
                    let limiter = Arc::clone(&limiter);

                    runtime.block_on(async move {
                        let start = Instant::now();
                        let mut set = JoinSet::new();
                        for _ in 0..tasks {
                            let limiter = Arc::clone(&limiter);
                            set.spawn(async move {
                                for _ in 0..per_task {
                                    limiter.wait().await;
                                }
                            });
                        }
                        set.join_all().await;
                        start.elapsed()
                    })
                });
            },
        );
    }
    group.finish();
}

fn run_all_benches(c: &mut Criterion) {
    // Fast enough that waits measure queueing overhead rather than the quota itself.
    let gate = Arc::new(QuotaGate::from_rate(
        RateLimit::per(Duration::from_secs(1), 1_000_000_000).unwrap(),
    ));
    let gov = Arc::new(RateLimiter::direct_with_clock(
        Quota::per_second(NonZeroU32::MAX),
        QuantaClock::default(),
    ));

    bench_try_acquire("QuotaGate", c, gate.as_ref());
    bench_acquire("QuotaGate", c, gate);

    bench_try_acquire("Governor", c, gov.as_ref());
    bench_acquire("Governor", c, gov);
}

criterion_group!(benches, run_all_benches);
criterion_main!(benches);
