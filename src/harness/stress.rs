/*!
 * Concurrent Stress Harness
 *
 * Releases many threads at once against an accessor and records what each
 * call returned.
 */

use super::report::StressReport;
use crate::core::limits::{DEFAULT_STRESS_ROUNDS, DEFAULT_STRESS_THREADS};
use crate::core::types::Identity;
use crate::instances::{RunContext, Singleton};
use serde::Serialize;
use std::sync::Barrier;
use std::thread;
use std::time::Instant;
use tracing::{info, info_span, warn};
use uuid::Uuid;

/// Stress run shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StressConfig {
    /// Threads released together through a barrier
    pub threads: usize,
    /// Accessor calls per thread
    pub rounds: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_STRESS_THREADS,
            rounds: DEFAULT_STRESS_ROUNDS,
        }
    }
}

impl StressConfig {
    /// Small run for unit tests
    pub const fn quick() -> Self {
        Self {
            threads: 8,
            rounds: 4,
        }
    }

    /// Many threads hammering the fast path
    pub const fn heavy() -> Self {
        Self {
            threads: 256,
            rounds: 64,
        }
    }
}

/// Stress an arbitrary accessor
///
/// `inspect` runs on every returned reference and reports how many of its
/// fields look partially constructed.
pub fn stress<'a, T, A, I>(config: &StressConfig, access: A, inspect: I) -> StressReport
where
    T: ?Sized + Sync + 'a,
    A: Fn() -> &'a T + Sync,
    I: Fn(&T) -> usize + Sync,
{
    let threads = config.threads.max(1);
    let rounds = config.rounds.max(1);
    let barrier = Barrier::new(threads);
    let started = Instant::now();

    let outcomes: Vec<thread::Result<(Vec<Identity>, usize)>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    let mut seen = Vec::with_capacity(rounds);
                    let mut torn = 0;
                    for _ in 0..rounds {
                        let instance = access();
                        seen.push(Identity::of(instance));
                        torn += inspect(instance);
                    }
                    (seen, torn)
                })
            })
            .collect();

        handles.into_iter().map(|handle| handle.join()).collect()
    });

    let elapsed = started.elapsed();
    let mut identities = Vec::with_capacity(threads * rounds);
    let mut torn_reads = 0;
    let mut panicked_threads = 0;

    for outcome in outcomes {
        match outcome {
            Ok((seen, torn)) => {
                identities.extend(seen);
                torn_reads += torn;
            }
            Err(_) => panicked_threads += 1,
        }
    }

    let mut report = StressReport::new(current_run_id(), threads, identities);
    report.torn_reads = torn_reads;
    report.panicked_threads = panicked_threads;
    report.elapsed_us = elapsed.as_micros() as u64;
    report
}

/// Stress a process-wide singleton and attach its construction count
pub fn stress_singleton<S: Singleton>(config: &StressConfig) -> StressReport {
    let span = info_span!("stress", variant = %S::VARIANT, threads = config.threads);
    let _entered = span.enter();

    let report = stress(config, S::instance, |instance: &S| {
        instance.sentinel().torn_fields()
    })
    .with_variant(S::VARIANT)
    .with_constructions(S::constructions());

    if report.is_clean() {
        info!(report = %report, "stress run clean");
    } else {
        warn!(report = %report, "stress run found violations");
    }
    report
}

fn current_run_id() -> Uuid {
    RunContext::get()
        .map(RunContext::run_id)
        .unwrap_or_else(|_| Uuid::new_v4())
}
