/*!
 * Property Tests
 *
 * Uniqueness and single construction for any thread count and call
 * pattern, checked on fresh cells so each case starts unconstructed.
 */

use proptest::prelude::*;
use singleton_patterns::core::state::InitState;
use singleton_patterns::core::sync::{DeferredCell, GuardedCell};
use singleton_patterns::harness::{stress, StressConfig};
use std::sync::atomic::{AtomicUsize, Ordering};

const FIELDS: usize = 6;
const PATTERN: u64 = 0x5A5A_5A5A_5A5A_5A5A;

fn build_payload(builds: &AtomicUsize) -> [u64; FIELDS] {
    builds.fetch_add(1, Ordering::SeqCst);
    let mut fields = [0u64; FIELDS];
    for field in fields.iter_mut() {
        *field = PATTERN;
        std::thread::yield_now();
    }
    fields
}

fn torn(payload: &[u64; FIELDS]) -> usize {
    payload.iter().filter(|&&f| f != PATTERN).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn guarded_cell_unique_for_any_thread_count(threads in 1usize..48, rounds in 1usize..8) {
        let cell = GuardedCell::new();
        let builds = AtomicUsize::new(0);

        let report = stress(
            &StressConfig { threads, rounds },
            || cell.get_or_init(|| build_payload(&builds)),
            torn,
        )
        .with_constructions(builds.load(Ordering::SeqCst));

        prop_assert!(report.is_clean(), "{}", report);
        prop_assert_eq!(report.calls, threads * rounds);
        prop_assert_eq!(cell.state(), InitState::Ready);
    }

    #[test]
    fn deferred_cell_unique_for_any_thread_count(threads in 1usize..48, rounds in 1usize..8) {
        let cell = DeferredCell::new();
        let builds = AtomicUsize::new(0);

        let report = stress(
            &StressConfig { threads, rounds },
            || cell.get_or_init(|| build_payload(&builds)),
            torn,
        )
        .with_constructions(builds.load(Ordering::SeqCst));

        prop_assert!(report.is_clean(), "{}", report);
        prop_assert_eq!(report.distinct_identities, 1);
    }

    #[test]
    fn sequential_calls_construct_once(calls in 1usize..200) {
        let cell = GuardedCell::new();
        let builds = AtomicUsize::new(0);

        let first = cell.get_or_init(|| build_payload(&builds)) as *const _;
        for _ in 1..calls {
            let next = cell.get_or_init(|| build_payload(&builds)) as *const _;
            prop_assert_eq!(first, next);
        }
        prop_assert_eq!(builds.load(Ordering::SeqCst), 1);
    }
}
