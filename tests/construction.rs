/*!
 * Construction Failure and Initialization Order Tests
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use singleton_patterns::core::state::InitState;
use singleton_patterns::core::sync::{DeferredCell, GuardedCell, StartupCell};
use singleton_patterns::instances::RunContext;
use singleton_patterns::SingletonError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Debug)]
struct Flaky {
    attempt: usize,
}

#[test]
#[serial]
fn test_run_context_read_before_install_is_an_error() {
    assert!(matches!(
        RunContext::get(),
        Err(SingletonError::Uninitialized { .. })
    ));

    let installed = RunContext::install().unwrap();
    let fetched = RunContext::get().unwrap();
    assert!(std::ptr::eq(installed, fetched));

    let again = RunContext::install();
    assert!(matches!(again, Err(SingletonError::AlreadyInstalled { .. })));
    assert_eq!(RunContext::get().unwrap().run_id(), installed.run_id());
}

#[test]
fn test_dependent_global_sees_uninitialized_dependency() {
    static DEPENDENCY: StartupCell<u64> = StartupCell::new();
    static DEPENDENT: DeferredCell<u64> = DeferredCell::new();

    // Built too early: the dependency is not installed yet.
    let early: Result<&u64, SingletonError> =
        DEPENDENT.get_or_try_init(|| DEPENDENCY.get().map(|base| base * 2));
    assert!(matches!(early, Err(SingletonError::Uninitialized { .. })));
    assert_eq!(DEPENDENT.state(), InitState::Unconstructed);

    DEPENDENCY.install(21).unwrap();

    let late: Result<&u64, SingletonError> =
        DEPENDENT.get_or_try_init(|| DEPENDENCY.get().map(|base| base * 2));
    assert_eq!(late.copied(), Ok(42));
}

#[test]
fn test_guarded_failure_under_contention() {
    let cell = Arc::new(GuardedCell::<Flaky>::new());
    let attempts = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cell = cell.clone();
            let attempts = attempts.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                cell.get_or_try_init(|| {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt == 1 {
                        Err(SingletonError::construction::<Flaky>("first attempt fails"))
                    } else {
                        Ok(Flaky { attempt })
                    }
                })
                .map(|flaky| flaky as *const Flaky as usize)
            })
        })
        .collect();

    let results: Vec<Result<usize, SingletonError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    let failures = results.iter().filter(|r| r.is_err()).count();
    let successes: Vec<usize> = results.iter().filter_map(|r| r.clone().ok()).collect();

    // Only the caller that ran the failing constructor sees the error.
    assert_eq!(failures, 1);
    assert_eq!(successes.len(), 15);
    assert!(successes.iter().all(|&addr| addr == successes[0]));

    // One failed attempt, one successful one, nothing else.
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(cell.get().map(|f| f.attempt), Some(2));
    assert_eq!(cell.state(), InitState::Ready);
}

#[test]
fn test_deferred_failure_then_retry() {
    let cell: DeferredCell<Flaky> = DeferredCell::new();

    let err = cell
        .get_or_try_init(|| Err::<Flaky, _>(SingletonError::construction::<Flaky>("nope")))
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("Flaky"));
    assert!(!cell.is_initialized());

    let built = cell
        .get_or_try_init(|| Ok::<_, SingletonError>(Flaky { attempt: 2 }))
        .unwrap();
    assert_eq!(built.attempt, 2);
    assert_eq!(cell.state(), InitState::Ready);
}
