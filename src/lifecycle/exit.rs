/*!
 * Exit Hooks
 * Process-wide teardown actions, run once in reverse registration order
 */

use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info};

type HookFn = Box<dyn FnOnce() + Send + 'static>;

struct ExitHook {
    name: &'static str,
    action: HookFn,
}

static EXIT_HOOKS: Mutex<Vec<ExitHook>> = parking_lot::const_mutex(Vec::new());
static HOOKS_RUN: AtomicUsize = AtomicUsize::new(0);

/// Register a teardown action owned by the process
///
/// Hooks run during [`run_exit_hooks`], most recently registered first, so a
/// singleton that depends on another is torn down before its dependency.
pub fn register_exit_hook<F>(name: &'static str, hook: F)
where
    F: FnOnce() + Send + 'static,
{
    EXIT_HOOKS.lock().push(ExitHook {
        name,
        action: Box::new(hook),
    });
    debug!(hook = name, "exit hook registered");
}

/// Number of hooks waiting to run
pub fn pending_exit_hooks() -> usize {
    EXIT_HOOKS.lock().len()
}

/// Total hooks run since process start
pub fn completed_exit_hooks() -> usize {
    HOOKS_RUN.load(Ordering::Acquire)
}

/// Run every pending exit hook exactly once
///
/// Returns how many hooks ran. Hooks registered while this runs (for
/// example by a hook touching another singleton) are picked up before it
/// returns. A panicking hook is logged and the remaining hooks still run.
///
/// # Safety
///
/// Hooks may free process-wide singletons. The caller must ensure no thread
/// still holds or will later use a reference obtained from a singleton whose
/// teardown is registered here.
pub unsafe fn run_exit_hooks() -> usize {
    let mut ran = 0;

    loop {
        let batch: Vec<ExitHook> = std::mem::take(&mut *EXIT_HOOKS.lock());
        if batch.is_empty() {
            break;
        }

        for hook in batch.into_iter().rev() {
            let name = hook.name;
            match panic::catch_unwind(AssertUnwindSafe(hook.action)) {
                Ok(()) => debug!(hook = name, "exit hook completed"),
                Err(_) => error!(hook = name, "exit hook panicked"),
            }
            ran += 1;
        }
    }

    if ran > 0 {
        HOOKS_RUN.fetch_add(ran, Ordering::AcqRel);
        info!(hooks = ran, "process teardown complete");
    }
    ran
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Arc;

    #[test]
    #[serial]
    fn test_hooks_run_in_reverse_order_once() {
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            register_exit_hook("test_order", move || order.lock().push(tag));
        }

        // SAFETY: these hooks free nothing.
        let ran = unsafe { run_exit_hooks() };
        assert_eq!(ran, 3);
        assert_eq!(*order.lock(), vec!["third", "second", "first"]);

        // SAFETY: as above.
        assert_eq!(unsafe { run_exit_hooks() }, 0);
        assert_eq!(order.lock().len(), 3);
    }

    #[test]
    #[serial]
    fn test_panicking_hook_does_not_stop_others() {
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        register_exit_hook("test_survivor", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        register_exit_hook("test_panics", || panic!("hook failure"));

        // SAFETY: these hooks free nothing.
        let ran = unsafe { run_exit_hooks() };
        assert_eq!(ran, 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_hook_registered_during_teardown_runs() {
        let hits = Arc::new(AtomicUsize::new(0));

        let outer = hits.clone();
        register_exit_hook("test_outer", move || {
            let inner = outer.clone();
            outer.fetch_add(1, Ordering::SeqCst);
            register_exit_hook("test_inner", move || {
                inner.fetch_add(10, Ordering::SeqCst);
            });
        });

        // SAFETY: these hooks free nothing.
        let ran = unsafe { run_exit_hooks() };
        assert_eq!(ran, 2);
        assert_eq!(hits.load(Ordering::SeqCst), 11);
        assert_eq!(pending_exit_hooks(), 0);
    }
}
