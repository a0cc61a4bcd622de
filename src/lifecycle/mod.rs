/*!
 * Process Lifecycle
 *
 * Scoped ownership of process-lifetime state: singletons that need a
 * destructor register an exit hook, and the [`ProcessLifetime`] guard held
 * by `main` runs those hooks when the program finishes.
 */

mod exit;

pub use exit::{completed_exit_hooks, pending_exit_hooks, register_exit_hook, run_exit_hooks};

use tracing::info;

/// Scope guard for the lifetime of the process
///
/// Dropping it runs every pending exit hook.
#[must_use = "dropping the guard immediately runs teardown"]
pub struct ProcessLifetime {
    _private: (),
}

impl ProcessLifetime {
    /// Start the process-lifetime scope
    ///
    /// # Safety
    ///
    /// The guard must outlive every use of every process-wide singleton:
    /// drop it only after all threads that touched them have been joined.
    pub unsafe fn enter() -> Self {
        info!("process lifetime scope entered");
        Self { _private: () }
    }
}

impl Drop for ProcessLifetime {
    fn drop(&mut self) {
        // SAFETY: `enter` requires the guard to outlive all singleton users.
        let ran = unsafe { run_exit_hooks() };
        info!(hooks = ran, "process lifetime scope closed");
    }
}
