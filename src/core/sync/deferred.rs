/*!
 * Deferred Static Cell (V3)
 *
 * Function-local static backed by a blocking one-time initializer.
 */

use crate::core::errors::short_type_name;
use crate::core::state::{AtomicInitState, InitState};
use once_cell::sync::OnceCell;
use tracing::debug;

/// One-time cell meant to live as a `static` inside its accessor function
///
/// Exactly-once construction, blocking of concurrent first callers and safe
/// publication are all delegated to [`OnceCell`]. The wrapper only adds
/// lifecycle reporting and a fallible entry point that leaves the cell
/// empty on failure.
///
/// # Example
///
/// ```
/// use singleton_patterns::core::sync::DeferredCell;
///
/// fn greeting() -> &'static String {
///     static CELL: DeferredCell<String> = DeferredCell::new();
///     CELL.get_or_init(|| "hello".to_string())
/// }
///
/// assert!(std::ptr::eq(greeting(), greeting()));
/// ```
pub struct DeferredCell<T> {
    inner: OnceCell<T>,
    state: AtomicInitState,
}

impl<T> DeferredCell<T> {
    pub const fn new() -> Self {
        Self {
            inner: OnceCell::new(),
            state: AtomicInitState::new(InitState::Unconstructed),
        }
    }

    /// Get the instance, constructing it on first call
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, std::convert::Infallible>(f())) {
            Ok(instance) => instance,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`DeferredCell::get_or_init`]
    ///
    /// On error the cell stays empty and the next call retries. Only the
    /// initializing call touches the lifecycle state; the fast path is a
    /// plain read.
    pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.inner.get_or_try_init(|| {
            // OnceCell runs one initializer at a time, so every edge below
            // happens before the next initializer can start.
            let _ = self
                .state
                .transition(InitState::Unconstructed, InitState::UnderConstruction);
            let rollback = RollbackOnUnwind(&self.state);
            let outcome = f();
            std::mem::forget(rollback);

            match outcome {
                Ok(value) => {
                    let _ = self
                        .state
                        .transition(InitState::UnderConstruction, InitState::Ready);
                    debug!(type_name = short_type_name::<T>(), "deferred instance constructed");
                    Ok(value)
                }
                Err(err) => {
                    let _ = self
                        .state
                        .transition(InitState::UnderConstruction, InitState::Unconstructed);
                    debug!(
                        type_name = short_type_name::<T>(),
                        "deferred construction failed, cell left empty"
                    );
                    Err(err)
                }
            }
        })
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.inner.get()
    }

    #[inline]
    pub fn state(&self) -> InitState {
        if self.inner.get().is_some() {
            return InitState::Ready;
        }
        self.state.load()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl<T> Default for DeferredCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct RollbackOnUnwind<'a>(&'a AtomicInitState);

impl Drop for RollbackOnUnwind<'_> {
    fn drop(&mut self) {
        let _ = self
            .0
            .transition(InitState::UnderConstruction, InitState::Unconstructed);
    }
}
