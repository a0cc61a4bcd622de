/*!
 * Guarded Lazy Cell (V2)
 *
 * Double-checked locking around a raw instance pointer, with explicit
 * teardown.
 */

use super::config::Publication;
use crate::core::errors::{short_type_name, SingletonError};
use crate::core::state::{AtomicInitState, InitState};
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use tracing::debug;

/// Lazily constructed slot guarded by double-checked locking
///
/// # Fast path
///
/// One atomic load. Once the instance is published no lock is taken.
///
/// # Slow path
///
/// Take the lock, check again, construct, publish. Threads arriving while
/// construction runs block on the lock and then find the instance on the
/// second check.
///
/// # Publication
///
/// [`GuardedCell::new`] publishes with release and checks with acquire, so a
/// reader that finds the pointer also finds every field the constructor
/// wrote. [`GuardedCell::new_relaxed`] reproduces the textbook bug where
/// both are relaxed.
///
/// # Teardown
///
/// The instance is dropped exactly once: by [`GuardedCell::destroy`], by
/// [`GuardedCell::destroy_shared`], or when the cell itself is dropped.
/// After teardown the cell is [`InitState::Destroyed`] and never rebuilds.
pub struct GuardedCell<T> {
    slot: AtomicPtr<T>,
    lock: Mutex<()>,
    state: AtomicInitState,
    publication: Publication,
    _owns: PhantomData<T>,
}

impl<T> GuardedCell<T> {
    /// Cell with acquire/release publication
    pub const fn new() -> Self {
        Self::with_publication(Publication::AcquireRelease)
    }

    /// Cell with relaxed publication (the broken double-checked lock)
    ///
    /// # Safety
    ///
    /// With relaxed ordering another thread can observe the published
    /// pointer before the constructor's writes, which is a data race. The
    /// caller must ensure the instance is only ever read on the thread that
    /// constructed it, or otherwise synchronize with that thread (e.g. join
    /// it) before reading.
    pub const unsafe fn new_relaxed() -> Self {
        Self::with_publication(Publication::Relaxed)
    }

    const fn with_publication(publication: Publication) -> Self {
        Self {
            slot: AtomicPtr::new(ptr::null_mut()),
            lock: parking_lot::const_mutex(()),
            state: AtomicInitState::new(InitState::Unconstructed),
            publication,
            _owns: PhantomData,
        }
    }

    #[inline]
    pub fn publication(&self) -> Publication {
        self.publication
    }

    /// Get the instance, constructing it on first access
    ///
    /// # Panics
    ///
    /// Panics if called after the instance was destroyed.
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, SingletonError>(f())) {
            Ok(instance) => instance,
            Err(err) => panic!("{err}"),
        }
    }

    /// Get the instance, running a fallible constructor on first access
    ///
    /// A constructor error is returned to the caller that ran it and leaves
    /// the cell unconstructed, so the next access retries. Access after
    /// teardown fails with [`SingletonError::Destroyed`].
    pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<SingletonError>,
    {
        let current = self.slot.load(self.publication.load());
        if !current.is_null() {
            // SAFETY: non-null slot values come from Box::into_raw and are only
            // freed by teardown, which callers must not race with reads.
            return Ok(unsafe { &*current });
        }

        let _guard = self.lock.lock();

        // The lock orders us after whichever thread published last.
        let current = self.slot.load(Ordering::Relaxed);
        if !current.is_null() {
            // SAFETY: as above.
            return Ok(unsafe { &*current });
        }

        // Under the lock with an empty slot the cell is either unconstructed
        // or torn down.
        if let Err(observed) = self
            .state
            .transition(InitState::Unconstructed, InitState::UnderConstruction)
        {
            debug_assert!(observed.is_terminal(), "guarded cell {observed} under lock");
            return Err(SingletonError::destroyed::<T>().into());
        }

        let rollback = RollbackOnUnwind(&self.state);
        let outcome = f();
        std::mem::forget(rollback);

        match outcome {
            Ok(value) => {
                let built = Box::into_raw(Box::new(value));
                self.slot.store(built, self.publication.store());
                let _ = self
                    .state
                    .transition(InitState::UnderConstruction, InitState::Ready);
                debug!(
                    type_name = short_type_name::<T>(),
                    publication = ?self.publication,
                    "guarded instance constructed"
                );
                // SAFETY: freshly published allocation owned by this cell.
                Ok(unsafe { &*built })
            }
            Err(err) => {
                let _ = self
                    .state
                    .transition(InitState::UnderConstruction, InitState::Unconstructed);
                debug!(
                    type_name = short_type_name::<T>(),
                    "guarded construction failed, slot left unconstructed"
                );
                Err(err)
            }
        }
    }

    /// Peek at the instance without constructing it
    pub fn get(&self) -> Option<&T> {
        let current = self.slot.load(self.publication.load());
        // SAFETY: see get_or_try_init.
        unsafe { current.as_ref() }
    }

    #[inline]
    pub fn state(&self) -> InitState {
        self.state.load()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.slot.load(Ordering::Acquire).is_null()
    }

    /// Drop the instance now
    ///
    /// Returns `true` if an instance existed. Exclusive access guarantees
    /// no outstanding references.
    pub fn destroy(&mut self) -> bool {
        let current = std::mem::replace(self.slot.get_mut(), ptr::null_mut());
        self.finish_destroy(current)
    }

    /// Drop the instance through a shared reference
    ///
    /// Idempotent: only the first call after construction frees anything.
    ///
    /// # Safety
    ///
    /// No reference previously returned by this cell may be used after this
    /// call, and no other thread may be inside an accessor concurrently.
    /// Intended for process teardown after all worker threads have finished.
    pub unsafe fn destroy_shared(&self) -> bool {
        let _guard = self.lock.lock();
        let current = self.slot.swap(ptr::null_mut(), Ordering::AcqRel);
        self.finish_destroy(current)
    }

    fn finish_destroy(&self, current: *mut T) -> bool {
        if current.is_null() {
            return false;
        }
        let _ = self.state.transition(InitState::Ready, InitState::Destroyed);
        // SAFETY: the pointer was taken out of the slot, so this is the only
        // remaining owner of the Box allocation.
        drop(unsafe { Box::from_raw(current) });
        debug!(type_name = short_type_name::<T>(), "guarded instance destroyed");
        true
    }
}

impl<T> Default for GuardedCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for GuardedCell<T> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Puts a cell back to `Unconstructed` if the constructor panics
struct RollbackOnUnwind<'a>(&'a AtomicInitState);

impl Drop for RollbackOnUnwind<'_> {
    fn drop(&mut self) {
        let _ = self
            .0
            .transition(InitState::UnderConstruction, InitState::Unconstructed);
    }
}

// SAFETY: shared access hands out &T across threads (needs T: Sync) and the
// constructor may run on any thread while teardown may drop on another
// (needs T: Send).
unsafe impl<T: Send + Sync> Sync for GuardedCell<T> {}
unsafe impl<T: Send> Send for GuardedCell<T> {}
