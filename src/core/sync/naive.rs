/*!
 * Naive Lazy Cell (V1)
 *
 * Check-then-act lazy construction with no mutual exclusion.
 */

use crate::core::state::{AtomicInitState, InitState};
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

/// Lazily constructed slot without any locking
///
/// The existence check and the publish are separate atomic operations, so
/// two threads that both see an empty slot both run the constructor. Each
/// caller gets the instance it built; the slot keeps whichever store landed
/// last. Nothing is ever freed: racing losers and the final winner all leak.
///
/// Publication itself uses acquire/release, so every reference handed out
/// points at a fully built value. The defect is duplicate construction, not
/// torn reads.
///
/// # Example
///
/// ```
/// use singleton_patterns::core::sync::NaiveCell;
///
/// static CELL: NaiveCell<String> = NaiveCell::new();
///
/// let first = CELL.get_or_init(|| "hello".to_string());
/// let second = CELL.get_or_init(|| unreachable!());
/// assert!(std::ptr::eq(first, second));
/// ```
pub struct NaiveCell<T> {
    slot: AtomicPtr<T>,
    state: AtomicInitState,
}

impl<T> NaiveCell<T> {
    pub const fn new() -> Self {
        Self {
            slot: AtomicPtr::new(ptr::null_mut()),
            state: AtomicInitState::new(InitState::Unconstructed),
        }
    }

    /// Get the instance, constructing it if the slot looks empty
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        let current = self.slot.load(Ordering::Acquire);
        if !current.is_null() {
            // SAFETY: non-null pointers in the slot come from Box::into_raw
            // below and are never freed.
            return unsafe { &*current };
        }

        // Unchecked window: another thread can be right here too. A racing
        // builder finds the edge already taken, so its transitions fail.
        let _ = self
            .state
            .transition(InitState::Unconstructed, InitState::UnderConstruction);
        let built = Box::into_raw(Box::new(f()));
        self.slot.store(built, Ordering::Release);
        let _ = self
            .state
            .transition(InitState::UnderConstruction, InitState::Ready);

        // SAFETY: `built` is a leaked Box allocation that outlives `self`.
        unsafe { &*built }
    }

    /// Peek at the currently published instance
    pub fn get(&self) -> Option<&T> {
        let current = self.slot.load(Ordering::Acquire);
        // SAFETY: see get_or_init.
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
}

impl<T> Default for NaiveCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: the slot only ever hands out shared references to leaked values,
// which requires T: Sync; constructing on any thread requires T: Send.
unsafe impl<T: Send + Sync> Sync for NaiveCell<T> {}
unsafe impl<T: Send> Send for NaiveCell<T> {}
