/*!
 * Publication Configuration
 *
 * Memory ordering used to publish a lazily constructed instance
 */

use std::sync::atomic::Ordering;

/// Ordering pair for the double-checked fast path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Publication {
    /// Acquire loads, release publish. Readers that see the pointer see
    /// every write the constructor made.
    #[default]
    AcquireRelease,
    /// Relaxed loads and publish. The classic broken double-checked lock:
    /// the pointer may become visible before the constructor's writes.
    Relaxed,
}

impl Publication {
    /// Ordering for the unlocked existence check
    #[inline(always)]
    pub const fn load(self) -> Ordering {
        match self {
            Self::AcquireRelease => Ordering::Acquire,
            Self::Relaxed => Ordering::Relaxed,
        }
    }

    /// Ordering for the store that publishes the instance
    #[inline(always)]
    pub const fn store(self) -> Ordering {
        match self {
            Self::AcquireRelease => Ordering::Release,
            Self::Relaxed => Ordering::Relaxed,
        }
    }

    pub const fn is_sound(self) -> bool {
        matches!(self, Self::AcquireRelease)
    }
}
