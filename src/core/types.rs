/*!
 * Core Types
 * Variant descriptors and instance identity
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address-based identity of an instance
///
/// Two identities are equal exactly when they were taken from the same object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(usize);

impl Identity {
    #[inline]
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self(value as *const T as *const () as usize)
    }

    #[inline]
    pub const fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The four singleton variants and their trade-offs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// V1: unchecked lazy construction, leaked
    NaiveLazy,
    /// V2: double-checked locking, torn down by an exit hook
    GuardedLazy,
    /// V3: function-local static with runtime-guaranteed one-time init
    DeferredStatic,
    /// V4: constructed before any access
    Eager,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::NaiveLazy,
        Variant::GuardedLazy,
        Variant::DeferredStatic,
        Variant::Eager,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::NaiveLazy => "naive_lazy",
            Self::GuardedLazy => "guarded_lazy",
            Self::DeferredStatic => "deferred_static",
            Self::Eager => "eager",
        }
    }

    pub const fn init_timing(self) -> &'static str {
        match self {
            Self::NaiveLazy | Self::GuardedLazy => "first access",
            Self::DeferredStatic => "first call to the accessor",
            Self::Eager => "before first access",
        }
    }

    pub const fn thread_safety(self) -> &'static str {
        match self {
            Self::NaiveLazy => "none",
            Self::GuardedLazy => "double-checked locking",
            Self::DeferredStatic => "runtime one-time initialization",
            Self::Eager => "no lazy branch",
        }
    }

    pub const fn cleanup(self) -> &'static str {
        match self {
            Self::NaiveLazy => "never (leaked)",
            Self::GuardedLazy => "exit hook",
            Self::DeferredStatic | Self::Eager => {
                "never (statics are not dropped, the destructor does not run)"
            }
        }
    }

    pub const fn known_defect(self) -> Option<&'static str> {
        match self {
            Self::NaiveLazy => Some(
                "concurrent first accesses may construct more than one instance; every instance leaks",
            ),
            Self::GuardedLazy => Some(
                "relaxed publication lets a reader see the pointer before the constructor's writes",
            ),
            Self::DeferredStatic => Some("the destructor never runs at process exit"),
            Self::Eager => Some(
                "a global installed at startup may be read by a dependent before it is installed; \
                 the destructor never runs at process exit",
            ),
        }
    }

    /// Whether concurrent first accesses are guaranteed to agree on one instance
    pub const fn is_thread_safe(self) -> bool {
        !matches!(self, Self::NaiveLazy)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serializable row of the variant comparison table
#[derive(Debug, Clone, Serialize)]
pub struct VariantProfile {
    pub variant: Variant,
    pub init_timing: &'static str,
    pub thread_safety: &'static str,
    pub cleanup: &'static str,
    pub known_defect: Option<&'static str>,
}

impl From<Variant> for VariantProfile {
    fn from(variant: Variant) -> Self {
        Self {
            variant,
            init_timing: variant.init_timing(),
            thread_safety: variant.thread_safety(),
            cleanup: variant.cleanup(),
            known_defect: variant.known_defect(),
        }
    }
}
