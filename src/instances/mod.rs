/*!
 * Process-Wide Singletons
 *
 * One concrete singleton per variant. None of them can be built, copied or
 * assigned from outside this crate: fields are private, constructors are
 * private, and none implements `Clone`, `Copy` or `Default`.
 *
 * ```compile_fail
 * use singleton_patterns::instances::GuardedSingleton;
 * // private constructor
 * let second = GuardedSingleton::new();
 * ```
 *
 * ```compile_fail
 * use singleton_patterns::instances::{DeferredSingleton, Singleton};
 * // no way to duplicate the instance
 * let copy: DeferredSingleton = DeferredSingleton::instance().clone();
 * ```
 *
 * ```compile_fail
 * use singleton_patterns::instances::{NaiveSingleton, Singleton};
 * // cannot move out of the shared instance
 * let moved = *NaiveSingleton::instance();
 * ```
 *
 * ```compile_fail
 * use singleton_patterns::instances::{EagerSingleton, Singleton};
 * // the accessor hands out shared references only
 * let slot: &mut EagerSingleton = EagerSingleton::instance();
 * ```
 *
 * ```compile_fail
 * use singleton_patterns::instances::GuardedSingleton;
 * // fields are private, so no struct literal either
 * let second = GuardedSingleton { sentinel: unimplemented!() };
 * ```
 */

mod deferred;
mod eager;
mod guarded;
mod naive;
mod sentinel;

pub use deferred::DeferredSingleton;
pub use eager::{EagerSingleton, RunContext};
pub use guarded::GuardedSingleton;
pub use naive::NaiveSingleton;
pub use sentinel::Sentinel;

use crate::config::HarnessConfig;
use crate::core::limits::DEFAULT_CONSTRUCTION_DELAY;
use crate::core::types::{Identity, Variant};
use std::time::Duration;
use tracing::warn;

/// Global accessor contract shared by every variant
pub trait Singleton: Send + Sync + Sized + 'static {
    /// Which variant backs this type
    const VARIANT: Variant;

    /// The process-wide instance
    fn instance() -> &'static Self;

    /// How many times the constructor has run in this process
    fn constructions() -> usize;

    /// Payload used to detect partially built instances
    fn sentinel(&self) -> &Sentinel;

    /// Identity of the process-wide instance
    fn identity() -> Identity {
        Identity::of(Self::instance())
    }
}

/// Delay between sentinel writes for instances built in this process
///
/// Falls back to the default when the environment cannot be parsed.
pub(crate) fn construction_delay() -> Duration {
    match HarnessConfig::global() {
        Ok(config) => config.construction_delay(),
        Err(err) => {
            warn!(error = %err, "harness config unavailable, using default construction delay");
            DEFAULT_CONSTRUCTION_DELAY
        }
    }
}
