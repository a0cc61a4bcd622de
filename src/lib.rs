/*!
 * Singleton Patterns Library
 *
 * Four ways to give a type exactly one process-wide instance, each with
 * its trade-offs made observable:
 * - V1 naive lazy: unchecked, may build twice, leaks
 * - V2 guarded lazy: double-checked locking, torn down by an exit hook
 * - V3 deferred static: runtime-guaranteed one-time initialization
 * - V4 eager: built before any access
 */

pub mod config;
pub mod core;
pub mod harness;
pub mod instances;
pub mod lifecycle;
pub mod monitoring;

// Re-exports
pub use config::HarnessConfig;
pub use crate::core::{
    DeferredCell, EagerCell, GuardedCell, Identity, InitState, NaiveCell, Publication,
    SingletonError, SingletonResult, StartupCell, Variant, VariantProfile,
};
pub use harness::{stress, stress_singleton, StressConfig, StressReport};
pub use instances::{
    DeferredSingleton, EagerSingleton, GuardedSingleton, NaiveSingleton, RunContext, Singleton,
};
pub use lifecycle::{register_exit_hook, ProcessLifetime};
pub use monitoring::init_tracing;
