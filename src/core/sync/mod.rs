/*!
 * Singleton Cells
 *
 * One storage primitive per singleton variant:
 * - `NaiveCell` (V1): unchecked lazy construction, leaks, may build twice
 * - `GuardedCell` (V2): double-checked locking with configurable publication
 * - `DeferredCell` (V3): function-local static, runtime one-time init
 * - `EagerCell` / `StartupCell` (V4): built before any access
 *
 * # Shared contract
 *
 * Every cell hands out shared references tied to the cell, exposes its
 * lifecycle through [`InitState`](crate::core::state::InitState), and (for
 * the thread-safe variants) guarantees a reader never sees a partially built
 * instance.
 */

mod config;
mod deferred;
mod eager;
mod guarded;
mod naive;

pub use config::Publication;
pub use deferred::DeferredCell;
pub use eager::{EagerCell, StartupCell};
pub use guarded::GuardedCell;
pub use naive::NaiveCell;
