/*!
 * Core Module
 * Singleton cells, lifecycle state and error handling
 */

pub mod errors;
pub mod limits;
pub mod state;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use state::{AtomicInitState, InitState};
pub use sync::{DeferredCell, EagerCell, GuardedCell, NaiveCell, Publication, StartupCell};
pub use types::*;
