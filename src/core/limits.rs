/*!
 * Limits and Constants
 *
 * Centralized location for harness defaults and sentinel values.
 */

use std::time::Duration;

// =============================================================================
// STRESS HARNESS
// =============================================================================

/// Default number of concurrent accessor threads
pub const DEFAULT_STRESS_THREADS: usize = 100;

/// Default accessor calls per thread
pub const DEFAULT_STRESS_ROUNDS: usize = 1;

/// Upper bound on threads accepted from configuration
/// Keeps a typo in SINGLETON_THREADS from exhausting the host
pub const MAX_STRESS_THREADS: usize = 4096;

// =============================================================================
// SENTINEL PAYLOAD
// =============================================================================

/// Pattern written into every sentinel field by a finished constructor
pub const SENTINEL_PATTERN: u64 = 0xDEAD_BEEF_CAFE_F00D;

/// Number of sentinel fields per instance
pub const SENTINEL_FIELDS: usize = 8;

/// Delay between sentinel field writes
/// Widens the construction window so racing readers actually overlap it
pub const DEFAULT_CONSTRUCTION_DELAY: Duration = Duration::from_micros(200);
