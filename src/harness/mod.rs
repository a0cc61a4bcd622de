/*!
 * Stress Harness
 *
 * Checks the accessor contract under contention:
 * - every call returns the same instance
 * - the constructor runs once
 * - no reader observes a partially written sentinel
 */

mod report;
mod stress;

pub use report::StressReport;
pub use stress::{stress, stress_singleton, StressConfig};
