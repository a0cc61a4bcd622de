/*!
 * Sentinel Payload
 * Multi-field pattern that exposes partially constructed instances
 */

use crate::core::limits::{SENTINEL_FIELDS, SENTINEL_PATTERN};
use std::thread;
use std::time::Duration;

/// Fields a constructor fills one at a time
///
/// A reader that finds any field not equal to [`SENTINEL_PATTERN`] is
/// looking at an instance whose constructor has not finished.
#[derive(Debug, PartialEq, Eq)]
pub struct Sentinel {
    fields: [u64; SENTINEL_FIELDS],
}

impl Sentinel {
    /// Fully written sentinel, usable in const contexts
    pub(crate) const COMPLETE: Sentinel = Sentinel {
        fields: [SENTINEL_PATTERN; SENTINEL_FIELDS],
    };

    /// Write every field, sleeping `delay` between writes
    pub(crate) fn build(delay: Duration) -> Self {
        let mut fields = [0u64; SENTINEL_FIELDS];
        for field in fields.iter_mut() {
            *field = SENTINEL_PATTERN;
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
        Self { fields }
    }

    /// Number of fields that do not hold the pattern
    pub fn torn_fields(&self) -> usize {
        self.fields
            .iter()
            .filter(|&&field| field != SENTINEL_PATTERN)
            .count()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.torn_fields() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_completes_every_field() {
        let sentinel = Sentinel::build(Duration::ZERO);
        assert!(sentinel.is_complete());
        assert_eq!(sentinel, Sentinel::COMPLETE);
    }

    #[test]
    fn test_torn_fields_counted() {
        let mut sentinel = Sentinel::build(Duration::ZERO);
        sentinel.fields[0] = 0;
        sentinel.fields[5] = 1;
        assert_eq!(sentinel.torn_fields(), 2);
        assert!(!sentinel.is_complete());
    }
}
