/*!
 * Naive Lazy Singleton (V1)
 */

use super::sentinel::Sentinel;
use super::{construction_delay, Singleton};
use crate::core::sync::NaiveCell;
use crate::core::types::Variant;
use crate::monitoring::span_construction;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

/// Process-wide instance built on first access without synchronization
///
/// Under contention more than one may be built; each one leaks.
#[derive(Debug)]
pub struct NaiveSingleton {
    sentinel: Sentinel,
    serial: usize,
}

impl NaiveSingleton {
    fn new() -> Self {
        let span = span_construction::<Self>(Variant::NaiveLazy);
        let _entered = span.enter();

        let serial = CONSTRUCTED.fetch_add(1, Ordering::SeqCst) + 1;
        let sentinel = Sentinel::build(construction_delay());
        info!(serial, "naive singleton constructed");
        Self { sentinel, serial }
    }

    /// Construction sequence number of this instance (1 for the first)
    pub fn serial(&self) -> usize {
        self.serial
    }
}

impl Singleton for NaiveSingleton {
    const VARIANT: Variant = Variant::NaiveLazy;

    fn instance() -> &'static Self {
        static CELL: NaiveCell<NaiveSingleton> = NaiveCell::new();
        CELL.get_or_init(Self::new)
    }

    fn constructions() -> usize {
        CONSTRUCTED.load(Ordering::SeqCst)
    }

    fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }
}
