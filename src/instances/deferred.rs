/*!
 * Deferred Static Singleton (V3)
 */

use super::sentinel::Sentinel;
use super::{construction_delay, Singleton};
use crate::core::sync::DeferredCell;
use crate::core::types::Variant;
use crate::monitoring::span_construction;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

/// Process-wide instance held in a static local to its accessor
///
/// Never dropped: its destructor does not run at process exit.
#[derive(Debug)]
pub struct DeferredSingleton {
    sentinel: Sentinel,
}

impl DeferredSingleton {
    fn new() -> Self {
        let span = span_construction::<Self>(Variant::DeferredStatic);
        let _entered = span.enter();

        CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        let sentinel = Sentinel::build(construction_delay());
        info!("deferred singleton constructed");
        Self { sentinel }
    }
}

impl Singleton for DeferredSingleton {
    const VARIANT: Variant = Variant::DeferredStatic;

    fn instance() -> &'static Self {
        static INSTANCE: DeferredCell<DeferredSingleton> = DeferredCell::new();
        INSTANCE.get_or_init(Self::new)
    }

    fn constructions() -> usize {
        CONSTRUCTED.load(Ordering::SeqCst)
    }

    fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }
}
