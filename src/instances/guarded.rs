/*!
 * Guarded Lazy Singleton (V2)
 */

use super::sentinel::Sentinel;
use super::{construction_delay, Singleton};
use crate::core::sync::GuardedCell;
use crate::core::types::Variant;
use crate::lifecycle::register_exit_hook;
use crate::monitoring::span_construction;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
static DESTROYED: AtomicUsize = AtomicUsize::new(0);

static CELL: GuardedCell<GuardedSingleton> = GuardedCell::new();

/// Process-wide instance built under double-checked locking
///
/// Construction registers an exit hook that drops the instance when the
/// process lifetime scope closes.
#[derive(Debug)]
pub struct GuardedSingleton {
    sentinel: Sentinel,
}

impl GuardedSingleton {
    fn new() -> Self {
        let span = span_construction::<Self>(Variant::GuardedLazy);
        let _entered = span.enter();

        CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        let sentinel = Sentinel::build(construction_delay());

        register_exit_hook("guarded_singleton", || {
            // SAFETY: exit hooks only run once every singleton user is done
            // (see `run_exit_hooks`).
            unsafe {
                CELL.destroy_shared();
            }
        });

        info!("guarded singleton constructed");
        Self { sentinel }
    }

    /// Number of times the destructor has run
    pub fn destructions() -> usize {
        DESTROYED.load(Ordering::SeqCst)
    }

    /// Whether the instance has been torn down
    pub fn is_destroyed() -> bool {
        CELL.state().is_terminal()
    }
}

impl Drop for GuardedSingleton {
    fn drop(&mut self) {
        DESTROYED.fetch_add(1, Ordering::SeqCst);
        info!("guarded singleton destroyed");
    }
}

impl Singleton for GuardedSingleton {
    const VARIANT: Variant = Variant::GuardedLazy;

    /// # Panics
    ///
    /// Panics if called after process teardown destroyed the instance.
    fn instance() -> &'static Self {
        CELL.get_or_init(Self::new)
    }

    fn constructions() -> usize {
        CONSTRUCTED.load(Ordering::SeqCst)
    }

    fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }
}
