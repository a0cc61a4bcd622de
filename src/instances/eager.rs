/*!
 * Eager Singletons (V4)
 *
 * `EagerSingleton` is evaluated at compile time. `RunContext` needs runtime
 * data, so it is installed during startup instead and reports early reads.
 */

use super::sentinel::Sentinel;
use super::Singleton;
use crate::core::errors::SingletonResult;
use crate::core::sync::{EagerCell, StartupCell};
use crate::core::types::Variant;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

static INSTANCE: EagerCell<EagerSingleton> = EagerCell::new(EagerSingleton {
    sentinel: Sentinel::COMPLETE,
});

/// Process-wide instance that exists before `main` runs
#[derive(Debug)]
pub struct EagerSingleton {
    sentinel: Sentinel,
}

impl Singleton for EagerSingleton {
    const VARIANT: Variant = Variant::Eager;

    fn instance() -> &'static Self {
        INSTANCE.get()
    }

    /// Always 1: the instance is part of the binary image
    fn constructions() -> usize {
        1
    }

    fn sentinel(&self) -> &Sentinel {
        &self.sentinel
    }
}

static RUN_CONTEXT: StartupCell<RunContext> = StartupCell::new();

/// Per-process run metadata, installed once at startup
#[derive(Debug)]
pub struct RunContext {
    run_id: Uuid,
    started_at: Instant,
}

impl RunContext {
    /// Install the context for this process
    pub fn install() -> SingletonResult<&'static RunContext> {
        let context = RUN_CONTEXT.install(RunContext {
            run_id: Uuid::new_v4(),
            started_at: Instant::now(),
        })?;
        info!(run_id = %context.run_id, "run context installed");
        Ok(context)
    }

    /// Installed context, or `Uninitialized` if startup has not run yet
    pub fn get() -> SingletonResult<&'static RunContext> {
        RUN_CONTEXT.get()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}
