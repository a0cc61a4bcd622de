/*!
 * Eager Cells (V4)
 *
 * Instances that exist before any accessor can run.
 */

use crate::core::errors::{short_type_name, SingletonError, SingletonResult};
use crate::core::state::InitState;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Instance built by constant evaluation
///
/// A `static EagerCell<T>` is part of the binary image, so there is no lazy
/// branch and no window in which a dependent could see it unbuilt.
///
/// ```
/// use singleton_patterns::core::sync::EagerCell;
///
/// static LIMIT: EagerCell<u32> = EagerCell::new(64);
/// assert_eq!(*LIMIT.get(), 64);
/// ```
#[derive(Debug)]
pub struct EagerCell<T> {
    value: T,
}

impl<T> EagerCell<T> {
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    #[inline(always)]
    pub const fn get(&self) -> &T {
        &self.value
    }

    #[inline]
    pub const fn state(&self) -> InitState {
        InitState::Ready
    }
}

/// Instance installed once during process startup
///
/// Models globals whose constructor cannot run at compile time. Reading it
/// before [`StartupCell::install`] is the initialization-order hazard: here
/// it is reported as [`SingletonError::Uninitialized`] instead of yielding
/// an unbuilt object.
#[derive(Debug)]
pub struct StartupCell<T> {
    inner: OnceLock<T>,
}

impl<T> StartupCell<T> {
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Install the instance; fails if one is already installed
    pub fn install(&self, value: T) -> SingletonResult<&T> {
        let mut fresh = false;
        let installed = self.inner.get_or_init(|| {
            fresh = true;
            value
        });

        if !fresh {
            warn!(type_name = short_type_name::<T>(), "startup instance installed twice");
            return Err(SingletonError::already_installed::<T>());
        }

        debug!(type_name = short_type_name::<T>(), "startup instance installed");
        Ok(installed)
    }

    /// Get the installed instance
    pub fn get(&self) -> SingletonResult<&T> {
        self.inner
            .get()
            .ok_or_else(SingletonError::uninitialized::<T>)
    }

    #[inline]
    pub fn state(&self) -> InitState {
        if self.inner.get().is_some() {
            InitState::Ready
        } else {
            InitState::Unconstructed
        }
    }

    #[inline]
    pub fn is_installed(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl<T> Default for StartupCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
