/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Singleton access errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SingletonError {
    #[error("Failed to construct {type_name}: {reason}")]
    #[diagnostic(
        code(singleton::construction_failed),
        help("The slot was left unconstructed. The next access retries construction.")
    )]
    ConstructionFailed { type_name: String, reason: String },

    #[error("{type_name} accessed before it was installed")]
    #[diagnostic(
        code(singleton::uninitialized),
        help("Eager instances must be installed during startup, before any dependent global reads them.")
    )]
    Uninitialized { type_name: String },

    #[error("{type_name} is already installed")]
    #[diagnostic(
        code(singleton::already_installed),
        help("An eager instance can be installed exactly once per process.")
    )]
    AlreadyInstalled { type_name: String },

    #[error("{type_name} was destroyed during teardown")]
    #[diagnostic(
        code(singleton::destroyed),
        help("Process-lifetime instances must not be used after exit hooks ran.")
    )]
    Destroyed { type_name: String },

    #[error("Invalid configuration value for {key}: {value:?}")]
    #[diagnostic(
        code(singleton::invalid_config),
        help("Check the environment variable; it must parse as the documented type.")
    )]
    InvalidConfig { key: String, value: String },
}

impl SingletonError {
    /// Construction failure for `T` with a human-readable reason
    pub fn construction<T: ?Sized>(reason: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            type_name: short_type_name::<T>().to_string(),
            reason: reason.into(),
        }
    }

    pub fn uninitialized<T: ?Sized>() -> Self {
        Self::Uninitialized {
            type_name: short_type_name::<T>().to_string(),
        }
    }

    pub fn already_installed<T: ?Sized>() -> Self {
        Self::AlreadyInstalled {
            type_name: short_type_name::<T>().to_string(),
        }
    }

    pub fn destroyed<T: ?Sized>() -> Self {
        Self::Destroyed {
            type_name: short_type_name::<T>().to_string(),
        }
    }

    pub fn invalid_config(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
        }
    }

    /// True when retrying the same access may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConstructionFailed { .. } | Self::Uninitialized { .. })
    }
}

/// Last path segment of a type name, generics included
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

pub type SingletonResult<T> = Result<T, SingletonError>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Widget>(), "Widget");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec<u8>");
        assert_eq!(short_type_name::<u32>(), "u32");
    }

    #[test]
    fn test_construction_message() {
        let err = SingletonError::construction::<Widget>("disk on fire");
        assert_eq!(err.to_string(), "Failed to construct Widget: disk on fire");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_destroyed_not_retryable() {
        assert!(!SingletonError::destroyed::<Widget>().is_retryable());
        assert!(!SingletonError::already_installed::<Widget>().is_retryable());
    }

    #[test]
    fn test_serde_tagging() {
        let err = SingletonError::uninitialized::<Widget>();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error_type"], "uninitialized");
        assert_eq!(json["details"]["type_name"], "Widget");

        let back: SingletonError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
