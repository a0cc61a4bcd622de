/*!
 * Harness Configuration
 *
 * Environment-driven settings for the stress harness and demo binary.
 *
 * Environment variables:
 * - SINGLETON_THREADS: accessor threads per stress run (default: 100)
 * - SINGLETON_ROUNDS: accessor calls per thread (default: 1)
 * - SINGLETON_CONSTRUCTION_DELAY_US: delay between sentinel writes (default: 200)
 * - SINGLETON_REPORT_JSON: print reports as JSON (default: false)
 */

use crate::core::errors::{SingletonError, SingletonResult};
use crate::core::limits::{
    DEFAULT_CONSTRUCTION_DELAY, DEFAULT_STRESS_ROUNDS, DEFAULT_STRESS_THREADS, MAX_STRESS_THREADS,
};
use crate::core::sync::DeferredCell;
use crate::harness::StressConfig;
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const ENV_THREADS: &str = "SINGLETON_THREADS";
pub const ENV_ROUNDS: &str = "SINGLETON_ROUNDS";
pub const ENV_CONSTRUCTION_DELAY_US: &str = "SINGLETON_CONSTRUCTION_DELAY_US";
pub const ENV_REPORT_JSON: &str = "SINGLETON_REPORT_JSON";

/// Harness settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessConfig {
    pub threads: usize,
    pub rounds: usize,
    pub construction_delay_us: u64,
    pub json_report: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_STRESS_THREADS,
            rounds: DEFAULT_STRESS_ROUNDS,
            construction_delay_us: DEFAULT_CONSTRUCTION_DELAY.as_micros() as u64,
            json_report: false,
        }
    }
}

impl HarnessConfig {
    /// Process-wide configuration, parsed from the environment on first use
    ///
    /// A parse failure is returned to the caller and nothing is cached, so
    /// fixing the environment and calling again succeeds.
    pub fn global() -> SingletonResult<&'static HarnessConfig> {
        static CONFIG: DeferredCell<HarnessConfig> = DeferredCell::new();
        CONFIG.get_or_try_init(Self::from_env)
    }

    /// Parse from the process environment
    pub fn from_env() -> SingletonResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> SingletonResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let threads = parse_var(&lookup, ENV_THREADS, defaults.threads)?;
        if threads == 0 || threads > MAX_STRESS_THREADS {
            return Err(SingletonError::invalid_config(ENV_THREADS, threads.to_string()));
        }

        let rounds = parse_var(&lookup, ENV_ROUNDS, defaults.rounds)?;
        if rounds == 0 {
            return Err(SingletonError::invalid_config(ENV_ROUNDS, rounds.to_string()));
        }

        let construction_delay_us =
            parse_var(&lookup, ENV_CONSTRUCTION_DELAY_US, defaults.construction_delay_us)?;

        let json_report = match lookup(ENV_REPORT_JSON) {
            Some(raw) => match raw.trim() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                other => return Err(SingletonError::invalid_config(ENV_REPORT_JSON, other)),
            },
            None => defaults.json_report,
        };

        let config = Self {
            threads,
            rounds,
            construction_delay_us,
            json_report,
        };
        debug!(?config, "harness config loaded");
        Ok(config)
    }

    #[inline]
    pub fn construction_delay(&self) -> Duration {
        Duration::from_micros(self.construction_delay_us)
    }

    pub fn stress_config(&self) -> StressConfig {
        StressConfig {
            threads: self.threads,
            rounds: self.rounds,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> SingletonResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SingletonError::invalid_config(key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = HarnessConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.construction_delay(), DEFAULT_CONSTRUCTION_DELAY);
    }

    #[test]
    fn test_overrides() {
        let config = HarnessConfig::from_lookup(lookup_from(&[
            (ENV_THREADS, "8"),
            (ENV_ROUNDS, " 3 "),
            (ENV_CONSTRUCTION_DELAY_US, "0"),
            (ENV_REPORT_JSON, "true"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            HarnessConfig {
                threads: 8,
                rounds: 3,
                construction_delay_us: 0,
                json_report: true,
            }
        );
        assert_eq!(config.stress_config().threads, 8);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = HarnessConfig::from_lookup(lookup_from(&[(ENV_THREADS, "lots")])).unwrap_err();
        assert_eq!(err, SingletonError::invalid_config(ENV_THREADS, "lots"));

        let err = HarnessConfig::from_lookup(lookup_from(&[(ENV_REPORT_JSON, "maybe")])).unwrap_err();
        assert!(matches!(err, SingletonError::InvalidConfig { .. }));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(HarnessConfig::from_lookup(lookup_from(&[(ENV_THREADS, "0")])).is_err());
        assert!(HarnessConfig::from_lookup(lookup_from(&[(ENV_THREADS, "1000000")])).is_err());
        assert!(HarnessConfig::from_lookup(lookup_from(&[(ENV_ROUNDS, "0")])).is_err());
    }
}
