//! Session Configuration
//!
//! Round parameters plus the per-session choices: seed, display locale
//! and which buzzer belongs to which seat.

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::core::rng::derive_session_seed;
use crate::game::buzzer::BuzzerMap;
use crate::game::state::RoundConfig;
use crate::game::target::Locale;

/// Environment variable holding a fixed seed.
pub const ENV_SEED: &str = "SHAPE_COUNTER_SEED";

/// Environment variable holding the locale code (`de` or `en`).
pub const ENV_LOCALE: &str = "SHAPE_COUNTER_LOCALE";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Environment variable present but unusable.
    #[error("Invalid {var}={value:?}: {reason}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// What was wrong
        reason: &'static str,
    },
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Round parameters (the fixed game constants).
    pub round: RoundConfig,
    /// Fixed seed; a fresh one is derived when `None`.
    pub seed: Option<u64>,
    /// Display language for the wanted text.
    pub locale: Locale,
    /// Buzzer to seat assignment.
    pub buzzers: BuzzerMap,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round: RoundConfig::default(),
            seed: None,
            locale: Locale::default(),
            buzzers: BuzzerMap::default(),
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `SHAPE_COUNTER_SEED` / `SHAPE_COUNTER_LOCALE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_SEED) {
            let seed = value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_SEED,
                value: value.clone(),
                reason: "expected an unsigned 64-bit integer",
            })?;
            config.seed = Some(seed);
        }

        if let Some(value) = lookup(ENV_LOCALE) {
            config.locale = Locale::from_code(&value).ok_or_else(|| ConfigError::InvalidEnv {
                var: ENV_LOCALE,
                value: value.clone(),
                reason: "expected \"de\" or \"en\"",
            })?;
        }

        Ok(config)
    }

    /// The configured seed, or one derived from the wall clock.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let nonce = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default();
            derive_session_seed(b"shape-counter", nonce)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = SessionConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.locale, Locale::German);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_env_overrides() {
        let config = SessionConfig::from_lookup(lookup(&[
            (ENV_SEED, " 12345 "),
            (ENV_LOCALE, "en"),
        ]))
        .unwrap();
        assert_eq!(config.seed, Some(12345));
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.resolve_seed(), 12345);
    }

    #[test]
    fn test_bad_seed_rejected() {
        let err = SessionConfig::from_lookup(lookup(&[(ENV_SEED, "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_SEED, .. }));
    }

    #[test]
    fn test_bad_locale_rejected() {
        let err = SessionConfig::from_lookup(lookup(&[(ENV_LOCALE, "fr")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid SHAPE_COUNTER_LOCALE=\"fr\": expected \"de\" or \"en\"");
    }
}
