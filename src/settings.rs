//! Runtime settings for the coordinator.
//!
//! Resolution order: built-in defaults, then an optional TOML file, then
//! `REPORT_WIDGET__*` environment variables.

use crate::coordinator::{CoordinatorOptions, SAMPLE_REPORT_URL};
use crate::core::FilterTarget;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Default settings file looked up by [`Settings::load`].
pub const DEFAULT_SETTINGS_FILE: &str = "report-widget.toml";

const ENV_PREFIX: &str = "REPORT_WIDGET__";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL of the embed-config endpoint.
    pub config_endpoint: String,
    pub request_timeout_secs: u64,
    /// Drop async completions superseded by a newer request of the same kind.
    pub discard_stale_completions: bool,
    pub filter_target: FilterTarget,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_endpoint: SAMPLE_REPORT_URL.to_string(),
            request_timeout_secs: 30,
            discard_stale_completions: false,
            filter_target: FilterTarget::default(),
        }
    }
}

/// One failed settings check.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SettingsViolation {
    #[error("config_endpoint '{endpoint}' is not a valid http(s) URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("filter_target.{field} must not be empty")]
    EmptyFilterTarget { field: &'static str },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid settings: {0}")]
    Invalid(Violations),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// All violations found by one validation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violations(pub Vec<SettingsViolation>);

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl Settings {
    /// Load from [`DEFAULT_SETTINGS_FILE`] (if present) and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(DEFAULT_SETTINGS_FILE)
    }

    /// Load from a TOML file (skipped when it does not exist) and the
    /// environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let settings = if path.exists() {
            let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        Ok(settings.with_overrides(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok()))
    }

    /// Parse settings from TOML; missing keys keep their defaults.
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply overrides looked up by key name (`CONFIG_ENDPOINT`, ...).
    ///
    /// Values that do not parse are logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CONFIG_ENDPOINT") {
            self.config_endpoint = v;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => tracing::warn!(value = %v, "Ignoring invalid REQUEST_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = lookup("DISCARD_STALE_COMPLETIONS") {
            match v.parse() {
                Ok(flag) => self.discard_stale_completions = flag,
                Err(_) => tracing::warn!(value = %v, "Ignoring invalid DISCARD_STALE_COMPLETIONS"),
            }
        }
        if let Some(v) = lookup("FILTER_TABLE") {
            self.filter_target.table = v;
        }
        if let Some(v) = lookup("FILTER_COLUMN") {
            self.filter_target.column = v;
        }
        self
    }

    /// Validate every setting, accumulating all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<SettingsViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<SettingsViolation>>> = Vec::new();

        checks.push(match reqwest::Url::parse(&self.config_endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Validation::success(()),
            Ok(url) => Validation::fail(SettingsViolation::InvalidEndpoint {
                endpoint: self.config_endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => Validation::fail(SettingsViolation::InvalidEndpoint {
                endpoint: self.config_endpoint.clone(),
                reason: e.to_string(),
            }),
        });

        checks.push(if self.request_timeout_secs > 0 {
            Validation::success(())
        } else {
            Validation::fail(SettingsViolation::ZeroTimeout)
        });

        for (field, value) in [
            ("table", &self.filter_target.table),
            ("column", &self.filter_target.column),
        ] {
            checks.push(if value.trim().is_empty() {
                Validation::fail(SettingsViolation::EmptyFilterTarget { field })
            } else {
                Validation::success(())
            });
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// [`Settings::validate`] as a `Result`.
    pub fn check(&self) -> Result<(), SettingsError> {
        match self.validate() {
            Validation::Success(_) => Ok(()),
            Validation::Failure(violations) => Err(SettingsError::Invalid(Violations(
                violations.iter().cloned().collect(),
            ))),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            discard_stale_completions: self.discard_stale_completions,
            filter_target: self.filter_target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_success());
        assert_eq!(settings.config_endpoint, SAMPLE_REPORT_URL);
        assert_eq!(settings.filter_target, FilterTarget::new("Product", "Segment"));
        assert!(!settings.discard_stale_completions);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            config_endpoint = "http://localhost:3001/report"
            discard_stale_completions = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.config_endpoint, "http://localhost:3001/report");
        assert!(settings.discard_stale_completions);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn nested_filter_target_parses() {
        let settings = Settings::from_toml(
            r#"
            [filter_target]
            table = "Sales"
            column = "Region"
            "#,
        )
        .unwrap();
        assert_eq!(settings.filter_target, FilterTarget::new("Sales", "Region"));
    }

    #[test]
    fn overrides_replace_values_and_skip_garbage() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CONFIG_ENDPOINT", "https://example.test/embed"),
            ("REQUEST_TIMEOUT_SECS", "not-a-number"),
            ("DISCARD_STALE_COMPLETIONS", "true"),
        ]);

        let settings =
            Settings::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.config_endpoint, "https://example.test/embed");
        assert_eq!(settings.request_timeout_secs, 30);
        assert!(settings.discard_stale_completions);
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let settings = Settings {
            config_endpoint: "ftp://example.test".to_string(),
            request_timeout_secs: 0,
            discard_stale_completions: false,
            filter_target: FilterTarget::new("", " "),
        };

        match settings.validate() {
            Validation::Failure(violations) => {
                assert_eq!(violations.len(), 4);
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, SettingsViolation::InvalidEndpoint { .. })));
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, SettingsViolation::ZeroTimeout)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn check_reports_unparseable_endpoint() {
        let settings = Settings {
            config_endpoint: "not a url".to_string(),
            ..Settings::default()
        };

        let err = settings.check().unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(Violations(ref v)) if v.len() == 1));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from("does-not-exist/report-widget.toml").unwrap();
        assert_eq!(settings.request_timeout_secs, Settings::default().request_timeout_secs);
    }
}
