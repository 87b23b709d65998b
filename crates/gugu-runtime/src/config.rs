#![forbid(unsafe_code)]

//! Pipeline configuration.
//!
//! Defaults reproduce the plain behaviour: the holder starts at `"0"`, every
//! in-range base is accepted, empty input is an error, and only finished
//! tables are delivered.
//!
//! # Environment Variables
//!
//! | Variable             | Values                | Field            |
//! |----------------------|-----------------------|------------------|
//! | `GUGU_INITIAL_VALUE` | any text              | `initial_value`  |
//! | `GUGU_MAX_BASE`      | `0..=MAX_BASE`        | `max_base`       |
//! | `GUGU_EMPTY_INPUT`   | `reject` \| `zero`    | `empty_input`    |
//! | `GUGU_EMIT_PARTIALS` | `1/0/true/false/...`  | `emit_partials`  |
//!
//! Invalid values are reported as [`ConfigError`] diagnostics and leave the
//! default in place.

use core::fmt;
use std::env;

use gugu_core::MAX_BASE;

pub const ENV_INITIAL_VALUE: &str = "GUGU_INITIAL_VALUE";
pub const ENV_MAX_BASE: &str = "GUGU_MAX_BASE";
pub const ENV_EMPTY_INPUT: &str = "GUGU_EMPTY_INPUT";
pub const ENV_EMIT_PARTIALS: &str = "GUGU_EMIT_PARTIALS";

/// Value held before the first input event.
pub const DEFAULT_INITIAL_VALUE: &str = "0";

/// How an empty input string is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInputPolicy {
    /// Deliver an error; no table.
    #[default]
    Reject,
    /// Treat the empty field as base 0 and deliver the zero table.
    ZeroTable,
}

impl EmptyInputPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::ZeroTable => "zero",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" | "error" => Some(Self::Reject),
            "zero" | "zero-table" | "zero_table" => Some(Self::ZeroTable),
            _ => None,
        }
    }
}

/// Configuration for a [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Value the holder starts with. Default: `"0"`.
    pub initial_value: String,
    /// Largest accepted base. Clamped to [`MAX_BASE`]. Default: `MAX_BASE`.
    pub max_base: u64,
    /// Empty input handling. Default: [`EmptyInputPolicy::Reject`].
    pub empty_input: EmptyInputPolicy,
    /// Deliver each partial accumulation through `on_partial` before the
    /// finished table. Default: `false`.
    pub emit_partials: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            initial_value: DEFAULT_INITIAL_VALUE.to_owned(),
            max_base: MAX_BASE,
            empty_input: EmptyInputPolicy::Reject,
            emit_partials: false,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
        self
    }

    #[must_use]
    pub fn with_max_base(mut self, max_base: u64) -> Self {
        self.max_base = max_base;
        self
    }

    #[must_use]
    pub fn with_empty_input(mut self, policy: EmptyInputPolicy) -> Self {
        self.empty_input = policy;
        self
    }

    #[must_use]
    pub fn with_emit_partials(mut self, enabled: bool) -> Self {
        self.emit_partials = enabled;
        self
    }

    /// The base limit actually enforced.
    #[must_use]
    pub fn effective_max_base(&self) -> u64 {
        self.max_base.min(MAX_BASE)
    }

    /// Read config from environment variables, ignoring invalid entries.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Read config from environment variables and report invalid entries.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Validate constraints and return every violation.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.max_base > MAX_BASE {
            errors.push(ConfigError::new(
                "max_base",
                self.max_base.to_string(),
                format!("must be <= {MAX_BASE}"),
            ));
        }
        if self.initial_value.contains('\n') {
            errors.push(ConfigError::new(
                "initial_value",
                self.initial_value.escape_debug().to_string(),
                "must be a single line",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Config plus the diagnostics collected while reading it.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: PipelineConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = PipelineConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_INITIAL_VALUE) {
        if value.contains('\n') {
            errors.push(ConfigError::new(
                "initial_value",
                value.escape_debug().to_string(),
                "must be a single line",
            ));
        } else {
            config.initial_value = value;
        }
    }

    if let Some(value) = get(ENV_MAX_BASE) {
        match value.trim().parse::<u64>() {
            Ok(parsed) if parsed <= MAX_BASE => config.max_base = parsed,
            Ok(_) => errors.push(ConfigError::new(
                "max_base",
                value,
                format!("must be <= {MAX_BASE}"),
            )),
            Err(_) => errors.push(ConfigError::new(
                "max_base",
                value,
                "expected non-negative integer",
            )),
        }
    }

    if let Some(value) = get(ENV_EMPTY_INPUT) {
        match EmptyInputPolicy::parse(&value) {
            Some(parsed) => config.empty_input = parsed,
            None => errors.push(ConfigError::new(
                "empty_input",
                value,
                "expected reject|zero",
            )),
        }
    }

    if let Some(value) = get(ENV_EMIT_PARTIALS) {
        match parse_bool(&value) {
            Some(parsed) => config.emit_partials = parsed,
            None => errors.push(ConfigError::new(
                "emit_partials",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Err(mut invalid) = config.validate() {
        errors.append(&mut invalid);
    }

    ConfigParse { config, errors }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse_from(vars: &[(&str, &str)]) -> ConfigParse {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        from_env_with(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.initial_value, "0");
        assert_eq!(config.max_base, MAX_BASE);
        assert_eq!(config.empty_input, EmptyInputPolicy::Reject);
        assert!(!config.emit_partials);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_env_gives_defaults() {
        let parsed = parse_from(&[]);
        assert_eq!(parsed.config, PipelineConfig::default());
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn env_overrides_apply() {
        let parsed = parse_from(&[
            (ENV_INITIAL_VALUE, "5"),
            (ENV_MAX_BASE, "99"),
            (ENV_EMPTY_INPUT, "zero"),
            (ENV_EMIT_PARTIALS, "yes"),
        ]);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.config.initial_value, "5");
        assert_eq!(parsed.config.max_base, 99);
        assert_eq!(parsed.config.empty_input, EmptyInputPolicy::ZeroTable);
        assert!(parsed.config.emit_partials);
    }

    #[test]
    fn invalid_env_values_are_reported() {
        let parsed = parse_from(&[
            (ENV_MAX_BASE, "lots"),
            (ENV_EMPTY_INPUT, "maybe"),
            (ENV_EMIT_PARTIALS, "sometimes"),
        ]);
        let fields: Vec<&str> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["max_base", "empty_input", "emit_partials"]);
        assert_eq!(parsed.config, PipelineConfig::default());
    }

    #[test]
    fn max_base_above_limit_is_reported() {
        let too_big = u64::MAX.to_string();
        let parsed = parse_from(&[(ENV_MAX_BASE, too_big.as_str())]);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.config.max_base, MAX_BASE);
    }

    #[test]
    fn validate_collects_all_violations() {
        let config = PipelineConfig::default()
            .with_max_base(u64::MAX)
            .with_initial_value("1\n2");
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(config.effective_max_base(), MAX_BASE);
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::new("max_base", "x", "expected non-negative integer");
        assert_eq!(err.to_string(), "max_base=x (expected non-negative integer)");
    }

    #[test]
    fn empty_policy_round_trips_names() {
        for policy in [EmptyInputPolicy::Reject, EmptyInputPolicy::ZeroTable] {
            assert_eq!(EmptyInputPolicy::parse(policy.as_str()), Some(policy));
        }
    }
}
