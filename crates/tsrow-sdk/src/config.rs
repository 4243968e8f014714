//! Encoder configuration, loadable from YAML with environment variable
//! substitution.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{sanitize_name, IngestError, Precision, Result, WireType};

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Policy knobs threaded through inference, extraction and metric assembly.
///
/// ```yaml
/// sanitize_names: true
/// default_precision: millisecond
/// instant_type: TIMESTAMP_MILLISECOND
/// timestamp_alias: ts
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Normalize record-derived table and column names to lower snake case.
    pub sanitize_names: bool,
    /// Width of a bare `timestamp` type annotation without a precision hint,
    /// and the initial precision of new metrics.
    pub default_precision: Precision,
    /// Column type of instant-typed record fields without a type annotation.
    pub instant_type: WireType,
    /// Name of the implicit timestamp column of new metrics.
    pub timestamp_alias: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            sanitize_names: true,
            default_precision: Precision::Millisecond,
            instant_type: WireType::TimestampMillisecond,
            timestamp_alias: "ts".to_string(),
        }
    }
}

impl EncoderConfig {
    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// [`IngestError::Config`] when `instant_type` is not temporal or the
    /// timestamp alias is not a valid name.
    pub fn validate(&self) -> Result<()> {
        if !self.instant_type.is_temporal() {
            return Err(IngestError::Config(format!(
                "instant_type must be a date, datetime or timestamp type, got {}",
                self.instant_type
            )));
        }
        let alias = self
            .name(&self.timestamp_alias)
            .map_err(|e| IngestError::Config(format!("timestamp_alias: {e}")))?;
        if alias.is_empty() {
            return Err(IngestError::Config("timestamp_alias must not be empty".into()));
        }
        Ok(())
    }

    /// Resolve a table or column name under this configuration. With
    /// sanitization off the name is only trimmed, never validated.
    ///
    /// # Errors
    ///
    /// The sanitizer's errors when sanitization is enabled.
    pub fn name(&self, raw: &str) -> Result<String> {
        if self.sanitize_names {
            return sanitize_name(raw);
        }
        Ok(raw.trim().to_string())
    }

    /// Parse a YAML document after `${VAR}` substitution, then validate.
    ///
    /// # Errors
    ///
    /// [`IngestError::Config`] on missing environment variables, malformed
    /// YAML, unknown keys or failed validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let substituted = substitute_env_vars(yaml)?;
        let config: Self = serde_yaml::from_str(&substituted)
            .map_err(|e| IngestError::Config(format!("failed to parse encoder YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    ///
    /// # Errors
    ///
    /// [`IngestError::Config`] when the file cannot be read, plus everything
    /// [`EncoderConfig::from_yaml_str`] reports.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }
}

/// Substitute `${VAR_NAME}` patterns with environment variable values.
///
/// # Errors
///
/// [`IngestError::Config`] naming every referenced variable that is not set.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = input.to_string();
    let mut missing = Vec::new();

    for cap in ENV_VAR_RE.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => result = result.replace(&cap[0], &val),
            Err(_) => missing.push(var_name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(IngestError::Config(format!(
            "missing environment variable(s): {}",
            missing.join(", ")
        )));
    }
    Ok(result)
}
