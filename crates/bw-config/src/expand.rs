//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Variables are looked up in the layered [`EnvVars`], so values from a
//! `.env` file are visible as well as the process environment.

use crate::ConfigError;
use crate::env::EnvVars;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str, env: &EnvVars) -> Result<String, ConfigError> {
    // Fast path: no expansion needed
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match env.get(var) {
            Some(val) => Ok(Some(val.to_owned())),
            None => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvVars {
        EnvVars::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_expand_simple_var() {
        let result = expand_env("${BW_SIMPLE}", "test.field", &env(&[("BW_SIMPLE", "hello")]));
        assert_eq!(result.unwrap(), "hello");
    }

    #[test]
    fn test_expand_with_default_uses_value() {
        let vars = env(&[("BW_DEFAULT", "hello")]);
        let result = expand_env("${BW_DEFAULT:-world}", "test.field", &vars).unwrap();
        assert_eq!(result, "hello");
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        let result = expand_env("${BW_UNSET:-default}", "test.field", &env(&[])).unwrap();
        assert_eq!(result, "default");
    }

    #[test]
    fn test_expand_missing_var_error() {
        let result = expand_env("${BW_MISSING}", "backlog.api_key", &env(&[]));
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("BW_MISSING"));
        assert!(err.to_string().contains("backlog.api_key"));
    }

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("literal string", "test.field", &env(&[])).unwrap();
        assert_eq!(result, "literal string");
    }

    #[test]
    fn test_expand_embedded_var() {
        let vars = env(&[("BW_SPACE", "acme")]);
        let result = expand_env("${BW_SPACE}-docs", "backlog.space_id", &vars).unwrap();
        assert_eq!(result, "acme-docs");
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("$VAR", "test.field", &env(&[])).unwrap();
        assert_eq!(result, "$VAR");
    }
}
