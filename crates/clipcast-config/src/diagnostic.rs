// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Converts Figment deserialization errors into miette diagnostics so
//! startup failures print a readable report instead of a debug dump.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic information.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(clipcast::config::unknown_key),
        help("valid keys: {valid_keys}")
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A configuration value failed to deserialize.
    #[error("invalid configuration value: {detail}")]
    #[diagnostic(code(clipcast::config::invalid_value))]
    InvalidValue {
        /// Description of the mismatch, including the offending key path.
        detail: String,
    },

    /// A credential required to serve is absent.
    #[error("missing required credential `{key}`")]
    #[diagnostic(
        code(clipcast::config::missing_credential),
        help("set `{key}` in clipcast.toml or export {env_var}")
    )]
    MissingCredential {
        /// Dotted config key path, e.g. `telegram.bot_token`.
        key: String,
        /// Equivalent environment variable name.
        env_var: String,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(clipcast::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(clipcast::config::other))]
    Other(String),
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// A figment error may contain multiple underlying errors; each is
/// converted to the closest `ConfigError` variant.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let path = error.path.join(".");
        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let key = if path.is_empty() {
                    field.clone()
                } else {
                    format!("{path}.{field}")
                };
                ConfigError::UnknownKey {
                    key,
                    valid_keys: expected.join(", "),
                }
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidValue {
                detail: format!("`{path}`: expected {expected}, found {actual}"),
            },
            Kind::InvalidValue(actual, expected) => ConfigError::InvalidValue {
                detail: format!("`{path}`: expected {expected}, found {actual}"),
            },
            Kind::MissingField(field) => ConfigError::InvalidValue {
                detail: format!("missing field `{field}` in `{path}`"),
            },
            _ => ConfigError::Other(format!("{error}")),
        };
        errors.push(config_error);
    }

    errors
}

/// Render configuration errors to stderr as miette reports.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error.clone()));
    }
    eprintln!(
        "clipcast: {} configuration error(s), aborting",
        errors.len()
    );
}
