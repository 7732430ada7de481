// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Semantic checks that cannot be expressed via serde attributes (non-empty
//! paths, sane domain), plus the serve-time credential check.

use crate::diagnostic::ConfigError;
use crate::model::ClipcastConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ClipcastConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.videos_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.videos_dir must not be empty".to_string(),
        });
    }

    if config.storage.activity_log.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.activity_log must not be empty".to_string(),
        });
    }

    if config.source.ytdlp_bin.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "source.ytdlp_bin must not be empty".to_string(),
        });
    }

    // The domain is interpolated into the URL accept pattern; restrict it to
    // hostname characters so it cannot change the pattern's meaning.
    let domain = config.source.domain.trim();
    if domain.is_empty() {
        errors.push(ConfigError::Validation {
            message: "source.domain must not be empty".to_string(),
        });
    } else if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::Validation {
            message: format!("source.domain `{domain}` is not a valid hostname"),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Check that every credential required to serve is present and non-empty.
///
/// Called by the serve path only; `clipcast config` works without
/// credentials. Absence of any credential is fatal at startup.
pub fn validate_credentials(config: &ClipcastConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let required: [(&str, &Option<String>); 5] = [
        ("telegram.bot_token", &config.telegram.bot_token),
        ("twitter.consumer_key", &config.twitter.consumer_key),
        ("twitter.consumer_secret", &config.twitter.consumer_secret),
        ("twitter.access_token", &config.twitter.access_token),
        (
            "twitter.access_token_secret",
            &config.twitter.access_token_secret,
        ),
    ];

    for (key, value) in required {
        let missing = match value {
            Some(v) => v.trim().is_empty(),
            None => true,
        };
        if missing {
            errors.push(ConfigError::MissingCredential {
                key: key.to_string(),
                env_var: format!("CLIPCAST_{}", key.replace('.', "_").to_uppercase()),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
