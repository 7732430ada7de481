// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./clipcast.toml` > `~/.config/clipcast/clipcast.toml`
//! > `/etc/clipcast/clipcast.toml` with environment variable overrides via
//! the `CLIPCAST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ClipcastConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/clipcast/clipcast.toml` (system-wide)
/// 3. `~/.config/clipcast/clipcast.toml` (user XDG config)
/// 4. `./clipcast.toml` (local directory)
/// 5. `CLIPCAST_*` environment variables
pub fn load_config() -> Result<ClipcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ClipcastConfig::default()))
        .merge(Toml::file("/etc/clipcast/clipcast.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("clipcast/clipcast.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("clipcast.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ClipcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ClipcastConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ClipcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ClipcastConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CLIPCAST_TELEGRAM_BOT_TOKEN` must map
/// to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("CLIPCAST_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CLIPCAST_TWITTER_CONSUMER_KEY -> "twitter_consumer_key"
        // The section is split off at the first underscore only; the rest of
        // the key may itself contain underscores (bot_token, videos_dir).
        let key_str = key.as_str();
        for section in ["bot", "telegram", "twitter", "source", "storage"] {
            if let Some(rest) = key_str.strip_prefix(section)
                && let Some(rest) = rest.strip_prefix('_')
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_loader_applies_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.bot.name, "clipcast");
        assert_eq!(config.storage.videos_dir, "videos");
    }

    #[test]
    fn string_loader_merges_over_defaults() {
        let config = load_config_from_str(
            r#"
[telegram]
bot_token = "123:abc"
"#,
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        // Untouched sections keep their defaults.
        assert_eq!(config.source.domain, "tiktok.com");
    }

    #[test]
    fn unknown_key_fails_extraction() {
        let result = load_config_from_str(
            r#"
[storage]
video_dir = "oops"
"#,
        );
        assert!(result.is_err());
    }
}
