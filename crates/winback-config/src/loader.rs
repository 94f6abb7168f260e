// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./winback.toml` > `~/.config/winback/winback.toml` > `/etc/winback/winback.toml`
//! with environment variable overrides via `WINBACK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WinbackConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/winback/winback.toml` (system-wide)
/// 3. `~/.config/winback/winback.toml` (user XDG config)
/// 4. `./winback.toml` (local directory)
/// 5. `WINBACK_*` environment variables
pub fn load_config() -> Result<WinbackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WinbackConfig::default()))
        .merge(Toml::file("/etc/winback/winback.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("winback/winback.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("winback.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<WinbackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WinbackConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// Backs the `--config <path>` CLI flag, which bypasses the XDG hierarchy.
pub fn load_config_from_path(path: &Path) -> Result<WinbackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WinbackConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `WINBACK_MESSAGING_REST_API_KEY`
/// must map to `messaging.rest_api_key`, not `messaging.rest.api.key`.
fn env_provider() -> Env {
    Env::prefixed("WINBACK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: WINBACK_MESSAGING_REST_API_KEY -> "messaging_rest_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("storefront_", "storefront.", 1)
            .replacen("messaging_", "messaging.", 1);
        mapped.into()
    })
}
