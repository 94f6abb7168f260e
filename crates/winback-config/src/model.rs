// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Winback cart-recovery backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Winback configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WinbackConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Record store backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cafe24 storefront settings.
    #[serde(default)]
    pub storefront: StorefrontConfig,

    /// Kakao Alimtalk messaging settings.
    #[serde(default)]
    pub messaging: MessagingConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "winback".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the gateway to.
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to bind the gateway to.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Public base URL of the dashboard frontend, used to build payment links
    /// embedded in notification messages.
    #[serde(default = "default_app_url")]
    pub app_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            app_url: default_app_url(),
        }
    }
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

/// Record store backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Record store backend to use: "sqlite" or "memory".
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Path to the SQLite database file. Ignored by the memory backend.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            database_path: default_database_path(),
        }
    }
}

fn default_storage_backend() -> String {
    "sqlite".to_string()
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("winback").join("winback.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("winback.db"))
        .to_string_lossy()
        .into_owned()
}

/// Cafe24 storefront configuration.
///
/// Without an access token the storefront adapter serves a generated mock
/// catalog. Debug output intentionally masks the access token.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorefrontConfig {
    /// Cafe24 mall identifier, used to build orderform URLs.
    #[serde(default)]
    pub mall_id: Option<String>,

    /// Cafe24 API access token. `None` keeps the adapter in mock mode.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Number of carts in the generated mock catalog.
    #[serde(default = "default_catalog_size")]
    pub catalog_size: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            mall_id: None,
            access_token: None,
            catalog_size: default_catalog_size(),
        }
    }
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("mall_id", &self.mall_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("catalog_size", &self.catalog_size)
            .finish()
    }
}

fn default_catalog_size() -> usize {
    80
}

/// Kakao Alimtalk messaging configuration.
///
/// All three credentials must be set for real sends; if any is missing the
/// messenger runs in mock mode and fabricates receipts. Debug output
/// intentionally masks the REST API key and sender key.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagingConfig {
    /// Kakao REST API key.
    #[serde(default)]
    pub rest_api_key: Option<String>,

    /// Alimtalk sender profile key.
    #[serde(default)]
    pub sender_key: Option<String>,

    /// Registered Alimtalk template code.
    #[serde(default)]
    pub template_code: Option<String>,

    /// Base URL of the Kakao API.
    #[serde(default = "default_messaging_base_url")]
    pub base_url: String,
}

impl MessagingConfig {
    /// Whether all credentials needed for real sends are present.
    pub fn has_credentials(&self) -> bool {
        self.rest_api_key.is_some() && self.sender_key.is_some() && self.template_code.is_some()
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            rest_api_key: None,
            sender_key: None,
            template_code: None,
            base_url: default_messaging_base_url(),
        }
    }
}

impl std::fmt::Debug for MessagingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingConfig")
            .field("rest_api_key", &self.rest_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("sender_key", &self.sender_key.as_ref().map(|_| "[REDACTED]"))
            .field("template_code", &self.template_code)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_messaging_base_url() -> String {
    "https://kapi.kakao.com".to_string()
}
