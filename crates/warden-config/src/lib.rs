//! Configuration management for Warden
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (WARDEN_* prefix, highest precedence)
//! 2. warden.local.toml (gitignored, local overrides)
//! 3. warden.toml (git-tracked, project config)
//! 4. ~/.config/warden/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main Warden configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub engine: EngineConfig,
    pub audit: AuditConfig,
}

/// Engine behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record field holding the owning principal's id (self-scoped rows).
    pub owner_field: String,

    /// Record field holding the owning department's id (department-scoped
    /// rows).
    pub department_field: String,

    /// Attach the principal's permission list to denial errors.
    ///
    /// Debug aid only: discloses authorization internals to the caller.
    /// Keep off in production.
    pub expose_grant_details: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            owner_field: "owner_id".to_string(),
            department_field: "department_id".to_string(),
            expose_grant_details: false,
        }
    }
}

/// Audit logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Log granted checks.
    pub log_granted: bool,

    /// Log denied checks.
    pub log_denied: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_granted: true,
            log_denied: true,
        }
    }
}

impl WardenConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Create a development configuration (grant details exposed on
    /// denial errors for debugging)
    pub fn development() -> Self {
        Self {
            engine: EngineConfig {
                expose_grant_details: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create a production configuration
    pub fn production() -> Self {
        Self::default()
    }
}
