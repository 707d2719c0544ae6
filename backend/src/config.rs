//! # Registry Configuration
//!
//! Runtime settings read from a single YAML file. The path comes from the
//! `STUDENT_REGISTRY_CONFIG` environment variable and defaults to
//! `registry.yaml` in the working directory. A missing file means defaults.
//!
//! ## YAML Format
//!
//! ```yaml
//! database_url: "sqlite:students.db"
//! bind_address: "127.0.0.1:3000"
//! default_page_size: 10
//! privileged_email: "admin@school.org"
//! export_filename: "alunos.csv"
//! cors_origin: "http://localhost:8080"
//! accounts:
//!   - email: "admin@school.org"
//!     password: "change-me"
//! ```

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::export_service::DEFAULT_EXPORT_FILENAME;
use crate::domain::view_state::{is_allowed_page_size, DEFAULT_PAGE_SIZE, PAGE_SIZES};
use crate::storage::Account;

pub const CONFIG_PATH_ENV: &str = "STUDENT_REGISTRY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "registry.yaml";

/// A sign-in account for the local auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub database_url: String,
    pub bind_address: String,
    pub default_page_size: u32,
    /// The only account allowed to export; export is off when unset
    pub privileged_email: Option<String>,
    pub export_filename: String,
    pub cors_origin: Option<String>,
    pub accounts: Vec<AccountConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:students.db".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            privileged_email: None,
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            cors_origin: None,
            accounts: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Path named by the environment, or the default
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load and validate the file at `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config = Self::from_yaml(&yaml_content)
            .with_context(|| format!("Invalid config {:?}", path))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as a map
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: RegistryConfig = serde_yaml::from_str(yaml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            bail!("database_url must not be empty");
        }
        self.bind_address
            .parse::<SocketAddr>()
            .with_context(|| format!("bind_address {:?} is not a socket address", self.bind_address))?;
        if !is_allowed_page_size(self.default_page_size) {
            bail!(
                "default_page_size {} must be one of {:?}",
                self.default_page_size,
                PAGE_SIZES
            );
        }
        if self.export_filename.trim().is_empty() || self.export_filename.contains(['/', '\\', '"']) {
            bail!("export_filename {:?} is not a plain file name", self.export_filename);
        }
        if let Some(email) = &self.privileged_email {
            if !email.contains('@') {
                bail!("privileged_email {:?} is not an email address", email);
            }
        }
        for account in &self.accounts {
            if account.email.trim().is_empty() || account.password.is_empty() {
                bail!("accounts need both an email and a password");
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.bind_address.parse()?)
    }

    pub fn auth_accounts(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|account| Account {
                email: account.email.trim().to_string(),
                password: account.password.clone(),
            })
            .collect()
    }
}
