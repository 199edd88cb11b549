// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Eodreport", "eodreport"));

pub const DEFAULT_BRANCH: &str = "Default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
}

fn default_port() -> u16 {
    587
}

fn default_currency() -> String {
    "Rs".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub smtp: SmtpConfig,
    /// Sender address, defaults to the SMTP username.
    #[serde(default)]
    pub from: Option<String>,
    /// Branch name to manager address. Must contain `Default`.
    pub branches: BTreeMap<String, String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl AppConfig {
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.smtp.username)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.branches.contains_key(DEFAULT_BRANCH) {
            return Err(ConfigError::MissingDefaultBranch);
        }
        Ok(())
    }

    /// Starter file written by `config init`.
    pub fn template() -> Self {
        let mut branches = BTreeMap::new();
        for b in ["Mumbai", "Delhi", "Bangalore", DEFAULT_BRANCH] {
            branches.insert(b.to_string(), "manager@example.com".to_string());
        }
        Self {
            smtp: SmtpConfig {
                host: "smtp.gmail.com".into(),
                port: default_port(),
                username: "sender@example.com".into(),
                password: "app-password".into(),
            },
            from: None,
            branches,
            currency: default_currency(),
            output_dir: default_output_dir(),
        }
    }

    /// Copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut c = self.clone();
        c.smtp.password = "********".into();
        c
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or(ConfigError::NoConfigDir)?;
    Ok(proj.config_dir().join("config.json"))
}

pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => config_path(),
    }
}

pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = fs::read_to_string(path)?;
    let cfg: AppConfig = serde_json::from_str(&raw)?;
    cfg.validate()?;
    log::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

pub fn save(path: &Path, cfg: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(cfg)?)?;
    Ok(())
}
