use std::{env, path::PathBuf};

use super::constants::{
    API_URL, ARTIFACTS_PATH, CHAIN_CONFIG_PATH, CONTAINER_LABEL, DIAGNOSTICS_PATH,
};

pub const API_URL_ENV: &str = "LOCAL_IC_API_URL";
pub const CHAIN_CONFIG_ENV: &str = "ICA_CHAIN_CONFIG";
pub const ARTIFACTS_DIR_ENV: &str = "ICA_ARTIFACTS_DIR";
pub const DIAGNOSTICS_DIR_ENV: &str = "ICA_DIAGNOSTICS_DIR";
pub const LOCALHOST_ENV: &str = "ICA_LOCALHOST";
pub const CONTAINER_LABEL_ENV: &str = "ICA_CONTAINER_LABEL";

/// Runtime configuration of the e2e suite.
///
/// Defaults come from [`super::constants`]; [`SuiteConfig::from_env`] applies the
/// environment overrides on top of them.
#[derive(Clone, Debug, PartialEq)]
pub struct SuiteConfig {
    pub api_url: String,
    pub chain_config_path: PathBuf,
    pub artifacts_dir: PathBuf,
    pub diagnostics_dir: PathBuf,
    pub container_label: String,
    /// use the 09-localhost client on the controller chain instead of a
    /// connection to the host chain
    pub localhost: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
            chain_config_path: PathBuf::from(CHAIN_CONFIG_PATH),
            artifacts_dir: PathBuf::from(ARTIFACTS_PATH),
            diagnostics_dir: PathBuf::from(DIAGNOSTICS_PATH),
            container_label: CONTAINER_LABEL.to_string(),
            localhost: false,
        }
    }
}

impl SuiteConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`, keyed by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV) {
            self.api_url = url;
        }
        if let Some(path) = lookup(CHAIN_CONFIG_ENV) {
            self.chain_config_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ARTIFACTS_DIR_ENV) {
            self.artifacts_dir = PathBuf::from(path);
        }
        if let Some(path) = lookup(DIAGNOSTICS_DIR_ENV) {
            self.diagnostics_dir = PathBuf::from(path);
        }
        if let Some(label) = lookup(CONTAINER_LABEL_ENV) {
            self.container_label = label;
        }
        if let Some(flag) = lookup(LOCALHOST_ENV) {
            self.localhost = parse_flag(&flag);
        }
        self
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    pub fn with_chain_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chain_config_path = path.into();
        self
    }

    pub fn with_artifacts_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = path.into();
        self
    }

    pub fn with_diagnostics_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.diagnostics_dir = path.into();
        self
    }

    pub fn with_container_label(mut self, label: &str) -> Self {
        self.container_label = label.to_string();
        self
    }

    pub fn with_localhost(mut self, localhost: bool) -> Self {
        self.localhost = localhost;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
