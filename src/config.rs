use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "releaseflow.toml";

/// Represents the complete configuration for release-flow.
///
/// Contains the remotes to publish to, the files merges must not carry over,
/// the build commands that stamp versions and the issue tracker settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub remote_repositories: RemoteRepositoriesConfig,

    #[serde(default)]
    pub merge_ignore_lists: MergeIgnoreListsConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub jira: JiraConfig,
}

/// Returns the default list of remotes.
fn default_remote_names() -> Vec<String> {
    vec!["origin".to_string()]
}

/// Returns the files that are never merged from a release into a stable branch.
fn default_tag_stable() -> Vec<String> {
    vec!["Build/Customizations/Version.props".to_string()]
}

/// Returns the files that are never merged back from a pre-release branch.
fn default_pre_release() -> Vec<String> {
    vec![
        "Build/Customizations/Version.props".to_string(),
        "Build/Customizations/PreRelease.props".to_string(),
    ]
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteRepositoriesConfig {
    #[serde(default = "default_remote_names")]
    pub remote_names: Vec<String>,
}

impl Default for RemoteRepositoriesConfig {
    fn default() -> Self {
        RemoteRepositoriesConfig {
            remote_names: default_remote_names(),
        }
    }
}

/// Repository-relative paths restored to the target branch's state after a merge.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MergeIgnoreListsConfig {
    #[serde(default = "default_pre_release")]
    pub pre_release: Vec<String>,

    #[serde(default = "default_tag_stable")]
    pub tag_stable: Vec<String>,
}

impl Default for MergeIgnoreListsConfig {
    fn default() -> Self {
        MergeIgnoreListsConfig {
            pre_release: default_pre_release(),
            tag_stable: default_tag_stable(),
        }
    }
}

/// Shell command templates run before the version metadata commit.
///
/// Supported placeholders: `{version}`, `{assembly_version}`,
/// `{assembly_file_version}`, `{informational_version}` and `{nuget_version}`.
/// An empty template only commits.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BuildConfig {
    #[serde(default)]
    pub prepare_next_version: String,

    #[serde(default)]
    pub development_for_next_release: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct JiraConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub project_key: String,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releaseflow.toml` in current directory
/// 3. `.releaseflow.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| ReleaseError::config(format!("Cannot read '{}': {}", path, e)))?
    } else if local.exists() {
        fs::read_to_string(&local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse and validate a TOML configuration document
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(text).map_err(|e| ReleaseError::config(format!("Invalid TOML: {}", e)))?;

    if config.remote_repositories.remote_names.is_empty() {
        return Err(ReleaseError::config(
            "[remote_repositories] remote_names must name at least one remote",
        ));
    }
    if config.jira.enabled && (config.jira.url.is_empty() || config.jira.project_key.is_empty()) {
        return Err(ReleaseError::config(
            "[jira] url and project_key are required when enabled",
        ));
    }
    Ok(config)
}
