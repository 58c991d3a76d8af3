//! Panel configuration file handling
//!
//! Loads and manages ~/.config/redirect-deployer/config.yaml.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Panel configuration
///
/// Passed to the deployer and the HTTP server at construction time; nothing
/// reads it from process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Directory whose subdirectories are the Firebase projects
    #[serde(default = "default_projects_root")]
    pub projects_root: PathBuf,

    /// Firebase CLI executable (bare name resolved through PATH, or a path)
    #[serde(default = "default_firebase_cli")]
    pub firebase_cli: PathBuf,

    /// Upper bound for each CLI invocation, in seconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// Address the HTTP panel listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Hosting config file name inside each project
    #[serde(default = "default_config_filename")]
    pub config_filename: String,
}

fn default_projects_root() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("firebase");
    path
}

fn default_firebase_cli() -> PathBuf {
    PathBuf::from(firebase::DEFAULT_PROGRAM)
}

fn default_command_timeout() -> u64 {
    firebase::DEFAULT_TIMEOUT.as_secs()
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_config_filename() -> String {
    "firebase.json".to_string()
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            projects_root: default_projects_root(),
            firebase_cli: default_firebase_cli(),
            command_timeout_secs: default_command_timeout(),
            bind: default_bind(),
            config_filename: default_config_filename(),
        }
    }
}

impl PanelConfig {
    /// Configuration rooted at `projects_root`, everything else default
    pub fn with_root(projects_root: impl Into<PathBuf>) -> Self {
        Self {
            projects_root: projects_root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::DeployerError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading panel configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            projects_root = %config.projects_root.display(),
            firebase_cli = %config.firebase_cli.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration, using defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving panel configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/redirect-deployer/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("redirect-deployer");
        path.push("config.yaml");
        path
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e| {
            crate::DeployerError::Config(format!("Invalid bind address '{}': {}", self.bind, e))
        })
    }

    /// Directory of a project
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.projects_root.join(project)
    }

    /// Hosting config file of a project
    pub fn hosting_config_path(&self, project: &str) -> PathBuf {
        self.project_dir(project).join(&self.config_filename)
    }

    /// CLI wrapper running inside a project directory
    pub fn firebase_for(&self, project: &str) -> firebase::Firebase {
        firebase::Firebase::new(&self.firebase_cli)
            .with_workdir(self.project_dir(project))
            .with_timeout(self.command_timeout())
    }
}
