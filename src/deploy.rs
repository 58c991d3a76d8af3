//! Deploy orchestration
//!
//! One deploy runs these steps in order, without retries:
//!
//! 1. Validate the request
//! 2. Write `index.html` / `404.html` redirect pages (creating the folder)
//! 3. Merge the hosting entry into the project's firebase.json
//! 4. `firebase target:apply hosting <site> <site>`
//! 5. `firebase deploy --only hosting:<site>`
//!
//! Steps 4 and 5 always both run. Only the deploy step decides the outcome;
//! the binding step's result is logged and otherwise dropped.

use crate::config::PanelConfig;
use crate::hosting::{merge_hosting_entry, MergeReport};
use crate::listing::{list_subdirectories, Listing};
use crate::url::normalize_redirect_url;
use crate::{artifacts, DeployerError, Result};
use firebase::CommandOutput;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Deploy request as sent by the panel (`siteName`, `redirectUrl`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub project: Option<String>,
    pub folder: Option<String>,
    pub site_name: Option<String>,
    pub redirect_url: Option<String>,
}

impl DeployRequest {
    pub fn new(
        project: impl Into<String>,
        folder: impl Into<String>,
        site_name: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            project: Some(project.into()),
            folder: Some(folder.into()),
            site_name: Some(site_name.into()),
            redirect_url: Some(redirect_url.into()),
        }
    }

    /// Check that every field is present and the paths stay under the root
    ///
    /// Site name and URL are trimmed. Empty values are accepted; an empty
    /// project or folder resolves to its parent directory.
    pub fn validate(self) -> Result<DeployPlan> {
        let project = require("project", self.project)?;
        let folder = require("folder", self.folder)?;
        let site_name = require("siteName", self.site_name)?.trim().to_string();
        let redirect_url = require("redirectUrl", self.redirect_url)?
            .trim()
            .to_string();

        ensure_single_component("project", &project)?;
        ensure_single_component("folder", &folder)?;

        Ok(DeployPlan {
            project,
            folder,
            site_name,
            redirect_url,
        })
    }
}

/// A validated deploy request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    pub project: String,
    pub folder: String,
    pub site_name: String,
    /// Raw redirect URL, trimmed but not normalized
    pub redirect_url: String,
}

impl DeployPlan {
    /// Normalized redirect base URL
    pub fn destination(&self) -> String {
        normalize_redirect_url(&self.redirect_url)
    }
}

/// Everything a successful run went through
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub destination: String,
    pub written: Vec<PathBuf>,
    pub merge: MergeReport,
    pub target_apply: CommandOutput,
    pub deploy: CommandOutput,
}

impl DeployReport {
    /// Only the deploy invocation decides success
    pub fn succeeded(&self) -> bool {
        self.deploy.success
    }
}

/// Caller-facing result of a deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeployOutcome {
    Deployed { success: bool, message: String },
    Failed { success: bool, error: String },
}

impl DeployOutcome {
    pub fn deployed(destination: &str) -> Self {
        DeployOutcome::Deployed {
            success: true,
            message: format!("Successfully deployed to {}", destination),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        DeployOutcome::Failed {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeployOutcome::Deployed { .. })
    }
}

impl From<&DeployReport> for DeployOutcome {
    fn from(report: &DeployReport) -> Self {
        if report.succeeded() {
            DeployOutcome::deployed(&report.destination)
        } else {
            DeployOutcome::failed(report.deploy.stderr.clone())
        }
    }
}

/// Runs deploys against the projects under a configured root
///
/// Deploys of the same project are serialized so concurrent requests cannot
/// lose each other's firebase.json update; different projects run freely.
#[derive(Debug)]
pub struct Deployer {
    config: PanelConfig,
    project_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl Deployer {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            project_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Project directories under the projects root
    pub fn list_projects(&self) -> Listing {
        list_subdirectories(&self.config.projects_root)
    }

    /// Content folder candidates inside a project
    pub fn list_folders(&self, project: &str) -> Result<Listing> {
        ensure_single_component("project", project)?;
        Ok(list_subdirectories(self.config.project_dir(project)))
    }

    /// Run a deploy and flatten the result for the caller
    ///
    /// Only request validation is an `Err`; a deploy that started always
    /// ends in a [`DeployOutcome`], failed or not.
    pub async fn deploy(&self, request: DeployRequest) -> Result<DeployOutcome> {
        let plan = match request.validate() {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected deploy request");
                return Err(e);
            }
        };

        let outcome = match self.run(&plan).await {
            Ok(report) => DeployOutcome::from(&report),
            Err(e) => {
                tracing::error!(
                    project = %plan.project,
                    target = %plan.site_name,
                    error = %e,
                    "Deploy aborted"
                );
                DeployOutcome::failed(e.to_string())
            }
        };
        Ok(outcome)
    }

    /// Run every deploy step for a validated plan
    ///
    /// Errors are the local filesystem steps; CLI failures are reported in
    /// the returned [`DeployReport`].
    pub async fn run(&self, plan: &DeployPlan) -> Result<DeployReport> {
        let project_dir = self.config.project_dir(&plan.project);
        let folder_dir = project_dir.join(&plan.folder);
        let destination = plan.destination();

        let lock = self.project_lock(&project_dir).await;
        let _guard = lock.lock().await;

        tracing::info!(
            project = %plan.project,
            folder = %plan.folder,
            target = %plan.site_name,
            destination = %destination,
            "Starting deploy"
        );

        let written = artifacts::write_redirect_artifacts(&folder_dir, &plan.redirect_url)?;

        let merge = merge_hosting_entry(
            self.config.hosting_config_path(&plan.project),
            &plan.site_name,
            &plan.folder,
            &plan.redirect_url,
        )?;

        let cli = self.config.firebase_for(&plan.project);

        let target_apply = cli.target_apply(&plan.site_name, &plan.site_name).await;
        if target_apply.success {
            tracing::info!(target = %plan.site_name, "Hosting target applied");
        } else {
            tracing::warn!(
                target = %plan.site_name,
                stderr = %target_apply.stderr.trim(),
                "Hosting target apply failed, deploying anyway"
            );
        }

        let deploy = cli.deploy_hosting(&plan.site_name).await;
        if deploy.success {
            tracing::info!(target = %plan.site_name, destination = %destination, "Deploy finished");
        } else {
            tracing::warn!(
                target = %plan.site_name,
                stderr = %deploy.stderr.trim(),
                "Deploy failed"
            );
        }

        Ok(DeployReport {
            destination,
            written,
            merge,
            target_apply,
            deploy,
        })
    }

    async fn project_lock(&self, project_dir: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.project_locks.lock().await;
        locks
            .entry(project_dir.to_path_buf())
            .or_default()
            .clone()
    }
}

fn require(field: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| DeployerError::InvalidInput(format!("Missing field: {}", field)))
}

/// Reject names that would leave their parent directory
fn ensure_single_component(field: &str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (None, None) if value.is_empty() => Ok(()),
        (Some(Component::Normal(name)), None) if name == value => Ok(()),
        _ => Err(DeployerError::InvalidInput(format!(
            "{} must be a single folder name: '{}'",
            field, value
        ))),
    }
}
