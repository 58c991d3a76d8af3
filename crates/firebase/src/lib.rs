//! Firebase CLI wrapper for Rust
//!
//! A small, type-safe interface to the `firebase` command line tool, covering
//! the hosting commands needed to bind a deploy target and deploy it.
//!
//! Every invocation runs with a working directory, captures stdout/stderr as
//! text and is bounded by a timeout. Failures never panic or bubble up as
//! hard errors from [`Firebase::run`]; they are folded into a
//! [`CommandOutput`] with `success == false`.
//!
//! # Example
//!
//! ```no_run
//! use firebase::Firebase;
//! use std::time::Duration;
//!
//! # async fn demo() {
//! let cli = Firebase::new("firebase")
//!     .with_workdir("/srv/firebase/my-project")
//!     .with_timeout(Duration::from_secs(120));
//!
//! cli.target_apply("promo-site", "promo-site").await;
//! let deployed = cli.deploy_hosting("promo-site").await;
//! if !deployed.success {
//!     eprintln!("deploy failed: {}", deployed.stderr);
//! }
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Default upper bound for a single CLI invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default program name, resolved through `PATH`
pub const DEFAULT_PROGRAM: &str = "firebase";

/// Errors that can occur when invoking the Firebase CLI
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Result type for firebase operations
pub type Result<T> = std::result::Result<T, Error>;

/// Output from a firebase command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Build a failed output carrying the error message as stderr
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: err.to_string(),
        }
    }

    /// Get combined stdout and stderr output
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Firebase CLI wrapper
#[derive(Debug, Clone)]
pub struct Firebase {
    /// Executable to run (bare name or absolute path)
    program: PathBuf,
    /// Working directory, usually the project root holding firebase.json
    workdir: Option<PathBuf>,
    /// Upper bound for each invocation
    timeout: Duration,
}

impl Default for Firebase {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Firebase {
    /// Create a wrapper for the given executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Run commands from a specific working directory
    pub fn with_workdir(mut self, path: impl Into<PathBuf>) -> Self {
        self.workdir = Some(path.into());
        self
    }

    /// Override the per-invocation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check if the CLI can be started at all
    pub async fn is_available(&self) -> bool {
        self.version().await.is_ok()
    }

    /// Get the CLI version string (`firebase --version`)
    pub async fn version(&self) -> Result<String> {
        let output = self.try_run(&["--version"]).await?;
        if !output.success {
            return Err(Error::CommandFailed(output.combined()));
        }
        Ok(output.stdout.trim().to_string())
    }

    // --- Hosting ---

    /// Bind a hosting target name to a site (`target:apply hosting <target> <site>`)
    pub async fn target_apply(&self, target: &str, site: &str) -> CommandOutput {
        self.run(&["target:apply", "hosting", target, site]).await
    }

    /// Deploy only the given hosting target (`deploy --only hosting:<target>`)
    pub async fn deploy_hosting(&self, target: &str) -> CommandOutput {
        let only = format!("hosting:{}", target);
        self.run(&["deploy", "--only", &only]).await
    }

    // --- Raw command execution ---

    /// Run an arbitrary firebase command, folding every failure into the output
    pub async fn run(&self, args: &[&str]) -> CommandOutput {
        match self.try_run(args).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    program = %self.program.display(),
                    args = ?args,
                    error = %e,
                    "Firebase CLI invocation failed"
                );
                CommandOutput::from_error(&e)
            }
        }
    }

    /// Run an arbitrary firebase command, surfacing spawn failures and timeouts
    ///
    /// A non-zero exit status is not an error here; it is reported through
    /// [`CommandOutput::success`].
    pub async fn try_run(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(ref dir) = self.workdir {
            cmd.current_dir(dir);
        }

        tracing::debug!(
            program = %self.program.display(),
            args = ?args,
            workdir = ?self.workdir,
            "Running firebase command"
        );

        // Dropping the pending future on timeout kills the child.
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|source| Error::Spawn {
                program: self.program.display().to_string(),
                source,
            })?,
            Err(_) => {
                return Err(Error::Timeout {
                    program: self.program.display().to_string(),
                    timeout: self.timeout,
                })
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        tracing::debug!(
            status = ?output.status.code(),
            success = output.status.success(),
            "Firebase command finished"
        );

        Ok(CommandOutput {
            success: output.status.success(),
            stdout,
            stderr,
        })
    }
}
