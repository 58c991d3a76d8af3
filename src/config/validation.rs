//! Configuration validation
//!
//! Checks a panel configuration before the server starts:
//! - The projects root exists and is a directory
//! - The CLI path is set
//! - The timeout is positive
//! - The bind address parses
//! - The hosting config file name is a bare file name

use super::panel_config::PanelConfig;
use std::path::{Component, Path};

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a panel configuration
pub fn validate_config(config: &PanelConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if !config.projects_root.is_dir() {
        errors.push(ValidationError::new(
            "projects_root",
            format!(
                "Projects root does not exist or is not a directory: {}",
                config.projects_root.display()
            ),
        ));
    }

    if config.firebase_cli.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "firebase_cli",
            "Firebase CLI path must not be empty",
        ));
    }

    if config.command_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "command_timeout_secs",
            "Timeout must be greater than 0",
        ));
    }

    if let Err(e) = config.bind_addr() {
        errors.push(ValidationError::new("bind", e.to_string()));
    }

    if !is_bare_file_name(&config.config_filename) {
        errors.push(ValidationError::new(
            "config_filename",
            format!(
                "Must be a file name without directories: '{}'",
                config.config_filename
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_bare_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_valid_config() {
        let temp = TempDir::new().unwrap();
        let config = PanelConfig::with_root(temp.path());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_root() {
        let config = PanelConfig::with_root("/nonexistent/projects/root");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "projects_root");
    }

    #[test]
    fn test_collects_every_problem() {
        let temp = TempDir::new().unwrap();
        let mut config = PanelConfig::with_root(temp.path());
        config.firebase_cli = PathBuf::new();
        config.command_timeout_secs = 0;
        config.bind = "not an address".to_string();
        config.config_filename = "../firebase.json".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["firebase_cli", "command_timeout_secs", "bind", "config_filename"]
        );
    }

    #[test]
    fn test_bare_file_name() {
        assert!(is_bare_file_name("firebase.json"));
        assert!(!is_bare_file_name("conf/firebase.json"));
        assert!(!is_bare_file_name(".."));
        assert!(!is_bare_file_name(""));
        assert!(!is_bare_file_name("/firebase.json"));
    }
}
