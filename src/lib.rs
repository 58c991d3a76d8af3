//! redirect-deployer - Local control panel for Firebase Hosting redirect sites
//!
//! Pick a project and a content folder, give a site name and a destination
//! URL, and the panel:
//!
//! 1. writes `index.html` and `404.html` pages that forward every visitor to
//!    the destination, keeping path and query string,
//! 2. merges a hosting target entry with a `**` 301 redirect into the
//!    project's firebase.json,
//! 3. runs `firebase target:apply` and `firebase deploy --only hosting:<site>`.
//!
//! # Architecture
//!
//! - **url**: Redirect URL normalization shared by pages and config
//! - **hosting**: firebase.json load/merge/save
//! - **artifacts**: Redirect page rendering and writing
//! - **listing**: Project and folder discovery
//! - **deploy**: Step orchestration and per-project locking
//! - **server**: HTTP panel (axum)
//! - **config**: Panel configuration and validation
//!
//! The Firebase CLI itself is driven through the `firebase` workspace crate.

pub mod artifacts;
pub mod config;
pub mod deploy;
pub mod error;
pub mod hosting;
pub mod listing;
pub mod logging;
pub mod server;
pub mod url;

// Re-exports
pub use deploy::{DeployOutcome, DeployRequest, Deployer};
pub use error::{DeployerError, Result};
