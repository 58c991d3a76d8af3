//! Configuration system
//!
//! Loads ~/.config/redirect-deployer/config.yaml with:
//! - The projects root holding one directory per Firebase project
//! - The Firebase CLI executable and its timeout
//! - The panel's bind address

mod panel_config;
pub mod validation;

pub use panel_config::PanelConfig;
pub use validation::{validate_config, ValidationError};
