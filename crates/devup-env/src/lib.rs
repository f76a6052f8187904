//! Isolated runtime environment provisioning.
//!
//! `resolver` turns an environment directory into explicit interpreter
//! paths; `builder` creates the environment and installs dependencies
//! through the package manager.

pub mod builder;
pub mod resolver;

pub use builder::{ensure_environment, install_requirements, upgrade_pip, InstallOutcome};
pub use resolver::EnvPaths;
