//! Bootstrap step failures.
//!
//! Each variant maps to one fatal step of the `up` sequence. External tools
//! run with inherited stdio, so their own diagnostics have already reached
//! the terminal by the time one of these surfaces; the messages here only
//! say which step died, never re-wrap tool output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to create environment at {}: {detail}", dir.display())]
    CreateEnv { dir: PathBuf, detail: String },

    #[error("environment at {} is missing or incomplete: {detail}", dir.display())]
    Activate { dir: PathBuf, detail: String },

    #[error("dependency install failed: {0}")]
    InstallDeps(String),

    #[error("failed to launch application: {0}")]
    Launch(String),
}

impl BootstrapError {
    pub fn create_env(dir: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::CreateEnv {
            dir: dir.into(),
            detail: detail.into(),
        }
    }

    pub fn activate(dir: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Activate {
            dir: dir.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_step() {
        let e = BootstrapError::create_env("venv", "python3 not found");
        assert!(e.to_string().contains("create environment"));
        assert!(e.to_string().contains("venv"));

        let e = BootstrapError::InstallDeps("manifest not found: requirements.txt".into());
        assert!(e.to_string().starts_with("dependency install failed"));
    }
}
