//! Environment variable key constants.
//!
//! Everything devup reads from the environment is declared here so the full
//! surface is greppable in one place.

/// Environment provisioning.
pub mod env {
    /// Virtual environment directory (default: `venv`).
    pub const DEVUP_ENV_DIR: &str = "DEVUP_ENV_DIR";
    /// Dependency manifest path (default: `requirements.txt`).
    pub const DEVUP_MANIFEST: &str = "DEVUP_MANIFEST";
}

/// Application launch.
pub mod server {
    /// ASGI application spec, `module:attribute` (default: `main:app`).
    pub const DEVUP_APP: &str = "DEVUP_APP";
    /// Bind address (default: `0.0.0.0`).
    pub const DEVUP_HOST: &str = "DEVUP_HOST";
    /// Bind port (default: `8000`).
    pub const DEVUP_PORT: &str = "DEVUP_PORT";
    /// Server log verbosity passed to the application (default: `info`).
    pub const DEVUP_APP_LOG_LEVEL: &str = "DEVUP_APP_LOG_LEVEL";
    /// Auto-reload toggle (default: on; `0`/`false` disables).
    pub const DEVUP_RELOAD: &str = "DEVUP_RELOAD";
    /// Combined-output log file (default: `server.log`).
    pub const DEVUP_LOG_FILE: &str = "DEVUP_LOG_FILE";
    /// Seconds to wait after forwarding a termination signal (default: 10).
    pub const DEVUP_GRACE_SECS: &str = "DEVUP_GRACE_SECS";
}

/// Logging and audit.
pub mod observability {
    /// When `1`/`true`, only WARN and above are logged.
    pub const DEVUP_QUIET: &str = "DEVUP_QUIET";
    /// Tracing filter for devup itself (default: `devup=info`).
    pub const DEVUP_LOG_LEVEL: &str = "DEVUP_LOG_LEVEL";
    /// JSON log output toggle.
    pub const DEVUP_LOG_JSON: &str = "DEVUP_LOG_JSON";
    /// Audit JSONL path; audit is off when unset.
    pub const DEVUP_AUDIT_LOG: &str = "DEVUP_AUDIT_LOG";
}
