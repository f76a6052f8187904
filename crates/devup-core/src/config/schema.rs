//! Domain-grouped configuration structs.
//!
//! Loaded from environment variables (after `.env`), with CLI overrides
//! applied on top: CLI > env > default.

use std::path::PathBuf;

use super::env_keys::{env as env_keys, observability as obv_keys, server as server_keys};
use super::loader::{env_bool, env_optional, env_or, env_parse, load_dotenv};

/// Environment provisioning configuration.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Virtual environment directory.
    pub env_dir: PathBuf,
    /// Dependency manifest path.
    pub manifest: PathBuf,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            env_dir: PathBuf::from(env_or(env_keys::DEVUP_ENV_DIR, || "venv".to_string())),
            manifest: PathBuf::from(env_or(env_keys::DEVUP_MANIFEST, || {
                "requirements.txt".to_string()
            })),
        }
    }

    pub fn with_cli_overrides(
        mut self,
        env_dir: Option<PathBuf>,
        manifest: Option<PathBuf>,
    ) -> Self {
        if let Some(dir) = env_dir {
            self.env_dir = dir;
        }
        if let Some(path) = manifest {
            self.manifest = path;
        }
        self
    }
}

/// Application launch configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// ASGI application spec, `module:attribute`.
    pub app: String,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Log verbosity passed to the server.
    pub log_level: String,
    /// Auto-reload on source changes.
    pub reload: bool,
    /// Combined-output log file.
    pub log_file: PathBuf,
    /// Grace period after forwarding a termination signal.
    pub grace_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            app: env_or(server_keys::DEVUP_APP, || "main:app".to_string()),
            host: env_or(server_keys::DEVUP_HOST, || "0.0.0.0".to_string()),
            port: env_parse(server_keys::DEVUP_PORT, 8000),
            log_level: env_or(server_keys::DEVUP_APP_LOG_LEVEL, || "info".to_string()),
            reload: env_bool(server_keys::DEVUP_RELOAD, true),
            log_file: PathBuf::from(env_or(server_keys::DEVUP_LOG_FILE, || {
                "server.log".to_string()
            })),
            grace_secs: env_parse(server_keys::DEVUP_GRACE_SECS, 10),
        }
    }

    pub fn with_cli_overrides(
        mut self,
        app: Option<String>,
        host: Option<String>,
        port: Option<u16>,
        log_file: Option<PathBuf>,
        no_reload: bool,
    ) -> Self {
        if let Some(app) = app {
            self.app = app;
        }
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(log_file) = log_file {
            self.log_file = log_file;
        }
        if no_reload {
            self.reload = false;
        }
        self
    }

    /// Arguments handed to the server process: bind address, port, verbosity
    /// and (unless disabled) auto-reload.
    pub fn server_args(&self) -> Vec<String> {
        let mut args = vec![
            self.app.clone(),
            "--host".to_string(),
            self.host.clone(),
            "--port".to_string(),
            self.port.to_string(),
            "--log-level".to_string(),
            self.log_level.clone(),
        ];
        if self.reload {
            args.push("--reload".to_string());
        }
        args
    }
}

/// Logging and audit configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            quiet: env_bool(obv_keys::DEVUP_QUIET, false),
            log_level: env_or(obv_keys::DEVUP_LOG_LEVEL, || "info".to_string()),
            log_json: env_bool(obv_keys::DEVUP_LOG_JSON, false),
            audit_log: env_optional(obv_keys::DEVUP_AUDIT_LOG),
        }
    }
}
