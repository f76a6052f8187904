//! Tracing init and the optional audit trail.
//!
//! Uses `ObservabilityConfig` for DEVUP_QUIET, DEVUP_LOG_LEVEL,
//! DEVUP_LOG_JSON and DEVUP_AUDIT_LOG.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use devup_core::config::ObservabilityConfig;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialize tracing. Call once at process startup.
/// When DEVUP_QUIET=1, only WARN and above are logged.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = if cfg.quiet {
        "warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn append_jsonl(path: &str, record: &serde_json::Value) {
    if let Some(parent) = Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
        if let Ok(line) = serde_json::to_string(record) {
            let _ = writeln!(f, "{}", line);
        }
    }
}

/// Audit: launch_started (right before spawn)
pub fn audit_launch_started(program: &Path, args: &[String]) {
    if let Some(path) = ObservabilityConfig::from_env().audit_log {
        let record = json!({
            "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "event": "launch_started",
            "program": program.to_string_lossy(),
            "args": args,
        });
        append_jsonl(&path, &record);
    }
}

/// Audit: launch_completed (child exited)
pub fn audit_launch_completed(program: &Path, exit_code: i32) {
    if let Some(path) = ObservabilityConfig::from_env().audit_log {
        let record = json!({
            "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "event": "launch_completed",
            "program": program.to_string_lossy(),
            "exit_code": exit_code,
            "success": exit_code == 0,
        });
        append_jsonl(&path, &record);
    }
}
