//! The full bootstrap sequence: ensure environment, upgrade pip, install
//! dependencies, launch the application.

use std::time::Duration;

use anyhow::Result;
use devup_core::config::{EnvConfig, ServerConfig};
use devup_core::manifest::Manifest;
use devup_env::{builder, EnvPaths};
use devup_launch::{supervisor, LaunchSpec};

use crate::cli::UpArgs;
use crate::observability;

/// `devup up` — returns the launched application's exit code.
pub fn cmd_up(args: UpArgs) -> Result<i32> {
    let env_cfg = EnvConfig::from_env().with_cli_overrides(args.env_dir, args.manifest);
    let server_cfg = ServerConfig::from_env().with_cli_overrides(
        args.app,
        args.host,
        args.port,
        args.log_file,
        args.no_reload,
    );

    // Ensure + activate: subsequent steps get resolved paths, never a
    // mutated process environment.
    let paths = builder::ensure_environment(&env_cfg)?;

    builder::upgrade_pip(&paths)?;

    let manifest = Manifest::load(&env_cfg.manifest)?;
    builder::install_requirements(&paths, &manifest, args.force_install)?;

    let spec = launch_spec(&paths, &server_cfg);
    observability::audit_launch_started(&spec.program, &spec.args);
    let code = supervisor::run(&spec)?;
    observability::audit_launch_completed(&spec.program, code);

    Ok(code)
}

/// Resolve the server invocation: the environment's `uvicorn` console
/// script when installed, else module invocation through the interpreter.
fn launch_spec(paths: &EnvPaths, cfg: &ServerConfig) -> LaunchSpec {
    let mut args = cfg.server_args();
    let program = match paths.app_binary("uvicorn") {
        Some(bin) => bin,
        None => {
            args.splice(0..0, ["-m".to_string(), "uvicorn".to_string()]);
            paths.python.clone()
        }
    };

    LaunchSpec {
        program,
        args,
        envs: paths.activation_env(),
        cwd: None,
        log_file: cfg.log_file.clone(),
        grace: Duration::from_secs(cfg.grace_secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn fake_paths(dir: &std::path::Path, with_uvicorn: bool) -> EnvPaths {
        fs::create_dir_all(dir.join("bin")).expect("mkdir bin");
        fs::write(dir.join("bin").join("python"), "").expect("touch python");
        if with_uvicorn {
            fs::write(dir.join("bin").join("uvicorn"), "").expect("touch uvicorn");
        }
        EnvPaths::resolve(dir).expect("resolve")
    }

    fn server_cfg() -> ServerConfig {
        ServerConfig {
            app: "main:app".into(),
            host: "0.0.0.0".into(),
            port: 8000,
            log_level: "info".into(),
            reload: true,
            log_file: PathBuf::from("server.log"),
            grace_secs: 10,
        }
    }

    #[test]
    fn test_launch_prefers_console_script() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let paths = fake_paths(&tmp.path().join("venv"), true);
        let spec = launch_spec(&paths, &server_cfg());

        assert_eq!(spec.program, paths.bin_dir.join("uvicorn"));
        assert_eq!(spec.args[0], "main:app");
    }

    #[test]
    fn test_launch_falls_back_to_module_invocation() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let paths = fake_paths(&tmp.path().join("venv"), false);
        let spec = launch_spec(&paths, &server_cfg());

        assert_eq!(spec.program, paths.python);
        assert_eq!(&spec.args[..3], &["-m", "uvicorn", "main:app"]);
        assert!(spec.args.contains(&"--reload".to_string()));
    }

    #[test]
    fn test_launch_env_activates_environment() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let paths = fake_paths(&tmp.path().join("venv"), true);
        let spec = launch_spec(&paths, &server_cfg());

        assert!(spec.envs.iter().any(|(k, _)| k == "VIRTUAL_ENV"));
        assert!(spec.envs.iter().any(|(k, _)| k == "PATH"));
    }
}
