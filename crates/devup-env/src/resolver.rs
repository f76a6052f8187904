//! Resolved environment paths.
//!
//! Activation is modeled as data, not process state: `EnvPaths` carries the
//! interpreter and bin directory of the isolated environment, and
//! `activation_env()` yields the variables injected into child processes.
//! devup's own environment is never mutated.

use std::path::{Path, PathBuf};
use std::process::Command;

use devup_core::error::BootstrapError;

/// Resolved paths of an isolated environment.
#[derive(Debug, Clone)]
pub struct EnvPaths {
    /// Environment directory root.
    pub env_dir: PathBuf,
    /// Script/binary directory (`bin` on Unix, `Scripts` on Windows).
    pub bin_dir: PathBuf,
    /// The environment's Python interpreter.
    pub python: PathBuf,
}

impl EnvPaths {
    /// True when `env_dir` holds a provisioned interpreter. This is the
    /// idempotence check: an existing environment is reused, never rebuilt.
    pub fn exists(env_dir: &Path) -> bool {
        env_dir.join("bin").join("python").exists()
            || env_dir.join("Scripts").join("python.exe").exists()
    }

    /// Resolve an environment directory into concrete paths. Fails when the
    /// directory is absent or holds no interpreter; subsequent steps must
    /// not run against a missing or broken environment.
    pub fn resolve(env_dir: &Path) -> Result<Self, BootstrapError> {
        let unix_python = env_dir.join("bin").join("python");
        let windows_python = env_dir.join("Scripts").join("python.exe");

        let (bin_dir, python) = if unix_python.exists() {
            (env_dir.join("bin"), unix_python)
        } else if windows_python.exists() {
            (env_dir.join("Scripts"), windows_python)
        } else {
            return Err(BootstrapError::activate(
                env_dir,
                "no interpreter found (expected bin/python or Scripts/python.exe)",
            ));
        };

        Ok(Self {
            env_dir: env_dir.to_path_buf(),
            bin_dir,
            python,
        })
    }

    /// Command invoking the environment's pip: the `pip` script if the venv
    /// installed one, else `python -m pip`.
    pub fn pip_command(&self) -> Command {
        let pip = self.bin_dir.join(if cfg!(windows) { "pip.exe" } else { "pip" });
        if pip.exists() {
            Command::new(pip)
        } else {
            let mut cmd = Command::new(&self.python);
            cmd.arg("-m").arg("pip");
            cmd
        }
    }

    /// Path to a console script installed into the environment, if present.
    pub fn app_binary(&self, name: &str) -> Option<PathBuf> {
        let candidate = self.bin_dir.join(if cfg!(windows) {
            format!("{name}.exe")
        } else {
            name.to_string()
        });
        candidate.exists().then_some(candidate)
    }

    /// Environment variables that make child processes resolve binaries
    /// from this environment first: `VIRTUAL_ENV` plus a `PATH` with the
    /// bin directory prepended.
    pub fn activation_env(&self) -> Vec<(String, String)> {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let joined = std::env::join_paths(
            std::iter::once(self.bin_dir.clone()).chain(std::env::split_paths(&path)),
        )
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| self.bin_dir.to_string_lossy().into_owned());

        vec![
            (
                "VIRTUAL_ENV".to_string(),
                self.env_dir.to_string_lossy().into_owned(),
            ),
            ("PATH".to_string(), joined),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fake_env(dir: &Path) {
        fs::create_dir_all(dir.join("bin")).expect("mkdir bin");
        fs::write(dir.join("bin").join("python"), "").expect("touch python");
    }

    #[test]
    fn test_exists_requires_interpreter() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env_dir = tmp.path().join("venv");
        assert!(!EnvPaths::exists(&env_dir));

        // A bare directory is not a valid environment
        fs::create_dir_all(&env_dir).expect("mkdir");
        assert!(!EnvPaths::exists(&env_dir));

        fake_env(&env_dir);
        assert!(EnvPaths::exists(&env_dir));
    }

    #[test]
    fn test_resolve_missing_env_is_activation_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = EnvPaths::resolve(&tmp.path().join("venv")).unwrap_err();
        assert!(matches!(err, BootstrapError::Activate { .. }));
    }

    #[test]
    fn test_resolve_finds_unix_layout() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env_dir = tmp.path().join("venv");
        fake_env(&env_dir);

        let paths = EnvPaths::resolve(&env_dir).expect("resolve");
        assert_eq!(paths.bin_dir, env_dir.join("bin"));
        assert_eq!(paths.python, env_dir.join("bin").join("python"));
    }

    #[test]
    fn test_app_binary_lookup() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env_dir = tmp.path().join("venv");
        fake_env(&env_dir);
        let paths = EnvPaths::resolve(&env_dir).expect("resolve");

        assert!(paths.app_binary("uvicorn").is_none());
        fs::write(env_dir.join("bin").join("uvicorn"), "").expect("touch uvicorn");
        assert_eq!(
            paths.app_binary("uvicorn"),
            Some(env_dir.join("bin").join("uvicorn"))
        );
    }

    #[test]
    fn test_activation_env_prepends_bin_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env_dir = tmp.path().join("venv");
        fake_env(&env_dir);
        let paths = EnvPaths::resolve(&env_dir).expect("resolve");

        let vars = paths.activation_env();
        let virtual_env = &vars.iter().find(|(k, _)| k == "VIRTUAL_ENV").expect("VIRTUAL_ENV").1;
        assert_eq!(virtual_env, &env_dir.to_string_lossy());

        let path = &vars.iter().find(|(k, _)| k == "PATH").expect("PATH").1;
        let first = std::env::split_paths(path).next().expect("non-empty PATH");
        assert_eq!(first, paths.bin_dir);
    }
}
