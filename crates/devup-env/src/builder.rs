//! Build the isolated environment and install dependencies.
//!
//! All external tools (`python -m venv`, pip) run with inherited stdio:
//! their progress and failure output goes straight to the terminal, and
//! devup's errors only name the step that died.

use std::path::PathBuf;
use std::process::Command;

use devup_core::config::EnvConfig;
use devup_core::error::BootstrapError;
use devup_core::manifest::Manifest;

use crate::resolver::EnvPaths;

/// Fingerprint of the last successfully installed manifest, stored inside
/// the environment directory.
const FINGERPRINT_FILE: &str = ".manifest-sha256";

/// Result of the dependency install step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// pip ran; the manifest listed this many named requirements.
    Installed(usize),
    /// Manifest unchanged since the last successful install; pip skipped.
    UpToDate,
}

/// Ensure the environment exists, creating it when absent.
///
/// An existing environment is reused as-is; creation runs
/// `python -m venv <dir>` with a system interpreter.
pub fn ensure_environment(cfg: &EnvConfig) -> Result<EnvPaths, BootstrapError> {
    if EnvPaths::exists(&cfg.env_dir) {
        tracing::info!(dir = %cfg.env_dir.display(), "Reusing existing environment");
        return EnvPaths::resolve(&cfg.env_dir);
    }

    let python = system_python().map_err(|e| BootstrapError::create_env(&cfg.env_dir, e))?;
    tracing::info!(
        dir = %cfg.env_dir.display(),
        python = %python.display(),
        "Creating virtual environment"
    );

    let status = Command::new(&python)
        .arg("-m")
        .arg("venv")
        .arg(&cfg.env_dir)
        .status()
        .map_err(|e| {
            BootstrapError::create_env(
                &cfg.env_dir,
                format!("failed to run {}: {}", python.display(), e),
            )
        })?;
    if !status.success() {
        return Err(BootstrapError::create_env(
            &cfg.env_dir,
            format!("venv exited with {status}"),
        ));
    }

    EnvPaths::resolve(&cfg.env_dir)
}

/// Upgrade the environment's pip to the latest version.
///
/// A non-zero exit is a warning, not a failure: the bundled pip still works
/// and a genuinely broken pip fails loudly at the install step. Not being
/// able to spawn the interpreter at all means the environment is broken.
pub fn upgrade_pip(paths: &EnvPaths) -> Result<(), BootstrapError> {
    tracing::info!("Upgrading pip");
    let status = Command::new(&paths.python)
        .args(["-m", "pip", "install", "--upgrade", "pip"])
        .status()
        .map_err(|e| {
            BootstrapError::activate(
                &paths.env_dir,
                format!("cannot run {}: {}", paths.python.display(), e),
            )
        })?;
    if !status.success() {
        tracing::warn!(%status, "pip self-upgrade failed; continuing with the bundled pip");
    }
    Ok(())
}

/// Install the manifest into the environment.
///
/// Skipped when the recorded fingerprint matches the manifest (unless
/// `force`); the manifest file itself is handed to pip verbatim.
pub fn install_requirements(
    paths: &EnvPaths,
    manifest: &Manifest,
    force: bool,
) -> Result<InstallOutcome, BootstrapError> {
    let fingerprint = manifest.fingerprint();
    let marker = paths.env_dir.join(FINGERPRINT_FILE);

    if !force {
        if let Ok(previous) = std::fs::read_to_string(&marker) {
            if previous.trim() == fingerprint {
                tracing::info!(
                    manifest = %manifest.path.display(),
                    "Dependencies up to date, skipping install"
                );
                return Ok(InstallOutcome::UpToDate);
            }
        }
    }

    tracing::info!(
        manifest = %manifest.path.display(),
        requirements = manifest.requirements.len(),
        "Installing dependencies"
    );
    let status = paths
        .pip_command()
        .arg("install")
        .arg("-r")
        .arg(&manifest.path)
        .status()
        .map_err(|e| BootstrapError::InstallDeps(format!("cannot run pip: {e}")))?;
    if !status.success() {
        return Err(BootstrapError::InstallDeps(format!(
            "pip install -r {} exited with {}",
            manifest.path.display(),
            status
        )));
    }

    if let Err(e) = std::fs::write(&marker, format!("{fingerprint}\n")) {
        tracing::warn!(error = %e, "Could not record manifest fingerprint");
    }
    Ok(InstallOutcome::Installed(manifest.requirements.len()))
}

/// Locate a system interpreter to create environments with.
pub fn system_python() -> Result<PathBuf, String> {
    for name in ["python3", "python"] {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }
    Err("python3 or python not found in PATH".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn fake_env(dir: &Path) -> EnvPaths {
        fs::create_dir_all(dir.join("bin")).expect("mkdir bin");
        fs::write(dir.join("bin").join("python"), "").expect("touch python");
        EnvPaths::resolve(dir).expect("resolve")
    }

    fn write_manifest(dir: &Path, content: &str) -> Manifest {
        let path = dir.join("requirements.txt");
        fs::write(&path, content).expect("write manifest");
        Manifest::load(&path).expect("load manifest")
    }

    #[test]
    fn test_existing_environment_is_reused() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env_dir = tmp.path().join("venv");
        fake_env(&env_dir);

        // No usable interpreter on PATH is needed for the reuse path.
        let cfg = EnvConfig {
            env_dir: env_dir.clone(),
            manifest: tmp.path().join("requirements.txt"),
        };
        let paths = ensure_environment(&cfg).expect("reuse");
        assert_eq!(paths.env_dir, env_dir);
    }

    #[test]
    fn test_matching_fingerprint_skips_install() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env_dir = tmp.path().join("venv");
        let paths = fake_env(&env_dir);
        let manifest = write_manifest(tmp.path(), "flask==2.3.0\n");

        fs::write(
            env_dir.join(FINGERPRINT_FILE),
            format!("{}\n", manifest.fingerprint()),
        )
        .expect("write marker");

        let outcome = install_requirements(&paths, &manifest, false).expect("skip");
        assert_eq!(outcome, InstallOutcome::UpToDate);
    }

    #[test]
    fn test_stale_fingerprint_does_not_skip() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env_dir = tmp.path().join("venv");
        let paths = fake_env(&env_dir);
        let manifest = write_manifest(tmp.path(), "flask==2.3.0\n");

        fs::write(env_dir.join(FINGERPRINT_FILE), "0000\n").expect("write marker");

        // The fake interpreter is not executable, so reaching pip fails,
        // which proves the skip was not taken.
        let err = install_requirements(&paths, &manifest, false).unwrap_err();
        assert!(matches!(err, BootstrapError::InstallDeps(_)));
    }

    #[test]
    fn test_force_bypasses_fingerprint() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env_dir = tmp.path().join("venv");
        let paths = fake_env(&env_dir);
        let manifest = write_manifest(tmp.path(), "flask==2.3.0\n");

        fs::write(
            env_dir.join(FINGERPRINT_FILE),
            format!("{}\n", manifest.fingerprint()),
        )
        .expect("write marker");

        let err = install_requirements(&paths, &manifest, true).unwrap_err();
        assert!(matches!(err, BootstrapError::InstallDeps(_)));
    }
}
