//! Preflight checks: everything `up` needs, without launching anything or
//! mutating the environment.

use anyhow::Result;
use devup_core::config::EnvConfig;
use devup_core::manifest::Manifest;
use devup_env::{builder, EnvPaths};

use crate::cli::CheckArgs;

/// `devup check`
pub fn cmd_check(args: CheckArgs) -> Result<()> {
    let cfg = EnvConfig::from_env().with_cli_overrides(args.env_dir, args.manifest);
    let mut failed = false;

    match builder::system_python() {
        Ok(python) => eprintln!("  ✓ system interpreter: {}", python.display()),
        Err(e) => {
            eprintln!("  ✗ system interpreter: {}", e);
            failed = true;
        }
    }

    if EnvPaths::exists(&cfg.env_dir) {
        match EnvPaths::resolve(&cfg.env_dir) {
            Ok(paths) => eprintln!(
                "  ✓ environment: {} ({})",
                cfg.env_dir.display(),
                paths.python.display()
            ),
            Err(e) => {
                eprintln!("  ✗ environment: {}", e);
                failed = true;
            }
        }
    } else {
        eprintln!(
            "  • environment: {} (not yet created — `devup up` will create it)",
            cfg.env_dir.display()
        );
    }

    match Manifest::load(&cfg.manifest) {
        Ok(manifest) => eprintln!(
            "  ✓ manifest: {} ({} requirement(s))",
            cfg.manifest.display(),
            manifest.requirements.len()
        ),
        Err(e) => {
            eprintln!("  ✗ manifest: {}", e);
            failed = true;
        }
    }

    if failed {
        anyhow::bail!("preflight failed");
    }
    eprintln!("Preflight OK.");
    Ok(())
}
