//! Dependency manifest (`requirements.txt`) parsing.
//!
//! The manifest is read-only input and is always handed to the package
//! manager verbatim (`pip install -r`); parsing exists for reporting,
//! preflight checks and the install fingerprint, never to re-implement
//! pip's resolution.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::BootstrapError;

/// One requirement line: the distribution name plus the raw line pip sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Distribution name before any version/extras/marker syntax,
    /// e.g. `flask` from `flask[async]>=2.3 ; python_version >= "3.8"`.
    pub name: String,
    /// The raw line as written in the manifest.
    pub line: String,
}

/// Parsed dependency manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub path: PathBuf,
    /// Named requirements, in file order.
    pub requirements: Vec<Requirement>,
    /// Pass-through pip option lines (`-r`, `--index-url`, ...).
    pub options: Vec<String>,
    raw: Vec<u8>,
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?").unwrap())
}

impl Manifest {
    /// Read and parse the manifest. A missing or unreadable file is a
    /// dependency-install failure: there is nothing meaningful to launch
    /// against.
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        let raw = std::fs::read(path).map_err(|e| {
            BootstrapError::InstallDeps(format!("cannot read manifest {}: {}", path.display(), e))
        })?;
        let text = String::from_utf8_lossy(&raw).into_owned();

        let mut requirements = Vec::new();
        let mut options = Vec::new();
        for line in text.lines() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('-') {
                options.push(line.to_string());
                continue;
            }
            if let Some(m) = name_re().find(line) {
                requirements.push(Requirement {
                    name: m.as_str().to_string(),
                    line: line.to_string(),
                });
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            requirements,
            options,
            raw,
        })
    }

    /// SHA-256 hex digest of the raw manifest bytes. Recorded in the
    /// environment after a successful install so unchanged manifests skip
    /// the install step.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.raw);
        hex::encode(hasher.finalize())
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty() && self.options.is_empty()
    }
}

/// Drop a trailing comment. pip only treats `#` preceded by whitespace (or
/// at line start) as a comment, so URL fragments like `pkg.zip#sha256=...`
/// survive.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_manifest(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("requirements.txt");
        let mut f = std::fs::File::create(&path).expect("create manifest");
        f.write_all(content.as_bytes()).expect("write manifest");
        (dir, path)
    }

    #[test]
    fn test_parse_names_and_specs() {
        let (_dir, path) = write_manifest(
            "flask==2.3.0\nrequests>=2.28  # http client\nwebsocket-client\npytz~=2023.3\n",
        );
        let m = Manifest::load(&path).expect("load");
        let names: Vec<&str> = m.requirements.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["flask", "requests", "websocket-client", "pytz"]);
        assert_eq!(m.requirements[1].line, "requests>=2.28");
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let (_dir, path) = write_manifest("# deps\n\n   \nflask\n  # trailing\n");
        let m = Manifest::load(&path).expect("load");
        assert_eq!(m.requirements.len(), 1);
        assert!(m.options.is_empty());
    }

    #[test]
    fn test_option_lines_kept_separately() {
        let (_dir, path) = write_manifest("--index-url https://pypi.example/simple\n-r base.txt\nflask\n");
        let m = Manifest::load(&path).expect("load");
        assert_eq!(m.options.len(), 2);
        assert_eq!(m.requirements.len(), 1);
    }

    #[test]
    fn test_extras_and_markers_do_not_leak_into_name() {
        let (_dir, path) = write_manifest("uvicorn[standard]>=0.23 ; python_version >= \"3.8\"\n");
        let m = Manifest::load(&path).expect("load");
        assert_eq!(m.requirements[0].name, "uvicorn");
    }

    #[test]
    fn test_missing_manifest_is_install_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Manifest::load(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, BootstrapError::InstallDeps(_)));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let (_dir, path) = write_manifest("flask==2.3.0\n");
        let a = Manifest::load(&path).expect("load").fingerprint();
        let b = Manifest::load(&path).expect("load").fingerprint();
        assert_eq!(a, b);

        std::fs::write(&path, "flask==2.3.1\n").expect("rewrite");
        let c = Manifest::load(&path).expect("load").fingerprint();
        assert_ne!(a, c);
    }
}
