// Local build of the deployable binary. The platform runs Linux containers,
// so the Go toolchain is asked to cross-compile for linux.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Build output that is removed from disk when dropped, whether the upload
/// succeeded or not.
#[derive(Debug)]
pub struct BuildArtifact {
    path: PathBuf,
}

impl BuildArtifact {
    /// Take ownership of `path`; it will be deleted on drop.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        BuildArtifact { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BuildArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "removed build artifact"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove build artifact"),
        }
    }
}

/// Run `go build -o <app_name>` in `dir` targeting linux.
pub fn build_binary(dir: &Path, app_name: &str) -> Result<BuildArtifact> {
    // Guard first so a half-written binary from a failed build goes too.
    let artifact = BuildArtifact::adopt(dir.join(app_name));
    debug!(dir = %dir.display(), app = app_name, "running go build");

    let output = Command::new("go")
        .args(["build", "-o", app_name])
        .current_dir(dir)
        .env("GOOS", "linux")
        .output()
        .map_err(|e| Error::Build(format!("failed to run `go build`: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Build(stderr.trim().to_string()));
    }
    Ok(artifact)
}
