// Per-directory project config: records which remote app the working
// directory is bound to.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

pub const CONFIG_FILE_NAME: &str = "hostgo.yml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub app_name: String,
}

impl ProjectConfig {
    pub fn new(app_name: impl Into<String>) -> Self {
        ProjectConfig {
            app_name: app_name.into(),
        }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        let data = fs::read_to_string(&path)
            .map_err(|e| Error::MissingProjectConfig(format!("{}: {}", path.display(), e)))?;
        serde_yaml::from_str(&data)
            .map_err(|e| Error::MissingProjectConfig(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = Self::path_in(dir);
        let data = serde_yaml::to_string(self)
            .map_err(|e| Error::MissingProjectConfig(e.to_string()))?;
        fs::write(&path, data)?;
        info!(path = %path.display(), app = %self.app_name, "wrote project config");
        Ok(())
    }
}

/// Git host serving one repository per app.
pub const GIT_HOST: &str = "https://git.hostgoapp.com";

pub fn git_remote_url(app_name: &str) -> String {
    format!("{}/{}.git", GIT_HOST, app_name)
}

/// Add the app's repository as the `hostgo` remote of the git checkout in `dir`.
pub fn add_git_remote(dir: &Path, app_name: &str) -> Result<String> {
    let url = git_remote_url(app_name);
    let output = Command::new("git")
        .args(["remote", "add", "hostgo", &url])
        .current_dir(dir)
        .output()?;
    if !output.status.success() {
        return Err(Error::Io(std::io::Error::other(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )));
    }
    info!(remote = %url, "added git remote");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn written_config_is_plain_yaml() {
        let dir = TempDir::new().unwrap();
        ProjectConfig::new("shiny-app").save(dir.path()).unwrap();
        let raw = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(raw.trim(), "app_name: shiny-app");
        assert_eq!(
            ProjectConfig::load(dir.path()).unwrap(),
            ProjectConfig::new("shiny-app")
        );
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MissingProjectConfig(_)));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn git_remote_points_at_app_repository() {
        assert_eq!(
            git_remote_url("shiny-app"),
            "https://git.hostgoapp.com/shiny-app.git"
        );
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "app_name: [unterminated").unwrap();
        assert!(matches!(
            ProjectConfig::load(dir.path()),
            Err(Error::MissingProjectConfig(_))
        ));
    }
}
