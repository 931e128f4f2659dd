// Credential store: the only place identity state touches the filesystem.
// The account returned by a successful login lives in a single JSON file
// under `~/.hostgo`. Nothing is encrypted and file permissions are the
// platform defaults.

use crate::error::{Error, Result};
use crate::types::Account;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const AUTH_DIR_NAME: &str = ".hostgo";
const AUTH_FILE_NAME: &str = ".auth.json";

/// Environment variable consulted when the home directory cannot be detected.
pub const HOME_DIR_ENV: &str = "HOME_DIR";

/// Pick the detected home directory, falling back to an explicit override.
pub fn resolve_home(detected: Option<PathBuf>, fallback: Option<OsString>) -> Result<PathBuf> {
    detected
        .or_else(|| fallback.filter(|h| !h.is_empty()).map(PathBuf::from))
        .ok_or(Error::NoHomeDir)
}

pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Store rooted in the current user's home directory.
    pub fn new() -> Result<Self> {
        let home = resolve_home(dirs::home_dir(), std::env::var_os(HOME_DIR_ENV))?;
        Ok(Self::in_home(home))
    }

    pub fn in_home(home: impl AsRef<Path>) -> Self {
        CredentialStore {
            dir: home.as_ref().join(AUTH_DIR_NAME),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(AUTH_FILE_NAME)
    }

    /// Read the saved account. A missing file and a corrupt one are the
    /// same thing to the caller: not logged in.
    pub fn load(&self) -> Result<Account> {
        let path = self.path();
        let data = fs::read(&path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "no credential file");
            Error::NotAuthenticated
        })?;
        let account: Account = serde_json::from_slice(&data).map_err(|e| {
            debug!(path = %path.display(), error = %e, "unreadable credential file");
            Error::NotAuthenticated
        })?;
        if account.account_token.is_empty() {
            debug!(path = %path.display(), "credential file has no token");
            return Err(Error::NotAuthenticated);
        }
        Ok(account)
    }

    /// Replace any previous credential state with `account`. The whole
    /// directory is recreated so nothing from an older login survives.
    pub fn save(&self, account: &Account) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_vec(account)?;
        fs::write(self.path(), data)?;
        info!(path = %self.path().display(), "saved credentials");
        Ok(())
    }
}
