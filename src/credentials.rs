use std::{
    env, fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{error::CloneError, Result};

pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const TOKEN_FILE: &str = ".github-token";

/// Token from `GITHUB_TOKEN`, falling back to the first line of `~/.github-token`.
pub fn resolve_token() -> Result<String> {
    let home = dirs::home_dir();
    resolve(env::var(TOKEN_VAR).ok(), home.as_deref())
}

fn resolve(from_env: Option<String>, home: Option<&Path>) -> Result<String> {
    if let Some(token) = from_env.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        debug!("Using GitHub token from {TOKEN_VAR}");
        return Ok(token.to_string());
    }

    let Some(path) = home.map(token_file) else {
        debug!("No home directory, cannot look for {TOKEN_FILE}");
        return Err(CloneError::MissingCredential);
    };

    match fs::read_to_string(&path) {
        Ok(content) => {
            let token = content.lines().next().unwrap_or_default().trim();
            if token.is_empty() {
                return Err(CloneError::MissingCredential);
            }
            debug!("Using GitHub token from {}", path.display());
            Ok(token.to_string())
        }
        Err(e) => {
            debug!("Could not read {}: {e}", path.display());
            Err(CloneError::MissingCredential)
        }
    }
}

fn token_file(home: &Path) -> PathBuf {
    home.join(TOKEN_FILE)
}
