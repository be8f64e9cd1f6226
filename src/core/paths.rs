use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base autoprune config directory (~/.config/autoprune/ on Unix-like systems)
pub fn autoprune() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("autoprune"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("autoprune"))
    }
}

/// Global autoprune.json config file path
pub fn autoprune_json() -> Result<PathBuf> {
    Ok(autoprune()?.join("autoprune.json"))
}
