//! Configuration file location.

use crate::constants::{APP_NAME, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Platform configuration directory, e.g. `~/.config/wildreid/` on Linux.
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Default config file inside [`config_dir`].
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// The config file in effect: `explicit` when given, otherwise the default.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    explicit.map_or_else(config_file_path, |path| Ok(path.to_path_buf()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_is_app_scoped_toml() {
        let path = config_file_path().unwrap();
        assert!(path.to_string_lossy().contains(APP_NAME));
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = Path::new("/tmp/other.toml");
        assert_eq!(
            resolve_config_path(Some(explicit)).unwrap(),
            explicit.to_path_buf()
        );
    }

    #[test]
    fn test_no_explicit_path_uses_default() {
        assert_eq!(
            resolve_config_path(None).unwrap(),
            config_file_path().unwrap()
        );
    }
}
