//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory under the config root.
const APP_DIR: &str = "cinedb";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// Order: `{dir}/config.toml` when `--dir` is given, then
/// `$XDG_CONFIG_HOME/cinedb/config.toml`, then `~/.config/cinedb/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set (when
/// `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir.map(PathBuf::as_path),
        std::env::var("XDG_CONFIG_HOME").ok().as_deref(),
        std::env::var("HOME").ok().as_deref(),
    )
}

/// Pure form of [`resolve_config_path`] over explicit environment values.
fn config_path_from(dir: Option<&Path>, xdg: Option<&str>, home: Option<&str>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    let root = match (xdg.filter(|x| !x.is_empty()), home.filter(|h| !h.is_empty())) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => Path::new(home).join(".config"),
        (None, None) => bail!("neither XDG_CONFIG_HOME nor HOME is set"),
    };
    Ok(root.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_dir_flag_wins_over_environment() {
        // Arrange
        let dir = Path::new("/srv/media/cinedb");

        // Act
        let path = config_path_from(Some(dir), Some("/xdg"), Some("/home/u")).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/srv/media/cinedb/config.toml"));
    }

    #[test]
    fn test_xdg_config_home() {
        // Arrange & Act
        let path = config_path_from(None, Some("/var/lib/conf"), Some("/home/u")).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/var/lib/conf/cinedb/config.toml"));
    }

    #[test]
    fn test_empty_xdg_falls_back_to_home() {
        // Arrange & Act
        let path = config_path_from(None, Some(""), Some("/home/u")).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.config/cinedb/config.toml"));
    }

    #[test]
    fn test_no_config_root() {
        // Arrange & Act
        let result = config_path_from(None, None, Some(""));

        // Assert
        assert!(result.unwrap_err().to_string().contains("XDG_CONFIG_HOME"));
    }

    #[test]
    fn test_resolve_with_dir_ignores_environment() {
        // Arrange
        let dir = PathBuf::from("relative/conf");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("relative/conf/config.toml"));
    }
}
