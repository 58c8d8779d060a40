use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("home directory not found, set $HOME environment variable")]
    HomeNotFound,
}

/// Name of the per-user and per-project settings directory.
const DIR_NAME: &str = ".cardboard";

/// Centralized path construction for the `~/.cardboard/` directory layout.
///
/// Use `resolve()` in production code and `from_dir()` in tests.
#[derive(Debug, Clone)]
pub struct CardboardPaths {
    base_dir: PathBuf,
}

impl CardboardPaths {
    /// Resolve paths from the user's home directory (`~/.cardboard`).
    pub fn resolve() -> Result<Self, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeNotFound)?;
        Ok(Self {
            base_dir: home.join(DIR_NAME),
        })
    }

    /// Create paths from an explicit base directory. Use in tests.
    pub fn from_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// The base `~/.cardboard` directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn user_config(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    /// Default location for a static card snapshot: `~/.cardboard/cards.json`.
    pub fn default_snapshot(&self) -> PathBuf {
        self.base_dir.join("cards.json")
    }

    // --- Static helpers (no self) ---

    /// Project-level config: `<project_root>/.cardboard/config.toml`.
    pub fn project_config(project_root: &Path) -> PathBuf {
        project_root.join(DIR_NAME).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_paths() -> CardboardPaths {
        CardboardPaths::from_dir(PathBuf::from("/home/user/.cardboard"))
    }

    #[test]
    fn test_resolve_returns_ok_when_home_set() {
        // HOME is set in CI and dev environments
        let result = CardboardPaths::resolve();
        assert!(result.is_ok());
        let paths = result.unwrap();
        assert!(paths.base_dir().to_string_lossy().contains(".cardboard"));
    }

    #[test]
    fn test_from_dir() {
        let paths = CardboardPaths::from_dir(PathBuf::from("/tmp/test-cardboard"));
        assert_eq!(paths.base_dir(), Path::new("/tmp/test-cardboard"));
    }

    #[test]
    fn test_user_config() {
        assert_eq!(
            test_paths().user_config(),
            PathBuf::from("/home/user/.cardboard/config.toml")
        );
    }

    #[test]
    fn test_default_snapshot() {
        assert_eq!(
            test_paths().default_snapshot(),
            PathBuf::from("/home/user/.cardboard/cards.json")
        );
    }

    #[test]
    fn test_project_config() {
        assert_eq!(
            CardboardPaths::project_config(Path::new("/work/site")),
            PathBuf::from("/work/site/.cardboard/config.toml")
        );
    }
}
