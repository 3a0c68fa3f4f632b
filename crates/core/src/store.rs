//! Filesystem-backed baseline store
//!
//! Maps logical baseline names to PNG files under a single root directory.
//! The handle is constructed once and passed to the comparator explicitly,
//! so there is no implicit shared baseline directory between callers.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{VisualError, VisualResult};

/// Validate a logical baseline name.
///
/// Names become file stems inside the store, so anything that could
/// escape the store root (separators, `..`) is rejected.
pub fn validate_name(name: &str) -> VisualResult<()> {
    if name.is_empty() {
        return Err(VisualError::InvalidName(name.to_string()));
    }
    let ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(VisualError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Persistent store of baseline images, keyed by name.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    root: PathBuf,
}

impl BaselineStore {
    /// Open (and create if missing) a baseline store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> VisualResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!("Baseline store opened at {}", root.display());
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a baseline with this name is (or would be) stored at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.png", name))
    }

    /// Whether a baseline exists for `name`.
    pub fn contains(&self, name: &str) -> VisualResult<bool> {
        validate_name(name)?;
        Ok(self.path_for(name).exists())
    }

    /// Load the stored baseline bytes for `name`, if present.
    pub fn load(&self, name: &str) -> VisualResult<Option<Vec<u8>>> {
        validate_name(name)?;
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(&path)?))
    }

    /// Persist `bytes` as the baseline for `name`, overwriting any
    /// previous baseline.
    pub fn save(&self, name: &str, bytes: &[u8]) -> VisualResult<()> {
        validate_name(name)?;
        let path = self.path_for(name);
        std::fs::write(&path, bytes)?;
        info!("Baseline saved: {}", path.display());
        Ok(())
    }

    /// Remove the baseline for `name`. Returns whether one existed.
    pub fn remove(&self, name: &str) -> VisualResult<bool> {
        validate_name(name)?;
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        info!("Baseline removed: {}", path.display());
        Ok(true)
    }

    /// List all baseline names in the store.
    pub fn list(&self) -> VisualResult<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "png").unwrap_or(false) {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("homepage_layout").is_ok());
        assert!(validate_name("nav-bar-2").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("../escape").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("space name").is_err());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = BaselineStore::open(tmp.path()).unwrap();

        assert!(!store.contains("homepage").unwrap());
        assert!(store.load("homepage").unwrap().is_none());

        store.save("homepage", b"not-really-a-png").unwrap();
        assert!(store.contains("homepage").unwrap());
        assert_eq!(
            store.load("homepage").unwrap().unwrap(),
            b"not-really-a-png"
        );
    }

    #[test]
    fn test_remove() {
        let tmp = TempDir::new().unwrap();
        let store = BaselineStore::open(tmp.path()).unwrap();

        store.save("login", b"x").unwrap();
        assert!(store.remove("login").unwrap());
        assert!(!store.remove("login").unwrap());
        assert!(!store.contains("login").unwrap());
    }

    #[test]
    fn test_list_sorted() {
        let tmp = TempDir::new().unwrap();
        let store = BaselineStore::open(tmp.path()).unwrap();

        store.save("b-page", b"x").unwrap();
        store.save("a-page", b"x").unwrap();
        // Non-PNG files are ignored
        std::fs::write(tmp.path().join("notes.txt"), b"ignore me").unwrap();

        assert_eq!(store.list().unwrap(), vec!["a-page", "b-page"]);
    }

    #[test]
    fn test_open_creates_root() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("deep").join("baselines");
        let store = BaselineStore::open(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(store.root(), nested.as_path());
    }
}
