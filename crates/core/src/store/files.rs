use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::BuildStore;
use crate::error::StoreError;

/// [`BuildStore`] over a directory-per-application layout on disk.
#[derive(Debug, Clone)]
pub struct LocalBuildStore {
    root: PathBuf,
}

impl LocalBuildStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding every application folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative store path onto disk, refusing anything that escapes the root.
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.root.join(relative))
    }
}

impl BuildStore for LocalBuildStore {
    fn list(&self, directory: &str) -> Result<Vec<String>, StoreError> {
        let dir = self
            .resolve(directory)
            .ok_or_else(|| StoreError::NotFound {
                path: PathBuf::from(directory),
            })?;
        if !dir.is_dir() {
            debug!("no build directory at {}", dir.display());
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                StoreError::io(path, source)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => warn!("Skipping non UTF-8 file name {}", entry.path().display()),
            }
        }

        Ok(names)
    }

    fn size_of(&self, path: &str) -> Result<u64, StoreError> {
        let resolved = self.resolve(path).ok_or_else(|| StoreError::NotFound {
            path: PathBuf::from(path),
        })?;
        let metadata = fs::metadata(&resolved).map_err(|err| StoreError::io(path, err))?;
        if !metadata.is_file() {
            return Err(StoreError::NotFound {
                path: PathBuf::from(path),
            });
        }
        Ok(metadata.len())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|resolved| resolved.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_files_sorted_and_skips_directories() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let app = temp.path().join("Paper");
        fs::create_dir_all(app.join("nested"))?;
        fs::write(app.join("b.jar"), b"bb")?;
        fs::write(app.join("a.jar"), b"a")?;
        fs::write(app.join("nested").join("c.jar"), b"ccc")?;

        let store = LocalBuildStore::new(temp.path());
        assert_eq!(store.list("Paper")?, ["a.jar", "b.jar"]);
        assert!(store.list("Missing")?.is_empty());
        Ok(())
    }

    #[test]
    fn reports_size_and_existence() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::create_dir_all(temp.path().join("Paper"))?;
        fs::write(temp.path().join("Paper").join("a.jar"), b"12345")?;

        let store = LocalBuildStore::new(temp.path());
        assert_eq!(store.size_of("Paper/a.jar")?, 5);
        assert!(store.exists("Paper/a.jar"));
        assert!(!store.exists("Paper/missing.jar"));
        assert!(!store.exists("Paper"));
        assert!(matches!(
            store.size_of("Paper/missing.jar"),
            Err(StoreError::NotFound { .. })
        ));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_utf8_names() -> anyhow::Result<()> {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let temp = tempdir()?;
        let app = temp.path().join("Paper");
        fs::create_dir_all(&app)?;
        fs::write(app.join(OsStr::from_bytes(b"bad\xff.jar")), b"x")?;
        fs::write(app.join("a.jar"), b"a")?;

        let store = LocalBuildStore::new(temp.path());
        assert_eq!(store.list("Paper")?, ["a.jar"]);
        Ok(())
    }

    #[test]
    fn refuses_paths_outside_root() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path().join("builds");
        fs::create_dir_all(&root)?;
        fs::write(temp.path().join("secret.jar"), b"x")?;

        let store = LocalBuildStore::new(&root);
        assert!(!store.exists("../secret.jar"));
        assert!(matches!(
            store.size_of("../secret.jar"),
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.list("..").is_err());
        Ok(())
    }
}
