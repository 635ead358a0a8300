//! Blob storage for Filebox.
//!
//! Blobs live in a flat namespace under a single root directory, keyed by
//! the client-supplied file name. Writing a name that already exists
//! replaces the earlier blob.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{FileboxError, Result};

/// Byte storage addressed by filesystem path.
pub trait BlobStore: Send + Sync {
    /// Root directory blobs are written into.
    fn root(&self) -> &Path;

    /// Location a blob with the given file name is stored at.
    fn path_for(&self, file_name: &str) -> Result<PathBuf>;

    /// Write content, replacing any existing blob at the path.
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Read the full content of a blob.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Remove a blob. A missing blob is an error.
    fn delete(&self, path: &Path) -> Result<()>;
}

/// Blob store backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore rooted at the given directory.
    ///
    /// The directory will be created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }
}

impl BlobStore for LocalBlobStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, file_name: &str) -> Result<PathBuf> {
        // Only the final component is kept so a name cannot leave the root.
        match Path::new(file_name).file_name() {
            Some(name) => Ok(self.root.join(name)),
            None => Err(FileboxError::BlobIo(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid blob name: {file_name:?}"),
            ))),
        }
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        debug!("Writing {} bytes to {:?}", content.len(), path);
        fs::write(path, content)?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        debug!("Deleting blob {:?}", path);
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (LocalBlobStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalBlobStore::new(temp_dir.path()).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_new_creates_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("blobs");

        let storage = LocalBlobStore::new(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(storage.root(), root.as_path());
    }

    #[test]
    fn test_path_for_flat_namespace() {
        let (storage, temp_dir) = setup_storage();

        assert_eq!(storage.path_for("a.png").unwrap(), temp_dir.path().join("a.png"));
        assert_eq!(
            storage.path_for("../../etc/passwd.pdf").unwrap(),
            temp_dir.path().join("passwd.pdf")
        );
        assert_eq!(storage.path_for("dir/b.pdf").unwrap(), temp_dir.path().join("b.pdf"));
    }

    #[test]
    fn test_path_for_rejects_empty_names() {
        let (storage, _temp_dir) = setup_storage();

        assert!(matches!(storage.path_for(""), Err(FileboxError::BlobIo(_))));
        assert!(matches!(storage.path_for(".."), Err(FileboxError::BlobIo(_))));
    }

    #[test]
    fn test_write_and_read() {
        let (storage, _temp_dir) = setup_storage();
        let path = storage.path_for("hello.pdf").unwrap();

        storage.write(&path, b"Hello, World!").unwrap();

        assert_eq!(storage.read(&path).unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_write_replaces_existing() {
        let (storage, _temp_dir) = setup_storage();
        let path = storage.path_for("a.png").unwrap();

        storage.write(&path, b"first").unwrap();
        storage.write(&path, b"second").unwrap();

        assert_eq!(storage.read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_read_missing() {
        let (storage, _temp_dir) = setup_storage();
        let path = storage.path_for("missing.png").unwrap();

        assert!(matches!(storage.read(&path), Err(FileboxError::BlobIo(_))));
    }

    #[test]
    fn test_delete() {
        let (storage, _temp_dir) = setup_storage();
        let path = storage.path_for("a.png").unwrap();
        storage.write(&path, b"x").unwrap();

        storage.delete(&path).unwrap();
        assert!(!path.exists());

        // A second delete has nothing to remove
        assert!(matches!(storage.delete(&path), Err(FileboxError::BlobIo(_))));
    }

    #[test]
    fn test_empty_content() {
        let (storage, _temp_dir) = setup_storage();
        let path = storage.path_for("empty.pdf").unwrap();

        storage.write(&path, b"").unwrap();

        assert!(storage.read(&path).unwrap().is_empty());
    }
}
