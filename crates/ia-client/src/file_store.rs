use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::store::ConfigStore;

/// Config store keeping the session in a single JSON file
///
/// Saves are atomic: the new content goes to `<file>.tmp`, is synced, and
/// then renamed over the old file while an advisory lock on `<file>.lock`
/// is held.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    lock_file: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let lock_file = sibling(&path, "lock");

        Self { path, lock_file }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire an exclusive lock on the config file
    fn acquire_lock(&self) -> io::Result<fs::File> {
        let lock_file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_file)?;

        lock_file.try_lock_exclusive().map_err(|e| {
            io::Error::new(
                io::ErrorKind::WouldBlock,
                format!("{} is locked by another process: {}", self.path.display(), e),
            )
        })?;

        Ok(lock_file)
    }
}

/// `config.json` -> `config.json.<extension>`
fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}

/// Write and sync a file readable by the owner only (Unix).
///
/// A leftover file from an interrupted save is replaced, never reused, so it
/// can't carry its looser mode over.
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed stale {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> io::Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config file at {}", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let _lock = self.acquire_lock()?;

        let temp_path = sibling(&self.path, "tmp");
        let result =
            write_private(&temp_path, bytes).and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileConfigStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path().join("inpost-air.config.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (store, _temp) = create_test_store();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let (store, _temp) = create_test_store();

        store.save(br#"{"refreshToken":"r","authToken":""}"#).unwrap();

        assert_eq!(store.load().unwrap(), br#"{"refreshToken":"r","authToken":""}"#);
        assert!(!sibling(store.path(), "tmp").exists());
    }

    #[test]
    fn test_save_overwrites() {
        let (store, _temp) = create_test_store();

        store.save(b"first, and longer").unwrap();
        store.save(b"second").unwrap();

        assert_eq!(store.load().unwrap(), b"second");
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path().join("nested/dir/config.json"));

        store.save(b"{}").unwrap();

        assert_eq!(store.load().unwrap(), b"{}");
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp) = create_test_store();
        store.save(b"{}").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_temp_file_does_not_leak_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp) = create_test_store();
        let temp_path = sibling(store.path(), "tmp");
        fs::write(&temp_path, b"leftover").unwrap();
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o644)).unwrap();

        store.save(b"{}").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), b"{}");
        assert!(!temp_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_private_creates_owner_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.tmp");

        write_private(&path, b"secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read(&path).unwrap(), b"secret");
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        // A non-empty directory where the config file should be makes the rename fail
        let target = temp_dir.path().join("config.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();
        let store = FileConfigStore::new(&target);

        assert!(store.save(b"{}").is_err());
        assert!(!sibling(&target, "tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_sibling_paths() {
        let path = Path::new("/tmp/app.config.json");

        assert_eq!(sibling(path, "lock"), Path::new("/tmp/app.config.json.lock"));
        assert_eq!(sibling(path, "tmp"), Path::new("/tmp/app.config.json.tmp"));
    }
}
