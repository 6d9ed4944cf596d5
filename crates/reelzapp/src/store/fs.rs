use super::fs_backend::FsBackend;
use super::local_store::LocalStore;
use std::path::PathBuf;

/// Production store: every collection is a `<key>.json` file in the data directory.
pub type FileStore = LocalStore<FsBackend>;

impl FileStore {
    pub fn new_fs(root: PathBuf) -> Self {
        LocalStore::with_backend(FsBackend::new(root))
    }
}
