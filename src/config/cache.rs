//! Cache of parsed config files
//!
//! Entries are keyed by file path and are only reused while the file's
//! modification time is unchanged. Nothing is cached unless a cache is handed
//! to the resolver explicitly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use super::ConfigFile;

#[derive(Debug)]
struct CachedFile {
    modified: SystemTime,
    file: Arc<ConfigFile>,
}

/// Shareable cache of parsed config files.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: Mutex<HashMap<PathBuf, CachedFile>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, CachedFile>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parsed file for `path`, if one was cached with the same mtime.
    pub fn get(&self, path: &Path, modified: SystemTime) -> Option<Arc<ConfigFile>> {
        self.entries()
            .get(path)
            .filter(|entry| entry.modified == modified)
            .map(|entry| Arc::clone(&entry.file))
    }

    pub fn insert(&self, path: &Path, modified: SystemTime, file: Arc<ConfigFile>) {
        self.entries()
            .insert(path.to_path_buf(), CachedFile { modified, file });
    }

    pub fn invalidate(&self, path: &Path) {
        self.entries().remove(path);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn file(path: &str) -> Arc<ConfigFile> {
        Arc::new(ConfigFile::new(Path::new(path)))
    }

    #[test]
    fn test_hit_with_same_mtime() {
        let cache = ConfigCache::new();
        let path = Path::new("/p/.editorconfig");
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(100);

        cache.insert(path, mtime, file("/p/.editorconfig"));
        assert!(cache.get(path, mtime).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss_when_mtime_changes() {
        let cache = ConfigCache::new();
        let path = Path::new("/p/.editorconfig");
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let new = SystemTime::UNIX_EPOCH + Duration::from_secs(200);

        cache.insert(path, old, file("/p/.editorconfig"));
        assert!(cache.get(path, new).is_none());

        cache.insert(path, new, file("/p/.editorconfig"));
        assert!(cache.get(path, new).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ConfigCache::new();
        let mtime = SystemTime::UNIX_EPOCH;
        cache.insert(Path::new("/a/.editorconfig"), mtime, file("/a/.editorconfig"));
        cache.insert(Path::new("/b/.editorconfig"), mtime, file("/b/.editorconfig"));

        cache.invalidate(Path::new("/a/.editorconfig"));
        assert!(cache.get(Path::new("/a/.editorconfig"), mtime).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
