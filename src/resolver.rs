//! Cascading resolution of the settings that apply to one file
//!
//! Walks from the target's directory up to the filesystem root, lets each
//! directory's config file contribute its matching sections, and stops after
//! the first file that declares `root = true`. Values found nearer the target
//! always win.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::{
    merge_nearer_wins, post_process, ConfigCache, ConfigNames, DirectoryConfig, FileSource,
    FsSource, Properties,
};
use crate::error::{Error, PathError};
use crate::walker::ancestors;

/// Resolution engine. Holds no per-resolution state, so one instance can
/// serve many lookups, including from several threads when `S` allows it.
#[derive(Debug, Clone)]
pub struct Resolver<S = FsSource> {
    source: S,
    names: ConfigNames,
    cache: Option<Arc<ConfigCache>>,
}

impl Resolver<FsSource> {
    pub fn new() -> Self {
        Self::with_source(FsSource)
    }
}

impl Default for Resolver<FsSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FileSource> Resolver<S> {
    /// Resolver reading config files through `source`.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            names: ConfigNames::default(),
            cache: None,
        }
    }

    pub fn with_names(mut self, names: ConfigNames) -> Self {
        self.names = names;
        self
    }

    /// Reuse parsed files across resolutions while their mtime is unchanged.
    pub fn with_cache(mut self, cache: Arc<ConfigCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn names(&self) -> &ConfigNames {
        &self.names
    }

    /// Effective properties for the file at `target`, which must be absolute
    /// but need not exist.
    pub fn resolve(&self, target: &Path) -> Result<Properties, Error> {
        check_absolute(target)?;
        let mut merged = Properties::new();

        for dir in ancestors(target) {
            let config = self.load(&dir)?;
            merge_nearer_wins(&mut merged, config.matched_properties(target));
            if config.is_root() {
                debug!(dir = %dir.display(), "root config reached");
                break;
            }
        }

        post_process(&mut merged);
        Ok(merged)
    }

    /// Directory whose config file ends the walk for `target`, or the
    /// filesystem root when no file claims to be root.
    pub fn project_root(&self, target: &Path) -> Result<PathBuf, Error> {
        check_absolute(target)?;
        let dirs = ancestors(target);

        for dir in &dirs {
            if self.load(dir)?.is_root() {
                return Ok(dir.clone());
            }
        }

        Ok(dirs.last().cloned().unwrap_or_else(|| target.to_path_buf()))
    }

    fn load(&self, dir: &Path) -> Result<DirectoryConfig, Error> {
        DirectoryConfig::load(&self.source, dir, &self.names, self.cache.as_deref())
    }
}

fn check_absolute(target: &Path) -> Result<(), PathError> {
    if target.is_absolute() {
        Ok(())
    } else {
        Err(PathError {
            path: target.to_path_buf(),
        })
    }
}

/// Resolve `target` against the local filesystem with default file names.
pub fn resolve(target: &Path) -> Result<Properties, Error> {
    Resolver::new().resolve(target)
}
