//! Locating and loading the config file that speaks for a directory

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use super::cache::ConfigCache;
use super::{parse_editorconfig, parse_toolconfig, ConfigFile, Properties};
use crate::error::{Error, ParseError};

/// Name of a ToolConfig file.
pub const TOOL_CONFIG_NAME: &str = ".toolconfig.toml";

/// Name of an EditorConfig file.
pub const EDITOR_CONFIG_NAME: &str = ".editorconfig";

/// Byte source for config files.
///
/// `read` returns `Ok(None)` when the file does not exist; every other
/// failure is reported to the caller.
pub trait FileSource {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Modification time, used to validate cached parses. `None` disables
    /// caching for this file.
    fn modified(&self, _path: &Path) -> Option<SystemTime> {
        None
    }
}

/// [`FileSource`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

impl FileSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if is_missing(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

/// File names looked up in every directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNames {
    pub tool: String,
    pub editor: String,
}

impl Default for ConfigNames {
    fn default() -> Self {
        Self {
            tool: TOOL_CONFIG_NAME.to_string(),
            editor: EDITOR_CONFIG_NAME.to_string(),
        }
    }
}

impl ConfigNames {
    /// Replace the EditorConfig file name. Only meant for conformance test
    /// harnesses.
    pub fn with_editor_name(mut self, name: impl Into<String>) -> Self {
        self.editor = name.into();
        self
    }
}

/// The single config file a directory contributes, if any.
///
/// A ToolConfig file always shadows an EditorConfig file in the same
/// directory, even when it is empty.
#[derive(Debug, Clone)]
pub enum DirectoryConfig {
    Tool(Arc<ConfigFile>),
    Editor(Arc<ConfigFile>),
    Absent,
}

impl DirectoryConfig {
    /// Look for the ToolConfig file in `dir`, then the EditorConfig file.
    pub fn load<S: FileSource + ?Sized>(
        source: &S,
        dir: &Path,
        names: &ConfigNames,
        cache: Option<&ConfigCache>,
    ) -> Result<Self, Error> {
        let tool_path = dir.join(&names.tool);
        if let Some(file) = load_file(source, &tool_path, parse_toolconfig, cache)? {
            debug!(
                path = %tool_path.display(),
                root = file.is_root,
                "loaded toolconfig file"
            );
            return Ok(DirectoryConfig::Tool(file));
        }

        let editor_path = dir.join(&names.editor);
        if let Some(file) = load_file(source, &editor_path, parse_editorconfig, cache)? {
            debug!(
                path = %editor_path.display(),
                root = file.is_root,
                "loaded editorconfig file"
            );
            return Ok(DirectoryConfig::Editor(file));
        }

        Ok(DirectoryConfig::Absent)
    }

    pub fn file(&self) -> Option<&ConfigFile> {
        match self {
            DirectoryConfig::Tool(file) | DirectoryConfig::Editor(file) => Some(file),
            DirectoryConfig::Absent => None,
        }
    }

    /// Whether this directory ends the walk.
    pub fn is_root(&self) -> bool {
        self.file().is_some_and(|f| f.is_root)
    }

    /// Properties of every section matching `target`, later sections winning.
    pub fn matched_properties(&self, target: &Path) -> Properties {
        self.file()
            .map(|f| f.matched_properties(target))
            .unwrap_or_default()
    }
}

fn load_file<S: FileSource + ?Sized>(
    source: &S,
    path: &Path,
    parse: fn(&Path, &str) -> Result<ConfigFile, ParseError>,
    cache: Option<&ConfigCache>,
) -> Result<Option<Arc<ConfigFile>>, Error> {
    let cached = cache.and_then(|c| source.modified(path).map(|mtime| (c, mtime)));
    if let Some((cache, mtime)) = cached {
        if let Some(file) = cache.get(path, mtime) {
            return Ok(Some(file));
        }
    }

    let Some(bytes) = source.read(path).map_err(|e| Error::io(path, e))? else {
        return Ok(None);
    };
    let text = String::from_utf8(bytes).map_err(|_| ParseError::Encoding {
        path: path.to_path_buf(),
    })?;
    let file = Arc::new(parse(path, &text)?);

    if let Some((cache, mtime)) = cached {
        cache.insert(path, mtime, Arc::clone(&file));
    }

    Ok(Some(file))
}
