//! Config file formats and the per-directory cascade.
//!
//! This module provides:
//! - Parsing `.editorconfig` files into ordered sections
//! - Parsing `.toolconfig.toml` files into the same shape
//! - Picking the one file that speaks for a directory
//! - Merging matched properties and normalizing well-known values
//! - An optional cache of parsed files keyed by path and mtime

mod cache;
mod editorconfig;
mod file;
mod merge;
mod toml_schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::glob::GlobMatcher;

pub use cache::ConfigCache;
pub use editorconfig::{
    parse_editorconfig, MAX_PROPERTY_LENGTH, MAX_SECTION_LENGTH, MAX_VALUE_LENGTH,
};
pub use file::{
    ConfigNames, DirectoryConfig, FileSource, FsSource, EDITOR_CONFIG_NAME, TOOL_CONFIG_NAME,
};
pub use merge::{merge_nearer_wins, post_process};
pub use toml_schema::{parse_toolconfig, ToolConfigToml};

/// Resolved key/value settings. Keys are lower-case.
pub type Properties = BTreeMap<String, String>;

/// One glob-guarded group of properties.
#[derive(Debug, Clone)]
pub struct Section {
    matcher: GlobMatcher,
    pub properties: Properties,
}

impl Section {
    pub fn new(anchor_dir: &Path, pattern: &str, properties: Properties) -> Self {
        Self {
            matcher: GlobMatcher::compile(anchor_dir, pattern),
            properties,
        }
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn matches(&self, target: &Path) -> bool {
        self.matcher.is_match(target)
    }
}

/// A parsed config file: its sections in file order plus the root flag.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub sections: Vec<Section>,
    pub is_root: bool,
}

impl ConfigFile {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            sections: Vec::new(),
            is_root: false,
        }
    }

    /// Directory the file lives in; section patterns are anchored here.
    pub fn anchor_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("/"))
    }

    /// Union of every matching section, later sections winning on conflicts.
    pub fn matched_properties(&self, target: &Path) -> Properties {
        let mut properties = Properties::new();
        for section in self.sections.iter().filter(|s| s.matches(target)) {
            properties.extend(
                section
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        properties
    }
}
