pub mod colors;
pub mod config;
pub mod error;
pub mod glob;
mod output;
pub mod resolver;
pub mod walker;

pub use colors::{should_use_colors, Colors};
pub use config::{
    merge_nearer_wins, parse_editorconfig, parse_toolconfig, post_process, ConfigCache,
    ConfigFile, ConfigNames, DirectoryConfig, FileSource, FsSource, Properties, Section,
    EDITOR_CONFIG_NAME, TOOL_CONFIG_NAME,
};
pub use error::{BadLine, Error, ParseError, PathError};
pub use glob::GlobMatcher;
pub use output::{render_editorconfig, render_toml, OutputMode};
pub use resolver::{resolve, Resolver};
pub use walker::{ancestors, walk_paths};

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Resolved properties for every requested file, keyed by displayed path.
#[derive(Debug, Default)]
pub struct RunResult {
    pub resolved: BTreeMap<String, Properties>,
}

/// Main entry point: resolve all given paths, expanding directories into the
/// files below them.
///
/// Fails on the first error; there is no partial result.
pub fn run<S: FileSource>(paths: &[PathBuf], resolver: &Resolver<S>) -> Result<RunResult, Error> {
    let mut result = RunResult::default();

    for root in paths {
        for path in walk_paths(std::slice::from_ref(root)) {
            let path = path.map_err(|e| Error::Io {
                path: root.clone(),
                source: e,
            })?;
            let properties = resolver.resolve(&path)?;
            result
                .resolved
                .insert(path.display().to_string(), properties);
        }
    }

    Ok(result)
}
