use std::io;
use std::iter;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, Walk, WalkBuilder};

/// Directories whose config files can apply to `path`: its parent first,
/// then each ancestor up to and including the filesystem root.
///
/// A root path yields just itself.
pub fn ancestors(path: &Path) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = path.ancestors().skip(1).map(Path::to_path_buf).collect();
    if dirs.is_empty() {
        return vec![path.to_path_buf()];
    }
    dirs
}

/// Expand directory arguments into the files below them.
///
/// Anything that is not an existing directory is passed through unchanged,
/// so targets need not exist on disk. Directory contents skip hidden and
/// gitignored entries and come out sorted by name.
pub fn walk_paths(paths: &[PathBuf]) -> impl Iterator<Item = io::Result<PathBuf>> + '_ {
    paths
        .iter()
        .flat_map(|path| -> Box<dyn Iterator<Item = io::Result<PathBuf>>> {
            if path.is_dir() {
                Box::new(directory_walker(path).filter_map(file_entry))
            } else {
                Box::new(iter::once(Ok(path.clone())))
            }
        })
}

fn directory_walker(dir: &Path) -> Walk {
    WalkBuilder::new(dir)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
}

fn file_entry(entry: Result<DirEntry, ignore::Error>) -> Option<io::Result<PathBuf>> {
    match entry {
        Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
            Some(Ok(entry.into_path()))
        }
        Ok(_) => None,
        Err(e) => {
            let message = e.to_string();
            Some(Err(e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other(message))))
        }
    }
}
