//! Header discovery: turn command-line targets into the list of header files
//! to process, and read them into batch units.

use crate::batch::Unit;
use crate::classify::is_builtin_type;
use crate::filter::SelectorFilter;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

pub const HEADER_EXTENSION: &str = "h";

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Also hook headers named after known framework types (`NSString.h`).
    pub next_step: bool,
    /// Descend into subdirectories of a directory target.
    pub recursive: bool,
    /// Anchored pattern the header's file name must match.
    pub file_filter: Option<SelectorFilter>,
}

/// Resolve targets to header paths.
///
/// A single directory target is walked for `.h` files (filtered by
/// `options`); otherwise every target that exists as a file is kept as given.
/// Directory results are sorted so output order is stable.
pub fn discover_headers(targets: &[PathBuf], options: &ScanOptions) -> Vec<PathBuf> {
    if let [dir] = targets {
        if dir.is_dir() {
            return walk_headers(dir, options);
        }
    }
    targets
        .iter()
        .filter(|path| {
            let keep = path.is_file();
            if !keep {
                warn!(path = %path.display(), "Target does not exist, skipping");
            }
            keep
        })
        .cloned()
        .collect()
}

fn walk_headers(dir: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    let results: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

    WalkBuilder::new(dir)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .max_depth(if options.recursive { None } else { Some(1) })
        .threads(rayon::current_num_threads().min(12))
        .build_parallel()
        .run(|| {
            Box::new(|entry| {
                let entry = match entry {
                    Ok(e) => e,
                    Err(_) => return ignore::WalkState::Continue,
                };
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    return ignore::WalkState::Continue;
                }
                if is_wanted_header(entry.path(), options) {
                    if let Ok(mut found) = results.lock() {
                        found.push(entry.path().to_path_buf());
                    }
                }
                ignore::WalkState::Continue
            })
        });

    let mut headers = results.into_inner().unwrap_or_default();
    headers.sort();
    debug!(dir = %dir.display(), headers = headers.len(), "Discovered headers");
    headers
}

fn is_wanted_header(path: &Path, options: &ScanOptions) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some(HEADER_EXTENSION) {
        return false;
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    if !options.next_step && is_builtin_type(stem) {
        return false;
    }
    match &options.file_filter {
        Some(filter) => {
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            filter.matches(file_name)
        }
        None => true,
    }
}

/// Read headers into units labeled with their file name. Unreadable files are
/// logged and returned separately so the caller can count them.
pub fn load_units(paths: &[PathBuf]) -> (Vec<Unit>, Vec<PathBuf>) {
    let mut units = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();
    for path in paths {
        match std::fs::read(path) {
            Ok(bytes) => {
                let label = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                units.push(Unit::new(label, String::from_utf8_lossy(&bytes).into_owned()));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read header");
                unreadable.push(path.clone());
            }
        }
    }
    (units, unreadable)
}
