//! Fragment loading: reads every `*.json` file of a folder and splits each
//! object into its indexer record and conf entry.
//!
//! Per-file failures are logged, recorded in the [`LoadReport`] and skipped.
//! Schema errors from [`split_fragment`] abort the load.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::error::AppError;
use crate::fragment::split_fragment;
use crate::text::EncodingChain;

/// A file that was left out of the aggregate, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Diagnostics for a single folder scan.
#[derive(Debug, Default, Clone)]
pub struct LoadReport {
    /// Number of fragments merged into the output.
    pub loaded: usize,
    /// Files that matched `*.json` but could not be used.
    pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
    /// Records a skipped file.
    pub fn skip(&mut self, path: PathBuf, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            path,
            reason: reason.into(),
        });
    }

    /// Returns the total number of candidate files seen.
    pub fn total(&self) -> usize {
        self.loaded + self.skipped.len()
    }
}

/// Indexer records and conf mapping gathered from a folder.
#[derive(Debug, Default, Clone)]
pub struct LoadedFragments {
    pub indexer: Vec<Map<String, Value>>,
    pub conf: Map<String, Value>,
    pub report: LoadReport,
}

/// Loads fragments from `folder`.
///
/// Only names ending in `.json` are considered; entries are visited in
/// file-name order. Listing the folder itself is fatal.
pub fn load_fragments(folder: &Path, encodings: &EncodingChain) -> Result<LoadedFragments, AppError> {
    let mut loaded = LoadedFragments::default();

    for path in json_entries(folder, |name| name.ends_with(".json"))? {
        let file = file_label(&path);
        let fragment = match read_fragment(&path, encodings) {
            Ok(fragment) => fragment,
            Err(e) => {
                error!("Error reading {}: {}", file, e);
                loaded.report.skip(path, e.to_string());
                continue;
            }
        };

        let split = split_fragment(&file, fragment)?;
        if let Some((domain, conf)) = split.conf {
            debug!("{} provides conf for {}", file, domain);
            loaded.conf.insert(domain, conf);
        }
        loaded.indexer.push(split.record);
        loaded.report.loaded += 1;
    }

    Ok(loaded)
}

/// Reads, decodes and parses one fragment, requiring a top-level object.
pub fn read_fragment(path: &Path, encodings: &EncodingChain) -> Result<Map<String, Value>, AppError> {
    match read_json(path, encodings)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Reads and parses a JSON file, trying each encoding of the chain.
pub(crate) fn read_json(path: &Path, encodings: &EncodingChain) -> Result<Value, AppError> {
    let bytes = fs::read(path).map_err(|e| AppError::io(path, e))?;
    let decoded = encodings.decode(path, &bytes)?;
    debug!("{} decoded as {}", path.display(), decoded.encoding.name());
    serde_json::from_str(&decoded.text).map_err(|source| AppError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Lists entries of `folder` whose file name satisfies `accept`, sorted by
/// name.
pub(crate) fn json_entries(
    folder: &Path,
    accept: impl Fn(&str) -> bool,
) -> Result<Vec<PathBuf>, AppError> {
    let entries = fs::read_dir(folder).map_err(|e| AppError::io(folder, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::io(folder, e))?;
        let name = entry.file_name();
        if name.to_str().is_some_and(&accept) {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
