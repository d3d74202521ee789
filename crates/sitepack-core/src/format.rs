//! In-place reformatting of the JSON files in a folder.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error};

use crate::error::AppError;
use crate::json::{self, Layout};
use crate::loader::{json_entries, read_json, SkippedFile};
use crate::text::EncodingChain;

/// Options for [`format_folder`].
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub encodings: EncodingChain,
    /// Escape characters outside printable ASCII. Off by default, so files
    /// come out as plain UTF-8.
    pub ascii: bool,
}

/// Outcome of formatting a folder.
#[derive(Debug, Default, Clone)]
pub struct FormatReport {
    pub formatted: Vec<PathBuf>,
    /// Files left untouched.
    pub skipped: Vec<SkippedFile>,
}

/// Rewrites every regular `*.json` file in `folder` (suffix matched
/// case-insensitively) with four-space indentation.
///
/// Key order is preserved. Files that cannot be read, decoded or parsed are
/// logged and left as they are. Failing to write a file back is fatal.
pub fn format_folder(folder: &Path, options: &FormatOptions) -> Result<FormatReport, AppError> {
    let mut report = FormatReport::default();

    for path in json_entries(folder, |name| name.to_lowercase().ends_with(".json"))? {
        if !path.is_file() {
            continue;
        }
        let value = match read_json(&path, &options.encodings) {
            Ok(value) => value,
            Err(e) => {
                error!("{}", e);
                report.skipped.push(SkippedFile {
                    reason: e.to_string(),
                    path,
                });
                continue;
            }
        };
        write_formatted(&path, &value, options.ascii)?;
        debug!("Formatted {}", path.display());
        report.formatted.push(path);
    }

    Ok(report)
}

fn write_formatted(path: &Path, value: &Value, ascii: bool) -> Result<(), AppError> {
    let formatted = json::to_vec(value, Layout::Pretty, ascii)?;
    fs::write(path, formatted).map_err(|e| AppError::io(path, e))
}
