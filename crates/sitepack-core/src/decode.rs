//! Legacy decoder: one base64 blob per input line, one compact JSON value per
//! output line.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use tracing::{error, info};

use crate::error::AppError;
use crate::json::{self, Layout};

/// Outcome of decoding a legacy file.
#[derive(Debug, Default)]
pub struct DecodeReport {
    /// Number of lines written to the output.
    pub written: usize,
    /// Lines that could not be decoded, with their 1-based line numbers.
    pub failures: Vec<AppError>,
}

impl DecodeReport {
    /// Line numbers of the failed lines, in input order.
    pub fn failed_lines(&self) -> Vec<usize> {
        self.failures
            .iter()
            .filter_map(|failure| match failure {
                AppError::Base64 { line, .. }
                | AppError::InvalidUtf8 { line }
                | AppError::InvalidLineJson { line, .. } => Some(*line),
                _ => None,
            })
            .collect()
    }
}

/// Decodes a single trimmed line into a JSON value.
pub fn decode_line(line_number: usize, line: &[u8]) -> Result<Value, AppError> {
    let bytes = STANDARD
        .decode(line.trim_ascii())
        .map_err(|source| AppError::Base64 {
            line: line_number,
            source,
        })?;
    let text = String::from_utf8(bytes).map_err(|_| AppError::InvalidUtf8 { line: line_number })?;
    serde_json::from_str(&text).map_err(|source| AppError::InvalidLineJson {
        line: line_number,
        source,
    })
}

/// Decodes every line of `input` into `output`, which is created or truncated.
///
/// A line that fails to decode is logged with its line number and skipped.
/// Reading the input or writing the output is fatal.
pub fn decode_file(input: &Path, output: &Path) -> Result<DecodeReport, AppError> {
    let contents = fs::read(input).map_err(|e| AppError::io(input, e))?;
    let file = File::create(output).map_err(|e| AppError::io(output, e))?;
    let mut writer = BufWriter::new(file);
    let mut report = DecodeReport::default();

    let mut lines: Vec<&[u8]> = contents.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        match decode_line(line_number, line) {
            Ok(value) => {
                let mut encoded = json::to_vec(&value, Layout::Compact, true)?;
                encoded.push(b'\n');
                writer
                    .write_all(&encoded)
                    .map_err(|e| AppError::io(output, e))?;
                report.written += 1;
            }
            Err(e) if e.is_skippable() => {
                error!("{}", e);
                report.failures.push(e);
            }
            Err(e) => return Err(e),
        }
    }

    writer.flush().map_err(|e| AppError::io(output, e))?;
    info!(
        "Decoded {} lines from {} ({} failed)",
        report.written,
        input.display(),
        report.failures.len()
    );
    Ok(report)
}
