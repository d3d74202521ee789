//! Writing the aggregate: pretty and packed JSON, then the base64 artifact.
//!
//! Every write truncates its destination. Failures here are fatal.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::info;

use crate::aggregate::Aggregate;
use crate::error::AppError;
use crate::json::{self, Layout};

/// Creates each path as an empty file, truncating existing content.
pub fn reset_outputs<P: AsRef<Path>>(paths: &[P]) -> Result<(), AppError> {
    for path in paths {
        let path = path.as_ref();
        fs::write(path, b"").map_err(|e| AppError::io(path, e))?;
    }
    Ok(())
}

/// Writes `aggregate` as ASCII-escaped pretty JSON to `pretty_path` and as
/// ASCII-escaped compact JSON to `pack_path`.
pub fn write_aggregate(aggregate: &Aggregate, pretty_path: &Path, pack_path: &Path) -> Result<(), AppError> {
    let pretty = json::to_vec(aggregate, Layout::Pretty, true)?;
    fs::write(pretty_path, &pretty).map_err(|e| AppError::io(pretty_path, e))?;

    let packed = json::to_vec(aggregate, Layout::Compact, true)?;
    fs::write(pack_path, &packed).map_err(|e| AppError::io(pack_path, e))?;

    info!(
        "Wrote {} ({} bytes) and {} ({} bytes)",
        pretty_path.display(),
        pretty.len(),
        pack_path.display(),
        packed.len()
    );
    Ok(())
}

/// Base64-encodes the text of `source` into `destination`.
///
/// Standard alphabet with padding, no line wrapping and no trailing newline.
pub fn encode_file(source: &Path, destination: &Path) -> Result<(), AppError> {
    let text = fs::read_to_string(source).map_err(|e| AppError::io(source, e))?;
    let encoded = STANDARD.encode(text.as_bytes());
    fs::write(destination, encoded.as_bytes()).map_err(|e| AppError::io(destination, e))?;
    info!(
        "Encoded {} into {} ({} bytes)",
        source.display(),
        destination.display(),
        encoded.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use tempfile::TempDir;

    fn sample() -> Aggregate {
        let mut record = Map::new();
        record.insert("name".to_string(), json!("中文站"));
        let mut conf = Map::new();
        conf.insert("foo.com".to_string(), json!({"x": 1}));
        Aggregate::new(vec![record], conf, "202405171530".to_string())
    }

    #[test]
    fn test_pretty_and_packed_parse_back_equal() {
        let dir = TempDir::new().unwrap();
        let pretty = dir.path().join("user.sites.json");
        let pack = dir.path().join("user.sites.pack.json");
        write_aggregate(&sample(), &pretty, &pack).unwrap();

        let pretty_text = fs::read_to_string(&pretty).unwrap();
        let pack_text = fs::read_to_string(&pack).unwrap();
        assert!(pretty_text.is_ascii());
        assert!(pack_text.is_ascii());
        assert!(pretty_text.starts_with("{\n    \"version\": \"202405171530\","));
        assert!(!pack_text.contains(' '));
        assert!(!pack_text.ends_with('\n'));

        let from_pretty: Aggregate = serde_json::from_str(&pretty_text).unwrap();
        let from_pack: Aggregate = serde_json::from_str(&pack_text).unwrap();
        assert_eq!(from_pretty, sample());
        assert_eq!(from_pack, sample());
    }

    #[test]
    fn test_writes_truncate() {
        let dir = TempDir::new().unwrap();
        let pretty = dir.path().join("p.json");
        let pack = dir.path().join("k.json");
        fs::write(&pack, "x".repeat(4096)).unwrap();
        write_aggregate(&sample(), &pretty, &pack).unwrap();
        let value: Value = serde_json::from_str(&fs::read_to_string(&pack).unwrap()).unwrap();
        assert_eq!(value["version"], "202405171530");
    }

    #[test]
    fn test_encode_file() {
        let dir = TempDir::new().unwrap();
        let pack = dir.path().join("pack.json");
        let bin = dir.path().join("user.sites.bin");
        fs::write(&pack, r#"{"a":1}"#).unwrap();
        encode_file(&pack, &bin).unwrap();
        assert_eq!(fs::read_to_string(&bin).unwrap(), "eyJhIjoxfQ==");
    }

    #[test]
    fn test_reset_outputs() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("old.bin");
        let fresh = dir.path().join("new.bin");
        fs::write(&existing, "stale").unwrap();
        reset_outputs(&[&existing, &fresh]).unwrap();
        assert_eq!(fs::read(&existing).unwrap(), b"");
        assert_eq!(fs::read(&fresh).unwrap(), b"");
    }

    #[test]
    fn test_write_into_missing_folder_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent").join("out.json");
        let err = write_aggregate(&sample(), &missing, &missing).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
