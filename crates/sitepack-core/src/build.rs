//! The full build: format, reset outputs, load, aggregate, write, encode.

use tracing::{info, warn};

use crate::aggregate::Aggregate;
use crate::config::PackConfig;
use crate::error::AppError;
use crate::format::{format_folder, FormatOptions, FormatReport};
use crate::loader::{load_fragments, LoadReport};
use crate::output::{encode_file, reset_outputs, write_aggregate};

/// Summary of a completed build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub version: String,
    pub records: usize,
    pub domains: usize,
    /// `None` when source formatting was disabled.
    pub format: Option<FormatReport>,
    pub load: LoadReport,
}

impl BuildSummary {
    /// Returns the number of input files left out of the aggregate.
    pub fn skipped(&self) -> usize {
        self.load.skipped.len()
    }
}

/// Runs every stage of the build described by `config`.
///
/// All three outputs are truncated before any fragment is read, so a fatal
/// schema error leaves them empty rather than stale.
pub fn run_build(config: &PackConfig) -> Result<BuildSummary, AppError> {
    let format = if config.format_sources {
        let options = FormatOptions {
            encodings: config.encodings.clone(),
            ascii: false,
        };
        let report = format_folder(&config.sites_dir, &options)?;
        info!(
            "Formatted {} files in {} ({} skipped)",
            report.formatted.len(),
            config.sites_dir.display(),
            report.skipped.len()
        );
        Some(report)
    } else {
        None
    };

    reset_outputs(&config.outputs())?;

    let loaded = load_fragments(&config.sites_dir, &config.encodings)?;
    let load = loaded.report.clone();
    for skipped in &load.skipped {
        warn!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    let aggregate = Aggregate::from_loaded(loaded);
    write_aggregate(&aggregate, &config.pretty_path, &config.pack_path)?;
    encode_file(&config.pack_path, &config.bin_path)?;

    info!(
        "Build {} complete: {} records, {} domains, {} skipped",
        aggregate.version,
        aggregate.indexer.len(),
        aggregate.conf.len(),
        load.skipped.len()
    );

    Ok(BuildSummary {
        version: aggregate.version,
        records: aggregate.indexer.len(),
        domains: aggregate.conf.len(),
        format,
        load,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> PackConfig {
        PackConfig {
            sites_dir: dir.path().join("sites"),
            pretty_path: dir.path().join("user.sites.json"),
            pack_path: dir.path().join("user.sites.pack.json"),
            bin_path: dir.path().join("user.sites.bin"),
            ..PackConfig::default()
        }
    }

    #[test]
    fn test_build_writes_all_outputs() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir(&config.sites_dir).unwrap();
        fs::write(
            config.sites_dir.join("a.json"),
            r#"{"domain":"http://foo.com/path","conf":{"x":1},"name":"A"}"#,
        )
        .unwrap();
        fs::write(config.sites_dir.join("b.json"), r#"{"name":"B"}"#).unwrap();
        fs::write(config.sites_dir.join("c.json"), "[1, 2]").unwrap();

        let summary = run_build(&config).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.domains, 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.format.as_ref().unwrap().formatted.len(), 3);

        let pretty: Value =
            serde_json::from_str(&fs::read_to_string(&config.pretty_path).unwrap()).unwrap();
        assert_eq!(pretty["version"], summary.version.as_str());
        assert_eq!(
            pretty["indexer"],
            json!([{"domain": "http://foo.com/path", "name": "A"}, {"name": "B"}])
        );
        assert_eq!(pretty["conf"], json!({"foo.com": {"x": 1}}));

        let packed = fs::read_to_string(&config.pack_path).unwrap();
        let bin = fs::read_to_string(&config.bin_path).unwrap();
        assert_eq!(STANDARD.decode(bin).unwrap(), packed.into_bytes());
    }

    #[test]
    fn test_legacy_decoder_reverses_bin() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir(&config.sites_dir).unwrap();
        fs::write(
            config.sites_dir.join("cn.json"),
            r#"{"domain":"https://例子.cn/","id":123456789012345678901234567890,"conf":{"name":"中文","emoji":"😀","ratio":0.30000000000000004}}"#,
        )
        .unwrap();

        run_build(&config).unwrap();
        let decoded = dir.path().join("decoded.json");
        let report = crate::decode::decode_file(&config.bin_path, &decoded).unwrap();
        assert_eq!(report.written, 1);

        let decoded: Aggregate =
            serde_json::from_str(fs::read_to_string(&decoded).unwrap().trim_end()).unwrap();
        let original: Aggregate =
            serde_json::from_str(&fs::read_to_string(&config.pretty_path).unwrap()).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.conf["例子.cn"]["emoji"], "😀");
        assert_eq!(decoded.indexer[0]["id"].to_string(), "123456789012345678901234567890");
        assert_eq!(decoded.conf["例子.cn"]["ratio"].to_string(), "0.30000000000000004");

        let packed = fs::read_to_string(&config.pack_path).unwrap();
        assert!(packed.contains(r#""id":123456789012345678901234567890"#));
        let source = fs::read_to_string(config.sites_dir.join("cn.json")).unwrap();
        assert!(source.contains("\"id\": 123456789012345678901234567890,"));
    }

    #[test]
    fn test_fragments_are_reformatted_in_place() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir(&config.sites_dir).unwrap();
        let fragment = config.sites_dir.join("a.json");
        fs::write(&fragment, r#"{"name":"A"}"#).unwrap();

        run_build(&config).unwrap();
        assert_eq!(fs::read_to_string(&fragment).unwrap(), "{\n    \"name\": \"A\"\n}");
    }

    #[test]
    fn test_format_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let config = PackConfig {
            format_sources: false,
            ..config_in(&dir)
        };
        fs::create_dir(&config.sites_dir).unwrap();
        let fragment = config.sites_dir.join("a.json");
        fs::write(&fragment, r#"{"name":"A"}"#).unwrap();

        let summary = run_build(&config).unwrap();
        assert!(summary.format.is_none());
        assert_eq!(fs::read_to_string(&fragment).unwrap(), r#"{"name":"A"}"#);
    }

    #[test]
    fn test_schema_error_leaves_outputs_empty() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir(&config.sites_dir).unwrap();
        fs::write(config.sites_dir.join("a.json"), r#"{"conf":{"x":1}}"#).unwrap();
        fs::write(&config.bin_path, "stale").unwrap();

        let err = run_build(&config).unwrap_err();
        assert!(matches!(err, AppError::MissingDomain { .. }));
        for output in config.outputs() {
            assert_eq!(fs::read_to_string(output).unwrap(), "");
        }
    }
}
