//! Sitepack Core - Fragment loading, aggregation, serialization and encoding.

pub mod aggregate;
pub mod build;
pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod fragment;
pub mod json;
pub mod loader;
pub mod output;
pub mod text;

pub use aggregate::{version_stamp, Aggregate};
pub use build::{run_build, BuildSummary};
pub use config::{default_config_path, load_pack_config, PackConfig};
pub use decode::{decode_file, DecodeReport};
pub use error::AppError;
pub use format::{format_folder, FormatOptions, FormatReport};
pub use fragment::{bare_domain, split_fragment, SplitFragment};
pub use loader::{load_fragments, LoadReport, LoadedFragments, SkippedFile};
pub use output::{encode_file, reset_outputs, write_aggregate};
pub use text::EncodingChain;
