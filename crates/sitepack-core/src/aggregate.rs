//! The versioned document combining every indexer record and conf entry.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::loader::LoadedFragments;

/// `strftime` pattern of the version stamp, minute resolution.
pub const VERSION_FORMAT: &str = "%Y%m%d%H%M";

/// The aggregate written to the pretty and packed outputs.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub version: String,
    pub indexer: Vec<Map<String, Value>>,
    pub conf: Map<String, Value>,
}

impl Aggregate {
    pub fn new(indexer: Vec<Map<String, Value>>, conf: Map<String, Value>, version: String) -> Self {
        Self {
            version,
            indexer,
            conf,
        }
    }

    /// Builds an aggregate stamped with the current local time.
    pub fn stamped(indexer: Vec<Map<String, Value>>, conf: Map<String, Value>) -> Self {
        Self::new(indexer, conf, version_stamp(&Local::now()))
    }

    /// Builds an aggregate from a folder scan, stamped with the current time.
    pub fn from_loaded(loaded: LoadedFragments) -> Self {
        Self::stamped(loaded.indexer, loaded.conf)
    }
}

/// Formats `at` as a version stamp such as `"202405171530"`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use sitepack_core::aggregate::version_stamp;
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 17, 15, 30, 59).unwrap();
/// assert_eq!(version_stamp(&at), "202405171530");
/// ```
pub fn version_stamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format(VERSION_FORMAT).to_string()
}
