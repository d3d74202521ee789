//! Text decoding with an ordered list of fallback encodings.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, GBK, UTF_8};
use tracing::warn;

use crate::error::AppError;

/// Ordered list of encodings tried when turning fragment bytes into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingChain {
    encodings: Vec<&'static Encoding>,
}

impl EncodingChain {
    /// Builds a chain that tries `encodings` in order.
    pub fn new(encodings: Vec<&'static Encoding>) -> Self {
        Self { encodings }
    }

    /// Builds a chain from WHATWG labels such as `"utf-8"` or `"gbk"`.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, AppError> {
        let encodings = labels
            .iter()
            .map(|label| {
                Encoding::for_label(label.as_ref().trim().as_bytes()).ok_or_else(|| {
                    AppError::ConfigError(format!("unknown encoding label: {}", label.as_ref()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if encodings.is_empty() {
            return Err(AppError::ConfigError(
                "at least one encoding is required".to_string(),
            ));
        }
        Ok(Self { encodings })
    }

    /// Names of the encodings in the chain, joined for diagnostics.
    pub fn describe(&self) -> String {
        self.encodings
            .iter()
            .map(|encoding| encoding.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Decodes `bytes` with the first encoding that accepts them.
    ///
    /// Malformed sequences are never replaced: an encoding either decodes the
    /// whole input or the next one is tried. Every fallback after the first is
    /// logged against `path`.
    pub fn decode<'a>(&self, path: &Path, bytes: &'a [u8]) -> Result<Decoded<'a>, AppError> {
        for (attempt, encoding) in self.encodings.iter().enumerate() {
            if attempt > 0 {
                warn!(
                    "{} might be encoded with a different encoding than {}, attempting with {}.",
                    path.display(),
                    self.encodings[attempt - 1].name(),
                    encoding.name()
                );
            }
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
                return Ok(Decoded {
                    text,
                    encoding: *encoding,
                });
            }
        }
        Err(AppError::Undecodable {
            path: path.to_path_buf(),
            encodings: self.describe(),
        })
    }
}

impl Default for EncodingChain {
    fn default() -> Self {
        Self::new(vec![UTF_8, GBK])
    }
}

/// Text produced by [`EncodingChain::decode`].
#[derive(Debug)]
pub struct Decoded<'a> {
    pub text: Cow<'a, str>,
    pub encoding: &'static Encoding,
}
