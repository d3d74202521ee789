//! Splitting a site fragment into its indexer record and its `conf` entry.

use serde_json::{Map, Value};

use crate::error::AppError;

/// Reserved key moved out of each fragment into the conf mapping.
pub const CONF_KEY: &str = "conf";

/// Key whose URL-like value names the fragment's domain.
pub const DOMAIN_KEY: &str = "domain";

/// A fragment separated into the parts that land in the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitFragment {
    /// The fragment without its `conf` key, key order preserved.
    pub record: Map<String, Value>,
    /// Bare domain and the `conf` value, if the fragment had one.
    pub conf: Option<(String, Value)>,
}

/// Derives a bare domain from a URL-like string.
///
/// Everything up to and including the first `//` is dropped, then everything
/// from the first `/` onwards.
///
/// ```
/// use sitepack_core::fragment::bare_domain;
///
/// assert_eq!(bare_domain("http://foo.com/path"), "foo.com");
/// assert_eq!(bare_domain("example.com"), "example.com");
/// ```
pub fn bare_domain(url: &str) -> &str {
    let rest = url.split_once("//").map_or(url, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}

/// Removes `conf` from `fragment` and keys it by the fragment's bare domain.
///
/// `file` only labels errors. A fragment with `conf` must also carry a string
/// `domain`; violating that is a schema error and is not skippable.
pub fn split_fragment(file: &str, mut fragment: Map<String, Value>) -> Result<SplitFragment, AppError> {
    let Some(conf) = fragment.shift_remove(CONF_KEY) else {
        return Ok(SplitFragment {
            record: fragment,
            conf: None,
        });
    };

    let domain = match fragment.get(DOMAIN_KEY) {
        None => {
            return Err(AppError::MissingDomain {
                file: file.to_string(),
            })
        }
        Some(Value::String(url)) => bare_domain(url).to_string(),
        Some(_) => {
            return Err(AppError::InvalidDomain {
                file: file.to_string(),
            })
        }
    };

    Ok(SplitFragment {
        record: fragment,
        conf: Some((domain, conf)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_bare_domain() {
        assert_eq!(bare_domain("https://www.example.org/"), "www.example.org");
        assert_eq!(bare_domain("https://example.org"), "example.org");
        assert_eq!(bare_domain("//cdn.example.org/a/b"), "cdn.example.org");
        assert_eq!(bare_domain("example.org/path"), "example.org");
        assert_eq!(bare_domain(""), "");
    }

    #[test]
    fn test_bare_domain_is_idempotent() {
        for url in ["http://foo.com/path", "https://a.b.c:8080/x?y", "example.com"] {
            let once = bare_domain(url);
            assert_eq!(bare_domain(once), once);
        }
    }

    #[test]
    fn test_bare_domain_splits_once() {
        assert_eq!(bare_domain("http://a.com//x"), "a.com");
    }

    #[test]
    fn test_split_with_conf() {
        let fragment = object(json!({
            "domain": "http://foo.com/path",
            "conf": {"x": 1},
            "name": "A"
        }));
        let split = split_fragment("a.json", fragment).unwrap();
        assert_eq!(
            Value::Object(split.record),
            json!({"domain": "http://foo.com/path", "name": "A"})
        );
        assert_eq!(split.conf, Some(("foo.com".to_string(), json!({"x": 1}))));
    }

    #[test]
    fn test_split_preserves_key_order() {
        let fragment: Map<String, Value> =
            serde_json::from_str(r#"{"zeta":1,"conf":null,"domain":"a.com","alpha":2}"#).unwrap();
        let split = split_fragment("a.json", fragment).unwrap();
        let keys: Vec<&str> = split.record.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "domain", "alpha"]);
        assert_eq!(split.conf, Some(("a.com".to_string(), Value::Null)));
    }

    #[test]
    fn test_split_without_conf() {
        let fragment = object(json!({"name": "B"}));
        let split = split_fragment("b.json", fragment).unwrap();
        assert_eq!(Value::Object(split.record), json!({"name": "B"}));
        assert!(split.conf.is_none());
    }

    #[test]
    fn test_conf_without_domain_is_rejected() {
        let fragment = object(json!({"conf": {"x": 1}, "name": "C"}));
        let err = split_fragment("c.json", fragment).unwrap_err();
        assert!(matches!(err, AppError::MissingDomain { ref file } if file == "c.json"));
    }

    #[test]
    fn test_non_string_domain_is_rejected() {
        let fragment = object(json!({"conf": {}, "domain": 42}));
        let err = split_fragment("d.json", fragment).unwrap_err();
        assert!(matches!(err, AppError::InvalidDomain { .. }));
    }
}
