//! Backend URI parsing
//!
//! A backend is selected by a URI-like connection string:
//!
//! ```text
//! file:runs.json
//! file://results/runs.json
//! memory://shared-store?strict=true
//! ```
//!
//! The scheme picks the backend, the path names the storage target, and
//! `?key=value` pairs carry backend options.

use std::collections::HashMap;

use crate::{Error, Result};

/// A parsed backend connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri {
    scheme: String,
    path: String,
    options: HashMap<String, String>,
}

impl ParsedUri {
    /// Parse a backend connection string.
    ///
    /// Accepts both `scheme:path` and `scheme://path` forms. Anything after
    /// a `?` is split into `key=value` option pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] if the scheme or path is missing.
    pub fn parse(uri: &str) -> Result<Self> {
        let (scheme, rest) = uri
            .split_once(':')
            .ok_or_else(|| Error::InvalidUri(format!("missing scheme in `{uri}`")))?;

        if scheme.is_empty() {
            return Err(Error::InvalidUri(format!("empty scheme in `{uri}`")));
        }

        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        if path.is_empty() {
            return Err(Error::InvalidUri(format!("missing path in `{uri}`")));
        }

        let mut options = HashMap::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                options.insert(key.to_string(), value.to_string());
            }
        }

        Ok(Self {
            scheme: scheme.to_string(),
            path: path.to_string(),
            options,
        })
    }

    /// Get the URI scheme (e.g. `file`, `memory`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Get the storage path or name.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get all backend options.
    #[must_use]
    pub const fn options(&self) -> &HashMap<String, String> {
        &self.options
    }

    /// Get a single backend option by key.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_form() {
        let uri = ParsedUri::parse("file:test.json").unwrap();
        assert_eq!(uri.scheme(), "file");
        assert_eq!(uri.path(), "test.json");
        assert!(uri.options().is_empty());
    }

    #[test]
    fn test_parse_double_slash_form() {
        let uri = ParsedUri::parse("file://results/test.json").unwrap();
        assert_eq!(uri.scheme(), "file");
        assert_eq!(uri.path(), "results/test.json");
    }

    #[test]
    fn test_parse_options() {
        let uri = ParsedUri::parse("memory://shared?strict=true&mode=append").unwrap();
        assert_eq!(uri.scheme(), "memory");
        assert_eq!(uri.path(), "shared");
        assert_eq!(uri.option("strict"), Some("true"));
        assert_eq!(uri.option("mode"), Some("append"));
        assert_eq!(uri.option("missing"), None);
    }

    #[test]
    fn test_parse_valueless_option() {
        let uri = ParsedUri::parse("memory://shared?strict").unwrap();
        assert_eq!(uri.option("strict"), Some(""));
    }

    #[test]
    fn test_parse_missing_scheme() {
        assert!(matches!(
            ParsedUri::parse("test.json"),
            Err(Error::InvalidUri(_))
        ));
    }

    #[test]
    fn test_parse_missing_path() {
        assert!(matches!(
            ParsedUri::parse("file://"),
            Err(Error::InvalidUri(_))
        ));
    }
}
