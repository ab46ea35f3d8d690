//! Cookie strings copied from a browser session.

use std::collections::BTreeMap;

/// Cookies keyed by name, rendered back as a `Cookie` header value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieMap(BTreeMap<String, String>);

impl CookieMap {
    /// Parse a raw `name=value; name=value` string.
    ///
    /// Segments without `=` are skipped; the value is everything after the
    /// first `=`.
    pub fn parse(raw: &str) -> Self {
        let mut cookies = BTreeMap::new();
        for item in raw.split(';') {
            let item = item.trim();
            if let Some((key, value)) = item.split_once('=') {
                cookies.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self(cookies)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for the `Cookie` request header, or `None` when empty.
    pub fn header_value(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self.0.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        Some(pairs.join("; "))
    }
}
