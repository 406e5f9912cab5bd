//! URL-fragment encoding: `#<pageId>` optionally followed by `?key=value&...`.

#[cfg(test)]
#[path = "hash_test.rs"]
mod hash_test;

use std::collections::BTreeMap;

use super::routes::PageId;

/// Query parameters carried by a navigation.
///
/// Keys are kept sorted so equal parameter sets always serialise to the same
/// fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavParams(BTreeMap<String, String>);

impl NavParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Like [`NavParams::get`] but treats blank values as absent.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` form, without the leading `?`.
    pub fn to_query(&self) -> String {
        serde_urlencoded::to_string(&self.0).unwrap_or_default()
    }

    /// Parse a query string; malformed input yields no parameters.
    pub fn from_query(query: &str) -> Self {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NavParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Canonical fragment for a navigation target.
pub fn build_hash(page: PageId, params: &NavParams) -> String {
    if params.is_empty() {
        format!("#{}", page.as_str())
    } else {
        format!("#{}?{}", page.as_str(), params.to_query())
    }
}

/// Route key of a fragment: text before `?`, without `#`.
pub fn route_key(hash: &str) -> &str {
    let hash = hash.strip_prefix('#').unwrap_or(hash);
    hash.split_once('?').map_or(hash, |(key, _)| key)
}

/// A parsed fragment. Created per navigation, never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub route_key: String,
    pub params: NavParams,
}

impl NavigationState {
    pub fn parse(hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        let (key, query) = hash.split_once('?').unwrap_or((hash, ""));
        Self { route_key: key.to_owned(), params: NavParams::from_query(query) }
    }
}
