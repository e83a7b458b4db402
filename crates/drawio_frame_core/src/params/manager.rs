//! Boot parameter set and its query-string form.
//!
//! # Responsibility
//! - Hold the name → value parameters the editor reads from its launch URL.
//! - Serialize to and parse from `application/x-www-form-urlencoded` queries.
//!
//! # Invariants
//! - Names are unique; a later `set` replaces the earlier value.
//! - `parse(serialize(p)) == p` for every parameter set `p`.
//! - No name is reserved or protected; callers own collisions.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use url::form_urlencoded;

/// Boot parameters for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParamManager {
    params: BTreeMap<String, String>,
}

impl UrlParamManager {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parameter set from initial pairs; later duplicates win.
    pub fn with_initial<I, K, V>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut manager = Self::new();
        for (name, value) in initial {
            manager.set(name, value);
        }
        manager
    }

    /// Parses a query string, with or without a leading `?`.
    ///
    /// Repeated names keep the last value. Malformed escapes are decoded
    /// leniently, never rejected.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::with_initial(form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Sets one parameter and returns the value it replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.params.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Encodes the parameters as a query string without a leading `?`.
    ///
    /// Each name appears exactly once; output order is sorted by name so
    /// the same set always serializes to the same string.
    pub fn serialize(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl Display for UrlParamManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UrlParamManager {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::with_initial(iter)
    }
}
