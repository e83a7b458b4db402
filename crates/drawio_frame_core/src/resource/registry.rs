//! Virtual resource registry.
//!
//! # Responsibility
//! - Map bundle paths under the reserved scheme to immutable payloads.
//! - Answer lookups without side effects.
//!
//! # Invariants
//! - Paths are matched exactly and case-sensitively; no prefix or partial matches.
//! - A `ResourceRegistry` is frozen: entries are only added through `RegistryBuilder`.
//! - Identifiers outside the reserved scheme never match.

use crate::resource::content_type::content_type_for_path;
use crate::resource::identifier::{classify, local_identifier, RequestTarget};
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

static BUNDLE_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._~@+\-]+(?:/[A-Za-z0-9._~@+\-]+)*$").expect("valid bundle path regex")
});

/// One bundled file addressable as `local://<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualResource {
    path: String,
    content: Bytes,
    content_type: String,
}

impl VirtualResource {
    /// Bundle-relative path, e.g. `images/diagram-icon.svg`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full reserved-scheme identifier.
    pub fn identifier(&self) -> String {
        local_identifier(&self.path)
    }

    /// Payload bytes. Cloning is cheap.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Payload as UTF-8 text, or `None` for binary content.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Registration errors raised while packing a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidPath(String),
    DuplicatePath(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(value) => write!(f, "bundle path is invalid: `{value}`"),
            Self::DuplicatePath(value) => write!(f, "bundle path already registered: `{value}`"),
        }
    }
}

impl Error for RegistryError {}

/// Packing-time builder; the only way to add registry entries.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<String, VirtualResource>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one payload with an explicit content type.
    pub fn register(
        &mut self,
        path: &str,
        content: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) -> Result<(), RegistryError> {
        if !is_valid_bundle_path(path) {
            return Err(RegistryError::InvalidPath(path.to_string()));
        }
        if self.entries.contains_key(path) {
            return Err(RegistryError::DuplicatePath(path.to_string()));
        }

        self.entries.insert(
            path.to_string(),
            VirtualResource {
                path: path.to_string(),
                content: content.into(),
                content_type: content_type.into(),
            },
        );
        Ok(())
    }

    /// Registers one payload, inferring the content type from the extension.
    pub fn register_inferred(
        &mut self,
        path: &str,
        content: impl Into<Bytes>,
    ) -> Result<(), RegistryError> {
        self.register(path, content, content_type_for_path(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the builder into a read-only registry.
    pub fn build(self) -> ResourceRegistry {
        ResourceRegistry {
            entries: Arc::new(self.entries),
        }
    }
}

/// Read-only registry of bundled resources. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    entries: Arc<BTreeMap<String, VirtualResource>>,
}

impl ResourceRegistry {
    /// Registry with no entries; every local lookup is not-found.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolves a full identifier such as `local://drawio.css`.
    ///
    /// Returns `None` for unregistered paths and for identifiers outside the
    /// reserved scheme.
    pub fn lookup(&self, identifier: &str) -> Option<&VirtualResource> {
        match classify(identifier) {
            RequestTarget::Local(path) => self.get(path),
            RequestTarget::External(_) => None,
        }
    }

    /// Resolves a bundle-relative path.
    pub fn get(&self, path: &str) -> Option<&VirtualResource> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted bundle paths.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VirtualResource> {
        self.entries.values()
    }
}

fn is_valid_bundle_path(path: &str) -> bool {
    BUNDLE_PATH_RE.is_match(path) && path.split('/').all(|segment| segment != "." && segment != "..")
}
