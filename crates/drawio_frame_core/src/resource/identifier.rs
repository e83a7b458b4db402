//! Request identifier classification.
//!
//! Identifiers under the reserved `local` scheme address bundled resources;
//! everything else belongs to the platform loader.

/// Reserved scheme for bundled resources, e.g. `local://drawio.css`.
pub const LOCAL_SCHEME: &str = "local";

/// Where one request identifier points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTarget<'a> {
    /// Bundle-relative path under the reserved scheme (may be empty).
    Local(&'a str),
    /// Any other identifier, kept verbatim.
    External(&'a str),
}

impl RequestTarget<'_> {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// Classifies an identifier by scheme.
///
/// The scheme compares case-insensitively (`LOCAL://x` is local); the path
/// is returned untouched, so registry matching stays case-sensitive.
pub fn classify(identifier: &str) -> RequestTarget<'_> {
    match split_scheme(identifier) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(LOCAL_SCHEME) => {
            RequestTarget::Local(rest.strip_prefix("//").unwrap_or(rest))
        }
        _ => RequestTarget::External(identifier),
    }
}

/// Formats the reserved-scheme identifier for a bundle path.
pub fn local_identifier(path: &str) -> String {
    format!("{LOCAL_SCHEME}://{path}")
}

/// Splits `scheme:rest` when the prefix is a syntactically valid scheme
/// (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`).
fn split_scheme(identifier: &str) -> Option<(&str, &str)> {
    let colon = identifier.find(':')?;
    let scheme = &identifier[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, &identifier[colon + 1..]))
}
