//! Request and response shapes shared by every loading convention.

use bytes::Bytes;

pub const STATUS_OK: u16 = 200;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;
/// Returned by loaders that have no network primitive at all.
pub const STATUS_UNAVAILABLE: u16 = 503;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// How the embedded application asked for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallingConvention {
    /// Blocking load; the result is returned in the same call.
    Sync,
    /// Deferred load; the result completes on a later event-loop turn.
    Async,
    /// Stylesheet link injected into the document.
    Stylesheet,
}

impl CallingConvention {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
            Self::Stylesheet => "stylesheet",
        }
    }

    /// Parses the name produced by `as_str`, ignoring case and surrounding
    /// whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sync" => Some(Self::Sync),
            "async" => Some(Self::Async),
            "stylesheet" => Some(Self::Stylesheet),
            _ => None,
        }
    }
}

/// One request seen by the interception engine. Lives for a single load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptedRequest {
    pub identifier: String,
    pub convention: CallingConvention,
}

impl InterceptedRequest {
    pub fn new(identifier: impl Into<String>, convention: CallingConvention) -> Self {
        Self {
            identifier: identifier.into(),
            convention,
        }
    }
}

/// Result value of a load. Failures are statuses, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResponse {
    /// Identifier the response answers.
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl LoadResponse {
    pub fn ok(url: impl Into<String>, content_type: impl Into<String>, body: Bytes) -> Self {
        Self {
            url: url.into(),
            status: STATUS_OK,
            content_type: Some(content_type.into()),
            body,
        }
    }

    /// Synthetic 404 for unregistered reserved-scheme paths.
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::synthetic(url, STATUS_NOT_FOUND, "Not Found")
    }

    /// Synthetic 403 for external requests refused by policy.
    pub fn forbidden(url: impl Into<String>) -> Self {
        Self::synthetic(url, STATUS_FORBIDDEN, "Forbidden")
    }

    /// Synthetic 503 for loaders without connectivity.
    pub fn unavailable(url: impl Into<String>) -> Self {
        Self::synthetic(url, STATUS_UNAVAILABLE, "Service Unavailable")
    }

    fn synthetic(url: impl Into<String>, status: u16, reason: &'static str) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: Some(PLAIN_TEXT.to_string()),
            body: Bytes::from_static(reason.as_bytes()),
        }
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text, or `None` for binary content.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{CallingConvention, LoadResponse, STATUS_FORBIDDEN, STATUS_NOT_FOUND};
    use bytes::Bytes;

    #[test]
    fn synthetic_responses_are_deterministic() {
        let first = LoadResponse::not_found("local://missing.png");
        let second = LoadResponse::not_found("local://missing.png");
        assert_eq!(first, second);
        assert_eq!(first.status, STATUS_NOT_FOUND);
        assert!(!first.is_success());
        assert_eq!(first.text(), Some("Not Found"));
        assert_eq!(LoadResponse::forbidden("https://x").status, STATUS_FORBIDDEN);
    }

    #[test]
    fn calling_convention_names_parse_back() {
        for convention in [
            CallingConvention::Sync,
            CallingConvention::Async,
            CallingConvention::Stylesheet,
        ] {
            assert_eq!(CallingConvention::parse(convention.as_str()), Some(convention));
        }
        assert_eq!(CallingConvention::parse(" ASYNC "), Some(CallingConvention::Async));
        assert_eq!(CallingConvention::parse("xhr"), None);
    }

    #[test]
    fn ok_responses_carry_type_and_body() {
        let response = LoadResponse::ok("local://a.css", "text/css", Bytes::from_static(b"a{}"));
        assert!(response.is_success());
        assert_eq!(response.content_type.as_deref(), Some("text/css"));
        assert_eq!(response.text(), Some("a{}"));
    }
}
