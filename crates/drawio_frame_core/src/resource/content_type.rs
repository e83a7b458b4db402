//! Content types for bundled files, keyed by extension.

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Returns the content type for a bundle path based on its extension.
///
/// Unknown or missing extensions map to `application/octet-stream`.
pub fn content_type_for_path(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return FALLBACK_CONTENT_TYPE;
    };

    match extension.to_ascii_lowercase().as_str() {
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "html" | "htm" => "text/html",
        "xml" | "drawio" => "application/xml",
        "txt" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "wasm" => "application/wasm",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::content_type_for_path;

    #[test]
    fn maps_known_extensions_case_insensitively() {
        assert_eq!(content_type_for_path("drawio.css"), "text/css");
        assert_eq!(content_type_for_path("js/app.min.JS"), "application/javascript");
        assert_eq!(content_type_for_path("images/logo.svg"), "image/svg+xml");
        assert_eq!(content_type_for_path("img/photo.JPEG"), "image/jpeg");
    }

    #[test]
    fn falls_back_for_unknown_or_missing_extension() {
        assert_eq!(content_type_for_path("LICENSE"), "application/octet-stream");
        assert_eq!(content_type_for_path("dir.v2/blob"), "application/octet-stream");
        assert_eq!(content_type_for_path("archive.xyz"), "application/octet-stream");
    }
}
