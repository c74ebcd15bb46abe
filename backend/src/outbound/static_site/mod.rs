//! Static document sources for the front-end bundle.
//!
//! Both adapters accept the same relative paths; anything that could walk
//! out of the document root is rejected as
//! [`DocumentSourceError::InvalidPath`].

mod fs_source;
mod http_source;

pub use fs_source::FsDocumentSource;
pub use http_source::HttpDocumentSource;

use crate::domain::media::content_type_for_extension;
use crate::domain::ports::DocumentSourceError;

const DOCUMENT_PATH_MAX: usize = 512;

/// Check that `path` is a plain relative document path.
pub(crate) fn validate_document_path(path: &str) -> Result<&str, DocumentSourceError> {
    let invalid = || DocumentSourceError::invalid_path(path);
    if path.is_empty() || path.len() > DOCUMENT_PATH_MAX || path.starts_with('/') {
        return Err(invalid());
    }
    if path.contains(['\\', '\0', '?', '#']) {
        return Err(invalid());
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid());
    }
    Ok(path)
}

/// Content type for a static document, inferred from its extension.
pub(crate) fn document_content_type(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path);
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "txt" => "text/plain; charset=utf-8",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        other => content_type_for_extension(other),
    }
}
