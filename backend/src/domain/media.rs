//! Blob keys, content-type inference, and meme upload rules.

use std::fmt;

/// Largest accepted meme upload (2 MiB).
pub const MAX_MEME_BYTES: usize = 2 * 1024 * 1024;

/// Largest accepted body for a direct media PUT (10 MiB).
pub const MAX_MEDIA_BYTES: usize = 10 * 1024 * 1024;

/// Longest accepted media key.
pub const MEDIA_KEY_MAX: usize = 256;

/// URL prefix under which blobs are served.
pub const MEDIA_URL_PREFIX: &str = "/media/";

/// Fallback content type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Media key validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaKeyError {
    #[error("media key must not be empty")]
    Empty,
    #[error("media key must be at most {max} characters")]
    TooLong { max: usize },
    #[error("media key contains an invalid character")]
    InvalidCharacter,
    #[error("media key must be relative and must not contain '..'")]
    Traversal,
}

/// Relative blob key such as `memes/p1-abc.png`.
///
/// Keys use `[A-Za-z0-9._/-]`, never start with `/`, and never contain an
/// empty or `..` segment, so they are safe to join onto a base directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey(String);

impl MediaKey {
    /// Validate a media key.
    pub fn new(raw: impl Into<String>) -> Result<Self, MediaKeyError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(MediaKeyError::Empty);
        }
        if raw.len() > MEDIA_KEY_MAX {
            return Err(MediaKeyError::TooLong { max: MEDIA_KEY_MAX });
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'/' | b'-'))
        {
            return Err(MediaKeyError::InvalidCharacter);
        }
        if raw.starts_with('/')
            || raw
                .split('/')
                .any(|segment| segment.is_empty() || segment == "..")
        {
            return Err(MediaKeyError::Traversal);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Lower-cased extension after the final `.` of the last segment.
    pub fn extension(&self) -> Option<String> {
        let name = self.0.rsplit('/').next().unwrap_or(self.0.as_str());
        name.rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Content type inferred from the extension.
    pub fn content_type(&self) -> &'static str {
        self.extension()
            .as_deref()
            .map_or(OCTET_STREAM, content_type_for_extension)
    }

    /// Public URL for the blob.
    pub fn url(&self) -> String {
        format!("{MEDIA_URL_PREFIX}{}", self.0)
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace characters that are not allowed inside a key segment with `_`.
///
/// Used to embed opaque ids in generated keys.
pub fn key_segment(raw: &str) -> String {
    raw.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Map a lower-case file extension to its MIME type.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "webm" => "audio/webm",
        _ => OCTET_STREAM,
    }
}

/// Image types accepted for meme uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemeImageType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl MemeImageType {
    /// Match a declared MIME type against the allow-list.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Binary object with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}
