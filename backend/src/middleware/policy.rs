//! Immutable routing policy: CORS headers and the cache-control table.
//!
//! Built once at start-up and shared by reference with the [`Cors`] and
//! [`CacheControl`] middleware.
//!
//! [`Cors`]: super::Cors
//! [`CacheControl`]: super::CacheControl

use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};

/// Methods advertised to browsers.
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
/// Request headers browsers may send.
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";
/// Preflight cache lifetime in seconds.
pub const CORS_MAX_AGE: &str = "86400";

pub const NO_STORE: &str = "no-store";
pub const API_NO_CACHE: &str = "no-cache, no-store, must-revalidate";
pub const SHARE_IMAGE_CACHE: &str = "public, max-age=3600";
pub const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";
pub const SHARE_PAGE_CACHE: &str = "public, max-age=300";
pub const DEFAULT_CACHE: &str = "public, max-age=3600";

/// How a cache rule matches a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    /// The path itself or anything below it.
    Tree(&'static str),
    /// Anything starting with the prefix.
    Prefix(&'static str),
    /// `/api/proposals/{id}/share-image`.
    ShareImage,
}

impl PathPattern {
    fn matches(self, path: &str) -> bool {
        match self {
            Self::Tree(root) => {
                path == root
                    || path
                        .strip_prefix(root)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Self::Prefix(prefix) => path.starts_with(prefix),
            Self::ShareImage => path
                .strip_prefix("/api/proposals/")
                .and_then(|rest| rest.strip_suffix("/share-image"))
                .is_some_and(|id| !id.is_empty() && !id.contains('/')),
        }
    }
}

/// One row of the cache table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheRule {
    pub pattern: PathPattern,
    pub value: &'static str,
}

/// Ordered cache table; the first matching rule wins.
pub const CACHE_RULES: &[CacheRule] = &[
    CacheRule {
        pattern: PathPattern::Tree("/health"),
        value: NO_STORE,
    },
    CacheRule {
        pattern: PathPattern::Tree("/api/health"),
        value: NO_STORE,
    },
    CacheRule {
        pattern: PathPattern::ShareImage,
        value: SHARE_IMAGE_CACHE,
    },
    CacheRule {
        pattern: PathPattern::Prefix("/api/"),
        value: API_NO_CACHE,
    },
    CacheRule {
        pattern: PathPattern::Prefix("/media/"),
        value: IMMUTABLE_CACHE,
    },
    CacheRule {
        pattern: PathPattern::Prefix("/assets/"),
        value: IMMUTABLE_CACHE,
    },
    CacheRule {
        pattern: PathPattern::Prefix("/proposals/"),
        value: SHARE_PAGE_CACHE,
    },
];

/// CORS headers plus the cache table.
#[derive(Debug, Clone)]
pub struct RouterPolicy {
    cors_headers: Vec<(HeaderName, HeaderValue)>,
    cache_rules: &'static [CacheRule],
}

impl RouterPolicy {
    /// Build the policy for the given `Access-Control-Allow-Origin` value.
    ///
    /// # Errors
    ///
    /// Fails when `allow_origin` is not a valid header value.
    pub fn new(allow_origin: &str) -> Result<Self, InvalidHeaderValue> {
        Ok(Self::with_origin(HeaderValue::from_str(allow_origin)?))
    }

    fn with_origin(origin: HeaderValue) -> Self {
        let cors_headers = vec![
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(CORS_ALLOW_METHODS),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(CORS_ALLOW_HEADERS),
            ),
            (
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static(CORS_MAX_AGE),
            ),
        ];
        Self {
            cors_headers,
            cache_rules: CACHE_RULES,
        }
    }

    pub fn cors_headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.cors_headers
    }

    /// Overwrite the CORS headers on a response.
    pub fn apply_cors(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.cors_headers {
            headers.insert(name.clone(), value.clone());
        }
    }

    /// Cache-Control value for a request path.
    pub fn cache_control_for(&self, path: &str) -> &'static str {
        self.cache_rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map_or(DEFAULT_CACHE, |rule| rule.value)
    }
}

/// Allows any origin.
impl Default for RouterPolicy {
    fn default() -> Self {
        Self::with_origin(HeaderValue::from_static("*"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/health", NO_STORE)]
    #[case("/health/live", NO_STORE)]
    #[case("/healthz", DEFAULT_CACHE)]
    #[case("/api/health", NO_STORE)]
    #[case("/api/proposals/p1/share-image", SHARE_IMAGE_CACHE)]
    #[case("/api/proposals/p1/comments", API_NO_CACHE)]
    #[case("/api/proposals", API_NO_CACHE)]
    #[case("/media/memes/a.png", IMMUTABLE_CACHE)]
    #[case("/assets/app.js", IMMUTABLE_CACHE)]
    #[case("/proposals/p1", SHARE_PAGE_CACHE)]
    #[case("/", DEFAULT_CACHE)]
    #[case("/index.html", DEFAULT_CACHE)]
    fn first_matching_rule_wins(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(RouterPolicy::default().cache_control_for(path), expected);
    }

    #[rstest]
    fn custom_origin_is_applied() {
        let policy = RouterPolicy::new("https://soapbox.example").expect("valid origin");
        let mut headers = HeaderMap::new();
        policy.apply_cors(&mut headers);
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("https://soapbox.example")
        );
        assert_eq!(headers.len(), 4);
    }

    #[rstest]
    fn rejects_origin_with_control_characters() {
        assert!(RouterPolicy::new("bad\norigin").is_err());
    }
}
