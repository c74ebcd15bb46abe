//! Open Graph and Twitter meta-tag injection for share pages.

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;

use super::share_image::{IMAGE_HEIGHT, IMAGE_WIDTH, escape_markup};

/// Character budget for titles, including any trailing `...`.
pub const TITLE_MAX: usize = 60;
/// Character budget for descriptions, including any trailing `...`.
pub const DESCRIPTION_MAX: usize = 150;

const ELLIPSIS: &str = "...";

static SOCIAL_META_RE: OnceLock<Regex> = OnceLock::new();
static HEAD_CLOSE_RE: OnceLock<Regex> = OnceLock::new();

fn social_meta_regex() -> &'static Regex {
    SOCIAL_META_RE.get_or_init(|| {
        let pattern = r#"(?is)<meta\b[^>]*?\b(?:property|name)\s*=\s*["']?(?:og|twitter):[^>]*>[ \t]*\r?\n?"#;
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("social meta regex failed to compile: {error}"))
    })
}

fn head_close_regex() -> &'static Regex {
    HEAD_CLOSE_RE.get_or_init(|| {
        Regex::new(r"(?i)</head\s*>")
            .unwrap_or_else(|error| panic!("head close regex failed to compile: {error}"))
    })
}

/// Values interpolated into the injected tag block. Inputs are raw text;
/// truncation and escaping happen during injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMeta {
    pub page_url: String,
    pub image_url: String,
    pub title: String,
    pub description: String,
}

/// Cut `text` to at most `max` characters, ending in `...` when shortened.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let kept: String = text.chars().take(keep).collect();
    format!("{}{ELLIPSIS}", kept.trim_end())
}

/// Remove every `og:*` and `twitter:*` meta tag.
pub fn strip_social_meta(html: &str) -> String {
    social_meta_regex().replace_all(html, "").into_owned()
}

fn tag_block(meta: &ShareMeta) -> String {
    let title = escape_markup(&truncate_with_ellipsis(&meta.title, TITLE_MAX));
    let description = escape_markup(&truncate_with_ellipsis(&meta.description, DESCRIPTION_MAX));
    let page_url = escape_markup(&meta.page_url);
    let image_url = escape_markup(&meta.image_url);
    let mut block = String::with_capacity(1024);
    let _ = write!(
        block,
        concat!(
            "<meta name=\"title\" content=\"{title}\">\n",
            "<meta name=\"description\" content=\"{description}\">\n",
            "<meta property=\"og:type\" content=\"website\">\n",
            "<meta property=\"og:url\" content=\"{page_url}\">\n",
            "<meta property=\"og:title\" content=\"{title}\">\n",
            "<meta property=\"og:description\" content=\"{description}\">\n",
            "<meta property=\"og:image\" content=\"{image_url}\">\n",
            "<meta property=\"og:image:width\" content=\"{width}\">\n",
            "<meta property=\"og:image:height\" content=\"{height}\">\n",
            "<meta name=\"twitter:card\" content=\"summary_large_image\">\n",
            "<meta name=\"twitter:url\" content=\"{page_url}\">\n",
            "<meta name=\"twitter:title\" content=\"{title}\">\n",
            "<meta name=\"twitter:description\" content=\"{description}\">\n",
            "<meta name=\"twitter:image\" content=\"{image_url}\">\n",
        ),
        title = title,
        description = description,
        page_url = page_url,
        image_url = image_url,
        width = IMAGE_WIDTH,
        height = IMAGE_HEIGHT,
    );
    block
}

/// Strip existing social tags and insert a fresh block before `</head>`.
///
/// Documents without a closing head tag are returned stripped but otherwise
/// unchanged.
///
/// # Examples
/// ```
/// use soapbox::domain::meta_tags::{ShareMeta, inject_share_meta};
///
/// let html = r#"<html><head><meta property="og:image" content="old.png"></head></html>"#;
/// let meta = ShareMeta {
///     page_url: "https://example.org/proposals/p1".into(),
///     image_url: "https://example.org/api/proposals/p1/share-image".into(),
///     title: "Fix the potholes".into(),
///     description: "Proposed by Ada".into(),
/// };
/// let out = inject_share_meta(html, &meta);
/// assert!(!out.contains("old.png"));
/// assert!(out.contains("summary_large_image"));
/// ```
pub fn inject_share_meta(html: &str, meta: &ShareMeta) -> String {
    let stripped = strip_social_meta(html);
    let Some(head_close) = head_close_regex().find(&stripped) else {
        return stripped;
    };
    let block = tag_block(meta);
    let mut out = String::with_capacity(stripped.len() + block.len());
    out.push_str(&stripped[..head_close.start()]);
    out.push_str(&block);
    out.push_str(&stripped[head_close.start()..]);
    out
}
