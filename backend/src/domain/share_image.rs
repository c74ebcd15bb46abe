//! Fixed-layout SVG card used as the social sharing preview for a proposal.
//!
//! Rendering is pure: the same [`ShareCard`] always produces byte-identical
//! output, and the only date printed is the proposal's creation date.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::{ProposalId, VoteTally};

pub const IMAGE_WIDTH: u32 = 1200;
pub const IMAGE_HEIGHT: u32 = 630;

/// Horizontal space available for wrapped body text, in pixels.
pub const WRAP_WIDTH_PX: usize = 1000;
/// Average glyph width assumed by the wrap heuristic, in pixels.
pub const AVG_CHAR_WIDTH_PX: usize = 18;
/// Characters per wrapped line.
pub const CHARS_PER_LINE: usize = WRAP_WIDTH_PX / AVG_CHAR_WIDTH_PX;
/// Maximum number of body lines.
pub const MAX_LINES: usize = 6;

const ELLIPSIS: &str = "...";
const FONT_STACK: &str = "Helvetica, Arial, sans-serif";
const POSITIVE_COLOUR: &str = "#16a34a";
const NEGATIVE_COLOUR: &str = "#dc2626";
const NEUTRAL_COLOUR: &str = "#6b7280";

/// Inputs for the share card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCard {
    pub proposal_id: ProposalId,
    pub text: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub tally: VoteTally,
}

/// Escape the five markup-unsafe characters.
///
/// # Examples
/// ```
/// use soapbox::domain::share_image::escape_markup;
///
/// assert_eq!(escape_markup("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
/// ```
pub fn escape_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Greedy word wrap measured in characters.
///
/// Words longer than `width` are hard-split. When the text needs more than
/// `max_lines` lines the last kept line is cut to fit a trailing `...`.
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        for piece in split_long_word(word, width) {
            let len = piece.chars().count();
            if current_len == 0 {
                current = piece;
                current_len = len;
            } else if current_len + 1 + len <= width {
                current.push(' ');
                current.push_str(&piece);
                current_len += 1 + len;
            } else {
                lines.push(std::mem::replace(&mut current, piece));
                current_len = len;
            }
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = with_ellipsis(last, width);
        }
    }
    lines
}

fn split_long_word(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn with_ellipsis(line: &str, width: usize) -> String {
    let keep = width.saturating_sub(ELLIPSIS.len());
    let kept: String = line.chars().take(keep).collect();
    format!("{}{ELLIPSIS}", kept.trim_end())
}

/// Render the net count with an explicit sign.
pub fn format_net(net: i64) -> String {
    if net > 0 {
        format!("+{net}")
    } else {
        net.to_string()
    }
}

/// Fill colour for the net count.
pub fn net_colour(net: i64) -> &'static str {
    match net.signum() {
        1 => POSITIVE_COLOUR,
        -1 => NEGATIVE_COLOUR,
        _ => NEUTRAL_COLOUR,
    }
}

/// Render the 1200×630 share card as SVG markup.
pub fn render_share_image(card: &ShareCard) -> String {
    let net = card.tally.net();
    let mut svg = String::with_capacity(4096);
    // `write!` into a String cannot fail.
    let _ = write!(
        svg,
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r##"<rect width="{w}" height="{h}" fill="#f8fafc"/>"##,
            r##"<rect x="0" y="0" width="{w}" height="96" fill="#1e3a8a"/>"##,
            r##"<text x="60" y="62" font-family="{font}" font-size="40" font-weight="700" fill="#ffffff">Soapbox proposal</text>"##,
            r##"<rect x="0" y="96" width="{w}" height="52" fill="#dbeafe"/>"##,
            r##"<text x="60" y="131" font-family="{font}" font-size="24" fill="#1e3a8a">Proposed by {author} on {date}</text>"##,
            r##"<rect x="60" y="176" width="1080" height="330" rx="16" fill="#ffffff" stroke="#1e3a8a" stroke-width="3"/>"##,
        ),
        w = IMAGE_WIDTH,
        h = IMAGE_HEIGHT,
        font = FONT_STACK,
        author = escape_markup(&card.author_name),
        date = card.created_at.format("%-d %B %Y"),
    );
    for (index, line) in wrap_text(&card.text, CHARS_PER_LINE, MAX_LINES)
        .iter()
        .enumerate()
    {
        let y = 232 + index * 48;
        let _ = write!(
            svg,
            r##"<text x="100" y="{y}" font-family="{FONT_STACK}" font-size="30" fill="#0f172a">{}</text>"##,
            escape_markup(line),
        );
    }
    let _ = write!(
        svg,
        concat!(
            r##"<text x="60" y="576" font-family="{font}" font-size="30" fill="{pos}">▲ {up}</text>"##,
            r##"<text x="240" y="576" font-family="{font}" font-size="30" fill="{neg}">▼ {down}</text>"##,
            r##"<text x="420" y="576" font-family="{font}" font-size="30" font-weight="700" fill="{net_fill}">Net {net}</text>"##,
            r##"<text x="1140" y="576" font-family="{font}" font-size="18" fill="{grey}" text-anchor="end">#{id}</text>"##,
            "</svg>",
        ),
        font = FONT_STACK,
        pos = POSITIVE_COLOUR,
        neg = NEGATIVE_COLOUR,
        grey = NEUTRAL_COLOUR,
        up = card.tally.upvotes,
        down = card.tally.downvotes,
        net_fill = net_colour(net),
        net = format_net(net),
        id = escape_markup(card.proposal_id.as_str()),
    );
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn card() -> ShareCard {
        ShareCard {
            proposal_id: ProposalId::new("p1").expect("id"),
            text: "Plant more trees along the river path".into(),
            author_name: "Ada".into(),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 4, 9, 30, 0)
                .single()
                .expect("timestamp"),
            tally: VoteTally {
                upvotes: 5,
                downvotes: 2,
            },
        }
    }

    #[rstest]
    fn short_text_fits_on_one_line() {
        let text = "a".repeat(CHARS_PER_LINE);
        assert_eq!(wrap_text(&text, CHARS_PER_LINE, MAX_LINES), vec![text]);
    }

    #[rstest]
    fn long_text_is_capped_with_ellipsis() {
        let text = "lorem ipsum ".repeat(CHARS_PER_LINE * MAX_LINES);
        let lines = wrap_text(&text, CHARS_PER_LINE, MAX_LINES);
        assert_eq!(lines.len(), MAX_LINES);
        let last = lines.last().expect("last line");
        assert!(last.ends_with("..."));
        assert!(last.chars().count() <= CHARS_PER_LINE);
    }

    #[rstest]
    fn long_words_are_hard_split() {
        let lines = wrap_text("abcdefghij", 4, MAX_LINES);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[rstest]
    fn wraps_at_word_boundaries() {
        let lines = wrap_text("one two three four", 9, MAX_LINES);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[rstest]
    fn escapes_all_five_characters() {
        let escaped = escape_markup(r#"<script>&"'"#);
        assert_eq!(escaped, "&lt;script&gt;&amp;&quot;&#39;");
    }

    #[rstest]
    fn rendered_text_contains_no_raw_markup(mut card: ShareCard) {
        card.text = r#"<script>alert("x") & 'y'</script>"#.into();
        card.author_name = "<b>".into();
        let svg = render_share_image(&card);
        assert!(!svg.contains("<script>"));
        assert!(!svg.contains("<b>"));
        assert!(svg.contains("&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"));
    }

    #[rstest]
    #[case(3, "+3", POSITIVE_COLOUR)]
    #[case(-2, "-2", NEGATIVE_COLOUR)]
    #[case(0, "0", NEUTRAL_COLOUR)]
    fn net_is_signed_and_coloured(#[case] net: i64, #[case] text: &str, #[case] colour: &str) {
        assert_eq!(format_net(net), text);
        assert_eq!(net_colour(net), colour);
    }

    #[rstest]
    fn rendering_is_deterministic(card: ShareCard) {
        assert_eq!(render_share_image(&card), render_share_image(&card));
    }

    #[rstest]
    fn renders_layout_and_counts(card: ShareCard) {
        let svg = render_share_image(&card);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="1200" height="630""#));
        assert!(svg.contains("4 March 2025"));
        assert!(svg.contains(&format!(r#"fill="{POSITIVE_COLOUR}">Net +3<"#)));
        assert!(svg.contains("#p1"));
    }
}
