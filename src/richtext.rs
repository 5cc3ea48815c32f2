//! Structured rich text as delivered by the content service, and an
//! allow-list renderer that turns it into markup.
//!
//! The content service returns rich text as a list of blocks (paragraphs,
//! headings, list items, images, ...) where each block carries plain text plus
//! a list of formatting spans addressed by offset. Nothing the service sends
//! is inserted as raw HTML: text is always escaped, only known block and span
//! kinds produce tags, and link/image URLs must use an allowed scheme.

use maud::{html, Markup, PreEscaped};
use serde::{Deserialize, Serialize};

/// Schemes a hyperlink span may point at.
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Schemes an image block may load from.
const IMAGE_SCHEMES: &[&str] = &["http", "https"];

/// Kind of a rich-text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Preformatted,
    ListItem,
    OListItem,
    Image,
    Embed,
    #[serde(other)]
    Unknown,
}

/// One block of rich text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    /// Image source, only meaningful for [`BlockKind::Image`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl RichTextBlock {
    /// Plain paragraph without formatting.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: text.into(),
            spans: Vec::new(),
            url: None,
            alt: None,
        }
    }

    /// Add a formatting span to this block.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }
}

/// Kind of an inline formatting span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    #[serde(other)]
    Unknown,
}

/// Inline formatting over `start..end` of a block's text.
///
/// Offsets count UTF-16 code units, as the content service produces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SpanData>,
}

impl Span {
    #[must_use]
    pub fn strong(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Strong,
            data: None,
        }
    }

    #[must_use]
    pub fn em(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Em,
            data: None,
        }
    }

    #[must_use]
    pub fn hyperlink(start: usize, end: usize, url: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Hyperlink,
            data: Some(SpanData {
                url: Some(url.into()),
                label: None,
            }),
        }
    }
}

/// Extra span payload: link target or label name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Render a rich-text field to markup.
///
/// Consecutive list items are grouped into a single `<ul>`/`<ol>`. Embeds and
/// images with a disallowed source are dropped; blocks of unknown kind keep
/// their text as a paragraph.
#[must_use]
pub fn render(blocks: &[RichTextBlock]) -> Markup {
    let mut out = String::new();
    let mut open_list: Option<BlockKind> = None;

    for block in blocks {
        let list_kind = matches!(block.kind, BlockKind::ListItem | BlockKind::OListItem)
            .then_some(block.kind);
        if open_list != list_kind {
            if let Some(kind) = open_list {
                out.push_str(list_tag(kind).1);
            }
            if let Some(kind) = list_kind {
                out.push_str(list_tag(kind).0);
            }
            open_list = list_kind;
        }
        render_block(block, &mut out);
    }
    if let Some(kind) = open_list {
        out.push_str(list_tag(kind).1);
    }

    PreEscaped(out)
}

/// Concatenate the text of every block, one block per line.
#[must_use]
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .filter(|b| !b.text.is_empty())
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Return `url` if it is safe to use as an image source.
#[must_use]
pub fn safe_image_url(url: &str) -> Option<String> {
    allowed_url(url, IMAGE_SCHEMES)
}

const fn list_tag(kind: BlockKind) -> (&'static str, &'static str) {
    match kind {
        BlockKind::OListItem => ("<ol>", "</ol>"),
        _ => ("<ul>", "</ul>"),
    }
}

fn render_block(block: &RichTextBlock, out: &mut String) {
    let tag = match block.kind {
        BlockKind::Paragraph | BlockKind::Unknown => "p",
        BlockKind::Heading1 => "h1",
        BlockKind::Heading2 => "h2",
        BlockKind::Heading3 => "h3",
        BlockKind::Heading4 => "h4",
        BlockKind::Heading5 => "h5",
        BlockKind::Heading6 => "h6",
        BlockKind::Preformatted => "pre",
        BlockKind::ListItem | BlockKind::OListItem => "li",
        BlockKind::Image => {
            render_image(block, out);
            return;
        }
        BlockKind::Embed => return,
    };

    if block.kind == BlockKind::Unknown && block.text.is_empty() {
        return;
    }

    out.push('<');
    out.push_str(tag);
    out.push('>');
    render_inline(&block.text, &block.spans, block.kind != BlockKind::Preformatted, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn render_image(block: &RichTextBlock, out: &mut String) {
    let Some(src) = block.url.as_deref().and_then(safe_image_url) else {
        return;
    };
    let markup = html! {
        p class="block-img" {
            img src=(src) alt=(block.alt.as_deref().unwrap_or(""));
        }
    };
    out.push_str(&markup.into_string());
}

/// A span that survived filtering, with offsets converted to bytes.
struct Resolved {
    start: usize,
    end: usize,
    open: String,
    close: &'static str,
}

fn render_inline(text: &str, spans: &[Span], line_breaks: bool, out: &mut String) {
    let offsets = utf16_byte_offsets(text);
    let to_byte = |i: usize| offsets[i.min(offsets.len() - 1)];

    let mut resolved: Vec<Resolved> = spans
        .iter()
        .filter_map(|span| {
            let (start, end) = (to_byte(span.start), to_byte(span.end));
            if start >= end {
                return None;
            }
            let (open, close) = span_tags(span)?;
            Some(Resolved {
                start,
                end,
                open,
                close,
            })
        })
        .collect();
    // Outer spans first so that nesting follows the source order.
    resolved.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut bounds: Vec<usize> = resolved
        .iter()
        .flat_map(|r| [r.start, r.end])
        .chain([0, text.len()])
        .collect();
    bounds.sort_unstable();
    bounds.dedup();

    let mut stack: Vec<usize> = Vec::new();
    for window in bounds.windows(2) {
        let (from, to) = (window[0], window[1]);
        let active: Vec<usize> = (0..resolved.len())
            .filter(|&i| resolved[i].start <= from && from < resolved[i].end)
            .collect();

        let keep = stack
            .iter()
            .zip(&active)
            .take_while(|(a, b)| a == b)
            .count();
        for &i in stack[keep..].iter().rev() {
            out.push_str(resolved[i].close);
        }
        for &i in &active[keep..] {
            out.push_str(&resolved[i].open);
        }
        stack = active;

        push_text(&text[from..to], line_breaks, out);
    }
    for &i in stack.iter().rev() {
        out.push_str(resolved[i].close);
    }
}

fn span_tags(span: &Span) -> Option<(String, &'static str)> {
    match span.kind {
        SpanKind::Strong => Some(("<strong>".to_string(), "</strong>")),
        SpanKind::Em => Some(("<em>".to_string(), "</em>")),
        SpanKind::Hyperlink => {
            let url = span.data.as_ref()?.url.as_deref()?;
            let href = allowed_url(url, LINK_SCHEMES)?;
            Some((
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                    escape(&href)
                ),
                "</a>",
            ))
        }
        SpanKind::Label => {
            let label: String = span
                .data
                .as_ref()?
                .label
                .as_deref()?
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            if label.is_empty() {
                return None;
            }
            Some((format!(r#"<span class="{label}">"#), "</span>"))
        }
        SpanKind::Unknown => None,
    }
}

fn push_text(text: &str, line_breaks: bool, out: &mut String) {
    if !line_breaks {
        out.push_str(&escape(text));
        return;
    }
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        out.push_str(&escape(line));
    }
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Byte offset for every UTF-16 index of `text`, plus one for the end.
///
/// An index that falls inside a surrogate pair maps to the start of its char.
fn utf16_byte_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(text.len() + 1);
    for (byte, ch) in text.char_indices() {
        for _ in 0..ch.len_utf16() {
            offsets.push(byte);
        }
    }
    offsets.push(text.len());
    offsets
}

fn allowed_url(raw: &str, schemes: &[&str]) -> Option<String> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    schemes
        .contains(&parsed.scheme())
        .then(|| parsed.to_string())
}
