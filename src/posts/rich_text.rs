//! Structured text blocks as stored in the content repository.
//!
//! Provides plain-text flattening (for word counts) and HTML rendering
//! (for the post page).

use maud::{html, Markup, PreEscaped};
use serde::{Deserialize, Deserializer, Serialize};

/// One block of structured text: a paragraph, heading, list item, image...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Embed>,
}

impl RichTextBlock {
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: text.into(),
            spans: Vec::new(),
            url: None,
            alt: None,
            oembed: None,
        }
    }
}

/// Inline formatting over a range of a block's text.
///
/// `start` and `end` are UTF-16 code unit offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SpanData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
}

/// Flatten blocks into plain text, one space between blocks.
#[must_use]
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deserialize a text field that may be a plain string, null, or an array
/// of structured text blocks.
pub(crate) fn text_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextField {
        Plain(String),
        Rich(Vec<RichTextBlock>),
    }

    Ok(match Option::<TextField>::deserialize(deserializer)? {
        Some(TextField::Plain(s)) => s,
        Some(TextField::Rich(blocks)) => as_text(&blocks),
        None => String::new(),
    })
}

/// Like [`text_field`], mapping empty text to `None`.
pub(crate) fn optional_text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = text_field(deserializer)?;
    Ok(Some(text).filter(|t| !t.is_empty()))
}

/// Render blocks as HTML. Consecutive list items are grouped into lists.
#[must_use]
pub fn as_html(blocks: &[RichTextBlock]) -> Markup {
    let mut groups: Vec<(&str, Vec<&RichTextBlock>)> = Vec::new();
    for block in blocks {
        let group = match block.kind.as_str() {
            "list-item" => "ul",
            "o-list-item" => "ol",
            _ => "",
        };
        match groups.last_mut() {
            Some((kind, items)) if !group.is_empty() && *kind == group => items.push(block),
            _ => groups.push((group, vec![block])),
        }
    }

    html! {
        @for (kind, items) in &groups {
            @match *kind {
                "ul" => {
                    ul { @for item in items { li { (render_inline(item)) } } }
                }
                "ol" => {
                    ol { @for item in items { li { (render_inline(item)) } } }
                }
                _ => {
                    @for item in items { (render_block(item)) }
                }
            }
        }
    }
}

fn render_block(block: &RichTextBlock) -> Markup {
    match block.kind.as_str() {
        "heading1" => html! { h1 { (render_inline(block)) } },
        "heading2" => html! { h2 { (render_inline(block)) } },
        "heading3" => html! { h3 { (render_inline(block)) } },
        "heading4" => html! { h4 { (render_inline(block)) } },
        "heading5" => html! { h5 { (render_inline(block)) } },
        "heading6" => html! { h6 { (render_inline(block)) } },
        "preformatted" => html! { pre { (block.text) } },
        "image" => html! {
            @if let Some(ref url) = block.url {
                p class="block-img" {
                    img src=(url) alt=(block.alt.as_deref().unwrap_or(""));
                }
            }
        },
        "embed" => match block.oembed {
            Some(ref embed) => html! {
                div data-oembed=[embed.embed_url.as_deref()] {
                    // Embed markup comes from the repository's oEmbed provider.
                    (PreEscaped(embed.html.as_deref().unwrap_or("")))
                }
            },
            None => html! {},
        },
        _ => html! { p { (render_inline(block)) } },
    }
}

/// Render a block's text with its spans applied.
///
/// The text is cut at every span boundary; each piece is wrapped in the
/// tags of all spans covering it, in span order.
fn render_inline(block: &RichTextBlock) -> Markup {
    let text = block.text.as_str();
    if block.spans.is_empty() {
        return render_text(text);
    }

    let offsets = utf16_byte_offsets(text);
    let to_byte = |utf16: usize| offsets.get(utf16).copied().unwrap_or(text.len());

    let mut cuts: Vec<usize> = vec![0, text.len()];
    for span in &block.spans {
        cuts.push(to_byte(span.start));
        cuts.push(to_byte(span.end));
    }
    cuts.sort_unstable();
    cuts.dedup();

    html! {
        @for window in cuts.windows(2) {
            @let (from, to) = (window[0], window[1]);
            @let covering: Vec<&Span> = block
                .spans
                .iter()
                .filter(|s| to_byte(s.start) <= from && to_byte(s.end) >= to)
                .collect();
            (wrap(&text[from..to], &covering))
        }
    }
}

fn wrap(text: &str, spans: &[&Span]) -> Markup {
    let Some((span, rest)) = spans.split_first() else {
        return render_text(text);
    };
    let inner = wrap(text, rest);
    match span.kind.as_str() {
        "strong" => html! { strong { (inner) } },
        "em" => html! { em { (inner) } },
        "hyperlink" => {
            let data = span.data.as_ref();
            let url = data.and_then(|d| d.url.as_deref()).unwrap_or("#");
            let target = data.and_then(|d| d.target.as_deref());
            html! {
                a href=(url) target=[target] rel=[target.map(|_| "noopener noreferrer")] { (inner) }
            }
        }
        "label" => {
            let label = span.data.as_ref().and_then(|d| d.label.as_deref());
            html! { span class=[label] { (inner) } }
        }
        _ => inner,
    }
}

/// Plain text with line breaks turned into `<br>`.
fn render_text(text: &str) -> Markup {
    html! {
        @for (i, line) in text.split('\n').enumerate() {
            @if i > 0 { br; }
            (line)
        }
    }
}

/// Byte offset of every UTF-16 code unit position, plus the end of the text.
///
/// Positions falling inside a surrogate pair map to the start of that char.
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
