//! Line-oriented rendering of agent text into typed display blocks.
//!
//! Only a small markdown subset is recognised. Each line is classified on
//! its own, in this priority order:
//!
//! | Prefix / pattern  | Block                       |
//! |-------------------|-----------------------------|
//! | `### `            | [`Block::Heading`] level 3  |
//! | `## `             | [`Block::Heading`] level 2  |
//! | `# `              | [`Block::Heading`] level 1  |
//! | `- ` or `* `      | [`Block::BulletItem`]       |
//! | `1. ` (digits)    | [`Block::NumberedItem`]     |
//! | blank             | [`Block::Spacer`]           |
//! | anything else     | [`Block::Paragraph`]        |
//!
//! Outside headings, text between paired `**` markers becomes
//! [`Inline::Strong`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

static NUMBERED_ITEM: OnceLock<Regex> = OnceLock::new();
static STRONG_SPAN: OnceLock<Regex> = OnceLock::new();

fn numbered_item() -> &'static Regex {
    NUMBERED_ITEM.get_or_init(|| Regex::new(r"^(\d+)\.\s").expect("valid numbered-item pattern"))
}

fn strong_span() -> &'static Regex {
    STRONG_SPAN.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid strong-span pattern"))
}

/// A run of inline text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Strong(String),
}

/// One display block, produced per input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    BulletItem { spans: Vec<Inline> },
    /// `number` is the item's label exactly as written (digits only).
    NumberedItem { number: String, spans: Vec<Inline> },
    Spacer,
    Paragraph { spans: Vec<Inline> },
}

/// Render `text` into blocks. Empty input yields no blocks.
pub fn render(text: &str) -> Vec<Block> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(classify_line).collect()
}

/// Classify a single line.
pub fn classify_line(line: &str) -> Block {
    if let Some(rest) = line.strip_prefix("### ") {
        return Block::Heading {
            level: 3,
            text: rest.to_string(),
        };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Block::Heading {
            level: 2,
            text: rest.to_string(),
        };
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Block::Heading {
            level: 1,
            text: rest.to_string(),
        };
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Block::BulletItem {
            spans: inline_spans(rest),
        };
    }
    if let Some(caps) = numbered_item().captures(line) {
        if let (Some(marker), Some(number)) = (caps.get(0), caps.get(1)) {
            return Block::NumberedItem {
                number: number.as_str().to_string(),
                spans: inline_spans(&line[marker.end()..]),
            };
        }
    }
    if line.trim().is_empty() {
        return Block::Spacer;
    }
    Block::Paragraph {
        spans: inline_spans(line),
    }
}

/// Split `text` on paired `**` markers. Unpaired markers stay literal.
pub fn inline_spans(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for caps in strong_span().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        spans.push(Inline::Text(text[cursor..whole.start()].to_string()));
        spans.push(Inline::Strong(inner.as_str().to_string()));
        cursor = whole.end();
    }
    if spans.is_empty() {
        return vec![Inline::Text(text.to_string())];
    }
    spans.push(Inline::Text(text[cursor..].to_string()));
    spans.retain(|span| !matches!(span, Inline::Text(t) if t.is_empty()));
    spans
}

impl fmt::Display for Inline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) | Self::Strong(text) => f.write_str(text),
        }
    }
}

fn write_spans(f: &mut fmt::Formatter<'_>, spans: &[Inline]) -> fmt::Result {
    spans.iter().try_for_each(|span| write!(f, "{span}"))
}

/// Plain-terminal rendering (no styling).
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading { level: 1, text } => write!(f, "{}", text.to_uppercase()),
            Self::Heading { text, .. } => f.write_str(text),
            Self::BulletItem { spans } => {
                f.write_str("  • ")?;
                write_spans(f, spans)
            }
            Self::NumberedItem { number, spans } => {
                write!(f, "  {number}. ")?;
                write_spans(f, spans)
            }
            Self::Spacer => Ok(()),
            Self::Paragraph { spans } => write_spans(f, spans),
        }
    }
}
