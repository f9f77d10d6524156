use serde::Deserialize;
use serde_json::Value;

use crate::parser;

/// Horizontal alignment of a block's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// The closed set of block kinds, plus the forward-compatible fallback
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Paragraph,
    Heading {
        level: Option<i64>,
    },
    Quote,
    List {
        ordered: bool,
    },
    ListItem,
    Image {
        url: Option<String>,
        alt: Option<String>,
    },
    Link {
        url: Option<String>,
    },
    Code,
    CodeBlock,
    /// Any kind this crate does not know about. Holds the original tag
    /// (empty if the node had none).
    Other(String),
}

impl BlockKind {
    /// Heading rank, clamped into 1..=6 and defaulting to 2.
    pub fn heading_rank(level: Option<i64>) -> u8 {
        match level {
            Some(level) => level.clamp(1, 6) as u8,
            None => 2,
        }
    }
}

/// A structural content unit that may contain child nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub alignment: Alignment,
    pub children: Vec<Node>,
}

/// A leaf text run with formatting marks
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    /// `None` when the source had no usable string.
    pub text: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Non-breaking space used in place of empty text runs
pub const NBSP: &str = "\u{00A0}";

impl Text {
    /// The string to display. Empty or absent text becomes a single
    /// non-breaking space.
    pub fn display_text(&self) -> &str {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NBSP,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Text(Text),
}

/// An ordered sequence of nodes, in reading order.
///
/// Construction never fails for well-formed JSON: anything that is not an
/// array becomes an empty document, and malformed fields fall back to their
/// defaults.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn from_value(value: &Value) -> Self {
        parser::parse_document(value)
    }

    /// Parse JSON text. Only syntax errors are reported.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}
