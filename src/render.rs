//! Document tree renderer.
//!
//! Every render is a pure function of the document, the display mode and the
//! config. Each call returns its own subtree; nothing is accumulated across
//! nodes and nothing is logged.

use crate::block::{Alignment, Block, BlockKind, Document, Node, Text};
use crate::config::{Config, Mode, Palette};
use crate::tree::{Element, RenderNode, RenderedTree, Style, Tag};

pub const PLACEHOLDER_TEXT: &str = "No content available";
pub const IMAGE_ERROR_TEXT: &str = "Failed to load image";
pub const DEFAULT_ALT: &str = "Image";

/// Class names the HTML stylesheet hooks into.
pub const PLACEHOLDER_CLASS: &str = "content-empty";
pub const LINK_CLASS: &str = "content-link";
pub const IMAGE_CLASS: &str = "content-image";
pub const IMAGE_ERROR_CLASS: &str = "content-image-error";

const MONOSPACE: &str = "ui-monospace, SFMono-Regular, Menlo, Consolas, monospace";

// Hides the image and reveals the sibling fallback box.
const IMAGE_ONERROR: &str =
    "this.style.display='none';this.nextElementSibling.style.display='block';";

/// Render using the compiled default config.
pub fn render(document: &Document, mode: Mode) -> RenderedTree {
    render_with_config(document, mode, Config::shared_default())
}

/// Accept only `http`, `https`, `mailto` and scheme-less (relative) urls.
/// Returns the trimmed url, or `None` for empty or disallowed input.
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    match url.find([':', '/', '?', '#']) {
        Some(idx) if url[idx..].starts_with(':') => {
            // Browsers ignore tabs and newlines inside the scheme.
            let scheme: String = url[..idx]
                .chars()
                .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
                .collect::<String>()
                .to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto").then_some(url)
        }
        _ => Some(url),
    }
}

pub fn render_with_config(document: &Document, mode: Mode, config: &Config) -> RenderedTree {
    let ctx = Context {
        palette: config.theme.palette(mode),
        config,
    };

    if document.is_empty() {
        return RenderedTree {
            nodes: vec![ctx.placeholder()],
        };
    }

    RenderedTree {
        nodes: ctx.render_nodes(&document.nodes),
    }
}

struct Context<'a> {
    palette: &'a Palette,
    config: &'a Config,
}

impl Context<'_> {
    fn placeholder(&self) -> RenderNode {
        Element::new(Tag::P)
            .attr("class", PLACEHOLDER_CLASS)
            .style(
                Style::new()
                    .with("color", &self.palette.muted)
                    .with("font-style", "italic"),
            )
            .child(RenderNode::Text(PLACEHOLDER_TEXT.to_string()))
            .into()
    }

    fn render_nodes(&self, nodes: &[Node]) -> Vec<RenderNode> {
        nodes.iter().filter_map(|node| self.render_node(node)).collect()
    }

    fn render_node(&self, node: &Node) -> Option<RenderNode> {
        match node {
            Node::Text(text) => Some(self.render_text(text)),
            Node::Block(block) => self.render_block(block),
        }
    }

    fn render_block(&self, block: &Block) -> Option<RenderNode> {
        let children = || self.render_nodes(&block.children);
        let align = block.alignment;

        let el = match &block.kind {
            // A `div` so that block children (images, code blocks, lists)
            // stay inside it when the HTML is parsed again.
            BlockKind::Paragraph => Element::new(Tag::Div)
                .style(aligned(align).with("margin", "0 0 16px 0"))
                .children(children()),

            BlockKind::Heading { level } => {
                let rank = BlockKind::heading_rank(*level);
                Element::new(Tag::Heading(rank))
                    .style(
                        aligned(align)
                            .with("margin", "24px 0 12px 0")
                            .with("font-weight", "bold"),
                    )
                    .children(children())
            }

            BlockKind::Quote => Element::new(Tag::Blockquote)
                .style(
                    aligned(align)
                        .with("border-left", format!("4px solid {}", self.palette.quote_border))
                        .with("padding-left", "16px")
                        .with("margin", "16px 0")
                        .with("color", &self.palette.muted),
                )
                .children(children()),

            BlockKind::List { ordered } => {
                let tag = if *ordered { Tag::Ol } else { Tag::Ul };
                Element::new(tag)
                    .style(
                        aligned(align)
                            .with("padding-left", "24px")
                            .with("margin", "0 0 16px 0"),
                    )
                    .children(children())
            }

            BlockKind::ListItem => Element::new(Tag::Li)
                .style(aligned(align).with("margin", "4px 0"))
                .children(children()),

            BlockKind::Image { url, alt } => return self.render_image(url.as_deref(), alt.as_deref()),

            BlockKind::Link { url } => {
                let mut el = Element::new(Tag::A);
                if let Some(url) = url.as_deref().and_then(safe_url) {
                    el = el.attr("href", url);
                }
                el.attr("target", "_blank")
                    .attr("rel", "noopener noreferrer")
                    .attr("class", LINK_CLASS)
                    .style(
                        Style::new()
                            .with("color", &self.config.links.color)
                            .with("text-decoration", "none"),
                    )
                    .children(children())
            }

            BlockKind::Code => Element::new(Tag::Code)
                .style(self.code_style())
                .children(children()),

            BlockKind::CodeBlock => Element::new(Tag::Pre)
                .style(
                    Style::new()
                        .with("font-family", MONOSPACE)
                        .with("background-color", &self.palette.code_background)
                        .with("padding", "12px 16px")
                        .with("margin", "16px 0")
                        .with("border-radius", "4px")
                        .with("overflow-x", "auto"),
                )
                .child(
                    Element::new(Tag::Code)
                        .style(self.code_style())
                        .children(children())
                        .into(),
                ),

            BlockKind::Other(_) => fallback(align).children(children()),
        };

        Some(el.into())
    }

    fn code_style(&self) -> Style {
        Style::new()
            .with("font-family", MONOSPACE)
            .with("background-color", &self.palette.code_background)
            .with("padding", "2px 4px")
            .with("border-radius", "3px")
    }

    /// Images without a usable url render nothing at all. Load failures are
    /// handled by the host through `onerror`, which swaps in the fallback box.
    fn render_image(&self, url: Option<&str>, alt: Option<&str>) -> Option<RenderNode> {
        let url = url.and_then(safe_url)?;
        let alt = alt.unwrap_or(DEFAULT_ALT);

        let img = Element::new(Tag::Img)
            .attr("src", url)
            .attr("alt", alt)
            .attr("draggable", "false")
            .attr("oncontextmenu", "return false;")
            .attr("onerror", IMAGE_ONERROR)
            .style(
                Style::new()
                    .with("display", "block")
                    .with("width", "100%")
                    .with("height", "auto")
                    .with("user-select", "none"),
            );

        let error_color = &self.config.image.error_color;
        let fallback = Element::new(Tag::Div)
            .attr("class", IMAGE_ERROR_CLASS)
            .style(
                Style::new()
                    .with("display", "none")
                    .with("border", format!("1px solid {}", error_color))
                    .with("color", error_color)
                    .with("padding", "16px")
                    .with("text-align", "center"),
            )
            .child(RenderNode::Text(IMAGE_ERROR_TEXT.to_string()));

        Some(
            Element::new(Tag::Div)
                .attr("class", IMAGE_CLASS)
                .style(Style::new().with("margin", "16px 0"))
                .child(img.into())
                .child(fallback.into())
                .into(),
        )
    }

    /// Marks nest in a fixed order: bold, then italic, then underline, then
    /// the run itself.
    fn render_text(&self, text: &Text) -> RenderNode {
        let mut node: RenderNode = Element::new(Tag::Span)
            .children(split_segments(text.display_text()).into_iter().map(segment))
            .into();

        if text.underline {
            node = Element::new(Tag::U).child(node).into();
        }
        if text.italic {
            node = Element::new(Tag::Em).child(node).into();
        }
        if text.bold {
            node = Element::new(Tag::Strong).child(node).into();
        }
        node
    }
}

fn aligned(align: Alignment) -> Style {
    Style::new().with("text-align", align.as_css())
}

fn fallback(align: Alignment) -> Element {
    Element::new(Tag::Div).style(aligned(align))
}

/// Display-only unit of a text run.
fn segment(piece: &str) -> RenderNode {
    let mut style = Style::new()
        .with("user-select", "none")
        .with("pointer-events", "none");
    if piece.chars().all(char::is_whitespace) {
        style = style.with("white-space", "pre-wrap");
    }
    Element::new(Tag::Span)
        .style(style)
        .child(RenderNode::Text(piece.to_string()))
        .into()
}

/// Split into alternating runs of whitespace and non-whitespace. Nothing is
/// dropped: concatenating the pieces yields the input.
///
/// U+00A0 counts as whitespace, so an empty run renders as one pre-wrapped
/// segment.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                pieces.push(&text[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}
