use crate::config::{Config, Mode};
use crate::render::LINK_CLASS;
use crate::tree::{Element, RenderNode, RenderedTree};

/// Serialize a rendered tree to an HTML fragment.
pub fn to_html(tree: &RenderedTree) -> String {
    let mut out = String::new();
    nodes_to_html(&tree.nodes, &mut out);
    out
}

/// Rules that cannot be expressed as inline styles.
pub fn stylesheet() -> String {
    format!(
        ".{LINK_CLASS}:hover {{ text-decoration: underline !important; }}\n"
    )
}

/// Wrap a rendered tree in a standalone HTML page for the given mode.
pub fn to_page(tree: &RenderedTree, mode: Mode, config: &Config) -> String {
    let palette = config.theme.palette(mode);
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
    out.push_str(&format!(
        "body {{ margin: 0 auto; max-width: 760px; padding: 24px; color: {}; background-color: {}; font-family: sans-serif; line-height: 1.6; }}\n",
        palette.text, palette.background
    ));
    out.push_str(&stylesheet());
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(&to_html(tree));
    out.push_str("\n</body>\n</html>\n");
    out
}

fn nodes_to_html(nodes: &[RenderNode], out: &mut String) {
    for node in nodes {
        match node {
            RenderNode::Text(text) => escape_into(text, out),
            RenderNode::Element(el) => element_to_html(el, out),
        }
    }
}

fn element_to_html(el: &Element, out: &mut String) {
    let name = el.tag.name();
    out.push('<');
    out.push_str(name);

    for (attr, value) in &el.attrs {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        escape_into(value, out);
        out.push('"');
    }

    if !el.style.is_empty() {
        out.push_str(" style=\"");
        for (i, (property, value)) in el.style.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(property);
            out.push_str(": ");
            escape_into(value, out);
            out.push(';');
        }
        out.push('"');
    }

    out.push('>');
    if el.tag.is_void() {
        return;
    }

    nodes_to_html(&el.children, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
