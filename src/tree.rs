//! The rendered visual tree.
//!
//! This is what the renderer produces: plain owned data describing elements,
//! their attributes and inline styles. It can be inspected directly or
//! serialized with [`crate::html`].

/// Element names used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Div,
    P,
    Heading(u8),
    Blockquote,
    Ul,
    Ol,
    Li,
    Img,
    A,
    Code,
    Pre,
    Strong,
    Em,
    U,
    Span,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::P => "p",
            Tag::Heading(1) => "h1",
            Tag::Heading(2) => "h2",
            Tag::Heading(3) => "h3",
            Tag::Heading(4) => "h4",
            Tag::Heading(5) => "h5",
            Tag::Heading(_) => "h6",
            Tag::Blockquote => "blockquote",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Img => "img",
            Tag::A => "a",
            Tag::Code => "code",
            Tag::Pre => "pre",
            Tag::Strong => "strong",
            Tag::Em => "em",
            Tag::U => "u",
            Tag::Span => "span",
        }
    }

    /// Void elements have no closing tag and no children.
    pub fn is_void(self) -> bool {
        matches!(self, Tag::Img)
    }
}

/// Ordered list of CSS declarations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Style(Vec<(&'static str, String)>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.0.push((property, value.into()));
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(p, v)| (*p, v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub attrs: Vec<(&'static str, String)>,
    pub style: Style,
    pub children: Vec<RenderNode>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            style: Style::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[RenderNode], out: &mut String) {
    for node in nodes {
        match node {
            RenderNode::Text(text) => out.push_str(text),
            RenderNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Element(Element),
    Text(String),
}

impl RenderNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderNode::Element(el) => Some(el),
            RenderNode::Text(_) => None,
        }
    }
}

impl From<Element> for RenderNode {
    fn from(el: Element) -> Self {
        RenderNode::Element(el)
    }
}

/// Output of a single render pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedTree {
    pub nodes: Vec<RenderNode>,
}

impl RenderedTree {
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, RenderNode, Style, Tag};

    #[test]
    fn heading_names_saturate() {
        assert_eq!(Tag::Heading(1).name(), "h1");
        assert_eq!(Tag::Heading(6).name(), "h6");
        assert_eq!(Tag::Heading(9).name(), "h6");
    }

    #[test]
    fn text_content_walks_descendants() {
        let el = Element::new(Tag::P)
            .child(RenderNode::Text("a".to_string()))
            .child(Element::new(Tag::Strong).child(RenderNode::Text("b".to_string())).into());
        assert_eq!(el.text_content(), "ab");
    }

    #[test]
    fn style_lookup() {
        let style = Style::new().with("color", "red").with("margin", "0");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("padding"), None);
    }
}
