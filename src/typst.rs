use crate::block::{Alignment, Block, BlockKind, Document, Node, Text};
use crate::config::{Config, Mode};
use crate::render::{DEFAULT_ALT, PLACEHOLDER_TEXT, safe_url};

/// Convert a document to Typst markup
pub fn document_to_typst(document: &Document, mode: Mode, config: &Config) -> String {
    let palette = config.theme.palette(mode);
    let mut out = String::new();

    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.font.sans {
        out.push_str("#set text(font: \"Open Sans\")\n");
    }
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    if mode == Mode::Dark {
        out.push_str(&format!("#set page(fill: rgb(\"{}\"))\n", palette.background));
        out.push_str(&format!("#set text(fill: rgb(\"{}\"))\n", palette.text));
    }
    out.push('\n');

    let emitter = Emitter { mode, config };
    let nodes = &document.nodes;

    if nodes.is_empty() {
        out.push_str("#emph[");
        push_escaped(PLACEHOLDER_TEXT, &mut out);
        out.push_str("]\n");
        return out;
    }

    let mut i = 0;
    while i < nodes.len() {
        match &nodes[i] {
            Node::Block(Block {
                kind: BlockKind::Heading { .. },
                ..
            }) => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emitter.emit_node(&nodes[i], &mut out);
                if i + 1 < nodes.len() {
                    i += 1;
                    emitter.emit_node(&nodes[i], &mut out);
                }
                out.push_str("]\n\n");
            }
            node => emitter.emit_node(node, &mut out),
        }
        i += 1;
    }

    out
}

struct Emitter<'a> {
    mode: Mode,
    config: &'a Config,
}

impl Emitter<'_> {
    fn emit_node(&self, node: &Node, out: &mut String) {
        match node {
            Node::Block(block) => self.emit_block(block, out),
            Node::Text(text) => {
                self.text_to_typst(text, out);
                out.push_str("\n\n");
            }
        }
    }

    fn emit_block(&self, block: &Block, out: &mut String) {
        let palette = self.config.theme.palette(self.mode);
        match &block.kind {
            BlockKind::Heading { level } => {
                let rank = BlockKind::heading_rank(*level);
                with_alignment(block.alignment, out, |out| {
                    for _ in 0..rank {
                        out.push('=');
                    }
                    out.push(' ');
                    self.inline_to_typst(&block.children, out);
                    out.push('\n');
                });
                out.push('\n');
            }
            BlockKind::Paragraph | BlockKind::ListItem | BlockKind::Other(_) => {
                with_alignment(block.alignment, out, |out| {
                    self.children_to_typst(&block.children, out);
                });
                out.push('\n');
            }
            BlockKind::Quote => {
                out.push_str(&format!(
                    "#block(stroke: (left: 2pt + rgb(\"{}\")), inset: (left: 10pt))[#text(fill: rgb(\"{}\"))[\n",
                    palette.quote_border, palette.muted
                ));
                self.children_to_typst(&block.children, out);
                out.push_str("]]\n\n");
            }
            BlockKind::List { .. } => {
                // Wrap list to keep together when small, allow breaks when large
                if count_list_items(block) <= 5 {
                    out.push_str("#block(breakable: false)[\n");
                    self.list_to_typst(block, 0, out);
                    out.push_str("]\n\n");
                } else {
                    self.list_to_typst(block, 0, out);
                    out.push('\n');
                }
            }
            BlockKind::CodeBlock => {
                out.push_str(&format!(
                    "#block(breakable: false, width: 100%, inset: 10pt, radius: 4pt, fill: rgb(\"{}\"))[#raw(block: true, ",
                    palette.code_background
                ));
                push_string_literal(&plain_text(&block.children), out);
                out.push_str(")]\n\n");
            }
            BlockKind::Image { .. } | BlockKind::Link { .. } | BlockKind::Code => {
                self.inline_block_to_typst(block, out);
                out.push_str("\n\n");
            }
        }
    }

    /// Paragraph-level content: inline runs joined, nested blocks on their own.
    fn children_to_typst(&self, children: &[Node], out: &mut String) {
        let mut inline = Vec::new();
        for child in children {
            if is_inline(child) {
                inline.push(child);
                continue;
            }
            self.flush_inline(&mut inline, out);
            if let Node::Block(block) = child {
                self.emit_block(block, out);
            }
        }
        self.flush_inline(&mut inline, out);
    }

    fn flush_inline(&self, inline: &mut Vec<&Node>, out: &mut String) {
        if inline.is_empty() {
            return;
        }
        for node in inline.drain(..) {
            self.inline_node_to_typst(node, out);
        }
        out.push('\n');
    }

    /// Single-line content. Block children are separated by a space so their
    /// text does not run together.
    fn inline_to_typst(&self, children: &[Node], out: &mut String) {
        for (i, child) in children.iter().enumerate() {
            if i > 0 && !(is_inline(child) && is_inline(&children[i - 1])) {
                out.push(' ');
            }
            self.inline_node_to_typst(child, out);
        }
    }

    fn inline_node_to_typst(&self, node: &Node, out: &mut String) {
        match node {
            Node::Text(text) => self.text_to_typst(text, out),
            Node::Block(block) => self.inline_block_to_typst(block, out),
        }
    }

    fn inline_block_to_typst(&self, block: &Block, out: &mut String) {
        let palette = self.config.theme.palette(self.mode);
        match &block.kind {
            BlockKind::Link { url } => {
                let label = |out: &mut String| {
                    out.push_str(&format!("#text(fill: rgb(\"{}\"))[", self.config.links.color));
                    self.inline_to_typst(&block.children, out);
                    out.push(']');
                };
                match url.as_deref().and_then(safe_url) {
                    Some(url) => {
                        out.push_str("#link(");
                        push_string_literal(url, out);
                        out.push_str(")[");
                        label(out);
                        out.push(']');
                    }
                    None => label(out),
                }
            }
            BlockKind::Code => {
                out.push_str(&format!(
                    "#box(fill: rgb(\"{}\"), inset: (x: 3pt), outset: (y: 3pt), radius: 2pt)[#raw(",
                    palette.code_background
                ));
                push_string_literal(&plain_text(&block.children), out);
                out.push_str(")]");
            }
            // Remote images are not fetched; the alt text links to the source.
            BlockKind::Image { url, alt } => {
                if let Some(url) = url.as_deref().and_then(safe_url) {
                    out.push_str("#link(");
                    push_string_literal(url, out);
                    out.push_str(")[#emph[");
                    push_escaped(alt.as_deref().unwrap_or(DEFAULT_ALT), out);
                    out.push_str("]]");
                }
            }
            _ => self.inline_to_typst(&block.children, out),
        }
    }

    fn list_to_typst(&self, list: &Block, indent: usize, out: &mut String) {
        let prefix = match list.kind {
            BlockKind::List { ordered: true } => "+",
            _ => "-",
        };
        let indent_str: String = "  ".repeat(indent);

        for item in &list.children {
            out.push_str(&indent_str);
            out.push_str(prefix);
            out.push(' ');

            let children = match item {
                Node::Block(Block {
                    kind: BlockKind::ListItem,
                    children,
                    ..
                }) => children.as_slice(),
                other => std::slice::from_ref(other),
            };

            let mut nested = Vec::new();
            let mut line = Vec::new();
            for child in children {
                match child {
                    Node::Block(block @ Block { kind: BlockKind::List { .. }, .. }) => {
                        nested.push(block)
                    }
                    _ => line.push(child.clone()),
                }
            }
            self.inline_to_typst(&line, out);
            out.push('\n');

            for block in nested {
                self.list_to_typst(block, indent + 1, out);
            }
        }
    }

    fn text_to_typst(&self, text: &Text, out: &mut String) {
        let mut closers = 0;
        for (mark, func) in [
            (text.bold, "#strong["),
            (text.italic, "#emph["),
            (text.underline, "#underline["),
        ] {
            if mark {
                out.push_str(func);
                closers += 1;
            }
        }
        match text.text.as_deref() {
            Some(s) if !s.is_empty() => push_escaped(s, out),
            _ => out.push('~'),
        }
        for _ in 0..closers {
            out.push(']');
        }
    }
}

fn is_inline(node: &Node) -> bool {
    match node {
        Node::Text(_) => true,
        Node::Block(block) => matches!(
            block.kind,
            BlockKind::Link { .. } | BlockKind::Code | BlockKind::Image { .. }
        ),
    }
}

fn with_alignment(alignment: Alignment, out: &mut String, body: impl FnOnce(&mut String)) {
    match alignment {
        Alignment::Left => body(out),
        Alignment::Justify => {
            out.push_str("#par(justify: true)[\n");
            body(out);
            out.push_str("]\n");
        }
        Alignment::Center | Alignment::Right => {
            out.push_str(&format!("#align({})[\n", alignment.as_css()));
            body(out);
            out.push_str("]\n");
        }
    }
}

fn count_list_items(list: &Block) -> usize {
    let mut count = list.children.len();
    for item in &list.children {
        if let Node::Block(item) = item {
            for child in &item.children {
                if let Node::Block(nested @ Block { kind: BlockKind::List { .. }, .. }) = child {
                    count += count_list_items(nested);
                }
            }
        }
    }
    count
}

fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_plain_text(nodes, &mut out);
    out
}

fn collect_plain_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text.text.as_deref().unwrap_or_default()),
            Node::Block(block) => collect_plain_text(&block.children, out),
        }
    }
}

/// Escape special Typst markup characters
fn push_escaped(text: &str, out: &mut String) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str(" \\\n");
        }
        push_escaped_line(line, out);
    }
}

// A leading `12.` would start a numbered list item.
fn push_escaped_line(line: &str, out: &mut String) {
    let indent = line.len() - line.trim_start().len();
    let digits = line[indent..].bytes().take_while(u8::is_ascii_digit).count();
    let marker = (digits > 0 && line[indent + digits..].starts_with('.')).then_some(indent + digits);

    for (idx, ch) in line.char_indices() {
        if Some(idx) == marker {
            out.push_str("\\.");
            continue;
        }
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-' | '+'
            | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn push_string_literal(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::document_to_typst;
    use crate::block::Document;
    use crate::config::{Config, Mode};

    const PREAMBLE: &str = "#set par(linebreaks: \"optimized\")\n\n";

    fn typst(value: Value) -> String {
        document_to_typst(&Document::from_value(&value), Mode::Light, &Config::default())
    }

    fn p(text: &str) -> Value {
        json!({"type": "paragraph", "children": [{"text": text}]})
    }

    #[test]
    fn empty_document() {
        assert_eq!(typst(json!([])), format!("{PREAMBLE}#emph[No content available]\n"));
    }

    #[test]
    fn heading_clamped_and_grouped() {
        assert_eq!(
            typst(json!([{"type": "heading", "level": 9, "children": [{"text": "Hi"}]}, p("Body")])),
            format!("{PREAMBLE}#block(breakable: false)[\n====== Hi\n\nBody\n\n]\n\n")
        );
        assert_eq!(
            typst(json!([{"type": "heading", "children": [{"text": "Hi"}]}])),
            format!("{PREAMBLE}#block(breakable: false)[\n== Hi\n\n]\n\n")
        );
    }

    #[test]
    fn paragraph() {
        assert_eq!(typst(json!([p("Hello world")])), format!("{PREAMBLE}Hello world\n\n"));
    }

    #[test]
    fn marks_nest_in_order() {
        assert_eq!(
            typst(json!([{"type": "paragraph", "children": [
                {"text": "x", "bold": true, "italic": true, "underline": true}
            ]}])),
            format!("{PREAMBLE}#strong[#emph[#underline[x]]]\n\n")
        );
    }

    #[test]
    fn alignment() {
        assert_eq!(
            typst(json!([{"type": "paragraph", "align": "center", "children": [{"text": "c"}]}])),
            format!("{PREAMBLE}#align(center)[\nc\n]\n\n")
        );
    }

    #[test]
    fn lists() {
        let item = |t: &str| json!({"type": "list-item", "children": [{"text": t}]});
        assert_eq!(
            typst(json!([{"type": "list", "ordered": true, "children": [item("one"), item("two")]}])),
            format!("{PREAMBLE}#block(breakable: false)[\n+ one\n+ two\n]\n\n")
        );
        assert_eq!(
            typst(json!([{"type": "list", "children": [item("one")]}])),
            format!("{PREAMBLE}#block(breakable: false)[\n- one\n]\n\n")
        );
    }

    #[test]
    fn nested_list() {
        let doc = json!([{"type": "list", "children": [
            {"type": "list-item", "children": [
                {"text": "outer"},
                {"type": "list", "ordered": true, "children": [
                    {"type": "list-item", "children": [{"text": "inner"}]}
                ]}
            ]}
        ]}]);
        assert_eq!(
            typst(doc),
            format!("{PREAMBLE}#block(breakable: false)[\n- outer\n  + inner\n]\n\n")
        );
    }

    #[test]
    fn image_without_url_emits_nothing() {
        assert_eq!(
            typst(json!([{"type": "image", "url": "", "alt": "x"}])),
            format!("{PREAMBLE}\n\n")
        );
    }

    #[test]
    fn image_and_link() {
        assert_eq!(
            typst(json!([{"type": "image", "url": "a.png"}])),
            format!("{PREAMBLE}#link(\"a.png\")[#emph[Image]]\n\n")
        );
        assert_eq!(
            typst(json!([{"type": "paragraph", "children": [
                {"type": "link", "url": "https://x.y", "children": [{"text": "go"}]}
            ]}])),
            format!("{PREAMBLE}#link(\"https://x.y\")[#text(fill: rgb(\"#1a73e8\"))[go]]\n\n")
        );
    }

    #[test]
    fn code_block_uses_raw() {
        let out = typst(json!([{"type": "code-block", "children": [{"text": "let x = \"1\";\n"}]}]));
        assert!(out.contains("#raw(block: true, \"let x = \\\"1\\\";\\n\")"));
    }

    #[test]
    fn unknown_kind_renders_children() {
        assert_eq!(
            typst(json!([{"type": "callout", "children": [{"text": "hey"}]}])),
            format!("{PREAMBLE}hey\n\n")
        );
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(typst(json!([p("a * b")])), format!("{PREAMBLE}a \\* b\n\n"));
        assert_eq!(typst(json!([p("a_b")])), format!("{PREAMBLE}a\\_b\n\n"));
        assert_eq!(typst(json!([p("= x")])), format!("{PREAMBLE}\\= x\n\n"));
    }

    #[test]
    fn quote_keeps_paragraph_breaks() {
        assert_eq!(
            typst(json!([{"type": "quote", "children": [p("one"), p("two")]}])),
            format!(
                "{PREAMBLE}#block(stroke: (left: 2pt + rgb(\"#bdbdbd\")), inset: (left: 10pt))[#text(fill: rgb(\"#616161\"))[\none\n\ntwo\n\n]]\n\n"
            )
        );
    }

    #[test]
    fn block_children_of_list_items_are_separated() {
        let doc = json!([{"type": "list", "children": [
            {"type": "list-item", "children": [p("one"), p("two")]}
        ]}]);
        assert_eq!(
            typst(doc),
            format!("{PREAMBLE}#block(breakable: false)[\n- one two\n]\n\n")
        );
    }

    #[test]
    fn leading_number_is_not_a_list_marker() {
        assert_eq!(
            typst(json!([p("2024. A good year")])),
            format!("{PREAMBLE}2024\\. A good year\n\n")
        );
        assert_eq!(
            typst(json!([p("Version 2. Done\n3. more")])),
            format!("{PREAMBLE}Version 2. Done \\\n3\\. more\n\n")
        );
        assert_eq!(typst(json!([p("3.5 kg")])), format!("{PREAMBLE}3\\.5 kg\n\n"));
    }

    #[test]
    fn script_urls_are_not_linked() {
        assert_eq!(
            typst(json!([{"type": "paragraph", "children": [
                {"type": "link", "url": "javascript:alert(1)", "children": [{"text": "go"}]}
            ]}])),
            format!("{PREAMBLE}#text(fill: rgb(\"#1a73e8\"))[go]\n\n")
        );
    }

    #[test]
    fn empty_text_is_non_breaking_space() {
        assert_eq!(typst(json!([p("")])), format!("{PREAMBLE}~\n\n"));
    }

    #[test]
    fn dark_mode_sets_page_fill() {
        let out = document_to_typst(&Document::default(), Mode::Dark, &Config::default());
        assert!(out.contains("#set page(fill: rgb(\"#121212\"))"));
        assert!(out.contains("#set text(fill: rgb(\"#e0e0e0\"))"));
    }
}
