use serde_json::{Map, Value};

use crate::block::{Alignment, Block, BlockKind, Document, Node, Text};

/// Build a document from a JSON value. Non-arrays yield an empty document.
pub fn parse_document(value: &Value) -> Document {
    match value {
        Value::Array(items) => Document::new(parse_nodes(items)),
        _ => Document::default(),
    }
}

fn parse_nodes(items: &[Value]) -> Vec<Node> {
    items.iter().filter_map(parse_node).collect()
}

/// Objects with a `text` key are text runs, every other object is a block.
/// Anything that is not an object is skipped.
fn parse_node(value: &Value) -> Option<Node> {
    let obj = value.as_object()?;
    if obj.contains_key("text") {
        Some(Node::Text(parse_text(obj)))
    } else {
        Some(Node::Block(parse_block(obj)))
    }
}

fn parse_text(obj: &Map<String, Value>) -> Text {
    Text {
        text: string_field(obj, "text"),
        bold: bool_field(obj, "bold"),
        italic: bool_field(obj, "italic"),
        underline: bool_field(obj, "underline"),
    }
}

fn parse_block(obj: &Map<String, Value>) -> Block {
    let tag = obj
        .get("type")
        .or_else(|| obj.get("kind"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let kind = match tag {
        "paragraph" => BlockKind::Paragraph,
        "heading" => BlockKind::Heading {
            level: int_field(obj, "level"),
        },
        "quote" => BlockKind::Quote,
        "list" => BlockKind::List {
            ordered: bool_field(obj, "ordered"),
        },
        "list-item" => BlockKind::ListItem,
        "image" => BlockKind::Image {
            url: string_field(obj, "url"),
            alt: string_field(obj, "alt"),
        },
        "link" => BlockKind::Link {
            url: string_field(obj, "url"),
        },
        "code" => BlockKind::Code,
        "code-block" => BlockKind::CodeBlock,
        other => BlockKind::Other(other.to_string()),
    };

    let children = match obj.get("children") {
        Some(Value::Array(items)) => parse_nodes(items),
        _ => Vec::new(),
    };

    Block {
        kind,
        alignment: parse_alignment(obj),
        children,
    }
}

fn parse_alignment(obj: &Map<String, Value>) -> Alignment {
    let value = obj
        .get("align")
        .or_else(|| obj.get("alignment"))
        .and_then(Value::as_str);
    match value {
        Some("center") => Alignment::Center,
        Some("right") => Alignment::Right,
        Some("justify") => Alignment::Justify,
        _ => Alignment::Left,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

// Floats are truncated so that `3.0` from a loosely typed editor still works.
fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = obj.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_document;
    use crate::block::{Alignment, Block, BlockKind, Document, Node, Text};

    #[test]
    fn non_array_is_empty() {
        assert!(parse_document(&json!({"type": "paragraph"})).is_empty());
        assert!(parse_document(&json!("hello")).is_empty());
        assert!(parse_document(&json!(null)).is_empty());
        assert!(parse_document(&json!([])).is_empty());
    }

    #[test]
    fn text_and_block_discrimination() {
        let doc = parse_document(&json!([
            {"type": "paragraph", "children": [{"text": "hi", "bold": true}]}
        ]));
        assert_eq!(
            doc.nodes,
            vec![Node::Block(Block {
                kind: BlockKind::Paragraph,
                alignment: Alignment::Left,
                children: vec![Node::Text(Text {
                    text: Some("hi".to_string()),
                    bold: true,
                    ..Text::default()
                })],
            })]
        );
    }

    #[test]
    fn text_key_wins_over_type() {
        let doc = parse_document(&json!([{"type": "paragraph", "text": "x"}]));
        assert!(matches!(doc.nodes[0], Node::Text(_)));
    }

    #[test]
    fn kind_alias_and_unknown_kinds() {
        let doc = parse_document(&json!([
            {"kind": "quote"},
            {"type": "table", "align": "center"},
            {"children": []}
        ]));
        let kinds: Vec<_> = doc
            .nodes
            .iter()
            .map(|n| match n {
                Node::Block(b) => b.kind.clone(),
                Node::Text(_) => panic!("expected block"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Quote,
                BlockKind::Other("table".to_string()),
                BlockKind::Other(String::new()),
            ]
        );
    }

    #[test]
    fn malformed_fields_default() {
        let doc = parse_document(&json!([
            {"type": "heading", "level": "big", "align": 7, "children": "nope"},
            {"type": "list", "ordered": "yes"},
            {"type": "image", "url": 5, "alt": null},
            {"text": 42, "bold": "true"},
            "stray",
            null
        ]));
        assert_eq!(doc.nodes.len(), 4);
        assert_eq!(
            doc.nodes[0],
            Node::Block(Block {
                kind: BlockKind::Heading { level: None },
                alignment: Alignment::Left,
                children: vec![],
            })
        );
        assert!(matches!(
            &doc.nodes[1],
            Node::Block(Block { kind: BlockKind::List { ordered: false }, .. })
        ));
        assert!(matches!(
            &doc.nodes[2],
            Node::Block(Block { kind: BlockKind::Image { url: None, alt: None }, .. })
        ));
        assert_eq!(doc.nodes[3], Node::Text(Text::default()));
    }

    #[test]
    fn float_level_is_truncated() {
        let doc = parse_document(&json!([{"type": "heading", "level": 3.7}]));
        assert!(matches!(
            &doc.nodes[0],
            Node::Block(Block { kind: BlockKind::Heading { level: Some(3) }, .. })
        ));
    }

    #[test]
    fn deserialize_through_serde() {
        let doc: Document =
            serde_json::from_str(r#"[{"type": "code", "children": [{"text": "x"}]}]"#).unwrap();
        assert_eq!(doc.nodes.len(), 1);
        let not_a_list: Document = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        assert!(not_a_list.is_empty());
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(Document::from_json_str("[{").is_err());
        assert!(Document::from_json_str("42").unwrap().is_empty());
    }
}
