use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Block props: an ordered JSON object
pub type Props = Map<String, Value>;

/// One renderable layout unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique within a layout and stable across history entries
    pub id: String,

    /// Key into the component registry (e.g. `Hero`, `ProductGrid`)
    #[serde(rename = "type")]
    pub block_type: String,

    #[serde(default)]
    pub props: Props,

    /// Block-level keys this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: impl Into<String>, props: Props) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            props,
            extra: Map::new(),
        }
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Shallow merge: top-level keys in `partial` overwrite existing ones,
    /// nested objects are replaced rather than merged.
    pub fn merge_props(&mut self, partial: &Props) {
        for (key, value) in partial {
            self.props.insert(key.clone(), value.clone());
        }
    }

    /// Same block with merged props (`self` is left untouched)
    pub fn with_merged_props(&self, partial: &Props) -> Self {
        let mut next = self.clone();
        next.merge_props(partial);
        next
    }
}

/// Parse a persisted layout (a JSON array of blocks)
pub fn parse_layout(source: &str) -> LayoutResult<Vec<Block>> {
    let value: Value = serde_json::from_str(source)?;
    if !value.is_array() {
        return Err(LayoutError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

/// Serialize blocks back to the persisted layout format
pub fn to_layout_json(blocks: &[Block]) -> LayoutResult<String> {
    Ok(serde_json::to_string_pretty(blocks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_layout() {
        let source = r#"[
            { "id": "a", "type": "Hero", "props": { "title": "Hello" } },
            { "id": "b", "type": "Footer" }
        ]"#;

        let blocks = parse_layout(source).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].block_type, "Hero");
        assert_eq!(blocks[0].prop_str("title"), Some("Hello"));
        assert!(blocks[1].props.is_empty());
    }

    #[test]
    fn test_rejects_non_array() {
        let result = parse_layout(r#"{ "id": "a" }"#);
        assert!(matches!(result, Err(LayoutError::NotAnArray)));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let source = r#"[{"id":"a","type":"Hero","props":{"futureKey":{"x":1}},"locked":true}]"#;
        let blocks = parse_layout(source).unwrap();
        assert_eq!(blocks[0].extra.get("locked"), Some(&json!(true)));

        let written = to_layout_json(&blocks).unwrap();
        let reparsed = parse_layout(&written).unwrap();
        assert_eq!(blocks, reparsed);
        assert_eq!(reparsed[0].prop("futureKey"), Some(&json!({ "x": 1 })));
    }

    #[test]
    fn test_merge_props_is_shallow() {
        let mut block = Block::new(
            "a",
            "Hero",
            props(json!({ "title": "Old", "cta": { "label": "Buy", "href": "/shop" } })),
        );

        block.merge_props(&props(json!({ "cta": { "label": "Shop now" }, "subtitle": "New" })));

        assert_eq!(block.prop_str("title"), Some("Old"));
        assert_eq!(block.prop_str("subtitle"), Some("New"));
        // nested objects are replaced, not merged
        assert_eq!(block.prop("cta"), Some(&json!({ "label": "Shop now" })));
    }
}
