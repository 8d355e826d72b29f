//! Lenient prop access for components.
//!
//! Every accessor falls back to a default instead of failing, so malformed or
//! missing props still render something sensible. Text accessors understand
//! hydrated content packets (`{ id, type, name, data }`) as well as plain
//! strings; an unresolved `{"$packet": ..}` marker reads as absent.

use serde_json::Value;
use storefront_layout::{packet_ref, Props};

pub struct PropReader<'a> {
    props: &'a Props,
}

impl<'a> PropReader<'a> {
    pub fn new(props: &'a Props) -> Self {
        Self { props }
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.props.get(key).and_then(text_of)
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        match self.props.get(key) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.props.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Array prop, or an empty slice when absent or not an array
    pub fn items(&self, key: &str) -> &'a [Value] {
        self.props
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Text carried by a prop value
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(fields) => {
            if packet_ref(value).is_some() {
                return None;
            }
            fields
                .get("data")
                .or_else(|| fields.get("text"))
                .and_then(text_of)
        }
        _ => None,
    }
}

/// Field of an object item (`items[i].title` and friends)
pub fn item_text(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(text_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_text_reads_hydrated_packets() {
        let p = props(json!({
            "plain": "Hello",
            "packet": { "id": "p", "type": "text", "name": "P", "data": { "text": "From packet" } },
            "packetString": { "id": "q", "type": "text", "name": "Q", "data": "Inline" },
            "unresolved": { "$packet": "missing" },
        }));
        let reader = PropReader::new(&p);

        assert_eq!(reader.text("plain").as_deref(), Some("Hello"));
        assert_eq!(reader.text("packet").as_deref(), Some("From packet"));
        assert_eq!(reader.text("packetString").as_deref(), Some("Inline"));
        assert_eq!(reader.text("unresolved"), None);
        assert_eq!(reader.text_or("absent", "Default"), "Default");
    }

    #[test]
    fn test_numbers_degrade_to_default() {
        let p = props(json!({ "a": 3, "b": "5", "c": "many", "d": -1 }));
        let reader = PropReader::new(&p);

        assert_eq!(reader.u64_or("a", 4), 3);
        assert_eq!(reader.u64_or("b", 4), 5);
        assert_eq!(reader.u64_or("c", 4), 4);
        assert_eq!(reader.u64_or("d", 4), 4);
        assert!(reader.items("a").is_empty());
    }
}
