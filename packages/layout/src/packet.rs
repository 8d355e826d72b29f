use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Marker key for an indirect packet reference inside block props
pub const PACKET_REF_KEY: &str = "$packet";

/// Reusable content unit stored separately from the block list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPacket {
    pub id: String,
    #[serde(rename = "type")]
    pub packet_type: String,
    pub name: String,
    #[serde(default)]
    pub data: Value,
}

impl ContentPacket {
    pub fn new(
        id: impl Into<String>,
        packet_type: impl Into<String>,
        name: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            id: id.into(),
            packet_type: packet_type.into(),
            name: name.into(),
            data,
        }
    }

    /// Inline form substituted for a reference during hydration
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "type": self.packet_type,
            "name": self.name,
            "data": self.data,
        })
    }
}

/// Resolved packets by id
pub type PacketMap = HashMap<String, ContentPacket>;

/// Returns the referenced packet id if `value` is a reference marker.
///
/// A marker is an object with exactly one key, `$packet`, holding a string.
pub fn packet_ref(value: &Value) -> Option<&str> {
    let object = value.as_object()?;
    if object.len() != 1 {
        return None;
    }
    object.get(PACKET_REF_KEY)?.as_str()
}

pub fn make_packet_ref(id: &str) -> Value {
    json!({ PACKET_REF_KEY: id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_ref_detection() {
        assert_eq!(packet_ref(&json!({ "$packet": "p1" })), Some("p1"));
        assert_eq!(packet_ref(&make_packet_ref("p2")), Some("p2"));

        assert_eq!(packet_ref(&json!("p1")), None);
        assert_eq!(packet_ref(&json!({ "$packet": 42 })), None);
        assert_eq!(packet_ref(&json!({ "$packet": "p1", "other": true })), None);
    }

    #[test]
    fn test_packet_deserializes_without_data() {
        let packet: ContentPacket =
            serde_json::from_str(r#"{"id":"p1","type":"text","name":"Tagline"}"#).unwrap();
        assert_eq!(packet.packet_type, "text");
        assert!(packet.data.is_null());
    }
}
