use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog product as injected into product listing blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub collection_ids: Vec<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_published() -> bool {
    true
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            price,
            currency: None,
            image_url: None,
            collection_ids: Vec::new(),
            published: true,
            extra: Map::new(),
        }
    }

    pub fn in_collection(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_ids.push(collection_id.into());
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }

    pub fn belongs_to(&self, collection_id: &str) -> bool {
        self.collection_ids.iter().any(|c| c == collection_id)
    }
}
