//! Wire protocol between the editor (parent) and the preview frame (child).
//!
//! ```json
//! { "type": "PREVIEW_UPDATE", "layout": [...], "theme": "bold" }
//! { "type": "PREVIEW_READY" }
//! ```
//!
//! Every field of an update is optional and absent fields are omitted, so
//! the schema can only grow by adding optional fields. Unknown fields are
//! ignored on receipt.

use crate::error::PreviewResult;
use serde::{Deserialize, Serialize};
use storefront_layout::{Block, Product, StoreColors, ThemeTag};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PreviewMessage {
    /// Parent → child: new values for the fields present
    #[serde(rename = "PREVIEW_UPDATE")]
    Update(PreviewUpdate),

    /// Child → parent: the frame has mounted and wants a full update
    #[serde(rename = "PREVIEW_READY")]
    Ready,
}

impl PreviewMessage {
    pub fn to_json(&self) -> PreviewResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(source: &str) -> PreviewResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<StoreColors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

impl PreviewUpdate {
    pub fn layout(blocks: Vec<Block>) -> Self {
        Self {
            layout: Some(blocks),
            ..Self::default()
        }
    }

    pub fn colors(colors: StoreColors) -> Self {
        Self {
            colors: Some(colors),
            ..Self::default()
        }
    }

    pub fn theme(theme: ThemeTag) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn products(products: Vec<Product>) -> Self {
        Self {
            products: Some(products),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_none()
            && self.colors.is_none()
            && self.theme.is_none()
            && self.products.is_none()
    }
}

impl From<PreviewUpdate> for PreviewMessage {
    fn from(update: PreviewUpdate) -> Self {
        PreviewMessage::Update(update)
    }
}

/// Everything the frame needs to render
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewState {
    pub layout: Vec<Block>,
    pub colors: StoreColors,
    pub theme: ThemeTag,
    pub products: Vec<Product>,
}

impl PreviewState {
    /// Update carrying every field
    pub fn full_update(&self) -> PreviewUpdate {
        PreviewUpdate {
            layout: Some(self.layout.clone()),
            colors: Some(self.colors.clone()),
            theme: Some(self.theme),
            products: Some(self.products.clone()),
        }
    }

    /// Overwrite only the fields present in `update`; returns whether the
    /// layout was among them
    pub fn merge(&mut self, update: PreviewUpdate) -> bool {
        if let Some(colors) = update.colors {
            self.colors = colors;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(products) = update.products {
            self.products = products;
        }
        match update.layout {
            Some(layout) => {
                self.layout = layout;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use storefront_layout::Props;

    #[test]
    fn test_ready_wire_format() {
        assert_eq!(
            PreviewMessage::Ready.to_json().unwrap(),
            r#"{"type":"PREVIEW_READY"}"#
        );
    }

    #[test]
    fn test_partial_update_omits_absent_fields() {
        let message = PreviewMessage::from(PreviewUpdate::theme(ThemeTag::Bold));
        let value: Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({ "type": "PREVIEW_UPDATE", "theme": "bold" }));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let message = PreviewMessage::from_json(
            r#"{"type":"PREVIEW_UPDATE","layout":[],"futureField":1}"#,
        )
        .unwrap();
        assert_eq!(message, PreviewMessage::Update(PreviewUpdate::layout(vec![])));
    }

    #[test]
    fn test_merge_keeps_fields_not_present() {
        let mut state = PreviewState {
            layout: vec![Block::new("a", "Hero", Props::new())],
            theme: ThemeTag::Elegant,
            ..PreviewState::default()
        };

        assert!(!state.merge(PreviewUpdate::colors(StoreColors::default())));
        assert_eq!(state.layout.len(), 1);
        assert_eq!(state.theme, ThemeTag::Elegant);

        assert!(state.merge(PreviewUpdate::layout(vec![])));
        assert!(state.layout.is_empty());
        assert_eq!(state.theme, ThemeTag::Elegant);
    }
}
