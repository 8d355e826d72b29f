use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storefront_layout::{StoreColors, ThemeTag};

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element (attributes are ordered so output is deterministic)
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<VNode>,
    },

    /// Text node
    Text { content: String },

    /// Placeholder for a block that failed to render (preview mode only)
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>, block_id: Option<String>) -> Self {
        VNode::Error {
            message: message.into(),
            block_id,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: impl IntoIterator<Item = VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    /// Element with a single text child
    pub fn text_element(tag: impl Into<String>, content: impl Into<String>) -> Self {
        VNode::element(tag).with_child(VNode::text(content))
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(content),
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            VNode::Error { .. } => {}
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, VNode::Error { .. })
    }
}

/// Output of one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedBlock {
    pub block_id: String,
    pub block_type: String,
    pub node: VNode,
}

/// Rendered page: blocks in layout order plus the store-wide styling inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub blocks: Vec<RenderedBlock>,
    pub colors: StoreColors,
    pub theme: ThemeTag,
}

impl RenderedPage {
    /// Ids of the blocks that produced output, in render order
    pub fn block_ids(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.block_id.as_str()).collect()
    }

    pub fn find(&self, block_id: &str) -> Option<&RenderedBlock> {
        self.blocks.iter().find(|b| b.block_id == block_id)
    }

    /// Root element carrying the palette as CSS custom properties
    pub fn root(&self) -> VNode {
        let style = self
            .colors
            .entries()
            .iter()
            .map(|(name, value)| format!("--color-{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        VNode::element("div")
            .with_class("storefront")
            .with_attr("data-theme", self.theme.as_str())
            .with_attr("style", style)
            .with_children(self.blocks.iter().map(|b| b.node.clone()))
    }
}
