//! Layout rendering: block sequence → `RenderedPage`.

use crate::enrich::enrich_block;
use crate::error::{RenderError, RenderResult};
use crate::registry::ComponentRegistry;
use crate::vdom::{RenderedBlock, RenderedPage, VNode};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use storefront_layout::{parse_layout, Block, Product, StoreColors, ThemeTag};
use storefront_packets::{hydrate_blocks, PacketLookup};
use tracing::{debug, info, instrument, warn};

/// How component failures surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Failed blocks render nothing
    #[default]
    Production,
    /// Failed blocks render an inline error placeholder
    Preview,
}

/// Store-wide inputs shared by every block of a render
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub colors: StoreColors,
    pub theme: ThemeTag,
    pub products: Vec<Product>,
    pub mode: RenderMode,
}

impl RenderContext {
    pub fn new(colors: StoreColors, theme: ThemeTag) -> Self {
        Self {
            colors,
            theme,
            ..Self::default()
        }
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    registry: Arc<ComponentRegistry>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(ComponentRegistry::builtin())
    }
}

impl LayoutEngine {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn with_shared_registry(registry: Arc<ComponentRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Render blocks in sequence order. Never fails as a whole: unknown
    /// types are skipped and component errors stay within their block.
    #[instrument(skip_all, fields(blocks = blocks.len(), mode = ?ctx.mode))]
    pub fn render(&self, blocks: &[Block], ctx: &RenderContext) -> RenderedPage {
        let mut rendered = Vec::with_capacity(blocks.len());

        for block in blocks {
            if let Some(node) = self.render_block(block, ctx) {
                rendered.push(RenderedBlock {
                    block_id: block.id.clone(),
                    block_type: block.block_type.clone(),
                    node,
                });
            }
        }

        info!(rendered = rendered.len(), "Layout rendered");

        RenderedPage {
            blocks: rendered,
            colors: ctx.colors.clone(),
            theme: ctx.theme,
        }
    }

    fn render_block(&self, block: &Block, ctx: &RenderContext) -> Option<VNode> {
        let Some(component) = self.registry.get(&block.block_type) else {
            debug!(block_id = %block.id, block_type = %block.block_type, "Skipping unknown block type");
            return None;
        };

        let props = enrich_block(block, ctx);
        let result = panic::catch_unwind(AssertUnwindSafe(|| component.render(&props, ctx)))
            .unwrap_or_else(|payload| {
                Err(RenderError::ComponentFailed {
                    component: block.block_type.clone(),
                    message: panic_message(payload.as_ref()),
                })
            });

        match result {
            Ok(node) => Some(node.with_attr("data-block-id", block.id.as_str())),
            Err(err) => {
                warn!(block_id = %block.id, block_type = %block.block_type, error = %err, "Block failed to render");
                match ctx.mode {
                    RenderMode::Production => None,
                    RenderMode::Preview => Some(VNode::error(err.to_string(), Some(block.id.clone()))),
                }
            }
        }
    }

    /// Hydrate packet references from `packets`, then render
    pub fn render_with_packets(
        &self,
        blocks: &[Block],
        packets: &impl PacketLookup,
        ctx: &RenderContext,
    ) -> RenderedPage {
        let hydrated = hydrate_blocks(blocks, packets);
        self.render(&hydrated, ctx)
    }

    /// Parse a persisted layout and render it
    pub fn render_json(
        &self,
        layout_json: &str,
        packets: &impl PacketLookup,
        ctx: &RenderContext,
    ) -> RenderResult<RenderedPage> {
        let blocks = parse_layout(layout_json)?;
        Ok(self.render_with_packets(&blocks, packets, ctx))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use storefront_layout::{make_packet_ref, ContentPacket, Props};

    fn block(id: &str, ty: &str) -> Block {
        Block::new(id, ty, Props::new())
    }

    #[test]
    fn test_root_nodes_carry_block_ids() {
        let engine = LayoutEngine::default();
        let page = engine.render(&[block("a", "Header"), block("b", "Footer")], &RenderContext::default());

        assert_eq!(page.block_ids(), vec!["a", "b"]);
        assert_eq!(page.blocks[0].node.attr("data-block-id"), Some("a"));
    }

    #[test]
    fn test_render_json_hydrates_packets() {
        let engine = LayoutEngine::default();
        let mut packets = HashMap::new();
        packets.insert(
            "t".to_string(),
            ContentPacket::new("t", "text", "Title", json!({ "text": "From packet" })),
        );
        let layout = json!([
            { "id": "h", "type": "Hero", "props": { "title": make_packet_ref("t") } }
        ]);

        let page = engine
            .render_json(&layout.to_string(), &packets, &RenderContext::default())
            .unwrap();
        assert!(page.blocks[0].node.text_content().contains("From packet"));
    }

    #[test]
    fn test_render_json_rejects_non_array() {
        let engine = LayoutEngine::default();
        let packets: HashMap<String, ContentPacket> = HashMap::new();
        assert!(engine
            .render_json("{}", &packets, &RenderContext::default())
            .is_err());
    }
}
