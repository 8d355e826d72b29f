//! Type tag → component dispatch.
//!
//! The built-in bricks form a closed set (`BlockKind`), but the registry
//! itself is open: integrations can register extra tags or replace a
//! built-in implementation.

use crate::components;
use crate::engine::RenderContext;
use crate::error::RenderResult;
use crate::vdom::VNode;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use storefront_layout::Props;

/// A renderable block implementation
pub trait Component: Send + Sync {
    fn render(&self, props: &Props, ctx: &RenderContext) -> RenderResult<VNode>;
}

impl<F> Component for F
where
    F: Fn(&Props, &RenderContext) -> RenderResult<VNode> + Send + Sync,
{
    fn render(&self, props: &Props, ctx: &RenderContext) -> RenderResult<VNode> {
        self(props, ctx)
    }
}

/// Built-in block types, as produced by the admin UI and AI generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Header,
    Hero,
    ProductGrid,
    BenefitsGrid,
    InfoGrid,
    RichText,
    ImageBanner,
    Newsletter,
    Footer,
}

impl BlockKind {
    pub const ALL: [BlockKind; 9] = [
        BlockKind::Header,
        BlockKind::Hero,
        BlockKind::ProductGrid,
        BlockKind::BenefitsGrid,
        BlockKind::InfoGrid,
        BlockKind::RichText,
        BlockKind::ImageBanner,
        BlockKind::Newsletter,
        BlockKind::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Header => "Header",
            BlockKind::Hero => "Hero",
            BlockKind::ProductGrid => "ProductGrid",
            BlockKind::BenefitsGrid => "BenefitsGrid",
            BlockKind::InfoGrid => "InfoGrid",
            BlockKind::RichText => "RichText",
            BlockKind::ImageBanner => "ImageBanner",
            BlockKind::Newsletter => "Newsletter",
            BlockKind::Footer => "Footer",
        }
    }

    /// Exact, case-sensitive match on the stored tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Arc<dyn Component>>,
}

impl ComponentRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in brick
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in BlockKind::ALL {
            registry.register_arc(kind.as_str(), components::builtin(kind));
        }
        registry
    }

    pub fn register(&mut self, tag: impl Into<String>, component: impl Component + 'static) {
        self.register_arc(tag, Arc::new(component));
    }

    pub fn register_arc(&mut self, tag: impl Into<String>, component: Arc<dyn Component>) {
        self.components.insert(tag.into(), component);
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<dyn Component>> {
        self.components.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.components.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.components.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_covers_every_kind() {
        let registry = ComponentRegistry::builtin();
        for kind in BlockKind::ALL {
            assert!(registry.contains(kind.as_str()), "missing {}", kind);
        }
        assert!(!registry.contains("UnknownWidget"));
    }

    #[test]
    fn test_block_kind_tags_are_case_sensitive() {
        assert_eq!(BlockKind::from_tag("ProductGrid"), Some(BlockKind::ProductGrid));
        assert_eq!(BlockKind::from_tag("productgrid"), None);
    }

    #[test]
    fn test_register_closure_component() {
        let mut registry = ComponentRegistry::new();
        registry.register("Banner", |_: &Props, _: &RenderContext| -> RenderResult<VNode> {
            Ok(VNode::text_element("marquee", "Sale"))
        });
        assert_eq!(registry.tags(), vec!["Banner"]);
    }
}
