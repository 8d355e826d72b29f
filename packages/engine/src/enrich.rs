//! Prop enrichment applied to every block before component dispatch.

use crate::engine::RenderContext;
use crate::registry::BlockKind;
use serde_json::Value;
use storefront_layout::{Block, Product, Props};

/// Props whose value `"theme"` defers to the store-wide theme tag
pub const THEME_KEYS: [&str; 3] = ["animation", "animationStyle", "themeStyle"];
pub const THEME_SENTINEL: &str = "theme";
pub const DEFAULT_COLUMNS: u64 = 4;

/// Props as the component will see them
pub fn enrich_block(block: &Block, ctx: &RenderContext) -> Props {
    let mut props = block.props.clone();
    substitute_theme(&mut props, ctx);

    if BlockKind::from_tag(&block.block_type) == Some(BlockKind::ProductGrid) {
        inject_products(&mut props, &ctx.products);
    }
    props
}

fn substitute_theme(props: &mut Props, ctx: &RenderContext) {
    for key in THEME_KEYS {
        if let Some(value) = props.get_mut(key) {
            if value.as_str() == Some(THEME_SENTINEL) {
                *value = Value::String(ctx.theme.as_str().to_string());
            }
        }
    }
}

fn inject_products(props: &mut Props, catalog: &[Product]) {
    let collection = props
        .get("collectionId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty() && *id != "all");
    let limit = props
        .get("limit")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(usize::MAX);

    let products: Vec<Value> = catalog
        .iter()
        .filter(|p| p.published)
        .filter(|p| collection.map_or(true, |c| p.belongs_to(c)))
        .take(limit)
        .filter_map(|p| serde_json::to_value(p).ok())
        .collect();

    props.insert("products".into(), Value::Array(products));
    props
        .entry("columns")
        .or_insert_with(|| Value::from(DEFAULT_COLUMNS));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_layout::ThemeTag;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("p1", "Mug", 12.0).in_collection("kitchen"),
            Product::new("p2", "Tee", 20.0).in_collection("apparel"),
            Product::new("p3", "Draft", 1.0).in_collection("kitchen").unpublished(),
        ]
    }

    fn ctx() -> RenderContext {
        RenderContext {
            theme: ThemeTag::Bold,
            products: catalog(),
            ..RenderContext::default()
        }
    }

    fn grid(props: Value) -> Block {
        Block::new("g", "ProductGrid", props.as_object().cloned().unwrap())
    }

    fn product_ids(props: &Props) -> Vec<String> {
        props["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_theme_sentinel_is_substituted() {
        let block = Block::new(
            "h",
            "Hero",
            json!({ "animation": "theme", "themeStyle": "fade", "title": "theme" })
                .as_object()
                .cloned()
                .unwrap(),
        );
        let props = enrich_block(&block, &ctx());

        assert_eq!(props["animation"], json!("bold"));
        assert_eq!(props["themeStyle"], json!("fade"));
        // only the listed keys are substituted
        assert_eq!(props["title"], json!("theme"));
    }

    #[test]
    fn test_all_collection_gets_every_published_product() {
        let props = enrich_block(&grid(json!({ "collectionId": "all" })), &ctx());
        assert_eq!(product_ids(&props), vec!["p1", "p2"]);
        assert_eq!(props["columns"], json!(4));
    }

    #[test]
    fn test_collection_filter_and_limit() {
        let props = enrich_block(&grid(json!({ "collectionId": "kitchen", "columns": 2 })), &ctx());
        assert_eq!(product_ids(&props), vec!["p1"]);
        assert_eq!(props["columns"], json!(2));

        let props = enrich_block(&grid(json!({ "limit": 1 })), &ctx());
        assert_eq!(product_ids(&props), vec!["p1"]);
    }

    #[test]
    fn test_other_blocks_get_no_products() {
        let block = Block::new("h", "Hero", Props::new());
        assert!(!enrich_block(&block, &ctx()).contains_key("products"));
    }
}
