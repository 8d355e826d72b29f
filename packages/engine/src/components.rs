//! Built-in storefront bricks.
//!
//! Markup is intentionally plain: class names only, no inline styling. The
//! storefront theme CSS targets the `sf-*` classes and the palette custom
//! properties set on the page root.

use crate::engine::RenderContext;
use crate::error::RenderResult;
use crate::props::{item_text, PropReader};
use crate::registry::{BlockKind, Component};
use crate::vdom::VNode;
use serde_json::Value;
use std::sync::Arc;
use storefront_layout::{Product, Props};

pub fn builtin(kind: BlockKind) -> Arc<dyn Component> {
    match kind {
        BlockKind::Header => Arc::new(Header),
        BlockKind::Hero => Arc::new(Hero),
        BlockKind::ProductGrid => Arc::new(ProductGrid),
        BlockKind::BenefitsGrid => Arc::new(FeatureGrid { class: "sf-benefits" }),
        BlockKind::InfoGrid => Arc::new(FeatureGrid { class: "sf-info" }),
        BlockKind::RichText => Arc::new(RichText),
        BlockKind::ImageBanner => Arc::new(ImageBanner),
        BlockKind::Newsletter => Arc::new(Newsletter),
        BlockKind::Footer => Arc::new(Footer),
    }
}

fn links(items: &[Value]) -> Vec<VNode> {
    items
        .iter()
        .filter_map(|item| {
            let label = item_text(item, "label")?;
            let href = item_text(item, "href").unwrap_or_else(|| "#".to_string());
            Some(VNode::text_element("a", label).with_attr("href", href))
        })
        .collect()
}

fn with_animation(node: VNode, props: &PropReader) -> VNode {
    match props.text("animation") {
        Some(animation) => node.with_attr("data-animation", animation),
        None => node,
    }
}

pub struct Header;

impl Component for Header {
    fn render(&self, props: &Props, _ctx: &RenderContext) -> RenderResult<VNode> {
        let props = PropReader::new(props);
        let store_name = props.text_or("storeName", "Store");

        let mut logo = VNode::element("a").with_class("sf-logo").with_attr("href", "/");
        logo = match props.text("logoUrl") {
            Some(src) => logo.with_child(
                VNode::element("img")
                    .with_attr("src", src)
                    .with_attr("alt", store_name),
            ),
            None => logo.with_child(VNode::text(store_name)),
        };

        Ok(VNode::element("header")
            .with_class("sf-header")
            .with_child(logo)
            .with_child(VNode::element("nav").with_children(links(props.items("links")))))
    }
}

pub struct Hero;

impl Component for Hero {
    fn render(&self, props: &Props, _ctx: &RenderContext) -> RenderResult<VNode> {
        let props = PropReader::new(props);
        let mut section = VNode::element("section").with_class("sf-hero");

        if let Some(image) = props.text("imageUrl") {
            section = section.with_attr("data-background", image);
        }
        section = section.with_child(VNode::text_element("h1", props.text_or("title", "Welcome")));
        if let Some(subtitle) = props.text("subtitle") {
            section = section.with_child(VNode::text_element("p", subtitle));
        }
        if let Some(cta) = props.text("ctaLabel") {
            section = section.with_child(
                VNode::text_element("a", cta)
                    .with_class("sf-cta")
                    .with_attr("href", props.text_or("ctaHref", "/products")),
            );
        }

        Ok(with_animation(section, &props))
    }
}

pub struct ProductGrid;

fn format_price(product: &Product) -> String {
    match product.currency.as_deref() {
        None | Some("USD") | Some("usd") => format!("${:.2}", product.price),
        Some(currency) => format!("{:.2} {}", product.price, currency.to_uppercase()),
    }
}

fn product_card(product: &Product) -> VNode {
    let href = format!("/products/{}", product.slug.as_deref().unwrap_or(&product.id));
    let mut card = VNode::element("a").with_class("sf-product").with_attr("href", href);

    if let Some(image) = &product.image_url {
        card = card.with_child(
            VNode::element("img")
                .with_attr("src", image.as_str())
                .with_attr("alt", product.name.as_str()),
        );
    }

    let card = card
        .with_child(VNode::text_element("h3", product.name.as_str()))
        .with_child(VNode::text_element("span", format_price(product)).with_class("sf-price"));

    VNode::element("li").with_child(card)
}

impl Component for ProductGrid {
    fn render(&self, props: &Props, _ctx: &RenderContext) -> RenderResult<VNode> {
        let reader = PropReader::new(props);
        let columns = reader.u64_or("columns", 4).clamp(1, 6);

        // malformed entries are skipped, not fatal
        let products: Vec<Product> = reader
            .items("products")
            .iter()
            .filter_map(|value| serde_json::from_value(value.clone()).ok())
            .collect();

        let mut section = VNode::element("section")
            .with_class("sf-product-grid")
            .with_attr("data-columns", columns.to_string());

        if let Some(title) = reader.text("title") {
            section = section.with_child(VNode::text_element("h2", title));
        }

        section = if products.is_empty() {
            section.with_child(VNode::text_element("p", "No products yet").with_class("sf-empty"))
        } else {
            section.with_child(VNode::element("ul").with_children(products.iter().map(product_card)))
        };

        Ok(with_animation(section, &reader))
    }
}

/// Shared by `BenefitsGrid` and `InfoGrid`: a titled grid of icon/title/text items
pub struct FeatureGrid {
    class: &'static str,
}

impl Component for FeatureGrid {
    fn render(&self, props: &Props, _ctx: &RenderContext) -> RenderResult<VNode> {
        let props = PropReader::new(props);
        let mut section = VNode::element("section").with_class(self.class);

        if let Some(title) = props.text("title") {
            section = section.with_child(VNode::text_element("h2", title));
        }

        let items = props.items("items").iter().map(|item| {
            let mut node = VNode::element("div").with_class("sf-feature");
            if let Some(icon) = item_text(item, "icon") {
                node = node.with_child(VNode::text_element("span", icon).with_class("sf-icon"));
            }
            if let Some(title) = item_text(item, "title") {
                node = node.with_child(VNode::text_element("h3", title));
            }
            if let Some(text) = item_text(item, "description").or_else(|| item_text(item, "text")) {
                node = node.with_child(VNode::text_element("p", text));
            }
            node
        });

        Ok(with_animation(section.with_children(items), &props))
    }
}

pub struct RichText;

impl Component for RichText {
    fn render(&self, props: &Props, _ctx: &RenderContext) -> RenderResult<VNode> {
        let props = PropReader::new(props);
        let content = props.text_or("content", "");

        let paragraphs = content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| VNode::text_element("p", p));

        let mut section = VNode::element("section").with_class("sf-rich-text");
        if let Some(heading) = props.text("heading") {
            section = section.with_child(VNode::text_element("h2", heading));
        }
        Ok(section.with_children(paragraphs))
    }
}

pub struct ImageBanner;

impl Component for ImageBanner {
    fn render(&self, props: &Props, _ctx: &RenderContext) -> RenderResult<VNode> {
        let props = PropReader::new(props);
        let mut figure = VNode::element("figure").with_class("sf-banner");

        if let Some(src) = props.text("imageUrl") {
            let img = VNode::element("img")
                .with_attr("src", src)
                .with_attr("alt", props.text_or("alt", ""));
            figure = match props.text("href") {
                Some(href) => figure.with_child(VNode::element("a").with_attr("href", href).with_child(img)),
                None => figure.with_child(img),
            };
        }
        if let Some(caption) = props.text("caption") {
            figure = figure.with_child(VNode::text_element("figcaption", caption));
        }
        Ok(with_animation(figure, &props))
    }
}

pub struct Newsletter;

impl Component for Newsletter {
    fn render(&self, props: &Props, _ctx: &RenderContext) -> RenderResult<VNode> {
        let props = PropReader::new(props);

        let form = VNode::element("form")
            .with_attr("method", "post")
            .with_attr("action", "/api/newsletter")
            .with_child(
                VNode::element("input")
                    .with_attr("type", "email")
                    .with_attr("name", "email")
                    .with_attr("placeholder", props.text_or("placeholder", "you@example.com")),
            )
            .with_child(
                VNode::text_element("button", props.text_or("buttonLabel", "Subscribe"))
                    .with_attr("type", "submit"),
            );

        Ok(VNode::element("section")
            .with_class("sf-newsletter")
            .with_child(VNode::text_element("h2", props.text_or("title", "Stay in the loop")))
            .with_child(form))
    }
}

pub struct Footer;

impl Component for Footer {
    fn render(&self, props: &Props, _ctx: &RenderContext) -> RenderResult<VNode> {
        let props = PropReader::new(props);
        let store_name = props.text_or("storeName", "Store");
        let copyright = props
            .text("copyright")
            .unwrap_or_else(|| format!("© {}", store_name));

        Ok(VNode::element("footer")
            .with_class("sf-footer")
            .with_child(VNode::element("nav").with_children(links(props.items("links"))))
            .with_child(VNode::text_element("small", copyright)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(kind: BlockKind, props: Value) -> VNode {
        let props = props.as_object().cloned().unwrap_or_default();
        builtin(kind).render(&props, &RenderContext::default()).unwrap()
    }

    #[test]
    fn test_every_builtin_renders_with_empty_props() {
        for kind in BlockKind::ALL {
            let node = render(kind, json!({}));
            assert!(node.tag().is_some(), "{} rendered no element", kind);
        }
    }

    #[test]
    fn test_hero_defaults_and_cta() {
        let node = render(BlockKind::Hero, json!({ "ctaLabel": "Shop" }));
        assert_eq!(node.children()[0].text_content(), "Welcome");
        assert_eq!(node.children()[1].attr("href"), Some("/products"));
    }

    #[test]
    fn test_product_grid_skips_malformed_products() {
        let node = render(
            BlockKind::ProductGrid,
            json!({
                "columns": 3,
                "products": [
                    { "id": "p1", "name": "Mug", "price": 12.5 },
                    { "bogus": true },
                ],
            }),
        );

        assert_eq!(node.attr("data-columns"), Some("3"));
        let list = &node.children()[0];
        assert_eq!(list.children().len(), 1);
        assert!(list.text_content().contains("$12.50"));
    }

    #[test]
    fn test_price_formatting() {
        let mut product = Product::new("p", "Tea", 4.0);
        assert_eq!(format_price(&product), "$4.00");
        product.currency = Some("eur".into());
        assert_eq!(format_price(&product), "4.00 EUR");
    }

    #[test]
    fn test_footer_copyright_defaults_to_store_name() {
        let node = render(BlockKind::Footer, json!({ "storeName": "Acme" }));
        assert!(node.text_content().contains("© Acme"));
    }
}
