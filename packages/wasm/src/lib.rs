use std::fmt::Display;
use storefront_editor::{Direction, EditorStore};
use storefront_engine::{to_html, ComponentRegistry, HtmlOptions, LayoutEngine, RenderContext, RenderMode};
use storefront_layout::{
    parse_layout, validate_layout, ContentPacket, PacketMap, Product, Props, SequentialIds,
    StoreColors, ThemeTag,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_err(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Render inputs as they arrive from JavaScript, all JSON strings
struct RenderInput<'a> {
    packets: &'a str,
    colors: &'a str,
    theme: &'a str,
    products: &'a str,
    preview: bool,
}

impl RenderInput<'_> {
    fn context(&self) -> Result<RenderContext, String> {
        let colors: StoreColors = if self.colors.trim().is_empty() {
            StoreColors::default()
        } else {
            serde_json::from_str(self.colors).map_err(|e| format!("Invalid colors: {}", e))?
        };
        let theme = if self.theme.trim().is_empty() {
            ThemeTag::default()
        } else {
            self.theme.parse::<ThemeTag>().map_err(|e| e.to_string())?
        };
        let products: Vec<Product> = if self.products.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(self.products).map_err(|e| format!("Invalid products: {}", e))?
        };
        let mode = if self.preview {
            RenderMode::Preview
        } else {
            RenderMode::Production
        };

        Ok(RenderContext::new(colors, theme)
            .with_products(products)
            .with_mode(mode))
    }

    fn packets(&self) -> Result<PacketMap, String> {
        if self.packets.trim().is_empty() {
            return Ok(PacketMap::new());
        }
        let packets: Vec<ContentPacket> =
            serde_json::from_str(self.packets).map_err(|e| format!("Invalid packets: {}", e))?;
        Ok(packets.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    fn render(&self, layout_json: &str) -> Result<String, String> {
        let ctx = self.context()?;
        let packets = self.packets()?;
        let page = LayoutEngine::default()
            .render_json(layout_json, &packets, &ctx)
            .map_err(|e| e.to_string())?;
        Ok(to_html(&page, HtmlOptions::compact()))
    }
}

/// Render a stored layout to an HTML fragment.
///
/// `packets` is a JSON array of packets; `colors` and `products` are JSON;
/// empty strings fall back to defaults.
#[wasm_bindgen(js_name = renderLayout)]
pub fn render_layout_js(
    layout: &str,
    packets: &str,
    colors: &str,
    theme: &str,
    products: &str,
    preview: bool,
) -> Result<String, JsValue> {
    RenderInput {
        packets,
        colors,
        theme,
        products,
        preview,
    }
    .render(layout)
    .map_err(js_err)
}

/// Validate a stored layout against the built-in block types and return the issues as JSON
#[wasm_bindgen(js_name = validateLayout)]
pub fn validate_layout_js(layout: &str) -> Result<String, JsValue> {
    validate_layout_json(layout).map_err(js_err)
}

fn validate_layout_json(layout: &str) -> Result<String, String> {
    let blocks = parse_layout(layout).map_err(|e| e.to_string())?;
    let registry = ComponentRegistry::builtin();
    let issues = validate_layout(&blocks, |ty| registry.contains(ty), None);
    serde_json::to_string(&issues).map_err(|e| e.to_string())
}

fn parse_props(props: &str) -> Result<Props, String> {
    if props.trim().is_empty() {
        return Ok(Props::new());
    }
    serde_json::from_str(props).map_err(|e| format!("Invalid props: {}", e))
}

fn parse_direction(direction: &str) -> Result<Direction, String> {
    match direction {
        "up" => Ok(Direction::Up),
        "down" => Ok(Direction::Down),
        other => Err(format!("Unknown direction: {}", other)),
    }
}

/// Editor state for one page, owned by the JavaScript side
#[wasm_bindgen]
pub struct EditorHandle {
    store: EditorStore,
}

#[wasm_bindgen]
impl EditorHandle {
    /// Open a layout for editing. With a `seed` (e.g. `tenant/page`) new block
    /// ids are deterministic; without one they are random UUIDs.
    #[wasm_bindgen(constructor)]
    pub fn new(layout: &str, seed: Option<String>) -> Result<EditorHandle, JsValue> {
        let blocks = if layout.trim().is_empty() {
            Vec::new()
        } else {
            parse_layout(layout).map_err(js_err)?
        };
        let store = match seed {
            Some(seed) => EditorStore::with_id_generator(blocks, SequentialIds::new(&seed)),
            None => EditorStore::new(blocks),
        };
        Ok(EditorHandle { store })
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.store.to_json().map_err(js_err)
    }

    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, layout: &str) -> Result<(), JsValue> {
        self.store.load_json(layout).map_err(js_err)
    }

    #[wasm_bindgen(js_name = addBlock)]
    pub fn add_block(&mut self, block_type: &str, props: &str) -> Result<String, JsValue> {
        let props = parse_props(props).map_err(js_err)?;
        Ok(self.store.add_block(block_type, props))
    }

    #[wasm_bindgen(js_name = insertBlock)]
    pub fn insert_block(&mut self, index: usize, block_type: &str, props: &str) -> Result<String, JsValue> {
        let props = parse_props(props).map_err(js_err)?;
        Ok(self.store.insert_block(index, block_type, props))
    }

    /// `direction` is `"up"` or `"down"`
    #[wasm_bindgen(js_name = moveBlock)]
    pub fn move_block(&mut self, id: &str, direction: &str) -> Result<(), JsValue> {
        let direction = parse_direction(direction).map_err(js_err)?;
        self.store.move_block(id, direction);
        Ok(())
    }

    #[wasm_bindgen(js_name = updateBlockProps)]
    pub fn update_block_props(&mut self, id: &str, props: &str) -> Result<(), JsValue> {
        let props = parse_props(props).map_err(js_err)?;
        self.store.update_block_props(id, &props);
        Ok(())
    }

    #[wasm_bindgen(js_name = removeBlock)]
    pub fn remove_block(&mut self, id: &str) {
        self.store.remove_block(id);
    }

    #[wasm_bindgen(js_name = selectBlock)]
    pub fn select_block(&mut self, id: Option<String>) {
        self.store.select_block(id.as_deref());
    }

    #[wasm_bindgen(getter, js_name = selectedBlockId)]
    pub fn selected_block_id(&self) -> Option<String> {
        self.store.selected_block_id().map(str::to_string)
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    #[wasm_bindgen(getter, js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    #[wasm_bindgen(getter, js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Label of the edit the next undo reverts, e.g. `"add block"`
    #[wasm_bindgen(getter, js_name = undoLabel)]
    pub fn undo_label(&self) -> Option<String> {
        self.store.undo_action().map(|a| a.label().to_string())
    }

    #[wasm_bindgen(getter, js_name = redoLabel)]
    pub fn redo_label(&self) -> Option<String> {
        self.store.redo_action().map(|a| a.label().to_string())
    }

    #[wasm_bindgen(getter, js_name = historyIndex)]
    pub fn history_index(&self) -> usize {
        self.store.history_index()
    }

    /// Bumped on every observable change; cheap to poll from a render loop
    #[wasm_bindgen(getter)]
    pub fn version(&self) -> f64 {
        self.store.version() as f64
    }

    /// Render the current blocks in preview mode
    pub fn render(&self, packets: &str, colors: &str, theme: &str, products: &str) -> Result<String, JsValue> {
        let layout = self.store.to_json().map_err(js_err)?;
        RenderInput {
            packets,
            colors,
            theme,
            products,
            preview: true,
        }
        .render(&layout)
        .map_err(js_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"[
        {"id":"hero","type":"Hero","props":{"title":{"$packet":"hero-title"},"animation":"theme"}},
        {"id":"grid","type":"ProductGrid","props":{"collectionId":"all"}}
    ]"#;

    const PACKETS: &str = r#"[{"id":"hero-title","type":"text","name":"Hero","data":{"text":"Summer Sale"}}]"#;

    #[test]
    fn test_render_layout() {
        let input = RenderInput {
            packets: PACKETS,
            colors: "",
            theme: "bold",
            products: r#"[{"id":"p1","name":"Mug","price":9.5}]"#,
            preview: false,
        };

        let html = input.render(LAYOUT).unwrap();
        assert!(html.contains("Summer Sale"));
        assert!(html.contains("data-animation=\"bold\""));
        assert!(html.contains("Mug"));
    }

    #[test]
    fn test_render_rejects_unknown_theme() {
        let input = RenderInput {
            packets: "",
            colors: "",
            theme: "gothic",
            products: "",
            preview: false,
        };
        assert!(input.render(LAYOUT).is_err());
    }

    #[test]
    fn test_validate_layout() {
        let issues = validate_layout_json(r#"[{"id":"a","type":"Carousel"}]"#).unwrap();
        assert!(issues.contains("Carousel"));
        assert_eq!(validate_layout_json("[]").unwrap(), "[]");
    }

    #[test]
    fn test_editor_handle_edits() {
        let mut editor = EditorHandle::new(LAYOUT, Some("acme/home".into())).unwrap();
        let id = editor.add_block("Newsletter", "").unwrap();
        assert!(id.ends_with("-1"));

        editor.move_block(&id, "up").unwrap();
        assert!(editor.can_undo());
        assert_eq!(editor.undo_label().as_deref(), Some("move block"));

        assert!(editor.undo());
        assert!(editor.undo());
        assert!(!editor.can_undo());
        assert!(editor.redo());
        assert_eq!(editor.history_index(), 1);

        let html = editor.render(PACKETS, "", "", "").unwrap();
        assert!(html.contains("Summer Sale"));
        assert!(html.contains(&format!("data-block-id=\"{}\"", id)));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    use super::*;

    #[wasm_bindgen_test]
    fn test_wasm_render_layout() {
        let layout = r#"[{"id":"f","type":"Footer","props":{"storeName":"Acme"}}]"#;
        let html = render_layout_js(layout, "", "", "", "", false).unwrap();
        assert!(html.contains("data-block-id=\"f\""));

        assert!(render_layout_js(layout, "", "", "gothic", "", false).is_err());
    }

    #[wasm_bindgen_test]
    fn test_wasm_editor_handle_random_ids() {
        let mut editor = EditorHandle::new("", None).unwrap();
        let id = editor.add_block("Hero", "{}").unwrap();
        assert_eq!(id.len(), 36);
        assert!(editor.move_block(&id, "sideways").is_err());
        assert!(editor.can_undo());
    }
}
