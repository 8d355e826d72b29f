//! Deterministic HTML serialization of rendered pages.

use crate::vdom::{RenderedPage, VNode};

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Wrap in `<!DOCTYPE html>` / `<html>` / `<body>`
    pub full_document: bool,
    /// Document title (full documents only)
    pub title: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            full_document: false,
            title: "Storefront".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    pub fn document(mut self) -> Self {
        self.full_document = true;
        self
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Serialize a rendered page
pub fn to_html(page: &RenderedPage, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    if ctx.options.full_document {
        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();
        ctx.add_line("<head>");
        ctx.indent();
        ctx.add_line("<meta charset=\"utf-8\">");
        let title = format!("<title>{}</title>", escape_text(&ctx.options.title));
        ctx.add_line(&title);
        ctx.dedent();
        ctx.add_line("</head>");
        ctx.add_line("<body>");
        ctx.indent();
    }

    write_node(&page.root(), &mut ctx);

    if ctx.options.full_document {
        ctx.dedent();
        ctx.add_line("</body>");
        ctx.dedent();
        ctx.add_line("</html>");
    }

    ctx.buffer
}

/// Serialize a single node
pub fn node_to_html(node: &VNode, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    write_node(node, &mut ctx);
    ctx.buffer
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Text { content } => ctx.add_line(&escape_text(content)),
        VNode::Error { message, block_id } => {
            let id_attr = block_id
                .as_deref()
                .map(|id| format!(" data-block-id=\"{}\"", escape_attr(id)))
                .unwrap_or_default();
            ctx.add_line(&format!(
                "<div class=\"sf-block-error\" role=\"alert\"{}>{}</div>",
                id_attr,
                escape_text(message)
            ));
        }
        VNode::Element {
            tag,
            attributes,
            children,
        } => {
            let mut open = format!("<{}", tag);
            for (key, value) in attributes {
                open.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
            }
            open.push('>');

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                ctx.add_line(&open);
                return;
            }

            // single text child stays on one line
            if let [VNode::Text { content }] = children.as_slice() {
                ctx.add_line(&format!("{}{}</{}>", open, escape_text(content), tag));
                return;
            }

            if children.is_empty() {
                ctx.add_line(&format!("{}</{}>", open, tag));
                return;
            }

            ctx.add_line(&open);
            ctx.indent();
            for child in children {
                write_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }
    }
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
