//! # Storefront Engine
//!
//! Turns a block sequence into a virtual DOM page and serializes it to HTML.
//!
//! ```text
//! Block[] ──hydrate──▶ Block[] ──enrich──▶ Props ──Component──▶ VNode ──to_html──▶ String
//!           (packets)           (theme,                (registry)
//!                                products)
//! ```
//!
//! Rendering a page never fails as a whole. Unknown block types are skipped
//! and a failing component only affects its own block (see [`RenderMode`]).

pub mod components;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod html;
pub mod props;
pub mod registry;
pub mod vdom;

pub use engine::{LayoutEngine, RenderContext, RenderMode};
pub use enrich::enrich_block;
pub use error::{RenderError, RenderResult};
pub use html::{node_to_html, to_html, HtmlOptions};
pub use props::PropReader;
pub use registry::{BlockKind, Component, ComponentRegistry};
pub use vdom::{RenderedBlock, RenderedPage, VNode};
