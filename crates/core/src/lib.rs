//! Core of the hubmark embedded Markdown view.
//!
//! Turns Markdown source into display-ready HTML (code blocks highlighted,
//! anchors guarded against navigating the embedding view away) and keeps the
//! authoritative source text synchronized to a host-side bridge. The
//! host-facing surfaces live in the `hubmark-wasm` and `hubmark-napi`
//! crates; everything here is host-agnostic.

mod error;
mod highlight;
mod page;
mod render;
mod rewrite;
mod view;

pub use error::RenderError;
pub use highlight::Highlighter;
pub use page::{CONTENT_ELEMENT_ID, Theme, document};
pub use render::{render_html, render_html_with, render_into};
pub use rewrite::{RewriteOptions, RewritePipe};
pub use view::{MarkdownView, TextBridge};

/// Returns the version of the core crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
