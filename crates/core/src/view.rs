//! The embedded Markdown view controller.
//!
//! Owns the authoritative Markdown source and its rendered HTML mirror, and
//! keeps an optional host bridge informed of the source after every
//! mutation. All operations are synchronous and run on the caller's thread;
//! the host's view event loop is the only expected caller.

use crate::error::RenderError;
use crate::highlight::Highlighter;
use crate::render;
use crate::rewrite::RewriteOptions;

/// Host-side receiver for the authoritative Markdown source.
///
/// The embedding reaches the view over some dynamic messaging channel; the
/// controller only ever needs this one call on it.
pub trait TextBridge {
    /// Receives the latest Markdown source after a mutation or on request.
    fn set_text(&self, text: &str);
}

/// Controller for an embedded Markdown view.
///
/// The source string is the single source of truth: the rendered container
/// and an attached bridge both reflect it after every operation. A view
/// starts empty, with navigation blocking enabled and no bridge.
pub struct MarkdownView {
    source: String,
    container: String,
    options: RewriteOptions,
    highlighter: Highlighter,
    bridge: Option<Box<dyn TextBridge>>,
}

impl MarkdownView {
    pub fn new() -> Self {
        Self {
            source: String::new(),
            container: String::new(),
            options: RewriteOptions::default(),
            highlighter: Highlighter::new(),
            bridge: None,
        }
    }

    /// Attaches the host bridge, replacing any previous one. Until a bridge
    /// is attached every push silently skips.
    pub fn attach_bridge(&mut self, bridge: Box<dyn TextBridge>) {
        self.bridge = Some(bridge);
    }

    /// Replaces the document with `text` and re-renders the container.
    ///
    /// Renders before swapping state, so a failed render leaves the previous
    /// document and container intact.
    pub fn write(&mut self, text: &str) -> Result<(), RenderError> {
        let rendered = self.render(text)?;
        self.source.clear();
        self.source.push_str(text);
        self.container = rendered;
        self.push_text();
        Ok(())
    }

    /// Appends `text` to the document and its rendering to the container.
    ///
    /// The chunk is rendered on its own, so `insert` boundaries are block
    /// boundaries as far as the Markdown dialect is concerned.
    pub fn insert(&mut self, text: &str) -> Result<(), RenderError> {
        let chunk = self.render(text)?;
        self.source.push_str(text);
        self.container.push_str(&chunk);
        self.push_text();
        Ok(())
    }

    /// Empties the document and the container.
    pub fn clear(&mut self) {
        self.source.clear();
        self.container.clear();
        self.push_text();
    }

    /// Pushes the current document to the bridge, if one is attached.
    ///
    /// Push-only: nothing is returned through this operation. In-process
    /// callers read [`MarkdownView::text`] instead.
    pub fn request_text(&self) {
        self.push_text();
    }

    /// Toggles anchor-click interception and re-renders the current document
    /// so the container immediately reflects the new setting.
    pub fn set_navigation_blocking(&mut self, enabled: bool) -> Result<(), RenderError> {
        if self.options.block_navigation == enabled {
            return Ok(());
        }
        self.options.block_navigation = enabled;

        if !self.source.is_empty() {
            let source = self.source.clone();
            self.container = self.render(&source)?;
        }
        Ok(())
    }

    /// Whether anchor clicks inside the container are currently intercepted.
    pub fn navigation_blocking(&self) -> bool {
        self.options.block_navigation
    }

    /// The authoritative Markdown source.
    pub fn text(&self) -> &str {
        &self.source
    }

    /// The rendered HTML mirror of the content container.
    pub fn container_html(&self) -> &str {
        &self.container
    }

    fn render(&self, text: &str) -> Result<String, RenderError> {
        render::render_html_with(text, self.highlighter, self.options)
    }

    fn push_text(&self) {
        if let Some(bridge) = &self.bridge {
            bridge.set_text(&self.source);
        }
    }
}

impl Default for MarkdownView {
    fn default() -> Self {
        Self::new()
    }
}
