//! Browser-side bindings for the embedded Markdown view.
//!
//! The host loads this module into its web view, builds a view with a render
//! sink that owns the content container, and wires its messaging channel to
//! [`MarkdownView::connect_bridge`] and [`MarkdownView::text_requested`].
//! Typical glue:
//!
//! ```js
//! const container = document.getElementById("content");
//! const view = new MarkdownView((html) => { container.innerHTML = html; });
//! channel.objects.bridge.textRequested.connect(() => view.textRequested());
//! view.connectBridge((text) => channel.objects.bridge.setText(text));
//! ```

use hubmark_core::{TextBridge, Theme};
use js_sys::Function;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// Flags the renderer as ready for host calls.
///
/// Runs once when the module is instantiated; hosts poll the
/// `markdownRendererReady` global before issuing operations.
#[wasm_bindgen(start)]
pub fn mark_renderer_ready() {
    let _ = js_sys::Reflect::set(
        &js_sys::global(),
        &JsValue::from_str("markdownRendererReady"),
        &JsValue::TRUE,
    );
}

/// Renders markdown into an HTML `String` with default options.
#[wasm_bindgen(js_name = render_html)]
pub fn render_html(input: &str) -> Result<String, JsError> {
    hubmark_core::render_html(input).map_err(to_js_error)
}

/// Builds the page shell the host loads into its web view, for the given
/// theme (`"dark"` or `"light"`) and optional replacement stylesheet.
#[wasm_bindgen(js_name = documentShell)]
pub fn document_shell(theme: &str, custom_css: Option<String>) -> Result<String, JsError> {
    let theme: Theme = theme.parse().map_err(to_js_error)?;
    Ok(hubmark_core::document(theme, custom_css.as_deref()))
}

/// The embedded Markdown view, driven by the host through the exported
/// methods and synchronized back through the bridge callback.
#[wasm_bindgen]
pub struct MarkdownView {
    view: hubmark_core::MarkdownView,
    render_sink: Function,
}

#[wasm_bindgen]
impl MarkdownView {
    /// Creates an empty view. `render_sink` receives the full container HTML
    /// after every mutation; the host glue assigns it to the content
    /// container.
    #[wasm_bindgen(constructor)]
    pub fn new(render_sink: Function) -> MarkdownView {
        MarkdownView {
            view: hubmark_core::MarkdownView::new(),
            render_sink,
        }
    }

    /// Attaches the host bridge. `set_text` receives the Markdown source
    /// after every mutation and on every `getText` call.
    #[wasm_bindgen(js_name = connectBridge)]
    pub fn connect_bridge(&mut self, set_text: Function) {
        self.view.attach_bridge(Box::new(CallbackBridge { set_text }));
    }

    /// Replaces the document and re-renders the container.
    pub fn write(&mut self, text: &str) -> Result<(), JsError> {
        self.view.write(text).map_err(to_js_error)?;
        self.sync_container()
    }

    /// Appends to the document and to the rendered container.
    pub fn insert(&mut self, text: &str) -> Result<(), JsError> {
        self.view.insert(text).map_err(to_js_error)?;
        self.sync_container()
    }

    /// Empties the document and the container.
    pub fn clear(&mut self) -> Result<(), JsError> {
        self.view.clear();
        self.sync_container()
    }

    /// Pushes the current document to the bridge, if connected. Push-only;
    /// nothing is returned.
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) {
        self.view.request_text();
    }

    /// Entry point for the host-originated "text requested" notification.
    #[wasm_bindgen(js_name = textRequested)]
    pub fn text_requested(&self) {
        self.view.request_text();
    }

    /// Toggles anchor-click interception inside the container.
    #[wasm_bindgen(js_name = setNavigationBlocking)]
    pub fn set_navigation_blocking(&mut self, enabled: bool) -> Result<(), JsError> {
        self.view
            .set_navigation_blocking(enabled)
            .map_err(to_js_error)?;
        self.sync_container()
    }
}

impl MarkdownView {
    fn sync_container(&self) -> Result<(), JsError> {
        self.render_sink
            .call1(
                &JsValue::UNDEFINED,
                &JsValue::from_str(self.view.container_html()),
            )
            .map_err(js_callback_error)?;
        Ok(())
    }
}

struct CallbackBridge {
    set_text: Function,
}

impl TextBridge for CallbackBridge {
    // Bridge pushes degrade to a no-op when the callback throws.
    fn set_text(&self, text: &str) {
        let _ = self
            .set_text
            .call1(&JsValue::UNDEFINED, &JsValue::from_str(text));
    }
}

fn to_js_error<E: ToString>(err: E) -> JsError {
    JsError::new(&err.to_string())
}

fn js_callback_error(err: JsValue) -> JsError {
    let message = err
        .as_string()
        .or_else(|| {
            js_sys::JSON::stringify(&err)
                .ok()
                .and_then(|s| s.as_string())
        })
        .unwrap_or_else(|| "render sink threw".to_string());
    JsError::new(&message)
}
