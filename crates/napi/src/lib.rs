#![deny(missing_docs)]
//! Node.js bindings that surface the hubmark renderer to native hosts.

use napi_derive::napi;

/// Returns the version string reported by the core crate.
#[napi]
pub fn version() -> String {
    hubmark_core::version().to_string()
}

/// Renders markdown into HTML with code highlighting and link guarding
/// applied.
#[napi]
pub fn render_html(input: String) -> napi::Result<String> {
    hubmark_core::render_html(&input).map_err(|err| napi::Error::from_reason(err.to_string()))
}
