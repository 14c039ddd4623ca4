use std::io;

use thiserror::Error;

/// Errors surfaced by the rendering pipeline.
///
/// Highlighting problems and absent bridges are not represented here; both
/// degrade locally (plain code, skipped push) instead of failing the call.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The streaming rewriter or its destination writer failed.
    #[error("failed to stream rendered html")]
    Io(#[from] io::Error),

    /// The rewriter emitted bytes that are not valid UTF-8.
    #[error("rendered html is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A theme name other than the built-in ones.
    #[error("unknown theme {0:?}, expected \"dark\" or \"light\"")]
    UnknownTheme(String),
}
