//! Page shell assembly: the HTML document hosts load into their web view.
//!
//! The shell carries the theme stylesheet, the generated highlight
//! stylesheet and the single content container the controller renders into.

use std::str::FromStr;

use crate::error::RenderError;
use crate::highlight;

/// Identifier of the render target inside the page shell. The controller
/// owns the container's entire subtree; hosts must not mutate it.
pub const CONTENT_ELEMENT_ID: &str = "content";

/// Built-in GitHub-like color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    fn stylesheet(self) -> &'static str {
        match self {
            Theme::Dark => include_str!("assets/theme-dark.css"),
            Theme::Light => include_str!("assets/theme-light.css"),
        }
    }

    /// Name of the syntect theme the highlight stylesheet is generated from.
    pub(crate) fn syntect_theme(self) -> &'static str {
        match self {
            Theme::Dark => "base16-ocean.dark",
            Theme::Light => "InspiredGitHub",
        }
    }
}

impl FromStr for Theme {
    type Err = RenderError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(RenderError::UnknownTheme(other.to_owned())),
        }
    }
}

/// Builds the complete HTML document a host loads into its web view before
/// rendering anything: styles in the head, an empty content container in the
/// body.
///
/// `custom_css` replaces the built-in theme stylesheet when given; the
/// highlight stylesheet always comes from the theme.
pub fn document(theme: Theme, custom_css: Option<&str>) -> String {
    let base = custom_css.unwrap_or(theme.stylesheet());
    let highlight = highlight::highlight_css(theme);

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <style>\n{base}\n{highlight}</style>\n\
         </head>\n\
         <body>\n\
         <div id=\"{CONTENT_ELEMENT_ID}\"></div>\n\
         </body>\n\
         </html>\n"
    )
}
