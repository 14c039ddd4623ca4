//! Classed-HTML syntax highlighting for rendered code blocks.
//!
//! Mirrors the highlight.js contract the view historically exposed: every
//! code block becomes `<pre><code class="hljs language-X">` markup, span
//! classes carry a `hl-` prefix, and the matching stylesheet is generated
//! from the syntect theme of the active page theme.

use std::sync::OnceLock;

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::page::Theme;

/// Span class prefix; keeps generated classes out of the host page's namespace.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Highlights code blocks into classed `<pre><code>` markup.
#[derive(Clone, Copy)]
pub struct Highlighter {
    syntaxes: &'static SyntaxSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: syntax_set(),
        }
    }

    /// Renders one code block as a `<pre><code>` element with classed spans.
    ///
    /// An unrecognized language tag falls back to first-line detection, then
    /// to plain text; a failure inside the highlighter degrades to escaped,
    /// unstyled code. Neither case is an error for the caller.
    pub fn code_block(&self, language: Option<&str>, code: &str) -> String {
        let syntax = self.resolve(language, code);
        let body = match self.classed_body(syntax, code) {
            Ok(body) => body,
            Err(err) => {
                log::warn!("highlighting failed for {}: {err}", syntax.name);
                escape_html(code)
            }
        };

        let mut out = String::with_capacity(body.len() + 48);
        out.push_str("<pre><code class=\"hljs");
        if let Some(lang) = language {
            out.push_str(" language-");
            out.push_str(&escape_html(lang));
        }
        out.push_str("\">");
        out.push_str(&body);
        out.push_str("</code></pre>\n");
        out
    }

    fn resolve(&self, language: Option<&str>, code: &str) -> &'static SyntaxReference {
        if let Some(lang) = language {
            if let Some(syntax) = self.syntaxes.find_syntax_by_token(lang) {
                return syntax;
            }
            if let Some(syntax) = self.syntaxes.find_syntax_by_extension(lang) {
                return syntax;
            }
            log::debug!("no syntax definition for language tag {lang:?}, detecting instead");
        }

        let first_line = code.lines().next().unwrap_or("");
        self.syntaxes
            .find_syntax_by_first_line(first_line)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn classed_body(
        &self,
        syntax: &SyntaxReference,
        code: &str,
    ) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Stylesheet for the classed spans, generated from the syntect theme that
/// matches the page theme. Generation problems yield an empty stylesheet
/// rather than an error; code still renders, just unstyled.
pub(crate) fn highlight_css(theme: Theme) -> String {
    static THEMES: OnceLock<ThemeSet> = OnceLock::new();
    let themes = THEMES.get_or_init(ThemeSet::load_defaults);

    let selected = themes
        .themes
        .get(theme.syntect_theme())
        .or_else(|| themes.themes.values().next());
    let Some(selected) = selected else {
        return String::new();
    };

    css_for_theme_with_class_style(selected, CLASS_STYLE).unwrap_or_else(|err| {
        log::warn!("could not generate highlight css: {err}");
        String::new()
    })
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut start = 0;

    for (index, byte) in text.bytes().enumerate() {
        let entity = match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        escaped.push_str(&text[start..index]);
        escaped.push_str(entity);
        start = index + 1;
    }

    escaped.push_str(&text[start..]);
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_language_produces_classed_spans() {
        let highlighter = Highlighter::new();
        let html = highlighter.code_block(Some("rust"), "fn main() {}\n");

        assert!(html.starts_with("<pre><code class=\"hljs language-rust\">"));
        assert!(html.contains("class=\"hl-"));
    }

    #[test]
    fn unknown_language_degrades_without_error() {
        let highlighter = Highlighter::new();
        let html = highlighter.code_block(Some("no-such-lang"), "just text\n");

        assert!(html.contains("language-no-such-lang"));
        assert!(html.contains("just text"));
    }

    #[test]
    fn indented_block_has_no_language_class() {
        let highlighter = Highlighter::new();
        let html = highlighter.code_block(None, "plain\n");

        assert!(html.starts_with("<pre><code class=\"hljs\">"));
    }

    #[test]
    fn code_content_is_escaped_or_spanned() {
        let highlighter = Highlighter::new();
        let html = highlighter.code_block(Some("html"), "<script>alert(1)</script>\n");

        assert!(!html.contains("<script>"));
    }

    #[test]
    fn highlight_css_is_nonempty_for_both_themes() {
        assert!(highlight_css(Theme::Dark).contains(".hl-"));
        assert!(highlight_css(Theme::Light).contains(".hl-"));
    }

    #[test]
    fn escape_html_covers_special_characters() {
        assert_eq!(escape_html("&<>\"'"), "&amp;&lt;&gt;&quot;&#39;");
        assert_eq!(escape_html("no specials"), "no specials");
    }
}
