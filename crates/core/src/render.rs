//! Markdown-to-HTML pipeline: parse, highlight code blocks, rewrite, write.

use std::io::Write;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::error::RenderError;
use crate::highlight::Highlighter;
use crate::rewrite::{RewriteOptions, RewritePipe};

/// Extension set matching the GitHub-flavored dialect the view displays.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Renders `input` into `writer`, streaming rewritten HTML chunk by chunk.
///
/// Malformed Markdown never fails; the parser renders it best-effort. The
/// only error sources are the rewriter and the destination writer.
pub fn render_into<W: Write>(
    writer: W,
    input: &str,
    highlighter: Highlighter,
    options: RewriteOptions,
) -> Result<W, RenderError> {
    let parser = Parser::new_ext(input, parser_options());
    let events = HighlightCodeBlocks {
        events: parser,
        highlighter,
    };

    let mut pipe = RewritePipe::new(writer, options);
    html::write_html_io(&mut pipe, events)?;
    Ok(pipe.into_inner()?)
}

/// Renders `input` to an HTML string with default options.
pub fn render_html(input: &str) -> Result<String, RenderError> {
    render_html_with(input, Highlighter::new(), RewriteOptions::default())
}

/// Renders `input` to an HTML string with the given highlighter and options.
pub fn render_html_with(
    input: &str,
    highlighter: Highlighter,
    options: RewriteOptions,
) -> Result<String, RenderError> {
    let bytes = render_into(Vec::new(), input, highlighter, options)?;
    Ok(String::from_utf8(bytes)?)
}

/// Event adapter that swaps every code block for its highlighted markup.
///
/// Buffers the text of one block at a time; everything else passes through
/// untouched.
struct HighlightCodeBlocks<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    events: I,
    highlighter: Highlighter,
}

impl<'a, I> Iterator for HighlightCodeBlocks<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let kind = match self.events.next()? {
            Event::Start(Tag::CodeBlock(kind)) => kind,
            other => return Some(other),
        };

        let language = match &kind {
            CodeBlockKind::Fenced(info) => fence_language(info),
            CodeBlockKind::Indented => None,
        };

        let mut code = String::new();
        for event in self.events.by_ref() {
            match event {
                Event::End(TagEnd::CodeBlock) => break,
                Event::Text(text) => code.push_str(&text),
                _ => {}
            }
        }

        let markup = self.highlighter.code_block(language.as_deref(), &code);
        Some(Event::Html(CowStr::from(markup)))
    }
}

/// First token of a fence info string, e.g. `rust` out of `rust,no_run`.
fn fence_language(info: &str) -> Option<String> {
    let token = info.split([',', ' ']).next().unwrap_or("").trim();
    (!token.is_empty()).then(|| token.to_owned())
}
