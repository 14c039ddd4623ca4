//! Streaming HTML rewriter that guards rendered content before it reaches
//! the embedded view.
//!
//! Runs over every rendered chunk, so re-renders re-apply the guards by
//! construction; there is no separate "install interception" step to forget.

use std::borrow::Cow;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use lol_html::errors::RewritingError;
use lol_html::{ElementContentHandlers, HtmlRewriter, OutputSink, Selector, Settings, element};

/// Inline activation guard written onto every anchor while navigation
/// blocking is enabled. Suppresses the default navigation and points the
/// user at the explicit opt-out.
pub const NAVIGATION_GUARD: &str = "event.preventDefault(); alert('You cannot navigate from \
     here. If you really need embedded navigation, call setNavigationBlocking(false).'); \
     return false;";

/// Flags controlling how rendered HTML is rewritten before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Intercept anchor activation inside the content container.
    pub block_navigation: bool,
    /// Default missing `loading` attributes on `<img>` tags to `lazy`.
    pub enforce_img_loading_lazy: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            block_navigation: true,
            enforce_img_loading_lazy: true,
        }
    }
}

/// Implements [`Write`] so the render pipeline can push raw HTML straight
/// into lol_html.
///
/// The destination writer is shared through a single `Rc<RefCell<Option<W>>>`,
/// the only heap allocation needed to satisfy lol_html's `OutputSink` trait
/// without buffering rewritten output.
pub struct RewritePipe<W: Write> {
    rewriter: Option<HtmlRewriter<'static, SinkProxy<W>>>,
    destination: Rc<RefCell<Option<W>>>,
    sink_error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> RewritePipe<W> {
    /// Creates a pipe that applies `options` and forwards rewritten output
    /// into `writer`.
    pub fn new(writer: W, options: RewriteOptions) -> Self {
        let destination = Rc::new(RefCell::new(Some(writer)));
        let sink_error = Rc::new(RefCell::new(None));
        let sink = SinkProxy::new(Rc::clone(&destination), Rc::clone(&sink_error));
        let rewriter = HtmlRewriter::new(options.into_settings(), sink);

        Self {
            rewriter: Some(rewriter),
            destination,
            sink_error,
        }
    }

    /// Consumes the pipe, lets lol_html flush, and returns the destination
    /// writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.finalize_if_needed()?;

        let cell = Rc::try_unwrap(self.destination)
            .map_err(|_| io::Error::other("rewriter still borrowed"))?;

        cell.into_inner()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "writer missing"))
    }

    fn finalize_if_needed(&mut self) -> io::Result<()> {
        if let Some(rewriter) = self.rewriter.take() {
            rewriter.end().map_err(rewriting_error_to_io)?;
        }

        Self::take_sink_error(&self.sink_error)
    }

    fn take_sink_error(cell: &Rc<RefCell<Option<io::Error>>>) -> io::Result<()> {
        if let Some(err) = cell.borrow_mut().take() {
            Err(err)
        } else {
            Ok(())
        }
    }
}

impl<W: Write> Write for RewritePipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let rewriter = self
            .rewriter
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "rewriter finalized"))?;

        rewriter.write(buf).map_err(rewriting_error_to_io)?;
        Self::take_sink_error(&self.sink_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.finalize_if_needed()
    }
}

impl RewriteOptions {
    fn into_settings(self) -> Settings<'static, 'static> {
        let mut settings = Settings::default();
        let mut handlers = Vec::new();

        if self.block_navigation {
            handlers.push(navigation_guard_handler());
        }
        if self.enforce_img_loading_lazy {
            handlers.push(lazy_img_handler());
        }

        settings.element_content_handlers = handlers;
        settings
    }
}

fn navigation_guard_handler() -> (
    Cow<'static, Selector>,
    ElementContentHandlers<'static>,
) {
    element!("a[href]", |el| {
        el.set_attribute("onclick", NAVIGATION_GUARD)?;

        Ok(())
    })
}

fn lazy_img_handler() -> (
    Cow<'static, Selector>,
    ElementContentHandlers<'static>,
) {
    element!("img", |el| {
        if el.get_attribute("loading").is_none() {
            el.set_attribute("loading", "lazy")?;
        }

        Ok(())
    })
}

fn rewriting_error_to_io(err: RewritingError) -> io::Error {
    io::Error::other(err)
}

struct SinkProxy<W: Write> {
    destination: Rc<RefCell<Option<W>>>,
    sink_error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> SinkProxy<W> {
    fn new(
        destination: Rc<RefCell<Option<W>>>,
        sink_error: Rc<RefCell<Option<io::Error>>>,
    ) -> Self {
        SinkProxy {
            destination,
            sink_error,
        }
    }
}

impl<W: Write> OutputSink for SinkProxy<W> {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }

        if self.sink_error.borrow().is_some() {
            return;
        }

        let mut borrow = self.destination.borrow_mut();

        if let Some(writer) = borrow.as_mut() {
            if let Err(err) = writer.write_all(chunk) {
                *self.sink_error.borrow_mut() = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rewrite(options: RewriteOptions, input: &[u8]) -> String {
        let mut pipe = RewritePipe::new(Vec::new(), options);
        pipe.write_all(input).expect("stream write should succeed");
        String::from_utf8(pipe.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn guards_anchor_activation() {
        let output = rewrite(
            RewriteOptions::default(),
            br#"<a href="https://example.com">out</a>"#,
        );

        assert!(output.contains("onclick=\""));
        assert!(output.contains("preventDefault"));
        assert!(output.contains("href=\"https://example.com\""));
    }

    #[test]
    fn leaves_anchors_alone_when_blocking_disabled() {
        let options = RewriteOptions {
            block_navigation: false,
            ..RewriteOptions::default()
        };
        let output = rewrite(options, br#"<a href="https://example.com">out</a>"#);

        assert!(!output.contains("onclick"));
    }

    #[test]
    fn skips_anchors_without_href() {
        let output = rewrite(RewriteOptions::default(), br#"<a name="top">anchor</a>"#);

        assert!(!output.contains("onclick"));
    }

    #[test]
    fn adds_lazy_loading_when_missing() {
        let output = rewrite(RewriteOptions::default(), br#"<img src="/hero.png">"#);

        assert!(output.contains("loading=\"lazy\""));
    }

    #[test]
    fn preserves_existing_loading_attribute() {
        let output = rewrite(
            RewriteOptions::default(),
            br#"<img src="/hero.png" loading="eager">"#,
        );

        assert!(output.contains("loading=\"eager\""));
    }
}
