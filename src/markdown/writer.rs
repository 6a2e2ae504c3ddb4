//! Output sink for the Markdown renderer.
//!
//! The writer owns two pieces of layout state so the renderer never has to
//! track columns itself:
//!
//! - **Linefeed runs**: [`Writer::ensure_linefeeds`] requests a minimum
//!   number of consecutive linefeeds before the next content. Requests
//!   accumulate (the largest wins) and are only materialized when real
//!   content follows, so adjacent blocks never produce more blank lines than
//!   either of them asked for.
//! - **Indentation**: a stack of line prefixes (list continuation indent,
//!   blockquote markers). Every linefeed written outside verbatim mode is
//!   followed by the current prefix.
//!
//! Verbatim mode is used for passthrough HTML and code: the bytes go out as
//! they are, without prefixes.

use std::io;

use crate::error::Result;

use super::UrlRewriter;

/// Markdown output buffer with deferred linefeeds and indentation.
pub struct Writer<'a> {
    out: Vec<u8>,
    /// Verbatim nesting depth.
    verbatim: usize,
    /// Consecutive linefeeds at the end of the output. The start of the
    /// output counts as an unbounded run.
    lf_run: usize,
    /// Pending linefeed request.
    lf_target: usize,
    /// Indent prefixes, each already concatenated with its ancestors.
    indents: Vec<String>,
    rewriter: &'a dyn UrlRewriter,
}

impl<'a> Writer<'a> {
    pub fn new(rewriter: &'a dyn UrlRewriter) -> Self {
        Self {
            out: Vec::new(),
            verbatim: 0,
            lf_run: usize::MAX,
            lf_target: 0,
            indents: Vec::new(),
            rewriter,
        }
    }

    /// A fresh, empty writer sharing this writer's URL rewriter.
    ///
    /// Used to render a subtree to a string (heading text, caption text)
    /// before deciding how to emit it.
    pub fn fork(&self) -> Writer<'a> {
        Writer::new(self.rewriter)
    }

    /// Run a link target or image source through the URL rewriter.
    pub fn rewrite_url(&self, url: &str) -> String {
        self.rewriter.rewrite_url(url)
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Request at least `n` consecutive linefeeds before the next content.
    ///
    /// Ignored in verbatim mode.
    pub fn ensure_linefeeds(&mut self, n: usize) {
        if self.verbatim == 0 {
            self.lf_target = self.lf_target.max(n);
        }
    }

    /// Push an indent prefix. Pending linefeeds are emitted first, with the
    /// indentation that was active when they were requested.
    pub fn push_indent(&mut self, prefix: &str) {
        self.flush_linefeeds();
        let full = match self.indents.last() {
            Some(parent) => format!("{parent}{prefix}"),
            None => prefix.to_string(),
        };
        self.indents.push(full);
    }

    /// Pop the innermost indent prefix.
    ///
    /// Pending linefeeds stay pending: they separate the indented block
    /// from whatever follows it, so they take the outer indentation.
    pub fn pop_indent(&mut self) {
        self.indents.pop();
    }

    pub fn enter_verbatim(&mut self) {
        self.verbatim += 1;
    }

    pub fn leave_verbatim(&mut self) {
        self.verbatim = self.verbatim.saturating_sub(1);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Write raw bytes, injecting the indent prefix after each linefeed.
    pub fn write_bytes(&mut self, mut bytes: &[u8]) {
        while let Some(i) = memchr::memchr(b'\n', bytes) {
            self.write_content(&bytes[..i]);
            self.write_linefeed(self.verbatim == 0);
            bytes = &bytes[i + 1..];
        }
        self.write_content(bytes);
    }

    pub fn write_byte(&mut self, b: u8) {
        if b == b'\n' {
            self.write_linefeed(self.verbatim == 0);
        } else {
            self.write_content(&[b]);
        }
    }

    /// Write bytes that contain no linefeed.
    fn write_content(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.flush_linefeeds();
        self.out.extend_from_slice(bytes);
        self.lf_run = 0;
    }

    fn write_linefeed(&mut self, indent: bool) {
        self.out.push(b'\n');
        self.lf_run = self.lf_run.saturating_add(1);
        if indent && let Some(prefix) = self.indents.last() {
            self.out.extend_from_slice(prefix.as_bytes());
        }
    }

    /// Emit linefeeds until the pending request is satisfied. These were
    /// requested outside verbatim mode, so they are always indented.
    fn flush_linefeeds(&mut self) {
        while self.lf_run < self.lf_target {
            self.write_linefeed(true);
        }
        self.lf_target = 0;
    }

    /// The raw output so far, without pending linefeeds.
    pub fn into_string(self) -> Result<String> {
        Ok(String::from_utf8(self.out)?)
    }

    /// Finish the document: trailing linefeeds collapse to exactly one and
    /// a non-empty document always ends with one.
    pub fn finish(mut self) -> Result<String> {
        while self.out.last() == Some(&b'\n') {
            self.out.pop();
        }
        if !self.out.is_empty() {
            self.out.push(b'\n');
        }
        self.into_string()
    }
}

impl io::Write for Writer<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
