//! WordPress post HTML → Markdown.
//!
//! The conversion runs in three passes over one parsed fragment:
//!
//! 1. [`crate::shortcode::process_shortcodes`] turns `[caption]`-style
//!    shortcodes into synthetic elements;
//! 2. [`crate::shortcode::process_latex`] does the same for inline
//!    `$latex ...$` spans;
//! 3. [`render::Renderer`] walks the tree and writes Markdown through a
//!    [`writer::Writer`], escaping text with [`escape`].
//!
//! Link targets and image sources go through a caller-supplied
//! [`UrlRewriter`], which is how the batch layer turns links between posts
//! and to uploaded media into local references.

pub mod escape;
pub mod render;
pub mod writer;

pub use escape::{ESCAPED_ALL, escape_markdown};
pub use render::Renderer;
pub use writer::Writer;

use crate::dom::parse_fragment;
use crate::error::Result;
use crate::shortcode::{Registry, process_latex, process_shortcodes};

/// Maps link targets and image sources to their output form.
///
/// Implemented for any `Fn(&str) -> String`. Rewriters that need to
/// remember what they resolved use interior mutability.
pub trait UrlRewriter {
    fn rewrite_url(&self, url: &str) -> String;
}

impl<F> UrlRewriter for F
where
    F: Fn(&str) -> String,
{
    fn rewrite_url(&self, url: &str) -> String {
        self(url)
    }
}

/// Leaves every URL as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRewriter;

impl UrlRewriter for IdentityRewriter {
    fn rewrite_url(&self, url: &str) -> String {
        url.to_string()
    }
}

/// HTML → Markdown converter with a fixed set of known shortcodes.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    registry: Registry,
}

impl Converter {
    /// A converter recognizing the default shortcodes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Convert one post body to Markdown.
    ///
    /// Structural shortcode errors and unrenderable captions abort the
    /// conversion; no partial output is returned.
    pub fn convert(&self, html: &str, rewriter: &dyn UrlRewriter) -> Result<String> {
        let (mut dom, body) = parse_fragment(html);
        log::trace!("parsed fragment into {} nodes", dom.len());

        process_shortcodes(&mut dom, body, &self.registry)?;
        process_latex(&mut dom, body);

        let mut writer = Writer::new(rewriter);
        Renderer::new(&dom).render_children(&mut writer, body)?;
        writer.finish()
    }
}

/// Convert one post body to Markdown with the default shortcodes.
///
/// # Examples
///
/// ```
/// use wp2md::markdown::{IdentityRewriter, convert_html_to_markdown};
///
/// let md = convert_html_to_markdown("<em>Hi</em> there", &IdentityRewriter).unwrap();
/// assert_eq!(md, "*Hi* there\n");
/// ```
pub fn convert_html_to_markdown(html: &str, rewriter: &dyn UrlRewriter) -> Result<String> {
    Converter::new().convert(html, rewriter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_convert_pipeline() {
        let md = convert_html_to_markdown(
            "<h1>Title</h1>\n<p>para</p>\n[latex]x^2[/latex] and $latex y$",
            &IdentityRewriter,
        )
        .unwrap();
        assert_eq!(md, "# Title\n\n<p>para</p>$$x^2$$ and $$y$$\n");
    }

    #[test]
    fn test_custom_registry() {
        let converter = Converter::with_registry(Registry::empty());
        let md = converter.convert("[latex]x[/latex]", &IdentityRewriter).unwrap();
        assert_eq!(md, "\\[latex\\]x\\[/latex\\]\n");
    }

    #[test]
    fn test_structural_error_aborts() {
        let err = convert_html_to_markdown("[caption]x", &IdentityRewriter).unwrap_err();
        assert!(matches!(err, Error::UnclosedShortcodes(_)));
    }

    #[test]
    fn test_rewriter_sees_every_url() {
        use std::cell::RefCell;

        let seen = RefCell::new(Vec::new());
        let rewrite = |url: &str| {
            seen.borrow_mut().push(url.to_string());
            url.to_uppercase()
        };
        let md = convert_html_to_markdown(
            r#"<a href="a">x</a> <img src="b">"#,
            &rewrite,
        )
        .unwrap();
        assert_eq!(md, "[x](A) ![](B)\n");
        assert_eq!(seen.into_inner(), vec!["a", "b"]);
    }

    #[test]
    fn test_converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }
}
