//! # wp2md
//!
//! Converts WordPress post bodies (HTML with `[shortcode]` markup and
//! inline `$latex ...$` spans) to Markdown, and whole WordPress exports
//! to directories of Markdown posts.
//!
//! ## Features
//!
//! - Shortcodes are parsed into the HTML tree before rendering, so
//!   `[caption]` around an image becomes a figure with a caption
//! - Markdown output escapes everything that would otherwise be markup
//! - Links between posts and to uploaded media are rewritten to local
//!   references through a [`UrlRewriter`]
//! - WXR export reading and batch conversion in [`blog`]
//!
//! ## Quick Start
//!
//! ```
//! use wp2md::{IdentityRewriter, convert_html_to_markdown};
//!
//! let html = r#"<h2>Hello</h2>[latex]e^{i\pi}[/latex]"#;
//! let md = convert_html_to_markdown(html, &IdentityRewriter).unwrap();
//! assert!(md.starts_with("## Hello\n\n"));
//! ```
//!
//! ## Converting an export
//!
//! ```no_run
//! use wp2md::blog::{Blog, ConvertOptions, save};
//!
//! let channel = wp2md::wxr::read_wxr("blog.wordpress.xml").unwrap();
//! let options = ConvertOptions::default();
//! let blog = Blog::from_channel(&channel, &options).unwrap();
//! save(&blog, "posts", &options).unwrap();
//! ```

pub mod blog;
pub mod dom;
pub mod error;
pub mod markdown;
pub mod shortcode;
pub(crate) mod util;
pub mod wxr;

pub use error::{Error, Result};
pub use markdown::{Converter, IdentityRewriter, UrlRewriter, convert_html_to_markdown};
pub use shortcode::Registry;
