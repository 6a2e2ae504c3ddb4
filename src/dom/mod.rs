//! Mutable HTML tree used by the rewriters and the renderer.
//!
//! - [`arena`]: the arena tree and its splice/reparent primitives
//! - [`tree_sink`]: html5ever `TreeSink` building an [`ArenaDom`]
//! - [`serialize`]: generic HTML output of arena subtrees

pub mod arena;
pub mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, Attribute, ChildrenIter, Node, NodeData, NodeId};
pub use serialize::{inner_html, serialize_node};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, QualName};

use tree_sink::ArenaSink;

/// Namespace marking elements created by shortcode rewriting.
pub const SHORTCODE_NS: &str = "wp";

/// Qualified name for a synthetic (shortcode) element.
pub fn shortcode_name(tag: &str) -> QualName {
    QualName::new(None, Namespace::from(SHORTCODE_NS), LocalName::from(tag))
}

/// Parse an HTML fragment (a post body, not a full document).
///
/// Returns the DOM and the `body` element holding the fragment's nodes. The
/// body is detached from the surrounding document so it is a parentless
/// root: walks that climb the tree stop at the fragment's edge.
pub fn parse_fragment(html: &str) -> (ArenaDom, NodeId) {
    // Wrap in a minimal document structure for parsing
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");

    let sink = parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());
    let mut dom = sink.into_dom();

    let body = match dom.find_by_tag("body") {
        Some(body) => body,
        None => {
            // html5ever always synthesizes a body; keep a usable root anyway.
            let body = dom.create_element(
                QualName::new(None, html5ever::ns!(html), LocalName::from("body")),
                Vec::new(),
            );
            dom.append(dom.document(), body);
            body
        }
    };
    dom.detach(body);
    (dom, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_returns_detached_body() {
        let (dom, body) = parse_fragment("a<em>b</em>c");
        assert!(dom.parent(body).is_none());
        let children: Vec<_> = dom.children(body).collect();
        assert_eq!(children.len(), 3);
        assert_eq!(dom.text_content(children[0]), Some("a"));
        assert!(dom.is_html_element(children[1], "em"));
    }

    #[test]
    fn test_shortcode_name_is_synthetic() {
        let mut dom = ArenaDom::new();
        let el = dom.create_element(shortcode_name("caption"), Vec::new());
        assert!(dom.is_synthetic(el));
        assert!(!dom.is_html_element(el, "caption"));
        assert_eq!(dom.element_name(el).unwrap().as_ref(), "caption");
    }
}
