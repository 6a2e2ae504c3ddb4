//! WordPress shortcode rewriting.
//!
//! Scans the text of an HTML tree for bracket shortcodes such as
//! `[caption width="300"]...[/caption]` and replaces them with synthetic
//! elements (namespace [`SHORTCODE_NS`](crate::dom::SHORTCODE_NS)) spliced
//! into the tree. Content between an opening and a closing tag is
//! reparented under the new element, even though the parser produced it as
//! a flat run of siblings.
//!
//! Tags must nest properly within each HTML element: a shortcode opened
//! inside a `<p>` has to be closed inside the same `<p>`. Anything else is a
//! structural error and aborts the rewrite, leaving the tree partially
//! modified.

mod attrs;
pub mod latex;
mod lexer;
mod registry;

pub use attrs::parse_attrs;
pub use latex::process_latex;
pub use lexer::{Lexeme, lex_tag};
pub use registry::Registry;

use std::ops::Range;

use crate::dom::{ArenaDom, Attribute, NodeId, shortcode_name};
use crate::error::{Error, Result};

/// A shortcode that has been opened but not yet closed.
#[derive(Debug, Clone)]
struct OpenTag {
    tag: String,
    node: NodeId,
}

/// A shortcode tag found in a text node, owned so the text can be rewritten.
struct FoundTag {
    /// Byte range of the tag, brackets included.
    span: Range<usize>,
    name: String,
    open: bool,
    close: bool,
    attrs: Vec<(String, String)>,
}

/// Result of scanning one text node.
struct TextScan {
    /// The node to continue with.
    next: NodeId,
    /// Element created for an opening tag, if any.
    created: Option<NodeId>,
}

/// Rewrite every shortcode below `root`, then drop empty text nodes left
/// behind by splitting.
pub fn process_shortcodes(dom: &mut ArenaDom, root: NodeId, registry: &Registry) -> Result<()> {
    ShortcodeProcessor::new(registry).process(dom, root)
}

/// Shortcode rewriter configured with a set of known tags.
pub struct ShortcodeProcessor<'r> {
    registry: &'r Registry,
}

impl<'r> ShortcodeProcessor<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn process(&self, dom: &mut ArenaDom, root: NodeId) -> Result<()> {
        self.process_node(dom, root)?;
        dom.remove_empty_text(root);
        Ok(())
    }

    fn process_node(&self, dom: &mut ArenaDom, node: NodeId) -> Result<()> {
        let mut tags: Vec<OpenTag> = Vec::new();

        let mut child = dom.first_child(node);
        while child.is_some() {
            let mut next = dom.next_sibling(child);
            let new_parent = tags.last().map(|t| t.node);
            let mut created = None;

            if dom.is_text(child) {
                let scan = self.process_text(dom, child, &mut tags)?;
                next = scan.next;
                created = scan.created;
            } else if dom.is_element(child) {
                self.process_node(dom, child)?;
            }

            // Everything between an opening and closing tag moves under
            // the innermost open tag, in document order.
            if let Some(parent) = new_parent {
                dom.append(parent, child);
                if let Some(element) = created {
                    dom.append(parent, element);
                }
            }

            child = next;
        }

        if !tags.is_empty() {
            return Err(Error::UnclosedShortcodes(
                tags.into_iter().map(|t| t.tag).collect(),
            ));
        }
        Ok(())
    }

    /// Scan a text node up to its first real shortcode and handle it.
    /// Escapes before that point are resolved in place.
    fn process_text(
        &self,
        dom: &mut ArenaDom,
        node: NodeId,
        tags: &mut Vec<OpenTag>,
    ) -> Result<TextScan> {
        let mut text = dom.text_content(node).unwrap_or_default().to_string();
        let mut i = 0;

        while let Some(offset) = memchr::memchr(b'[', &text.as_bytes()[i..]) {
            let start = i + offset;
            match lex_tag(&text[start + 1..], self.registry) {
                None => i = start + 1,
                Some(Lexeme::Escape { len, literal }) => {
                    log::trace!("shortcode escape {literal}");
                    let literal = literal.to_string();
                    text.replace_range(start..start + 1 + len, &literal);
                    i = start + literal.len();
                }
                Some(Lexeme::Tag {
                    len,
                    name,
                    open,
                    close,
                    attrs,
                }) => {
                    let found = FoundTag {
                        span: start..start + 1 + len,
                        name: name.to_string(),
                        open,
                        close,
                        attrs: parse_attrs(attrs),
                    };
                    dom.set_text(node, text);
                    return self.handle_tag(dom, node, tags, found);
                }
            }
        }

        if dom.text_content(node) != Some(text.as_str()) {
            dom.set_text(node, text);
        }
        Ok(TextScan {
            next: dom.next_sibling(node),
            created: None,
        })
    }

    fn handle_tag(
        &self,
        dom: &mut ArenaDom,
        node: NodeId,
        tags: &mut Vec<OpenTag>,
        found: FoundTag,
    ) -> Result<TextScan> {
        let FoundTag {
            span,
            name: tag,
            open,
            close,
            attrs,
        } = found;

        // Split the text node, cutting out the tag
        let next = dom.split_text(node, span.start, span.end);

        let mut created = None;
        if open {
            let attrs = attrs
                .iter()
                .map(|(k, v)| Attribute::new(k, v.as_str()))
                .collect();
            let element = dom.create_element(shortcode_name(&tag), attrs);
            dom.insert_after(node, element);
            log::trace!("opened shortcode [{tag}]");
            tags.push(OpenTag {
                tag: tag.clone(),
                node: element,
            });
            created = Some(element);
        }

        if close {
            match tags.last() {
                Some(top) if top.tag == tag => {
                    tags.pop();
                    log::trace!("closed shortcode [/{tag}]");
                }
                _ => return Err(Error::UnexpectedClosingShortcode(tag)),
            }
        }

        Ok(TextScan { next, created })
    }
}
