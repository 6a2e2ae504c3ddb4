//! Inline `$latex ...$` math spans (the WP-LaTeX plugin syntax).

use crate::dom::{ArenaDom, NodeId, shortcode_name};

const MARKER: &str = "$latex ";

/// Find the terminating `$` of a math span in `text`. `\$` does not
/// terminate.
fn find_terminator(text: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < text.len() {
        match text[i] {
            b'\\' if text.get(i + 1) == Some(&b'$') => i += 2,
            b'$' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Replace every terminated `$latex ...$` span below `root` with a
/// synthetic `latex` element holding the span's text. Unterminated spans
/// stay literal text.
pub fn process_latex(dom: &mut ArenaDom, root: NodeId) {
    process_node(dom, root);
    dom.remove_empty_text(root);
}

fn process_node(dom: &mut ArenaDom, node: NodeId) {
    let mut child = dom.first_child(node);
    while child.is_some() {
        if dom.is_text(child) {
            child = process_text(dom, child);
        } else {
            if dom.is_element(child) {
                process_node(dom, child);
            }
            child = dom.next_sibling(child);
        }
    }
}

/// Split math spans out of one text node. Returns the node to continue
/// with.
fn process_text(dom: &mut ArenaDom, mut node: NodeId) -> NodeId {
    loop {
        let Some(text) = dom.text_content(node) else {
            return dom.next_sibling(node);
        };
        let Some(start) = text.find(MARKER) else {
            return dom.next_sibling(node);
        };
        let body_start = start + MARKER.len();
        let Some(len) = find_terminator(&text.as_bytes()[body_start..]) else {
            // Nothing after an unterminated marker can close a span either.
            return dom.next_sibling(node);
        };
        let body = text[body_start..body_start + len].to_string();
        log::trace!("math span {body:?}");

        let tail = dom.split_text(node, start, body_start + len + 1);
        let element = dom.create_element(shortcode_name("latex"), Vec::new());
        let inner = dom.create_text(body);
        dom.append(element, inner);
        dom.insert_after(node, element);

        node = tail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{inner_html, parse_fragment};

    fn process(html: &str) -> String {
        let (mut dom, body) = parse_fragment(html);
        process_latex(&mut dom, body);
        inner_html(&dom, body).unwrap()
    }

    #[test]
    fn test_single_span() {
        assert_eq!(process("a $latex 1+2$ b"), "a <latex>1+2</latex> b");
    }

    #[test]
    fn test_multiple_spans() {
        assert_eq!(
            process("$latex x$ and $latex y^2$"),
            "<latex>x</latex> and <latex>y^2</latex>"
        );
    }

    #[test]
    fn test_escaped_dollar_does_not_terminate() {
        assert_eq!(
            process(r"costs $latex \$5$ total"),
            r"costs <latex>\$5</latex> total"
        );
    }

    #[test]
    fn test_unterminated_span_is_literal() {
        assert_eq!(process("a $latex 1+2 b"), "a $latex 1+2 b");
    }

    #[test]
    fn test_marker_needs_trailing_space() {
        assert_eq!(process("$latex$ $latexx$"), "$latex$ $latexx$");
    }

    #[test]
    fn test_spans_inside_elements() {
        assert_eq!(
            process("<p><em>$latex a$</em></p>"),
            "<p><em><latex>a</latex></em></p>"
        );
    }

    #[test]
    fn test_span_element_is_synthetic() {
        let (mut dom, body) = parse_fragment("$latex e$");
        process_latex(&mut dom, body);
        let children: Vec<_> = dom.children(body).collect();
        assert_eq!(children.len(), 1);
        assert!(dom.is_synthetic(children[0]));
        let inner = dom.first_child(children[0]);
        assert_eq!(dom.text_content(inner), Some("e"));
    }

    #[test]
    fn test_no_markup_is_noop() {
        let html = "<p>plain $5 and <b>$ money</b></p>";
        assert_eq!(process(html), html);
    }
}
