//! HTML tree → Markdown rendering.
//!
//! Each rule only applies when the element has the simple shape Markdown
//! can express (a link with nothing but an `href`, a `<code>` with plain
//! text, a list of only `<li>` items, ...). Everything else is written back
//! as HTML in verbatim mode, which Markdown passes through untouched.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::dom::{ArenaDom, NodeData, NodeId, serialize_node};
use crate::error::{Error, Result};

use super::escape::{
    ESCAPED_ALL, ESCAPED_LINK_TEXT, ESCAPED_TITLE, ESCAPED_URL, ESCAPED_URL_WITH_TITLE,
    escape_markdown, tabs_to_spaces, trim_left_newline, trim_right_newline,
};
use super::writer::Writer;

const HEADING_PREFIXES: [&str; 6] = ["# ", "## ", "### ", "#### ", "##### ", "###### "];

const IMG_ALLOWED_ATTRS: [&str; 7] = ["src", "alt", "title", "width", "height", "class", "style"];

/// Elements whose edges swallow a single adjacent newline in text.
const BLOCK_ELEMENTS: [&str; 16] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "div", "p", "hr", "blockquote", "pre", "ol", "ul", "dl",
    "dd", "form",
];

const CODE_FENCE: &str = "```";

static FLOAT_LEFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\W|^)float\s*:\s*left\s*(?:;|$)").unwrap());

static FLOAT_RIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\W|^)float\s*:\s*right\s*(?:;|$)").unwrap());

/// Renders nodes of one tree into a [`Writer`].
pub struct Renderer<'d> {
    dom: &'d ArenaDom,
}

impl<'d> Renderer<'d> {
    pub fn new(dom: &'d ArenaDom) -> Self {
        Self { dom }
    }

    /// Render all children of `root` (the fragment's body).
    pub fn render_children(&self, w: &mut Writer<'_>, root: NodeId) -> Result<()> {
        for child in self.dom.children(root) {
            self.render_node(w, child, None)?;
        }
        Ok(())
    }

    /// Render one node. `list_index` is the zero-based item position when
    /// the node is rendered as an item of an `<ol>`/`<ul>`.
    pub fn render_node(
        &self,
        w: &mut Writer<'_>,
        id: NodeId,
        list_index: Option<usize>,
    ) -> Result<()> {
        let Some(node) = self.dom.get(id) else {
            return Ok(());
        };

        match &node.data {
            NodeData::Text(text) => {
                let mut text = text.as_str();
                if self.is_prev_block_boundary(id) {
                    text = trim_left_newline(text);
                }
                if self.is_next_block_boundary(id) {
                    text = trim_right_newline(text);
                }
                handle_text(w, text);
                Ok(())
            }
            NodeData::Element { .. } if self.dom.is_synthetic(id) => self.render_shortcode(w, id),
            NodeData::Element { .. } => self.render_element(w, id, list_index),
            NodeData::Comment(_) => Ok(()),
            NodeData::Doctype { .. } => Err(Error::UnexpectedDoctype),
            NodeData::Document => self.render_children(w, id),
        }
    }

    fn render_element(
        &self,
        w: &mut Writer<'_>,
        id: NodeId,
        list_index: Option<usize>,
    ) -> Result<()> {
        let dom = self.dom;
        let tag = dom.element_name(id).map(|n| n.as_ref()).unwrap_or("");

        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = usize::from(tag.as_bytes()[1] - b'1');
                if let Some(text) = self.child_text(w, id)? {
                    w.ensure_linefeeds(2);
                    singleline(w, HEADING_PREFIXES[level], &text);
                    w.ensure_linefeeds(2);
                    return Ok(());
                }
            }
            "em" | "i" => return self.render_contents(w, "*", id, "*"),
            "strong" | "b" => return self.render_contents(w, "**", id, "**"),
            "code" => {
                if let Some(text) = self.try_leaf_child_text(id)
                    && !text.contains('`')
                {
                    w.enter_verbatim();
                    w.write_str("`");
                    w.write_str(text);
                    w.write_str("`");
                    w.leave_verbatim();
                    return Ok(());
                }
            }
            "pre" => {
                if let Some(text) = self.try_leaf_child_text(id)
                    && !text.contains(CODE_FENCE)
                {
                    let text = tabs_to_spaces(text, 8);
                    w.ensure_linefeeds(2);
                    w.write_str(CODE_FENCE);
                    w.write_str("\n");
                    w.enter_verbatim();
                    w.write_str(&text);
                    w.leave_verbatim();
                    w.ensure_linefeeds(1);
                    w.write_str(CODE_FENCE);
                    w.ensure_linefeeds(2);
                    return Ok(());
                }
            }
            "a" => {
                if self.is_simple_link(id) {
                    let text = self.leaf_child_text(id).unwrap_or("");
                    let href = w.rewrite_url(dom.get_attr(id, "href").unwrap_or(""));
                    surround(w, "[", text, "]", ESCAPED_LINK_TEXT);
                    surround(w, "(", &href, ")", ESCAPED_URL);
                    return Ok(());
                }
                if self.is_image_link(id) && self.handle_image(w, dom.first_child(id)) {
                    return Ok(());
                }
            }
            "img" => {
                if self.handle_image(w, id) {
                    return Ok(());
                }
            }
            "ol" | "ul" => {
                if self.contains_only_list_items(id) {
                    w.ensure_linefeeds(2);
                    let items = dom.children(id).filter(|&kid| dom.is_element(kid));
                    for (index, item) in items.enumerate() {
                        self.render_node(w, item, Some(index))?;
                    }
                    w.ensure_linefeeds(2);
                    return Ok(());
                }
            }
            "li" => {
                let parent = dom.parent(id);
                if let Some(index) = list_index {
                    let marker = if dom.is_html_element(parent, "ol") {
                        Some(format!("{}. ", index + 1))
                    } else if dom.is_html_element(parent, "ul") {
                        Some("* ".to_string())
                    } else {
                        None
                    };
                    if let Some(marker) = marker {
                        w.push_indent("    ");
                        let result = self.render_contents(w, &marker, id, "");
                        w.pop_indent();
                        w.ensure_linefeeds(1);
                        return result;
                    }
                }
            }
            "blockquote" => {
                w.ensure_linefeeds(2);
                w.push_indent("> ");
                let result = self.render_contents(w, "> ", id, "");
                w.pop_indent();
                w.ensure_linefeeds(1);
                return result;
            }
            _ => {}
        }

        // Everything else goes out as HTML.
        log::trace!("passing <{tag}> through as HTML");
        w.enter_verbatim();
        let result = serialize_node(dom, id, &mut *w);
        w.leave_verbatim();
        Ok(result?)
    }

    fn render_shortcode(&self, w: &mut Writer<'_>, id: NodeId) -> Result<()> {
        let tag = self.dom.element_name(id).map(|n| n.as_ref()).unwrap_or("");
        match tag {
            "latex" => {
                let leaf = self.leaf_child_text(id).filter(|_| !self.contains_markup(id));
                let text = match leaf {
                    Some(text) => Cow::Borrowed(text),
                    None => {
                        log::warn!("markup inside [latex] dropped, keeping its text");
                        let mut text = String::new();
                        self.collect_text(id, &mut text);
                        Cow::Owned(text)
                    }
                };
                // `$$[` would read as a display math caption
                let start = if text.starts_with('[') { "$$ " } else { "$$" };
                surround(w, start, &text, "$$", "");
                Ok(())
            }
            "caption" | "wp_caption" => self.handle_caption(w, id),
            _ => Err(Error::UnsupportedShortcode(tag.to_string())),
        }
    }

    fn render_contents(
        &self,
        w: &mut Writer<'_>,
        prefix: &str,
        id: NodeId,
        suffix: &str,
    ) -> Result<()> {
        w.write_str(prefix);
        for child in self.dom.children(id) {
            self.render_node(w, child, None)?;
        }
        w.write_str(suffix);
        Ok(())
    }

    /// Render an element's contents into a separate buffer. `None` if that
    /// fails, in which case the caller falls back to HTML.
    fn child_text(&self, w: &Writer<'_>, id: NodeId) -> Result<Option<String>> {
        let mut fork = w.fork();
        match self.render_contents(&mut fork, "", id, "") {
            Ok(()) => Ok(Some(fork.into_string()?)),
            Err(err) => {
                log::debug!("contents can't be rendered as Markdown: {err}");
                Ok(None)
            }
        }
    }

    /// `[caption]<img ...> text[/caption]` or the legacy
    /// `[caption caption="text"]<img ...>[/caption]`.
    fn handle_caption(&self, w: &mut Writer<'_>, id: NodeId) -> Result<()> {
        let dom = self.dom;
        let first = self.first_meaningful_child(id);
        let mut image = first;
        if dom.is_html_element(image, "a") {
            // Links, we may descend.
            image = self.first_meaningful_child(image);
        }
        if !dom.is_html_element(image, "img") {
            return Err(Error::CaptionShape);
        }

        let caption = match dom.get_attr(id, "caption") {
            Some(caption) => {
                w.write_str("{% figure %}");
                self.render_contents(w, "", id, "")?;
                escape_markdown(caption, ESCAPED_ALL).into_owned()
            }
            None => {
                let mut fork = w.fork();
                let mut rest = dom.next_sibling(first);
                while rest.is_some() {
                    self.render_node(&mut fork, rest, None)?;
                    rest = dom.next_sibling(rest);
                }
                let caption = fork.into_string()?.trim().to_string();

                w.write_str("{% figure %}");
                self.render_node(w, first, None)?;
                caption
            }
        };

        w.write_str("{% figcaption %}");
        w.write_str(&caption);
        w.write_str("{% endfigcaption %}{% endfigure %}");
        Ok(())
    }

    /// Emit `![alt](src "title")`. Returns false (writing nothing) when the
    /// image carries attributes Markdown can't express.
    fn handle_image(&self, w: &mut Writer<'_>, id: NodeId) -> bool {
        let dom = self.dom;
        if !dom
            .attrs(id)
            .iter()
            .all(|a| IMG_ALLOWED_ATTRS.contains(&a.key()))
        {
            return false;
        }

        let url = w.rewrite_url(dom.get_attr(id, "src").unwrap_or(""));
        let title = dom.get_attr(id, "title").unwrap_or("");

        let mut annotations = Vec::new();
        if let Some(style) = dom.get_attr(id, "style") {
            if FLOAT_LEFT_RE.is_match(style) {
                annotations.push("floatleft");
            }
            if FLOAT_RIGHT_RE.is_match(style) {
                annotations.push("floatright");
            }
        }
        let mut alt = String::new();
        if !annotations.is_empty() {
            alt = format!("{{{}}}", annotations.join(" "));
        }
        alt.push_str(dom.get_attr(id, "alt").unwrap_or(""));

        surround(w, "![", &alt, "]", ESCAPED_LINK_TEXT);
        if title.is_empty() {
            surround(w, "(", &url, ")", ESCAPED_URL);
        } else {
            surround(w, "(", &url, " ", ESCAPED_URL_WITH_TITLE);
            surround(w, "\"", title, "\")", ESCAPED_TITLE);
        }
        true
    }

    fn first_meaningful_child(&self, id: NodeId) -> NodeId {
        self.dom
            .children(id)
            .find(|&kid| {
                !self
                    .dom
                    .text_content(kid)
                    .is_some_and(|t| t.trim().is_empty())
            })
            .unwrap_or(NodeId::NONE)
    }

    /// Whether the node has anything but (at most) a single text child.
    fn contains_markup(&self, id: NodeId) -> bool {
        let first = self.dom.first_child(id);
        !(first == self.dom.last_child(id) && (first.is_none() || self.dom.is_text(first)))
    }

    /// Only `<li>` elements and whitespace.
    fn contains_only_list_items(&self, id: NodeId) -> bool {
        self.dom.children(id).all(|kid| match self.dom.get(kid).map(|n| &n.data) {
            Some(NodeData::Text(text)) => text.trim().is_empty(),
            Some(NodeData::Element { .. }) => self.dom.is_html_element(kid, "li"),
            _ => false,
        })
    }

    /// The text of an element with no attributes and no child markup.
    fn try_leaf_child_text(&self, id: NodeId) -> Option<&'d str> {
        if self.dom.attrs(id).is_empty() && !self.contains_markup(id) {
            self.leaf_child_text(id)
        } else {
            None
        }
    }

    /// The first child's text: empty for no children, `None` if the first
    /// child is not text.
    fn leaf_child_text(&self, id: NodeId) -> Option<&'d str> {
        let first = self.dom.first_child(id);
        if first.is_none() {
            return Some("");
        }
        self.dom.text_content(first)
    }

    /// All descendant text, in document order.
    fn collect_text(&self, id: NodeId, out: &mut String) {
        for kid in self.dom.children(id) {
            match self.dom.text_content(kid) {
                Some(text) => out.push_str(text),
                None => self.collect_text(kid, out),
            }
        }
    }

    /// A link with just an `href` and plain text.
    fn is_simple_link(&self, id: NodeId) -> bool {
        let attrs = self.dom.attrs(id);
        !self.contains_markup(id) && attrs.len() == 1 && attrs[0].key() == "href"
    }

    /// A link with just an `href` wrapping a single image of the same URL.
    fn is_image_link(&self, id: NodeId) -> bool {
        let dom = self.dom;
        let attrs = dom.attrs(id);
        if attrs.len() != 1 || attrs[0].key() != "href" {
            return false;
        }

        let img = dom.first_child(id);
        if img.is_none() || img != dom.last_child(id) || !dom.is_html_element(img, "img") {
            return false;
        }

        dom.get_attr(id, "href") == Some(dom.get_attr(img, "src").unwrap_or(""))
    }

    fn is_block_level(&self, id: NodeId) -> bool {
        !self.dom.is_synthetic(id)
            && self
                .dom
                .element_name(id)
                .is_some_and(|name| BLOCK_ELEMENTS.contains(&name.as_ref()))
    }

    /// Whether a block boundary separates the node from the content before
    /// it: climb until there is a previous sibling, then descend through
    /// its last children.
    fn is_prev_block_boundary(&self, id: NodeId) -> bool {
        let dom = self.dom;
        let mut n = id;
        loop {
            if self.is_block_level(n) {
                return true;
            }
            let prev = dom.prev_sibling(n);
            if prev.is_some() {
                n = prev;
                break;
            }
            n = dom.parent(n);
            if n.is_none() {
                return true;
            }
        }

        while n.is_some() {
            if self.is_block_level(n) {
                return true;
            }
            n = dom.last_child(n);
        }
        false
    }

    /// Mirror of [`Self::is_prev_block_boundary`] looking forward.
    fn is_next_block_boundary(&self, id: NodeId) -> bool {
        let dom = self.dom;
        let mut n = id;
        loop {
            if self.is_block_level(n) {
                return true;
            }
            let next = dom.next_sibling(n);
            if next.is_some() {
                n = next;
                break;
            }
            n = dom.parent(n);
            if n.is_none() {
                return true;
            }
        }

        while n.is_some() {
            if self.is_block_level(n) {
                return true;
            }
            n = dom.first_child(n);
        }
        false
    }
}

fn surround(w: &mut Writer<'_>, prefix: &str, text: &str, suffix: &str, escaped: &str) {
    w.write_str(prefix);
    w.write_str(&escape_markdown(text, escaped));
    w.write_str(suffix);
}

/// Write `text` with line breaks folded to spaces.
fn singleline(w: &mut Writer<'_>, prefix: &str, text: &str) {
    w.write_str(prefix);
    for (i, line) in text.split(['\r', '\n']).enumerate() {
        if i > 0 {
            w.write_byte(b' ');
        }
        w.write_str(line);
    }
}

/// Write body text. A single newline becomes an explicit `<br>` line break;
/// a run of two or more is a paragraph break.
fn handle_text(w: &mut Writer<'_>, mut text: &str) {
    while let Some(i) = text.find('\n') {
        w.write_str(&escape_markdown(&text[..i], ESCAPED_ALL));

        let run = text[i..].bytes().take_while(|&b| b == b'\n').count();
        if run == 1 {
            w.write_str("\n<br>");
        } else {
            w.write_str("\n\n");
        }
        text = &text[i + run..];
    }
    w.write_str(&escape_markdown(text, ESCAPED_ALL));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;
    use crate::shortcode::{Registry, process_latex, process_shortcodes};

    fn render_with(html: &str, rewrite: &dyn crate::markdown::UrlRewriter) -> Result<String> {
        let (mut dom, body) = parse_fragment(html);
        process_shortcodes(&mut dom, body, &Registry::default())?;
        process_latex(&mut dom, body);
        let mut w = Writer::new(rewrite);
        Renderer::new(&dom).render_children(&mut w, body)?;
        w.finish()
    }

    fn render(html: &str) -> Result<String> {
        render_with(html, &|url: &str| url.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(render("Hello, World!").unwrap(), "Hello, World!\n");
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(
            render("*bold* and _italic_ cost $5").unwrap(),
            "\\*bold\\* and \\_italic\\_ cost \\$5\n"
        );
    }

    #[test]
    fn test_single_linefeed_becomes_line_break() {
        assert_eq!(
            render("line one\nline two").unwrap(),
            "line one\n<br>line two\n"
        );
    }

    #[test]
    fn test_linefeed_runs_become_paragraph_break() {
        assert_eq!(
            render("para one\n\n\n\npara two").unwrap(),
            "para one\n\npara two\n"
        );
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            render("intro<h2>Section <em>one</em></h2>body").unwrap(),
            "intro\n\n## Section *one*\n\nbody\n"
        );
        assert_eq!(render("<h6>x</h6>").unwrap(), "###### x\n");
    }

    #[test]
    fn test_heading_folds_line_breaks() {
        assert_eq!(render("<h1>a<br>b</h1>").unwrap(), "# a<br>b\n");
        assert_eq!(render("<h1>a\nb</h1>").unwrap(), "# a <br>b\n");
    }

    #[test]
    fn test_emphasis_nests() {
        assert_eq!(
            render("<strong>a <em>b</em></strong> <b>c</b> <i>d</i>").unwrap(),
            "**a *b*** **c** *d*\n"
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(render("<code>a*b</code>").unwrap(), "`a*b`\n");
        assert_eq!(
            render("<code>a`b</code>").unwrap(),
            "<code>a`b</code>\n"
        );
        assert_eq!(
            render(r#"<code class="x">y</code>"#).unwrap(),
            "<code class=\"x\">y</code>\n"
        );
    }

    #[test]
    fn test_preformatted_block() {
        assert_eq!(
            render("before<pre>\tif x:\n\t\ty()</pre>after").unwrap(),
            "before\n\n```\n        if x:\n                y()\n```\n\nafter\n"
        );
    }

    #[test]
    fn test_preformatted_with_fence_falls_back() {
        assert_eq!(
            render("<pre>```</pre>").unwrap(),
            "<pre>```</pre>\n"
        );
    }

    #[test]
    fn test_simple_link() {
        let rewrite = |url: &str| format!("{url}?rewritten");
        assert_eq!(
            render_with(r#"see <a href="http://x/(1)">the [docs]</a>"#, &rewrite).unwrap(),
            "see [the \\[docs\\]](http://x/\\(1\\)?rewritten)\n"
        );
    }

    #[test]
    fn test_link_with_extra_attributes_falls_back() {
        assert_eq!(
            render(r#"<a href="u" target="_blank">x</a>"#).unwrap(),
            "<a href=\"u\" target=\"_blank\">x</a>\n"
        );
    }

    #[test]
    fn test_image_link_renders_as_image() {
        assert_eq!(
            render(r#"<a href="http://x/i.png"><img src="http://x/i.png" alt="pic"></a>"#).unwrap(),
            "![pic](http://x/i.png)\n"
        );
    }

    #[test]
    fn test_image_with_title_and_float() {
        assert_eq!(
            render(r#"<img src="u.png" alt="a" title="say &quot;hi&quot;" style="border: 0; float:right;">"#)
                .unwrap(),
            "![{floatright}a](u.png \"say \\\"hi\\\"\")\n"
        );
        assert_eq!(
            render(r#"<img src="u.png" style="float: left">"#).unwrap(),
            "![{floatleft}](u.png)\n"
        );
    }

    #[test]
    fn test_image_with_unknown_attribute_falls_back() {
        assert_eq!(
            render(r#"<img src="u" data-id="3">"#).unwrap(),
            "<img src=\"u\" data-id=\"3\">\n"
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            render("<ol>\n<li>first</li>\n<li>second</li>\n</ol>").unwrap(),
            "1. first\n2. second\n"
        );
    }

    #[test]
    fn test_list_item_continuation_is_indented() {
        assert_eq!(
            render("<ul><li>a\nb</li><li>c</li></ul>").unwrap(),
            "* a\n    <br>b\n* c\n"
        );
    }

    #[test]
    fn test_nested_lists() {
        assert_eq!(
            render("<ul><li>a<ol><li>b</li></ol></li><li>c</li></ul>").unwrap(),
            "* a\n    \n    1. b\n\n* c\n"
        );
    }

    #[test]
    fn test_list_with_other_children_falls_back() {
        assert_eq!(
            render("<ul><li>a</li><p>b</p></ul>").unwrap(),
            "<ul><li>a</li><p>b</p></ul>\n"
        );
    }

    #[test]
    fn test_list_item_outside_list_falls_back() {
        let (dom, body) = parse_fragment("<ul><li>x</li></ul>");
        let ul = dom.first_child(body);
        let li = dom.first_child(ul);
        let identity = |url: &str| url.to_string();
        let mut w = Writer::new(&identity);
        Renderer::new(&dom).render_node(&mut w, li, None).unwrap();
        assert_eq!(w.finish().unwrap(), "<li>x</li>\n");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            render("a<blockquote>quoted\nline</blockquote>b").unwrap(),
            "a\n\n> quoted\n> <br>line\nb\n"
        );
    }

    #[test]
    fn test_block_boundary_trims_single_newline() {
        assert_eq!(
            render("<h1>T</h1>\ntext\n<h2>U</h2>").unwrap(),
            "# T\n\ntext\n\n## U\n"
        );
    }

    #[test]
    fn test_unknown_element_passes_through_verbatim() {
        assert_eq!(
            render("<ul><li>x<div>\n<span>y</span>\n</div></li></ul>").unwrap(),
            "* x<div>\n<span>y</span>\n</div>\n"
        );
    }

    #[test]
    fn test_comments_render_nothing() {
        assert_eq!(render("a<!--more-->b").unwrap(), "ab\n");
    }

    #[test]
    fn test_math_span() {
        assert_eq!(render("a $latex 1+2$ b").unwrap(), "a $$1+2$$ b\n");
        assert_eq!(render("a $latex 1+2 b").unwrap(), "a \\$latex 1\\+2 b\n");
        assert_eq!(render("[latex][x]_1[/latex]").unwrap(), "$$ [x]_1$$\n");
    }

    #[test]
    fn test_math_block_keeps_text_inside_markup() {
        assert_eq!(render("[latex]a<em>b</em>c[/latex]").unwrap(), "$$abc$$\n");
        assert_eq!(render("[latex]<em>b</em>[/latex]").unwrap(), "$$b$$\n");
        assert_eq!(render("[latex]x<!-- c --><sub>1</sub>[/latex]").unwrap(), "$$x1$$\n");
    }

    #[test]
    fn test_caption_new_form() {
        assert_eq!(
            render(r#"a[caption id="x" width=10]<img src="u"/>[/caption]b"#).unwrap(),
            "a{% figure %}![](u){% figcaption %}{% endfigcaption %}{% endfigure %}b\n"
        );
        assert_eq!(
            render(r#"[caption] <a href="i.png"><img src="i.png"></a> The *cap* [/caption]"#).unwrap(),
            "{% figure %}![](i.png){% figcaption %}The \\*cap\\*{% endfigcaption %}{% endfigure %}\n"
        );
    }

    #[test]
    fn test_caption_legacy_attribute() {
        assert_eq!(
            render(r#"[caption caption="A *b*"]<img src="u">[/caption]"#).unwrap(),
            "{% figure %}![](u){% figcaption %}A \\*b\\*{% endfigcaption %}{% endfigure %}\n"
        );
    }

    #[test]
    fn test_caption_must_start_with_image() {
        let err = render("a[caption]b[/caption]c").unwrap_err();
        assert!(matches!(err, Error::CaptionShape));
        let err = render(r#"[wp_caption]<a href="x">text</a>[/wp_caption]"#).unwrap_err();
        assert!(matches!(err, Error::CaptionShape));
    }

    #[test]
    fn test_unsupported_shortcode() {
        let (mut dom, body) = parse_fragment("[gallery]x[/gallery]");
        let registry = Registry::default().with_tag("gallery", true);
        process_shortcodes(&mut dom, body, &registry).unwrap();
        let identity = |url: &str| url.to_string();
        let mut w = Writer::new(&identity);
        let err = Renderer::new(&dom).render_children(&mut w, body).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShortcode(ref t) if t == "gallery"));
    }

    #[test]
    fn test_doctype_is_an_error() {
        let mut dom = ArenaDom::new();
        let doctype = dom.create_doctype("html".into(), String::new(), String::new());
        let identity = |url: &str| url.to_string();
        let mut w = Writer::new(&identity);
        let err = Renderer::new(&dom).render_node(&mut w, doctype, None).unwrap_err();
        assert!(matches!(err, Error::UnexpectedDoctype));
    }
}
