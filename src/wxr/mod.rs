//! WordPress eXtended RSS (WXR) export reader.
//!
//! Reads the parts of `rss/channel` the converter needs: blog metadata,
//! authors, and every `item` (posts, pages and attachments alike). Element
//! names are resolved against their namespace, so `wp:post_id` matches
//! whatever prefix the export binds to a WordPress export namespace.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};

use crate::error::{Error, Result};
use crate::util::decode_text;

/// Prefix of every WXR version's namespace (`.../export/1.2/`).
const WP_NS: &[u8] = b"http://wordpress.org/export/";
const CONTENT_NS: &[u8] = b"http://purl.org/rss/1.0/modules/content/";

/// The exported blog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub base_blog_url: String,
    pub authors: Vec<Author>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub login: String,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
}

/// One exported post, page, attachment, menu item, ...
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub link: String,
    /// Post body HTML.
    pub content: String,
    pub post_id: u64,
    pub post_date_gmt: String,
    pub post_name: String,
    pub post_type: String,
    /// `0` when the item has no parent.
    pub post_parent: u64,
    pub comment_status: String,
    pub status: String,
    pub attachment_url: String,
    pub categories: Vec<String>,
}

/// Read and parse an export file.
pub fn read_wxr(path: impl AsRef<Path>) -> Result<Channel> {
    let path = path.as_ref();
    log::debug!("reading export {}", path.display());
    let bytes = fs::read(path)?;
    parse_wxr(&decode_text(&bytes))
}

/// Parse an export document.
pub fn parse_wxr(content: &str) -> Result<Channel> {
    let mut reader = NsReader::from_str(content);

    let mut channel = Channel::default();
    let mut item: Option<Item> = None;
    let mut author: Option<Author> = None;
    let mut path: Vec<String> = Vec::new();
    let mut buf_text = String::new();

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) => {
                let name = canonical_name(&ns, e.local_name().as_ref());
                match name.as_str() {
                    "item" => item = Some(Item::default()),
                    "wp:author" => author = Some(Author::default()),
                    _ => {}
                }
                path.push(name);
                buf_text.clear();
            }
            (_, Event::Text(e)) => buf_text.push_str(&String::from_utf8_lossy(e.as_ref())),
            (_, Event::CData(e)) => buf_text.push_str(&String::from_utf8_lossy(&e)),
            (_, Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match resolve_entity(&entity) {
                    Some(resolved) => buf_text.push_str(&resolved),
                    None => {
                        buf_text.push('&');
                        buf_text.push_str(&entity);
                        buf_text.push(';');
                    }
                }
            }
            (_, Event::End(_)) => {
                let Some(name) = path.pop() else {
                    continue;
                };
                let text = std::mem::take(&mut buf_text);
                let parent = path.last().map(String::as_str).unwrap_or("");

                match (parent, name.as_str()) {
                    (_, "item") => {
                        if let Some(done) = item.take() {
                            channel.items.push(done);
                        }
                    }
                    (_, "wp:author") => {
                        if let Some(done) = author.take() {
                            channel.authors.push(done);
                        }
                    }
                    ("item", field) => {
                        if let Some(item) = item.as_mut() {
                            set_item_field(item, field, text)?;
                        }
                    }
                    ("wp:author", field) => {
                        if let Some(author) = author.as_mut() {
                            set_author_field(author, field, text);
                        }
                    }
                    ("channel", "title") => channel.title = text,
                    ("channel", "link") => channel.link = text,
                    ("channel", "wp:base_blog_url") => channel.base_blog_url = text,
                    _ => {}
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    log::debug!(
        "export has {} items and {} authors",
        channel.items.len(),
        channel.authors.len()
    );
    Ok(channel)
}

/// Name an element the way WordPress prefixes it: `wp:` for the export
/// namespace, `content:` for RSS content, bare for no namespace. An
/// undeclared prefix is kept as written.
fn canonical_name(ns: &ResolveResult<'_>, local: &[u8]) -> String {
    let local = String::from_utf8_lossy(local);
    match ns {
        ResolveResult::Unbound => local.into_owned(),
        ResolveResult::Bound(Namespace(uri)) if uri.starts_with(WP_NS) => format!("wp:{local}"),
        ResolveResult::Bound(Namespace(uri)) if *uri == CONTENT_NS => format!("content:{local}"),
        ResolveResult::Bound(Namespace(uri)) => {
            format!("{{{}}}{local}", String::from_utf8_lossy(uri))
        }
        ResolveResult::Unknown(prefix) => format!("{}:{local}", String::from_utf8_lossy(prefix)),
    }
}

fn set_item_field(item: &mut Item, field: &str, text: String) -> Result<()> {
    match field {
        "title" => item.title = text,
        "link" => item.link = text,
        "content:encoded" => item.content = text,
        "wp:post_id" => item.post_id = parse_number(field, &text)?,
        "wp:post_date_gmt" => item.post_date_gmt = text,
        "wp:post_name" => item.post_name = text,
        "wp:post_type" => item.post_type = text,
        "wp:post_parent" => item.post_parent = parse_number(field, &text)?,
        "wp:comment_status" => item.comment_status = text,
        "wp:status" => item.status = text,
        "wp:attachment_url" => item.attachment_url = text,
        "category" => item.categories.push(text),
        _ => {}
    }
    Ok(())
}

fn set_author_field(author: &mut Author, field: &str, text: String) {
    match field {
        "wp:author_login" => author.login = text,
        "wp:author_email" => author.email = text,
        "wp:author_display_name" => author.display_name = text,
        "wp:author_first_name" => author.first_name = text,
        "wp:author_last_name" => author.last_name = text,
        _ => {}
    }
}

/// Parse a numeric field. An empty field is zero.
fn parse_number<T: FromStr + Default>(field: &str, text: &str) -> Result<T> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(T::default());
    }
    text.parse()
        .map_err(|_| Error::InvalidExport(format!("{field}: not a number: {text:?}")))
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}
