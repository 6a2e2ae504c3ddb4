//! Error types for wp2md operations.

use thiserror::Error;

/// Errors that can occur while converting posts.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("shortcode: unexpected closing shortcode '{0}'")]
    UnexpectedClosingShortcode(String),

    #[error("shortcodes still open at end of surrounding HTML tag: {}", .0.join(", "))]
    UnclosedShortcodes(Vec<String>),

    #[error("the content of caption shortcodes must start with an image, possibly nested inside a link")]
    CaptionShape,

    #[error("unhandled shortcode '{0}'")]
    UnsupportedShortcode(String),

    #[error("markup isn't supposed to contain a doctype declaration")]
    UnexpectedDoctype,

    #[error("invalid export: {0}")]
    InvalidExport(String),

    #[error("{title:?}: error converting contents to markdown: {source}")]
    Document {
        title: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the title of the document being converted.
    pub fn in_document(self, title: impl Into<String>) -> Self {
        Error::Document {
            title: title.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error comes from malformed shortcode nesting.
    pub fn is_structural(&self) -> bool {
        match self {
            Error::UnexpectedClosingShortcode(_) | Error::UnclosedShortcodes(_) => true,
            Error::Document { source, .. } => source.is_structural(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
