//! Known shortcode tags.

use std::collections::HashMap;

/// Maps shortcode tag names to whether they are block tags.
///
/// Block tags need separate open and close markers and collect the content
/// between them; standalone tags are always self-closing. A tag that is not
/// registered is never treated as markup.
#[derive(Debug, Clone)]
pub struct Registry {
    tags: HashMap<String, bool>,
}

impl Registry {
    /// An empty registry: no bracket text is recognized.
    pub fn empty() -> Self {
        Self {
            tags: HashMap::new(),
        }
    }

    /// Register a tag, replacing any previous classification.
    pub fn with_tag(mut self, name: &str, is_block: bool) -> Self {
        self.insert(name, is_block);
        self
    }

    pub fn insert(&mut self, name: &str, is_block: bool) {
        self.tags.insert(name.to_string(), is_block);
    }

    /// `Some(is_block)` for a known tag, `None` otherwise.
    pub fn is_block(&self, name: &str) -> Option<bool> {
        self.tags.get(name).copied()
    }

    /// Registered tag names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }
}

impl Default for Registry {
    /// The shortcodes the Markdown renderer knows how to emit.
    fn default() -> Self {
        Self::empty()
            .with_tag("caption", true)
            .with_tag("wp_caption", true)
            .with_tag("latex", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tags() {
        let registry = Registry::default();
        assert_eq!(registry.is_block("caption"), Some(true));
        assert_eq!(registry.is_block("wp_caption"), Some(true));
        assert_eq!(registry.is_block("latex"), Some(true));
        assert_eq!(registry.is_block("gallery"), None);
    }

    #[test]
    fn test_with_tag_overrides() {
        let registry = Registry::default().with_tag("latex", false);
        assert_eq!(registry.is_block("latex"), Some(false));
        assert_eq!(registry.is_block("caption"), Some(true));
    }
}
