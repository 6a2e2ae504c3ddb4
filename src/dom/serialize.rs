//! Generic HTML serialization of arena subtrees.
//!
//! The Markdown renderer falls back to this for anything it has no rule for,
//! so the output keeps the original markup (including attributes) intact.

use std::io::{self, Write};

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use super::arena::{ArenaDom, NodeData, NodeId};

/// A node reference that html5ever's serializer can walk.
pub struct SerializableNode<'a> {
    dom: &'a ArenaDom,
    id: NodeId,
}

impl<'a> SerializableNode<'a> {
    pub fn new(dom: &'a ArenaDom, id: NodeId) -> Self {
        Self { dom, id }
    }
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => serialize_subtree(self.dom, self.id, serializer),
            TraversalScope::ChildrenOnly(_) => {
                for child in self.dom.children(self.id) {
                    serialize_subtree(self.dom, child, serializer)?;
                }
                Ok(())
            }
        }
    }
}

fn serialize_subtree<S: Serializer>(dom: &ArenaDom, id: NodeId, serializer: &mut S) -> io::Result<()> {
    let Some(node) = dom.get(id) else {
        return Ok(());
    };

    match &node.data {
        NodeData::Element { name, attrs } => {
            serializer.start_elem(
                name.clone(),
                attrs.iter().map(|a| (&a.name, a.value.as_str())),
            )?;
            for child in dom.children(id) {
                serialize_subtree(dom, child, serializer)?;
            }
            serializer.end_elem(name.clone())
        }
        NodeData::Text(text) => serializer.write_text(text),
        NodeData::Comment(text) => serializer.write_comment(text),
        NodeData::Doctype { name, .. } => serializer.write_doctype(name),
        NodeData::Document => {
            for child in dom.children(id) {
                serialize_subtree(dom, child, serializer)?;
            }
            Ok(())
        }
    }
}

/// Serialize a node and its subtree as HTML into `writer`.
pub fn serialize_node<W: Write>(dom: &ArenaDom, id: NodeId, writer: W) -> io::Result<()> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(writer, &SerializableNode::new(dom, id), opts)
}

/// Serialize the children of a node as an HTML string.
pub fn inner_html(dom: &ArenaDom, id: NodeId) -> io::Result<String> {
    let mut bytes = Vec::new();
    for child in dom.children(id) {
        serialize_node(dom, child, &mut bytes)?;
    }
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
