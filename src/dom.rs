//! In-memory document implementing [`Tree`]
//!
//! A small arena with HTML DOM semantics: tag and attribute names are
//! lowercased, inserting a fragment moves its children, and markers
//! serialize as empty comments. Removed nodes stay in the arena so that
//! handles held by callers remain valid.

use std::any::Any;

use indexmap::IndexMap;
use thiserror::Error;

use crate::parser::is_void_element;
use crate::renderer::Tree;
use crate::template::{Callback, Value};

/// Handle to a node of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Errors raised by document mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("invalid tag name {0:?}")]
    InvalidTagName(String),
    #[error("invalid attribute name {0:?}")]
    InvalidAttributeName(String),
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("node {0:?} is not a text node")]
    NotText(NodeId),
    #[error("node {0:?} has no parent")]
    NoParent(NodeId),
    #[error("node {node:?} cannot be inserted into {parent:?}")]
    Hierarchy { parent: NodeId, node: NodeId },
}

/// Event passed to listeners by [`Document::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub target: NodeId,
}

#[derive(Debug)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    /// Inert placeholder, serialized as `<!---->`
    Marker,
    Fragment,
}

#[derive(Debug, Default)]
pub struct ElementData {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub properties: IndexMap<String, Value>,
    pub listeners: Vec<(String, Callback)>,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of nodes with a `body` element as its root
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<'))
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            body: NodeId(0),
        };
        doc.body = doc.alloc(NodeKind::Element(ElementData {
            tag: "body".to_string(),
            ..ElementData::default()
        }));
        doc
    }

    /// The root element
    pub fn body(&self) -> NodeId {
        self.body
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn data(&self, id: NodeId) -> Result<&NodeData, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self.data_mut(id)?.kind {
            NodeKind::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|data| &data.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map_or(&[][..], |data| data.children.as_slice())
    }

    /// Lowercased tag name of an element
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Attribute names of an element in insertion order
    pub fn attribute_names(&self, id: NodeId) -> Vec<&str> {
        self.element(id)
            .map(|element| element.attributes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn property(&self, id: NodeId, name: &str) -> Option<&Value> {
        self.element(id)?.properties.get(name)
    }

    /// Data of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Text(data) => Some(data),
            _ => None,
        }
    }

    /// Concatenated data of every descendant text node
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.nodes.get(id.0).map(|data| &data.kind) {
            Some(NodeKind::Text(data)) => out.push_str(data),
            Some(_) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// Markup of the children of `id`
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_html(child, &mut out);
        }
        out
    }

    /// Markup of `id` itself
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(id.0) else {
            return;
        };
        match &data.kind {
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&value.replace('&', "&amp;").replace('"', "&quot;"));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&element.tag) {
                    return;
                }
                out.push_str(&self.inner_html(id));
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
            NodeKind::Text(text) => {
                let escaped = text
                    .replace('&', "&amp;")
                    .replace('<', "&lt;")
                    .replace('>', "&gt;");
                out.push_str(&escaped);
            }
            NodeKind::Marker => out.push_str("<!---->"),
            NodeKind::Fragment => out.push_str(&self.inner_html(id)),
        }
    }

    /// Descendant elements of `root` with the given tag, in document order
    pub fn query_all(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect_tagged(root, &tag.to_ascii_lowercase(), &mut found);
        found
    }

    /// First descendant element of `root` with the given tag
    pub fn query(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.query_all(root, tag).into_iter().next()
    }

    fn collect_tagged(&self, id: NodeId, tag: &str, found: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            if self.tag(child) == Some(tag) {
                found.push(child);
            }
            self.collect_tagged(child, tag, found);
        }
    }

    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.element(id).map_or(0, |element| {
            element
                .listeners
                .iter()
                .filter(|(name, _)| name == event)
                .count()
        })
    }

    /// Invoke the listeners of `id` for `event`; returns how many ran
    pub fn dispatch(&self, id: NodeId, event: &str) -> usize {
        let listeners: Vec<Callback> = self.element(id).map_or_else(Vec::new, |element| {
            element
                .listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, listener)| listener.clone())
                .collect()
        });
        let event = Event {
            name: event.to_string(),
            target: id,
        };
        for listener in &listeners {
            listener.call(&event as &dyn Any);
        }
        listeners.len()
    }

    fn is_container(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(id.0).map(|data| &data.kind),
            Some(NodeKind::Element(_) | NodeKind::Fragment)
        )
    }

    /// Whether `node` is `id` or one of its ancestors
    fn is_inclusive_ancestor(&self, node: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(candidate) = current {
            if candidate == node {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        if let Some(parent) = self.data_mut(node)?.parent.take() {
            self.data_mut(parent)?.children.retain(|&child| child != node);
        }
        Ok(())
    }

    /// Insert `node` into `parent` at `index`; fragments contribute their children
    fn insert_at(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), DomError> {
        if !self.is_container(parent) || self.is_inclusive_ancestor(node, parent) {
            return Err(DomError::Hierarchy { parent, node });
        }

        let is_fragment = matches!(self.data(node)?.kind, NodeKind::Fragment);
        let moved = if is_fragment {
            std::mem::take(&mut self.data_mut(node)?.children)
        } else {
            self.detach(node)?;
            vec![node]
        };
        for &child in &moved {
            self.data_mut(child)?.parent = Some(parent);
        }
        let children = &mut self.data_mut(parent)?.children;
        let index = index.min(children.len());
        children.splice(index..index, moved);
        Ok(())
    }
}

impl Tree for Document {
    type Node = NodeId;
    type Error = DomError;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        if !valid_tag_name(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }
        Ok(self.alloc(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..ElementData::default()
        })))
    }

    fn create_text(&mut self, data: &str) -> Result<NodeId, DomError> {
        Ok(self.alloc(NodeKind::Text(data.to_string())))
    }

    fn create_marker(&mut self) -> Result<NodeId, DomError> {
        Ok(self.alloc(NodeKind::Marker))
    }

    fn create_fragment(&mut self) -> Result<NodeId, DomError> {
        Ok(self.alloc(NodeKind::Fragment))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.insert_at(*parent, usize::MAX, *child)
    }

    fn insert_before(&mut self, node: &NodeId, reference: &NodeId) -> Result<(), DomError> {
        let parent = self
            .data(*reference)?
            .parent
            .ok_or(DomError::NoParent(*reference))?;
        if node == reference {
            return Ok(());
        }
        if self.data(*node)?.parent == Some(parent) {
            self.detach(*node)?;
        }
        let index = self
            .children(parent)
            .iter()
            .position(|child| child == reference)
            .ok_or(DomError::NoParent(*reference))?;
        self.insert_at(parent, index, *node)
    }

    fn remove(&mut self, node: &NodeId) -> Result<(), DomError> {
        self.detach(*node)
    }

    fn first_child(&self, node: &NodeId) -> Option<NodeId> {
        self.children(*node).first().copied()
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(*node)?);
        let position = siblings.iter().position(|child| child == node)?;
        siblings.get(position + 1).copied()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if !valid_attribute_name(name) {
            return Err(DomError::InvalidAttributeName(name.to_string()));
        }
        self.element_mut(*node)?
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(*node)?
            .attributes
            .shift_remove(&name.to_ascii_lowercase());
        Ok(())
    }

    fn set_property(&mut self, node: &NodeId, name: &str, value: &Value) -> Result<(), DomError> {
        self.element_mut(*node)?
            .properties
            .insert(name.to_string(), value.clone());
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: &Callback,
    ) -> Result<(), DomError> {
        let listeners = &mut self.element_mut(*node)?.listeners;
        let present = listeners
            .iter()
            .any(|(name, existing)| name == event && existing.ptr_eq(listener));
        if !present {
            listeners.push((event.to_string(), listener.clone()));
        }
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: &Callback,
    ) -> Result<(), DomError> {
        self.element_mut(*node)?
            .listeners
            .retain(|(name, existing)| !(name == event && existing.ptr_eq(listener)));
        Ok(())
    }

    fn set_text(&mut self, node: &NodeId, data: &str) -> Result<(), DomError> {
        match &mut self.data_mut(*node)?.kind {
            NodeKind::Text(text) => {
                data.clone_into(text);
                Ok(())
            }
            _ => Err(DomError::NotText(*node)),
        }
    }
}
