//! Primitives a host tree must provide to be rendered into

use std::fmt::Debug;
use std::hash::Hash;

use crate::template::{Callback, Value};

/// A mutable target tree
///
/// Nodes are cheap handles compared by identity. Every mutating primitive
/// may fail; the renderer propagates failures unchanged.
pub trait Tree {
    type Node: Clone + Eq + Hash + Debug + 'static;
    type Error: std::error::Error + 'static;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;
    fn create_text(&mut self, data: &str) -> Result<Self::Node, Self::Error>;
    /// Create an inert node with no visible content
    fn create_marker(&mut self) -> Result<Self::Node, Self::Error>;
    /// Create a batch container whose children move on insertion
    fn create_fragment(&mut self) -> Result<Self::Node, Self::Error>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node)
        -> Result<(), Self::Error>;
    /// Insert `node` right before `reference`, in `reference`'s parent
    fn insert_before(&mut self, node: &Self::Node, reference: &Self::Node)
        -> Result<(), Self::Error>;
    /// Detach `node` from its parent
    fn remove(&mut self, node: &Self::Node) -> Result<(), Self::Error>;

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str)
        -> Result<(), Self::Error>;
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;
    fn set_property(&mut self, node: &Self::Node, name: &str, value: &Value)
        -> Result<(), Self::Error>;

    fn add_event_listener(&mut self, node: &Self::Node, event: &str, listener: &Callback)
        -> Result<(), Self::Error>;
    /// Remove a listener previously added with the same event and callback
    fn remove_event_listener(&mut self, node: &Self::Node, event: &str, listener: &Callback)
        -> Result<(), Self::Error>;

    /// Replace the data of a text node
    fn set_text(&mut self, node: &Self::Node, data: &str) -> Result<(), Self::Error>;
}
