//! Projection of a static tree onto a live tree
//!
//! Mounting creates every static node once and records, per placeholder,
//! where its value lands. The [`MutationTable`] it returns is what the
//! resolver patches on every later render.

use std::rc::Rc;

use crate::parser::{AttrValue, Binding, Node, StaticTree};
use crate::template::Value;

use super::resolver;
use super::tree::Tree;

/// Live state of every placeholder of one mounted static tree
#[derive(Debug)]
pub struct MutationTable<N> {
    pub(crate) slots: Vec<Option<Slot<N>>>,
}

impl<N> Default for MutationTable<N> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<N> MutationTable<N> {
    fn with_capacity(slot_count: usize) -> Self {
        let mut slots = Vec::with_capacity(slot_count);
        slots.resize_with(slot_count, || None);
        Self { slots }
    }

    fn insert(&mut self, index: usize, slot: Slot<N>) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(slot);
    }

    /// Number of placeholder positions, populated or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of placeholders bound to live state
    pub fn populated(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Value last applied to placeholder `index`
    pub fn previous(&self, index: usize) -> Option<&Value> {
        match self.slots.get(index)?.as_ref()? {
            Slot::Attribute(slot) => Some(&slot.prev),
            Slot::Content(slot) => Some(&slot.item.value),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Slot<N> {
    Attribute(AttrSlot<N>),
    Content(ContentSlot<N>),
}

/// Attribute placeholder: live element plus decoded binding
#[derive(Debug)]
pub(crate) struct AttrSlot<N> {
    pub(crate) node: N,
    pub(crate) binding: Binding,
    pub(crate) prev: Value,
}

/// Content placeholder: persistent marker the content is inserted before
#[derive(Debug)]
pub(crate) struct ContentSlot<N> {
    pub(crate) marker: N,
    pub(crate) item: Item<N>,
}

/// A value together with the live content it produced
#[derive(Debug)]
pub(crate) struct Item<N> {
    pub(crate) value: Value,
    pub(crate) content: Content<N>,
}

impl<N> Default for Item<N> {
    fn default() -> Self {
        Self {
            value: Value::Null,
            content: Content::Empty,
        }
    }
}

/// Live content of a content placeholder or list item
#[derive(Debug)]
pub(crate) enum Content<N> {
    Empty,
    Text(N),
    Nested(Box<Nested<N>>),
    List(Vec<Item<N>>),
}

/// A nested template bracketed by two markers
#[derive(Debug)]
pub(crate) struct Nested<N> {
    pub(crate) tree: Rc<StaticTree>,
    pub(crate) start: N,
    pub(crate) end: N,
    pub(crate) table: MutationTable<N>,
}

impl<N: Clone> Content<N> {
    /// First live node of this content, if it produced any
    pub(crate) fn first_node(&self) -> Option<N> {
        match self {
            Content::Empty => None,
            Content::Text(node) => Some(node.clone()),
            Content::Nested(nested) => Some(nested.start.clone()),
            Content::List(items) => items.iter().find_map(|item| item.content.first_node()),
        }
    }
}

/// Mount `statics` as the last children of `parent`
///
/// Returns the mutation table and the top-level nodes created. Bound
/// attributes and content are left for the first resolve.
pub fn mount<T: Tree>(
    tree: &mut T,
    statics: &StaticTree,
    parent: &T::Node,
) -> Result<(MutationTable<T::Node>, Vec<T::Node>), T::Error> {
    let mut table = MutationTable::with_capacity(statics.slot_count);
    let nodes = mount_nodes(tree, &statics.nodes, parent, &mut table)?;
    log::debug!(
        "mounted {} top-level nodes with {} bound placeholders",
        nodes.len(),
        table.populated()
    );
    Ok((table, nodes))
}

pub(crate) fn mount_nodes<T: Tree>(
    tree: &mut T,
    nodes: &[Node],
    parent: &T::Node,
    table: &mut MutationTable<T::Node>,
) -> Result<Vec<T::Node>, T::Error> {
    let mut created = Vec::with_capacity(nodes.len());

    for node in nodes {
        let live = match node {
            Node::Element(element) => {
                let live = tree.create_element(&element.tag)?;
                tree.append_child(parent, &live)?;
                for (name, value) in &element.attrs {
                    let Some(binding) = Binding::decode(name) else {
                        continue;
                    };
                    match value {
                        AttrValue::Literal(literal) => {
                            let literal = Value::from(literal.as_str());
                            resolver::apply_binding(tree, &live, &binding, &Value::Null, &literal)?;
                        }
                        AttrValue::Slot(index) => table.insert(
                            *index,
                            Slot::Attribute(AttrSlot {
                                node: live.clone(),
                                binding,
                                prev: Value::Null,
                            }),
                        ),
                    }
                }
                if !element.has_markup_binding() {
                    mount_nodes(tree, &element.children, &live, table)?;
                }
                live
            }
            Node::Text(text) => {
                let live = tree.create_text(text)?;
                tree.append_child(parent, &live)?;
                live
            }
            Node::Slot(index) => {
                let marker = tree.create_marker()?;
                tree.append_child(parent, &marker)?;
                table.insert(
                    *index,
                    Slot::Content(ContentSlot {
                        marker: marker.clone(),
                        item: Item::default(),
                    }),
                );
                marker
            }
        };
        created.push(live);
    }

    Ok(created)
}
