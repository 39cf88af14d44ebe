//! Rendering into containers of a live tree

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

use crate::parser::StaticTree;
use crate::template::{Template, Value};

use super::mount::{mount, MutationTable};
use super::resolver::{clear_table, resolve};
use super::tree::Tree;

/// What one container currently shows
struct Root<N> {
    tree: Rc<StaticTree>,
    table: MutationTable<N>,
    nodes: Vec<N>,
}

/// Per-container render state for one host tree
///
/// The first render into a container mounts the template after the
/// container's existing children; every render then patches the mounted
/// nodes in place.
///
/// # Example
///
/// ```rust
/// use slotted::{html, dom::Document, Renderer};
///
/// let mut doc = Document::new();
/// let body = doc.body();
/// let mut renderer = Renderer::new();
///
/// for name in ["World", "Rust"] {
///     renderer.render(&mut doc, html!("<p>Hello, ", name, "!</p>")?, &body)?;
/// }
/// assert_eq!(doc.inner_html(body), "<p>Hello, Rust<!---->!</p>");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Renderer<T: Tree> {
    roots: HashMap<T::Node, Root<T::Node>>,
}

impl<T: Tree> Default for Renderer<T> {
    fn default() -> Self {
        Self {
            roots: HashMap::new(),
        }
    }
}

impl<T: Tree> Renderer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `value` into `container`
    ///
    /// Values that are not templates render as a single content
    /// placeholder. A template from a different call site than the one
    /// mounted replaces the mounted content.
    pub fn render(
        &mut self,
        tree: &mut T,
        value: impl Into<Value>,
        container: &T::Node,
    ) -> Result<(), T::Error> {
        let template = Template::wrap(value.into());

        let remount = self
            .roots
            .get(container)
            .is_some_and(|root| !Rc::ptr_eq(&root.tree, template.tree()));
        if remount {
            log::debug!("template changed in {container:?}, remounting");
            self.unmount(tree, container)?;
        }

        let root = match self.roots.entry(container.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let (table, nodes) = mount(tree, template.tree(), container)?;
                entry.insert(Root {
                    tree: Rc::clone(template.tree()),
                    table,
                    nodes,
                })
            }
        };
        resolve(tree, &mut root.table, template.values())
    }

    /// Remove everything rendered into `container`
    ///
    /// Returns `false` when nothing was mounted there.
    pub fn unmount(&mut self, tree: &mut T, container: &T::Node) -> Result<bool, T::Error> {
        let Some(mut root) = self.roots.remove(container) else {
            return Ok(false);
        };
        clear_table(tree, &mut root.table)?;
        for node in &root.nodes {
            tree.remove(node)?;
        }
        log::debug!("unmounted {} top-level nodes from {container:?}", root.nodes.len());
        Ok(true)
    }

    pub fn is_mounted(&self, container: &T::Node) -> bool {
        self.roots.contains_key(container)
    }

    /// Mutation table of the content mounted in `container`
    pub fn table(&self, container: &T::Node) -> Option<&MutationTable<T::Node>> {
        self.roots.get(container).map(|root| &root.table)
    }
}
