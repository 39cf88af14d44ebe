//! Template handles produced by invoking a template
//!
//! A template invocation pairs the parsed, shared static tree of a call site
//! with the values supplied for its placeholders:
//!
//! ```rust
//! use slotted::{html, Value};
//!
//! let item = |name: &str| html!("<li>", name, "</li>");
//! let list = html!("<ul>", vec![item("a")?, item("b")?], "</ul>")?;
//!
//! assert_eq!(list.values().len(), 1);
//! assert!(matches!(list.values()[0], Value::List(_)));
//! # Ok::<(), slotted::TemplateError>(())
//! ```

mod cache;
mod value;

use std::fmt;
use std::rc::Rc;

pub use cache::{with_cache, FragmentsId, TemplateCache};
pub use value::{Attributes, Callback, NodeRef, Value};

use crate::error::TemplateError;
use crate::parser::{AttrValue, Node, StaticTree, KEY_ATTRIBUTE};

/// Static tree of a bare value rendered on its own: a single content slot
fn content_tree() -> Rc<StaticTree> {
    thread_local! {
        static CONTENT: Rc<StaticTree> = Rc::new(StaticTree {
            nodes: vec![Node::Slot(0)],
            slot_count: 1,
        });
    }
    CONTENT.with(Rc::clone)
}

/// A template invocation: shared static tree, values and reconciliation key
#[derive(Clone)]
pub struct Template(Rc<TemplateData>);

struct TemplateData {
    tree: Rc<StaticTree>,
    values: Vec<Value>,
    key: Option<Value>,
}

impl Template {
    /// Invoke a template through the thread's template cache
    ///
    /// `fragments` must be a `static` so repeated invocations share the
    /// parsed tree; prefer the [`html!`](crate::html!) macro.
    pub fn new(
        fragments: &'static [&'static str],
        values: Vec<Value>,
    ) -> Result<Self, TemplateError> {
        let tree = with_cache(|cache| cache.get_or_parse(fragments))?;
        Self::from_tree(tree, values)
    }

    /// Build a handle from an already parsed tree
    pub fn from_tree(tree: Rc<StaticTree>, values: Vec<Value>) -> Result<Self, TemplateError> {
        if values.len() != tree.slot_count {
            return Err(TemplateError::ArityMismatch {
                expected: tree.slot_count,
                found: values.len(),
            });
        }
        let key = find_key(&tree, &values);
        Ok(Template(Rc::new(TemplateData { tree, values, key })))
    }

    /// Wrap any value as a template; non-templates get a single content slot
    pub fn wrap(value: Value) -> Self {
        match value {
            Value::Template(t) => t,
            other => Template(Rc::new(TemplateData {
                tree: content_tree(),
                values: vec![other],
                key: None,
            })),
        }
    }

    pub fn tree(&self) -> &Rc<StaticTree> {
        &self.0.tree
    }

    pub fn values(&self) -> &[Value] {
        &self.0.values
    }

    /// Key from a `key` attribute on the first top-level element, if any
    pub fn key(&self) -> Option<&Value> {
        self.0.key.as_ref()
    }

    /// Whether both handles are the same invocation
    pub fn ptr_eq(&self, other: &Template) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether both handles come from the same static tree
    pub fn same_tree(&self, other: &Template) -> bool {
        Rc::ptr_eq(&self.0.tree, &other.0.tree)
    }
}

fn find_key(tree: &StaticTree, values: &[Value]) -> Option<Value> {
    let element = tree.nodes.first()?.as_element()?;
    let key = match element.attrs.get(KEY_ATTRIBUTE)? {
        AttrValue::Literal(s) => Value::from(s.as_str()),
        AttrValue::Slot(index) => values.get(*index)?.clone(),
    };
    (!key.is_null()).then_some(key)
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("nodes", &self.0.tree.nodes.len())
            .field("values", &self.0.values)
            .field("key", &self.0.key)
            .finish()
    }
}

/// Invoke a template from its fragments and values
pub fn html(
    fragments: &'static [&'static str],
    values: Vec<Value>,
) -> Result<Template, TemplateError> {
    Template::new(fragments, values)
}
