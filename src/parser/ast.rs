//! Static node tree produced by the template parser

use indexmap::IndexMap;

/// Element names that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Attribute name reserved for list reconciliation identity
pub const KEY_ATTRIBUTE: &str = "key";

/// Attribute name that spreads a mapping of further attributes
pub const SPREAD_ATTRIBUTE: &str = "...";

/// Check whether a tag name is a void element (ASCII case-insensitive)
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// The parse result for one fragment sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StaticTree {
    /// Top-level nodes in source order
    pub nodes: Vec<Node>,
    /// Number of placeholders implied by the fragments
    pub slot_count: usize,
}

/// A node of the immutable template tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Content placeholder referring to an argument index
    Slot(usize),
}

impl Node {
    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Get the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element with its attributes and children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Tag name as written in the template
    pub tag: String,
    /// Attributes in source order, names still carrying their prefix
    pub attrs: IndexMap<String, AttrValue>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    /// Add a child node (builder style)
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }

    /// Whether an `unsafe-html` attribute owns the children of this element
    ///
    /// Static children of such an element are never materialized.
    pub fn has_markup_binding(&self) -> bool {
        self.attrs
            .keys()
            .any(|name| matches!(Binding::decode(name), Some(Binding::Markup)))
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Value of a static attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Literal(String),
    /// Placeholder index bound to this attribute
    Slot(usize),
}

impl AttrValue {
    pub fn literal(value: impl Into<String>) -> Self {
        AttrValue::Literal(value.into())
    }
}

/// How a bound attribute mutates its node, decoded from the name prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `name` - set or remove a string attribute
    Attribute(String),
    /// `?name` - present with an empty value when truthy, absent otherwise
    Boolean(String),
    /// `.name` - assign a property on the live node
    Property(String),
    /// `@name` - subscribe an event listener
    Event(String),
    /// `ref` - hand the live node to a callback or reference cell
    Ref,
    /// `...` - apply every entry of a mapping as its own binding
    Spread,
    /// `unsafe-html` - replace the children with parsed markup
    Markup,
}

impl Binding {
    /// Decode an attribute name; `key` never materializes and yields `None`
    pub fn decode(name: &str) -> Option<Self> {
        if name == KEY_ATTRIBUTE {
            return None;
        }
        if name == SPREAD_ATTRIBUTE {
            return Some(Binding::Spread);
        }
        if name == "ref" {
            return Some(Binding::Ref);
        }
        if name == "unsafe-html" {
            return Some(Binding::Markup);
        }
        let mut chars = name.chars();
        let binding = match chars.next() {
            Some('?') => Binding::Boolean(chars.as_str().to_string()),
            Some('.') => Binding::Property(chars.as_str().to_string()),
            Some('@') => Binding::Event(chars.as_str().to_string()),
            _ => Binding::Attribute(name.to_string()),
        };
        Some(binding)
    }
}
