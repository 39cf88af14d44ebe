//! Argument values bound to template placeholders

use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::Template;

/// Pointer identity for possibly unsized shared values
fn same_rc<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A value supplied for one placeholder
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value: renders nothing and removes plain attributes
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    /// Nested template
    Template(Template),
    /// Dynamic child list
    List(Rc<[Value]>),
    /// Mapping applied through a spread binding
    Attributes(Attributes),
    /// Event listener or ref callback
    Callback(Callback),
    /// Reference cell receiving the live node of a `ref` binding
    Ref(NodeRef),
    /// Arbitrary payload for property bindings
    Opaque(Rc<dyn Any>),
}

impl Value {
    /// Wrap an arbitrary payload for a property binding
    pub fn opaque(payload: impl Any) -> Self {
        Value::Opaque(Rc::new(payload))
    }

    /// Build a list value
    pub fn list(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Identity comparison used to decide whether a slot changed
    ///
    /// Scalars compare by value (so `NaN` never equals itself), everything
    /// else by pointer identity.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Template(a), Value::Template(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => same_rc(a, b),
            (Value::Attributes(a), Value::Attributes(b)) => same_rc(&a.0, &b.0),
            (Value::Callback(a), Value::Callback(b)) => a.ptr_eq(b),
            (Value::Ref(a), Value::Ref(b)) => same_rc(&a.0, &b.0),
            (Value::Opaque(a), Value::Opaque(b)) => same_rc(a, b),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness used by boolean bindings
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Text form of a scalar; non-scalars render as the empty string
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Number(n) => Cow::Owned(format_number(*n)),
            Value::Str(s) => Cow::Borrowed(&**s),
            _ => Cow::Borrowed(""),
        }
    }

    pub fn as_template(&self) -> Option<&Template> {
        match self {
            Value::Template(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_attributes(&self) -> Option<&Attributes> {
        match self {
            Value::Attributes(attrs) => Some(attrs),
            _ => None,
        }
    }
}

/// Shortest round-trip decimal form, switching to exponent notation
/// (`1e+21`, `1.5e-7`) outside `[1e-6, 1e21)`
fn format_number(n: f64) -> String {
    if n.is_infinite() {
        return (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() || (1e-6..1e21).contains(&n.abs()) {
        return n.to_string();
    }
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Attributes(attrs) => f.debug_tuple("Attributes").field(attrs).finish(),
            Value::Callback(_) => f.write_str("Callback(..)"),
            Value::Ref(_) => f.write_str("Ref(..)"),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(Rc::from(s.as_str()))
    }
}

impl From<Template> for Value {
    fn from(t: Template) -> Self {
        Value::Template(t)
    }
}

impl From<Attributes> for Value {
    fn from(attrs: Attributes) -> Self {
        Value::Attributes(attrs)
    }
}

impl From<Callback> for Value {
    fn from(cb: Callback) -> Self {
        Value::Callback(cb)
    }
}

impl From<NodeRef> for Value {
    fn from(r: NodeRef) -> Self {
        Value::Ref(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Ordered attribute mapping for spread bindings
///
/// Names use the same prefixes as template attributes (`?`, `.`, `@`).
#[derive(Clone, Default)]
pub struct Attributes(Rc<IndexMap<String, Value>>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Rc::make_mut(&mut self.0).insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes(Rc::new(
            iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }
}

/// Invocable value for event and ref bindings
///
/// The argument is host defined: event listeners receive the host's event
/// object, ref callbacks receive the live node.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&dyn Any)>);

impl Callback {
    pub fn new(f: impl Fn(&dyn Any) + 'static) -> Self {
        Callback(Rc::new(f))
    }

    pub fn call(&self, arg: &dyn Any) {
        (self.0)(arg)
    }

    /// Identity comparison, used to match listeners on removal
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        same_rc(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Reference cell filled with the live node of a `ref` binding
#[derive(Clone, Default)]
pub struct NodeRef(Rc<RefCell<Option<Box<dyn Any>>>>);

impl NodeRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current node, if one of type `N` was stored
    pub fn get<N: Clone + 'static>(&self) -> Option<N> {
        self.0.borrow().as_ref()?.downcast_ref::<N>().cloned()
    }

    pub(crate) fn set(&self, node: Box<dyn Any>) {
        *self.0.borrow_mut() = Some(node);
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodeRef(..)")
    }
}
