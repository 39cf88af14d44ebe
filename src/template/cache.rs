//! Cache of parsed templates keyed by fragment identity

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ParseError;
use crate::parser::{parse, StaticTree};

/// Identity of a `'static` fragment slice: its address and length
///
/// The `html!` macro places fragments in a call-site `static`, so every
/// invocation of the same call site yields the same identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentsId {
    addr: usize,
    len: usize,
}

impl FragmentsId {
    pub fn of(fragments: &'static [&'static str]) -> Self {
        Self {
            addr: fragments.as_ptr() as usize,
            len: fragments.len(),
        }
    }
}

/// Parsed static trees shared by every invocation of a call site
#[derive(Debug, Default)]
pub struct TemplateCache {
    trees: HashMap<FragmentsId, Rc<StaticTree>>,
}

impl TemplateCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tree for `fragments`, parsing them on first use
    ///
    /// A failed parse leaves the cache untouched.
    pub fn get_or_parse(
        &mut self,
        fragments: &'static [&'static str],
    ) -> Result<Rc<StaticTree>, ParseError> {
        let id = FragmentsId::of(fragments);
        if let Some(tree) = self.trees.get(&id) {
            return Ok(Rc::clone(tree));
        }

        let tree = Rc::new(parse(fragments)?);
        self.trees.insert(id, Rc::clone(&tree));
        Ok(tree)
    }

    /// Get an already parsed tree
    pub fn get(&self, fragments: &'static [&'static str]) -> Option<&Rc<StaticTree>> {
        self.trees.get(&FragmentsId::of(fragments))
    }

    pub fn contains(&self, fragments: &'static [&'static str]) -> bool {
        self.trees.contains_key(&FragmentsId::of(fragments))
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Drop every cached tree; handles already created keep theirs alive
    pub fn clear(&mut self) {
        self.trees.clear();
    }
}

thread_local! {
    static CACHE: RefCell<TemplateCache> = RefCell::new(TemplateCache::new());
}

/// Run `f` with the thread's template cache
pub fn with_cache<R>(f: impl FnOnce(&mut TemplateCache) -> R) -> R {
    CACHE.with(|cache| f(&mut cache.borrow_mut()))
}
