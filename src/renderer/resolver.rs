//! Patching a mounted tree against new placeholder values
//!
//! Every placeholder compares its next value with the last applied one
//! ([`Value::same`]) and only touches the live tree when they differ.
//! Content placeholders hold text, nested templates or lists; lists of keyed
//! templates are reconciled by key, every other list by position.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::parser::{parse, Binding};
use crate::template::{Attributes, Template, Value};

use super::mount::{mount_nodes, Content, Item, MutationTable, Nested, Slot};
use super::tree::Tree;

/// Apply `values` to every populated placeholder of `table`, in index order
///
/// Missing values count as [`Value::Null`].
pub fn resolve<T: Tree>(
    tree: &mut T,
    table: &mut MutationTable<T::Node>,
    values: &[Value],
) -> Result<(), T::Error> {
    let null = Value::Null;

    for (index, slot) in table.slots.iter_mut().enumerate() {
        let next = values.get(index).unwrap_or(&null);
        match slot {
            None => {}
            Some(Slot::Attribute(slot)) => {
                if !slot.prev.same(next) {
                    log::trace!("patching attribute slot {index} ({:?})", slot.binding);
                    apply_binding(tree, &slot.node, &slot.binding, &slot.prev, next)?;
                    slot.prev = next.clone();
                }
            }
            Some(Slot::Content(slot)) => {
                patch_item(tree, &mut slot.item, next, &slot.marker)?;
            }
        }
    }

    Ok(())
}

/// Remove every live node produced by the content placeholders of `table`
pub(crate) fn clear_table<T: Tree>(
    tree: &mut T,
    table: &mut MutationTable<T::Node>,
) -> Result<(), T::Error> {
    for slot in table.slots.iter_mut().flatten() {
        if let Slot::Content(slot) = slot {
            clear(tree, &mut slot.item.content)?;
            slot.item.value = Value::Null;
        }
    }
    Ok(())
}

fn patch_item<T: Tree>(
    tree: &mut T,
    item: &mut Item<T::Node>,
    next: &Value,
    anchor: &T::Node,
) -> Result<(), T::Error> {
    if item.value.same(next) {
        return Ok(());
    }
    resolve_content(tree, &mut item.content, next, anchor)?;
    item.value = next.clone();
    Ok(())
}

/// Bring `content` to the state of `next`, inserting new nodes before `anchor`
fn resolve_content<T: Tree>(
    tree: &mut T,
    content: &mut Content<T::Node>,
    next: &Value,
    anchor: &T::Node,
) -> Result<(), T::Error> {
    match next {
        Value::Null => clear(tree, content),
        Value::Template(template) => {
            if let Content::Nested(nested) = content {
                if Rc::ptr_eq(&nested.tree, template.tree()) {
                    return resolve(tree, &mut nested.table, template.values());
                }
            }
            clear(tree, content)?;
            let nested = instantiate(tree, template, anchor)?;
            *content = Content::Nested(Box::new(nested));
            Ok(())
        }
        Value::List(values) => {
            if !matches!(content, Content::List(_)) {
                clear(tree, content)?;
                *content = Content::List(Vec::new());
            }
            let Content::List(items) = content else {
                return Ok(());
            };
            if is_keyed(values) {
                reconcile_keyed(tree, items, values, anchor)
            } else {
                reconcile_positional(tree, items, values, anchor)
            }
        }
        Value::Bool(_) | Value::Number(_) | Value::Str(_) => {
            let text = next.to_text();
            if let Content::Text(node) = content {
                return tree.set_text(node, &text);
            }
            clear(tree, content)?;
            let node = tree.create_text(&text)?;
            tree.insert_before(&node, anchor)?;
            *content = Content::Text(node);
            Ok(())
        }
        other => {
            log::warn!("cannot render {other:?} as content; leaving it empty");
            clear(tree, content)
        }
    }
}

/// Mount `template` in a fresh bracketed range right before `anchor`
fn instantiate<T: Tree>(
    tree: &mut T,
    template: &Template,
    anchor: &T::Node,
) -> Result<Nested<T::Node>, T::Error> {
    let start = tree.create_marker()?;
    let end = tree.create_marker()?;
    let fragment = tree.create_fragment()?;

    let mut table = MutationTable::default();
    mount_nodes(tree, &template.tree().nodes, &fragment, &mut table)?;
    resolve(tree, &mut table, template.values())?;

    tree.insert_before(&start, anchor)?;
    tree.insert_before(&fragment, anchor)?;
    tree.insert_before(&end, anchor)?;

    Ok(Nested {
        tree: Rc::clone(template.tree()),
        start,
        end,
        table,
    })
}

/// Remove the live nodes of `content` and leave it empty
fn clear<T: Tree>(tree: &mut T, content: &mut Content<T::Node>) -> Result<(), T::Error> {
    match std::mem::replace(content, Content::Empty) {
        Content::Empty => Ok(()),
        Content::Text(node) => tree.remove(&node),
        Content::Nested(nested) => remove_range(tree, &nested.start, &nested.end),
        Content::List(mut items) => {
            for item in &mut items {
                clear(tree, &mut item.content)?;
            }
            Ok(())
        }
    }
}

/// Remove `start`, `end` and every sibling between them
fn remove_range<T: Tree>(tree: &mut T, start: &T::Node, end: &T::Node) -> Result<(), T::Error> {
    let mut current = Some(start.clone());
    while let Some(node) = current {
        current = tree.next_sibling(&node);
        tree.remove(&node)?;
        if &node == end {
            break;
        }
    }
    Ok(())
}

fn item_key(value: &Value) -> Option<&Value> {
    value.as_template()?.key()
}

fn is_keyed(values: &[Value]) -> bool {
    !values.is_empty() && values.iter().all(|value| item_key(value).is_some())
}

/// First live node of `items`, falling back to `anchor`
fn anchor_of<'a, N: Clone + 'a>(items: impl IntoIterator<Item = &'a Item<N>>, anchor: &N) -> N {
    items
        .into_iter()
        .find_map(|item| item.content.first_node())
        .unwrap_or_else(|| anchor.clone())
}

fn reconcile_positional<T: Tree>(
    tree: &mut T,
    items: &mut Vec<Item<T::Node>>,
    next: &[Value],
    anchor: &T::Node,
) -> Result<(), T::Error> {
    for (index, value) in next.iter().enumerate() {
        if index < items.len() {
            let before = anchor_of(&items[index + 1..], anchor);
            patch_item(tree, &mut items[index], value, &before)?;
        } else {
            let mut item = Item::default();
            patch_item(tree, &mut item, value, anchor)?;
            items.push(item);
        }
    }

    for mut item in items.drain(next.len()..) {
        clear(tree, &mut item.content)?;
    }
    Ok(())
}

fn reconcile_keyed<T: Tree>(
    tree: &mut T,
    items: &mut Vec<Item<T::Node>>,
    next: &[Value],
    anchor: &T::Node,
) -> Result<(), T::Error> {
    let prev_keys: Vec<Option<Value>> = items
        .iter()
        .map(|item| item_key(&item.value).cloned())
        .collect();
    let next_keys: Vec<&Value> = next.iter().filter_map(item_key).collect();
    let in_prev = |key: &Value| prev_keys.iter().flatten().any(|k| k.same(key));
    let in_next = |key: &Value| next_keys.iter().any(|k| k.same(key));

    let mut old: VecDeque<Item<T::Node>> = std::mem::take(items).into();
    let (mut inserted, mut removed, mut kept) = (0, 0, 0);

    for value in next {
        // Old items whose key is gone come out before the next item is placed
        while let Some(front) = old.front() {
            let stale = match item_key(&front.value) {
                Some(key) => !in_next(key),
                None => false,
            };
            let fresh = item_key(value).is_some_and(|key| !in_prev(key));
            if !stale || fresh {
                break;
            }
            if let Some(mut item) = old.pop_front() {
                clear(tree, &mut item.content)?;
                removed += 1;
            }
        }

        let fresh = item_key(value).is_some_and(|key| !in_prev(key));
        let reused = if fresh { None } else { old.pop_front() };
        let before = anchor_of(&old, anchor);
        let mut item = match reused {
            Some(item) => {
                kept += 1;
                item
            }
            None => {
                inserted += 1;
                Item::default()
            }
        };
        patch_item(tree, &mut item, value, &before)?;
        items.push(item);
    }

    for mut item in old {
        clear(tree, &mut item.content)?;
        removed += 1;
    }

    log::debug!("keyed list: {kept} kept, {inserted} inserted, {removed} removed");
    Ok(())
}

/// Apply one attribute binding to `node`
pub(crate) fn apply_binding<T: Tree>(
    tree: &mut T,
    node: &T::Node,
    binding: &Binding,
    prev: &Value,
    next: &Value,
) -> Result<(), T::Error> {
    match binding {
        Binding::Attribute(name) => {
            if next.is_null() {
                tree.remove_attribute(node, name)
            } else {
                tree.set_attribute(node, name, &next.to_text())
            }
        }
        Binding::Boolean(name) => {
            if next.is_truthy() {
                tree.set_attribute(node, name, "")
            } else {
                tree.remove_attribute(node, name)
            }
        }
        Binding::Property(name) => tree.set_property(node, name, next),
        Binding::Event(name) => {
            if let Value::Callback(listener) = prev {
                tree.remove_event_listener(node, name, listener)?;
            }
            match next {
                Value::Callback(listener) => tree.add_event_listener(node, name, listener),
                Value::Null => Ok(()),
                other => {
                    log::warn!("listener for `{name}` is not a callback: {other:?}");
                    Ok(())
                }
            }
        }
        Binding::Ref => {
            match next {
                Value::Callback(callback) => callback.call(node),
                Value::Ref(cell) => cell.set(Box::new(node.clone())),
                Value::Null => {}
                other => log::warn!("ref binding ignores {other:?}"),
            }
            Ok(())
        }
        Binding::Spread => apply_spread(tree, node, prev.as_attributes(), next),
        Binding::Markup => apply_markup(tree, node, next),
    }
}

fn apply_spread<T: Tree>(
    tree: &mut T,
    node: &T::Node,
    prev: Option<&Attributes>,
    next: &Value,
) -> Result<(), T::Error> {
    let null = Value::Null;
    let empty = Attributes::new();
    let next = match next {
        Value::Attributes(attrs) => attrs,
        Value::Null => &empty,
        other => {
            log::warn!("spread binding expects attributes, got {other:?}");
            &empty
        }
    };

    for (name, value) in next.iter() {
        let old = prev.and_then(|attrs| attrs.get(name)).unwrap_or(&null);
        if old.same(value) {
            continue;
        }
        if let Some(binding) = spread_binding(name) {
            apply_binding(tree, node, &binding, old, value)?;
        }
    }

    for (name, old) in prev.into_iter().flat_map(|attrs| attrs.iter()) {
        if next.contains(name) {
            continue;
        }
        if let Some(binding) = spread_binding(name) {
            apply_binding(tree, node, &binding, old, &null)?;
        }
    }

    Ok(())
}

/// Binding of a spread entry; markup only binds as a template attribute
fn spread_binding(name: &str) -> Option<Binding> {
    match Binding::decode(name)? {
        Binding::Markup => {
            log::warn!("ignoring `{name}` in a spread binding");
            None
        }
        binding => Some(binding),
    }
}

/// Replace the children of `node` with `next` parsed as markup
fn apply_markup<T: Tree>(tree: &mut T, node: &T::Node, next: &Value) -> Result<(), T::Error> {
    while let Some(child) = tree.first_child(node) {
        tree.remove(&child)?;
    }
    if next.is_null() {
        return Ok(());
    }

    let markup = next.to_text();
    match parse(&[markup.as_ref()]) {
        Ok(statics) => {
            let mut table = MutationTable::default();
            mount_nodes(tree, &statics.nodes, node, &mut table)?;
        }
        Err(err) => {
            log::warn!("inserting unparsable markup as text: {err}");
            let text = tree.create_text(&markup)?;
            tree.append_child(node, &text)?;
        }
    }
    Ok(())
}
