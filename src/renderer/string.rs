//! Serialization of templates to markup strings
//!
//! Serialization walks the static tree with the values of one invocation; it
//! keeps no state and needs no live tree. Placeholder markers never appear in
//! the output.

use crate::parser::{AttrValue, Binding, Element, Node};
use crate::template::{Template, Value};

use super::config::SerializeConfig;

/// Serialize static nodes with the values bound to their placeholders
pub fn serialize(nodes: &[Node], values: &[Value], config: &SerializeConfig) -> String {
    let mut out = String::new();
    Writer { out: &mut out, config }.nodes(nodes, values);
    out
}

/// Serialize a template, or any value as a single content placeholder
pub fn serialize_value(value: &Value, config: &SerializeConfig) -> String {
    let mut out = String::new();
    Writer { out: &mut out, config }.value(value);
    out
}

struct Writer<'a> {
    out: &'a mut String,
    config: &'a SerializeConfig,
}

impl Writer<'_> {
    fn nodes(&mut self, nodes: &[Node], values: &[Value]) {
        let null = Value::Null;
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Slot(index) => self.value(values.get(*index).unwrap_or(&null)),
                Node::Element(element) => self.element(element, values),
            }
        }
    }

    fn value(&mut self, value: &Value) {
        match value {
            Value::Template(template) => self.template(template),
            Value::List(items) => items.iter().for_each(|item| self.value(item)),
            Value::Bool(_) | Value::Number(_) | Value::Str(_) => {
                let text = value.to_text();
                if self.config.escape_dynamic {
                    escape_into(self.out, &text, TEXT_ESCAPES);
                } else {
                    self.out.push_str(&text);
                }
            }
            _ => {}
        }
    }

    fn template(&mut self, template: &Template) {
        self.nodes(&template.tree().nodes, template.values());
    }

    fn element(&mut self, element: &Element, values: &[Value]) {
        let null = Value::Null;
        let mut markup = None;

        self.out.push('<');
        self.out.push_str(&element.tag);
        for (name, value) in &element.attrs {
            let Some(binding) = Binding::decode(name) else {
                continue;
            };
            match value {
                AttrValue::Literal(literal) => {
                    self.attribute(&binding, &Value::from(literal.as_str()), false, &mut markup)
                }
                AttrValue::Slot(index) => {
                    let value = values.get(*index).unwrap_or(&null);
                    self.attribute(&binding, value, self.config.escape_dynamic, &mut markup)
                }
            }
        }

        let owned = element.has_markup_binding();
        if (element.children.is_empty() || owned) && markup.is_none() {
            match (element.is_void(), self.config.self_close_void) {
                (true, true) => self.out.push_str("/>"),
                (true, false) => self.out.push('>'),
                (false, _) => {
                    self.out.push_str("></");
                    self.out.push_str(&element.tag);
                    self.out.push('>');
                }
            }
            return;
        }

        self.out.push('>');
        match markup {
            Some(markup) => self.out.push_str(&markup),
            None => self.nodes(&element.children, values),
        }
        self.out.push_str("</");
        self.out.push_str(&element.tag);
        self.out.push('>');
    }

    fn attribute(
        &mut self,
        binding: &Binding,
        value: &Value,
        escape: bool,
        markup: &mut Option<String>,
    ) {
        match binding {
            Binding::Attribute(name) => {
                if value.is_null() {
                    return;
                }
                self.out.push(' ');
                self.out.push_str(name);
                self.out.push_str("=\"");
                if escape {
                    escape_into(self.out, &value.to_text(), ATTRIBUTE_ESCAPES);
                } else {
                    self.out.push_str(&value.to_text());
                }
                self.out.push('"');
            }
            Binding::Boolean(name) => {
                if value.is_truthy() {
                    self.out.push(' ');
                    self.out.push_str(name);
                }
            }
            Binding::Property(_) | Binding::Event(_) | Binding::Ref => {}
            Binding::Spread => {
                let Some(attrs) = value.as_attributes() else {
                    return;
                };
                for (name, value) in attrs.iter() {
                    match Binding::decode(name) {
                        Some(Binding::Markup) | None => {}
                        Some(binding) => self.attribute(&binding, value, escape, markup),
                    }
                }
            }
            Binding::Markup => {
                if !value.is_null() {
                    *markup = Some(value.to_text().into_owned());
                }
            }
        }
    }
}

const TEXT_ESCAPES: &[(char, &str)] = &[('&', "&amp;"), ('<', "&lt;"), ('>', "&gt;")];
const ATTRIBUTE_ESCAPES: &[(char, &str)] = &[('&', "&amp;"), ('"', "&quot;")];

fn escape_into(out: &mut String, text: &str, escapes: &[(char, &str)]) {
    for c in text.chars() {
        match escapes.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
}
