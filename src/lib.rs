//! Slotted - parse-once, patch-forever markup templates
//!
//! A template is a sequence of literal markup fragments with placeholders
//! between them. The fragments of a call site are parsed once into a shared
//! static tree; rendering projects that tree onto a live [`Tree`] and later
//! renders patch only the placeholders whose values changed.
//!
//! # Example
//!
//! ```rust
//! use slotted::{html, dom::Document, render_to_string, Renderer};
//!
//! fn counter(count: u32) -> Result<slotted::Template, slotted::TemplateError> {
//!     html!("<p class=", if count > 2 { "many" } else { "few" }, ">", count, " clicks</p>")
//! }
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let mut renderer = Renderer::new();
//!
//! renderer.render(&mut doc, counter(1)?, &body)?;
//! let p = doc.query(body, "p").unwrap();
//! renderer.render(&mut doc, counter(3)?, &body)?;
//!
//! assert_eq!(doc.query(body, "p"), Some(p));
//! assert_eq!(doc.inner_html(body), "<p class=\"many\">3<!----> clicks</p>");
//! assert_eq!(render_to_string(counter(3)?), "<p class=\"many\">3 clicks</p>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dom;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod template;

pub use error::{ParseError, TemplateError};
pub use parser::{parse, StaticTree};
pub use renderer::{serialize, ConfigError, Renderer, SerializeConfig, Tree};
pub use template::{html, Attributes, Callback, NodeRef, Template, Value};

/// Invoke a template
///
/// Fragments are string literals alternating with value expressions, which
/// are converted with [`Value::from`]. The fragments are stored in a
/// call-site `static`, so every invocation of the same call site shares one
/// parsed tree. Evaluates to `Result<Template, TemplateError>`.
///
/// ```rust
/// let item = slotted::html!("<li key=", 7, ">", "seven", "</li>")?;
/// assert_eq!(item.values().len(), 2);
/// assert!(item.key().is_some());
/// # Ok::<(), slotted::TemplateError>(())
/// ```
#[macro_export]
macro_rules! html {
    ($first:literal $(, $value:expr, $fragment:literal)* $(,)?) => {{
        static FRAGMENTS: &[&str] = &[$first $(, $fragment)*];
        $crate::html(
            FRAGMENTS,
            ::std::vec![$($crate::Value::from($value)),*],
        )
    }};
}

/// Serialize a template, or any value, with the default configuration
pub fn render_to_string(value: impl Into<Value>) -> String {
    render_to_string_with_config(value, &SerializeConfig::default())
}

/// Serialize a template, or any value, with a custom configuration
///
/// # Example
///
/// ```rust
/// use slotted::{html, render_to_string_with_config, SerializeConfig};
///
/// let config = SerializeConfig::new().with_self_close_void(true);
/// let out = render_to_string_with_config(html!("<input value=", "a", ">")?, &config);
/// assert_eq!(out, "<input value=\"a\"/>");
/// # Ok::<(), slotted::TemplateError>(())
/// ```
pub fn render_to_string_with_config(value: impl Into<Value>, config: &SerializeConfig) -> String {
    renderer::serialize_value(&value.into(), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_template() {
        let out = render_to_string(html!("\n  <div>Hello</div>\n").unwrap());
        assert_eq!(out, "<div>Hello</div>");
    }

    #[test]
    fn test_render_nested_templates() {
        let items: Vec<Template> = ["a", "b"]
            .iter()
            .map(|s| html!("<li>", *s, "</li>").unwrap())
            .collect();
        let out = render_to_string(html!("<ul>", items, "</ul>").unwrap());
        assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_render_bare_values() {
        assert_eq!(render_to_string(100), "100");
        assert_eq!(render_to_string(Value::Null), "");
        assert_eq!(render_to_string(vec!["a", "b", "c"]), "abc");
    }

    #[test]
    fn test_macro_reuses_call_site() {
        let make = |v: i32| html!("<b>", v, "</b>").unwrap();
        assert!(make(1).same_tree(&make(2)));
        assert!(!make(1).ptr_eq(&make(1)));
    }

    #[test]
    fn test_malformed_template_error() {
        let result = html!("<div !>");
        assert!(matches!(result, Err(TemplateError::Malformed(_))));
    }
}
