//! Renderers for template handles
//!
//! A handle is either projected onto a live [`Tree`] (mounted once per
//! container, then patched on every render) or serialized to a string.

pub mod config;
mod mount;
mod resolver;
mod root;
mod string;
mod tree;

pub use config::{ConfigError, SerializeConfig};
pub use mount::{mount, MutationTable};
pub use resolver::resolve;
pub use root::Renderer;
pub use string::{serialize, serialize_value};
pub use tree::Tree;
