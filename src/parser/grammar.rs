//! Streaming parser turning template fragments into a static tree

use crate::error::ParseError;
use crate::parser::ast::{AttrValue, Element, Node, StaticTree, SPREAD_ATTRIBUTE};
use crate::parser::lexer::{self, ContentToken, TagToken, ValueToken, COMMENT_CLOSE};

/// Progress of the attribute currently being read inside a tag
#[derive(Debug, Clone, PartialEq)]
enum Stage {
    /// Name read, `=` not seen yet
    Name,
    /// `=` seen, value expected
    Value,
    /// Opening quote seen at the end of a fragment
    Quoted(char),
}

#[derive(Debug, Clone)]
struct PendingAttr {
    name: String,
    stage: Stage,
}

/// Parser state carried across fragment boundaries
#[derive(Debug, Default)]
struct Parser {
    root: Vec<Node>,
    open: Vec<Element>,
    in_tag: bool,
    in_comment: bool,
    pending: Option<PendingAttr>,
    /// Quote that must open the next fragment, with the placeholder it follows
    expect_quote: Option<(char, usize)>,
}

/// Parse template fragments into a static tree
///
/// `N` fragments imply `N - 1` placeholders, numbered from zero in source
/// order. Placeholders inside comments are dropped.
///
/// # Example
///
/// ```rust
/// use slotted::parser::{parse, Node};
///
/// let tree = parse(&["<p>Hello, ", "</p>"]).unwrap();
/// let p = tree.nodes[0].as_element().unwrap();
/// assert_eq!(p.children, vec![Node::text("Hello, "), Node::Slot(0)]);
/// ```
pub fn parse(fragments: &[&str]) -> Result<StaticTree, ParseError> {
    let mut parser = Parser::default();

    for (i, fragment) in fragments.iter().enumerate() {
        let mut rest: &str = fragment;

        if i > 0 {
            parser.commit_placeholder(i - 1, fragments[i - 1].len())?;
            if let Some((quote, index)) = parser.expect_quote.take() {
                rest = rest
                    .strip_prefix(quote)
                    .ok_or_else(|| ParseError::UnclosedQuote {
                        fragment: i,
                        span: 0..fragment.chars().next().map_or(0, char::len_utf8),
                        index,
                        quote,
                    })?;
            }
        }

        let has_next = i + 1 < fragments.len();
        while !rest.is_empty() {
            let next = parser.step(rest, has_next);
            if next.len() == rest.len() {
                let stalled = rest.trim_start();
                let offset = fragment.len() - stalled.len();
                let found: String = stalled.chars().take(16).collect();
                return Err(ParseError::NoProgress {
                    fragment: i,
                    span: offset..offset + found.len(),
                    found,
                });
            }
            rest = next;
        }
    }

    let tree = parser.finish(fragments.len().saturating_sub(1));
    log::debug!(
        "parsed template: {} fragments, {} top-level nodes",
        fragments.len(),
        tree.nodes.len()
    );
    Ok(tree)
}

impl Parser {
    /// Consume a prefix of `rest`; returning it unchanged signals a stall
    fn step<'a>(&mut self, rest: &'a str, has_next: bool) -> &'a str {
        if self.in_comment {
            return match rest.find(COMMENT_CLOSE) {
                Some(pos) => {
                    self.in_comment = false;
                    &rest[pos + COMMENT_CLOSE.len()..]
                }
                None => "",
            };
        }
        if self.in_tag {
            self.step_tag(rest, has_next)
        } else {
            self.step_content(rest)
        }
    }

    fn step_content<'a>(&mut self, rest: &'a str) -> &'a str {
        let (token, len) = lexer::next_content_token(rest);
        match token {
            ContentToken::Doctype => {}
            ContentToken::CommentOpen => self.in_comment = true,
            ContentToken::CloseTag(name) => self.close_named(name),
            ContentToken::OpenTag(name) => {
                self.open.push(Element::new(name));
                self.in_tag = true;
            }
            ContentToken::Text(text) => {
                let text = lexer::trim_line_breaks(text);
                if !text.is_empty() {
                    self.children_mut().push(Node::text(text));
                }
            }
        }
        &rest[len..]
    }

    fn step_tag<'a>(&mut self, rest: &'a str, has_next: bool) -> &'a str {
        let input = rest.trim_start();
        if input.is_empty() {
            return input;
        }

        if self.awaiting_value() {
            match lexer::next_value_token(input) {
                Some((ValueToken::Quoted(value) | ValueToken::Unquoted(value), len)) => {
                    self.commit_literal(value);
                    return &input[len..];
                }
                Some((ValueToken::OpenQuote(quote), len)) if has_next => {
                    if let Some(pending) = self.pending.as_mut() {
                        pending.stage = Stage::Quoted(quote);
                    }
                    return &input[len..];
                }
                // `<a href=>`: the tag end below commits an empty value
                _ if input.starts_with('>') || input.starts_with("/>") => self.commit_literal(""),
                _ => return rest,
            }
        }

        let Some((token, len)) = lexer::next_tag_token(input) else {
            return rest;
        };
        match token {
            TagToken::End { self_closing } => {
                self.flush_valueless();
                self.in_tag = false;
                let void = self.open.last().is_some_and(Element::is_void);
                if self_closing || void {
                    self.close_current();
                }
            }
            TagToken::Equals => match self.pending.as_mut() {
                Some(pending) if pending.stage == Stage::Name => pending.stage = Stage::Value,
                _ => return rest,
            },
            TagToken::Ellipsis => {
                if !has_next || !input[len..].trim().is_empty() {
                    return rest;
                }
                self.flush_valueless();
                self.pending = Some(PendingAttr {
                    name: SPREAD_ATTRIBUTE.to_string(),
                    stage: Stage::Value,
                });
            }
            TagToken::Name(name) => {
                self.flush_valueless();
                self.pending = Some(PendingAttr {
                    name: name.to_string(),
                    stage: Stage::Name,
                });
            }
        }
        &input[len..]
    }

    fn commit_placeholder(&mut self, index: usize, offset: usize) -> Result<(), ParseError> {
        if self.in_comment {
            log::trace!("dropping placeholder {index} inside a comment");
            return Ok(());
        }
        if !self.in_tag {
            self.children_mut().push(Node::Slot(index));
            return Ok(());
        }

        match self.pending.take() {
            Some(PendingAttr {
                name,
                stage: Stage::Value,
            }) => {
                self.set_attr(name, AttrValue::Slot(index));
                Ok(())
            }
            Some(PendingAttr {
                name,
                stage: Stage::Quoted(quote),
            }) => {
                self.set_attr(name, AttrValue::Slot(index));
                self.expect_quote = Some((quote, index));
                Ok(())
            }
            _ => Err(ParseError::UnboundPlaceholder {
                fragment: index,
                span: offset..offset,
                index,
            }),
        }
    }

    fn awaiting_value(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingAttr {
                stage: Stage::Value,
                ..
            })
        )
    }

    fn commit_literal(&mut self, value: &str) {
        if let Some(pending) = self.pending.take() {
            self.set_attr(pending.name, AttrValue::Literal(value.to_string()));
        }
    }

    /// Commit an attribute written without `=` as an empty literal
    fn flush_valueless(&mut self) {
        if let Some(pending) = self.pending.take() {
            if pending.stage == Stage::Name {
                self.set_attr(pending.name, AttrValue::Literal(String::new()));
            }
        }
    }

    fn set_attr(&mut self, name: String, value: AttrValue) {
        if let Some(current) = self.open.last_mut() {
            current.attrs.insert(name, value);
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(current) => &mut current.children,
            None => &mut self.root,
        }
    }

    fn close_current(&mut self) {
        if let Some(element) = self.open.pop() {
            self.children_mut().push(Node::Element(element));
        }
    }

    /// Close the innermost open element named `name` and everything inside it
    fn close_named(&mut self, name: &str) {
        match self
            .open
            .iter()
            .rposition(|el| el.tag.eq_ignore_ascii_case(name))
        {
            Some(pos) => {
                while self.open.len() > pos {
                    self.close_current();
                }
            }
            None => log::debug!("ignoring unmatched closing tag </{name}>"),
        }
    }

    fn finish(mut self, slot_count: usize) -> StaticTree {
        if self.in_tag {
            self.flush_valueless();
        }
        while !self.open.is_empty() {
            self.close_current();
        }
        StaticTree {
            nodes: self.root,
            slot_count,
        }
    }
}
