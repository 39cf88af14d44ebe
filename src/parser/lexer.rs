//! Recognizers for the fragment grammar
//!
//! The grammar is mode dependent (content, inside a tag, attribute value) and
//! alternatives are tried in priority order rather than by longest match, so
//! each mode gets its own scanning function. Every function reports how many
//! bytes of the input the recognized token spans.

/// Token recognized between tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentToken<'a> {
    /// `<!DOCTYPE ...>`, skipped
    Doctype,
    /// `<!--`, enters comment mode
    CommentOpen,
    /// `</name>`
    CloseTag(&'a str),
    /// `<name`, enters tag mode
    OpenTag(&'a str),
    /// Raw text up to the next `<`
    Text(&'a str),
}

/// Token recognized inside a tag where an attribute name may appear
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagToken<'a> {
    /// `>` or `/>`
    End { self_closing: bool },
    Equals,
    /// Bare `...` introducing a spread binding
    Ellipsis,
    /// Attribute name including its `?`, `.` or `@` prefix
    Name(&'a str),
}

/// Token recognized after `=`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueToken<'a> {
    Quoted(&'a str),
    Unquoted(&'a str),
    /// A lone quote at the end of the input, closed after a placeholder
    OpenQuote(char),
}

/// Closing sequence of a comment
pub const COMMENT_CLOSE: &str = "-->";

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_attr_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')
}

/// Length of the leading run of characters matching `pred`
fn run_len(input: &str, pred: impl Fn(char) -> bool) -> usize {
    input.find(|c: char| !pred(c)).unwrap_or(input.len())
}

fn leading_whitespace(input: &str) -> usize {
    input.len() - input.trim_start().len()
}

/// Recognize the next token in content position
///
/// Always consumes at least one byte of a non-empty input: a `<` that opens
/// none of the known constructs is captured as text up to the following `<`.
pub fn next_content_token(input: &str) -> (ContentToken<'_>, usize) {
    let ws = leading_whitespace(input);
    let rest = &input[ws..];

    if rest.starts_with('<') {
        if let Some(len) = doctype(rest) {
            return (ContentToken::Doctype, ws + len);
        }
        if rest.starts_with("<!--") {
            return (ContentToken::CommentOpen, ws + 4);
        }
        if let Some((name, len)) = close_tag(rest) {
            return (ContentToken::CloseTag(name), ws + len);
        }
        if let Some((name, len)) = open_tag(rest) {
            return (ContentToken::OpenTag(name), ws + len);
        }
        let end = rest[1..].find('<').map(|p| p + 1).unwrap_or(rest.len());
        return (ContentToken::Text(&input[..ws + end]), ws + end);
    }

    let end = input.find('<').unwrap_or(input.len());
    (ContentToken::Text(&input[..end]), end)
}

fn doctype(input: &str) -> Option<usize> {
    let keyword = input.strip_prefix("<!")?;
    if !keyword.get(..7)?.eq_ignore_ascii_case("doctype") {
        return None;
    }
    let body = keyword[7..].strip_prefix(' ')?;
    let end = body.find('>')?;
    if end == 0 {
        return None;
    }
    Some(input.len() - body.len() + end + 1)
}

fn close_tag(input: &str) -> Option<(&str, usize)> {
    let rest = input.strip_prefix('<')?;
    let rest = rest.trim_start().strip_prefix('/')?.trim_start();
    let name_len = run_len(rest, is_tag_name_char);
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let after = rest[name_len..].trim_start().strip_prefix('>')?;
    Some((name, input.len() - after.len()))
}

fn open_tag(input: &str) -> Option<(&str, usize)> {
    let rest = input.strip_prefix('<')?.trim_start();
    let name_len = run_len(rest, is_tag_name_char);
    if name_len == 0 {
        return None;
    }
    let consumed = input.len() - rest.len() + name_len;
    Some((&rest[..name_len], consumed))
}

/// Recognize the next token inside a tag; the input must not start with whitespace
pub fn next_tag_token(input: &str) -> Option<(TagToken<'_>, usize)> {
    if input.starts_with("/>") {
        return Some((TagToken::End { self_closing: true }, 2));
    }
    if input.starts_with('>') {
        return Some((TagToken::End { self_closing: false }, 1));
    }
    if input.starts_with('=') {
        return Some((TagToken::Equals, 1));
    }
    if input.starts_with("...") {
        return Some((TagToken::Ellipsis, 3));
    }

    let prefix = match input.chars().next() {
        Some('?' | '.' | '@') => 1,
        _ => 0,
    };
    let name_len = run_len(&input[prefix..], is_attr_name_char);
    if name_len == 0 {
        return None;
    }
    let len = prefix + name_len;
    Some((TagToken::Name(&input[..len]), len))
}

/// Recognize an attribute value; the input must not start with whitespace
pub fn next_value_token(input: &str) -> Option<(ValueToken<'_>, usize)> {
    let first = input.chars().next()?;
    if first == '"' || first == '\'' {
        return match input[1..].find(first) {
            Some(end) => Some((ValueToken::Quoted(&input[1..1 + end]), end + 2)),
            None if input.len() == 1 => Some((ValueToken::OpenQuote(first), 1)),
            None => None,
        };
    }
    let len = run_len(input, |c| !c.is_whitespace() && c != '>');
    if len == 0 {
        return None;
    }
    Some((ValueToken::Unquoted(&input[..len]), len))
}

/// Strip a leading and a trailing whitespace run when it contains a line break
pub fn trim_line_breaks(text: &str) -> &str {
    let mut text = text;
    let lead = leading_whitespace(text);
    if text[..lead].contains('\n') {
        text = &text[lead..];
    }
    let body = text.trim_end();
    if text[body.len()..].contains('\n') {
        text = body;
    }
    text
}
