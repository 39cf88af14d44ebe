//! Integration tests for the fragment parser

use pretty_assertions::assert_eq;

use slotted::parser::{AttrValue, Element, Node};
use slotted::{html, parse, ParseError, TemplateError, Value};

fn div() -> Element {
    Element::new("div")
}

#[test]
fn test_single() {
    let tree = parse(&["\n      <div>hello</div>\n    "]).expect("Should parse");
    assert_eq!(tree.nodes, vec![div().with_child(Node::text("hello")).into()]);
}

#[test]
fn test_multiple() {
    let tree = parse(&["\n      <div>hello</div>\n      <div>world</div>\n    "])
        .expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![
            div().with_child(Node::text("hello")).into(),
            div().with_child(Node::text("world")).into(),
        ]
    );
}

#[test]
fn test_has_attribute() {
    let tree = parse(&["<div name=\"greet\">hello</div>"]).expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![div()
            .with_attr("name", AttrValue::literal("greet"))
            .with_child(Node::text("hello"))
            .into()]
    );
}

#[test]
fn test_has_text_variables() {
    let t = html!("\n      <div>hello, ", "world", ", ", 1000, "</div>\n    ").unwrap();
    assert_eq!(
        t.tree().nodes,
        vec![div()
            .with_child(Node::text("hello, "))
            .with_child(Node::Slot(0))
            .with_child(Node::text(", "))
            .with_child(Node::Slot(1))
            .into()]
    );
    assert!(t.values()[0].same(&Value::from("world")));
    assert!(t.values()[1].same(&Value::from(1000)));
}

#[test]
fn test_has_attribute_variables() {
    let tree = parse(&[
        "\n      <div\n        name=\"greet\"\n        class=",
        "\n        @click=",
        "\n        .value=",
        "\n        ?yes=",
        "\n      >\n        hello\n      </div>\n    ",
    ])
    .expect("Should parse");

    assert_eq!(
        tree.nodes,
        vec![div()
            .with_attr("name", AttrValue::literal("greet"))
            .with_attr("class", AttrValue::Slot(0))
            .with_attr("@click", AttrValue::Slot(1))
            .with_attr(".value", AttrValue::Slot(2))
            .with_attr("?yes", AttrValue::Slot(3))
            .with_child(Node::text("hello"))
            .into()]
    );
    assert_eq!(tree.slot_count, 4);
}

#[test]
fn test_has_static_key() {
    let t = html!("<div key=\"99\">hello</div>").unwrap();
    assert_eq!(
        t.tree().nodes,
        vec![div()
            .with_attr("key", AttrValue::literal("99"))
            .with_child(Node::text("hello"))
            .into()]
    );
    assert!(t.key().unwrap().same(&Value::from("99")));
}

#[test]
fn test_has_variable_key() {
    let t = html!("<div key=", 80, ">hello</div>").unwrap();
    assert_eq!(
        t.tree().nodes[0].as_element().unwrap().attrs.get("key"),
        Some(&AttrValue::Slot(0))
    );
    assert!(t.key().unwrap().same(&Value::from(80)));
}

#[test]
fn test_closed_elements() {
    let tree = parse(&["\n      <div class=\"test\" />\n    "]).expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![div().with_attr("class", AttrValue::literal("test")).into()]
    );
}

#[test]
fn test_ignore_unexpected_enclosing_tag() {
    let tree = parse(&["<div><p><b></p></b></div></main>"]).expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![div()
            .with_child(Element::new("p").with_child(Element::new("b").into()).into())
            .into()]
    );
}

#[test]
fn test_closing_tag_case_insensitive() {
    let tree = parse(&["<DIV>a</div>b"]).expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![
            Element::new("DIV").with_child(Node::text("a")).into(),
            Node::text("b"),
        ]
    );
}

#[test]
fn test_ugly_attributes() {
    let tree = parse(&["<div name  =  \"a\" id  = 'b' class = c  color =  d></div>"])
        .expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![div()
            .with_attr("name", AttrValue::literal("a"))
            .with_attr("id", AttrValue::literal("b"))
            .with_attr("class", AttrValue::literal("c"))
            .with_attr("color", AttrValue::literal("d"))
            .into()]
    );
}

#[test]
fn test_doctype() {
    let tree = parse(&["\n      <!DOCTYPE html>\n      <div>doctype</div>\n    "])
        .expect("Should parse");
    assert_eq!(tree.nodes, vec![div().with_child(Node::text("doctype")).into()]);
}

#[test]
fn test_comment() {
    let tree = parse(&[
        "\n      <!-- comment -->\n      <div>comment</div>\n      <!--  -->\n      <!-->\n    ",
    ])
    .expect("Should parse");
    assert_eq!(tree.nodes, vec![div().with_child(Node::text("comment")).into()]);
}

#[test]
fn test_invalid_comment() {
    let tree = parse(&[
        "\n      <div><!-- ->in comment --></div>\n      <div><!- --></div>\n    ",
    ])
    .expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![div().into(), div().with_child(Node::text("<!- -->")).into()]
    );
}

#[test]
fn test_ignore_variables_in_comment() {
    let t = html!("\n      <!-- ", 0, " -->\n    ").unwrap();
    assert!(t.tree().nodes.is_empty());
    assert_eq!(t.tree().slot_count, 1);
    assert_eq!(t.values().len(), 1);
}

#[test]
fn test_spread_attribute() {
    let tree = parse(&["<div ...", "></div>"]).expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![div().with_attr("...", AttrValue::Slot(0)).into()]
    );
}

#[test]
fn test_quoted_binding() {
    let tree = parse(&["<a href='", "' title=\"", "\">x</a>"]).expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![Element::new("a")
            .with_attr("href", AttrValue::Slot(0))
            .with_attr("title", AttrValue::Slot(1))
            .with_child(Node::text("x"))
            .into()]
    );
}

#[test]
fn test_valueless_attributes() {
    let tree = parse(&["<input disabled ?checked=", " readonly>"]).expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![Element::new("input")
            .with_attr("disabled", AttrValue::literal(""))
            .with_attr("?checked", AttrValue::Slot(0))
            .with_attr("readonly", AttrValue::literal(""))
            .into()]
    );
}

#[test]
fn test_void_elements_need_no_closing_tag() {
    let tree = parse(&["<p><br>a<INPUT>b</p>"]).expect("Should parse");
    assert_eq!(
        tree.nodes,
        vec![Element::new("p")
            .with_child(Element::new("br").into())
            .with_child(Node::text("a"))
            .with_child(Element::new("INPUT").into())
            .with_child(Node::text("b"))
            .into()]
    );
}

#[test]
fn test_empty_template() {
    let tree = parse(&[""]).expect("Should parse");
    assert!(tree.nodes.is_empty());
    assert_eq!(tree.slot_count, 0);
}

#[test]
fn test_malformed_template_fails_fast() {
    let err = parse(&["<div>", "</div><p #>"]).unwrap_err();
    match &err {
        ParseError::NoProgress { fragment, found, .. } => {
            assert_eq!(*fragment, 1);
            assert_eq!(found, "#>");
        }
        other => panic!("Expected NoProgress, got {:?}", other),
    }

    let report = err.format(&["<div>", "</div><p #>"], "broken.html");
    assert!(report.contains("broken.html"));
}

#[test]
fn test_malformed_template_is_not_cached() {
    let first = html!("<p ", 1, "></p>");
    let second = html!("<p ", 1, "></p>");
    assert!(matches!(first, Err(TemplateError::Malformed(_))));
    assert!(matches!(second, Err(TemplateError::Malformed(_))));
}

#[test]
fn test_arity_mismatch() {
    static FRAGMENTS: &[&str] = &["<p>", "</p>"];
    let err = slotted::html(FRAGMENTS, vec![]).unwrap_err();
    assert_eq!(err, TemplateError::ArityMismatch { expected: 1, found: 0 });
}
