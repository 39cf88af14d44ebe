//! Integration tests for re-rendering into an already mounted container

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use slotted::dom::{Document, NodeId};
use slotted::{html, Attributes, Callback, Renderer, Template, Value};

struct Fixture {
    doc: Document,
    container: NodeId,
    renderer: Renderer<Document>,
}

impl Fixture {
    fn new() -> Self {
        use slotted::Tree;

        let mut doc = Document::new();
        let body = doc.body();
        let container = doc.create_element("div").unwrap();
        doc.append_child(&body, &container).unwrap();
        Self {
            doc,
            container,
            renderer: Renderer::new(),
        }
    }

    fn render(&mut self, value: impl Into<Value>) {
        self.renderer
            .render(&mut self.doc, value, &self.container)
            .expect("Should render");
    }

    fn query(&self, tag: &str) -> NodeId {
        self.doc.query(self.container, tag).expect("Should find element")
    }

    fn all(&self, tag: &str) -> Vec<NodeId> {
        self.doc.query_all(self.container, tag)
    }

    fn texts(&self, tag: &str) -> Vec<String> {
        self.all(tag)
            .into_iter()
            .map(|id| self.doc.text_content(id))
            .collect()
    }
}

/// Counts how often it was invoked
fn spy() -> (Callback, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    (Callback::new(move |_| counter.set(counter.get() + 1)), calls)
}

fn keyed_list(rows: &[(u32, &str)]) -> Template {
    let items: Vec<Template> = rows
        .iter()
        .map(|&(id, content)| html!("\n  <li key=", id, ">", content, "</li>\n").unwrap())
        .collect();
    html!("\n<ul>\n  ", items, "\n</ul>\n").unwrap()
}

fn unkeyed_list(rows: &[(u32, &str)]) -> Template {
    let items: Vec<Template> = rows
        .iter()
        .map(|&(_, content)| html!("\n  <li>", content, "</li>\n").unwrap())
        .collect();
    html!("\n<ul>\n  ", items, "\n</ul>\n").unwrap()
}

#[test]
fn test_text() {
    let app = |text: Value| html!("\n  <div>", text, "</div>\n").unwrap();
    let mut fx = Fixture::new();

    fx.render(app("string".into()));
    let div = fx.query("div");
    assert_eq!(fx.doc.text_content(div), "string");

    for (value, expected) in [
        (Value::from("change"), "change"),
        (Value::from(1000), "1000"),
        (Value::from(true), "true"),
        (Value::from(false), "false"),
    ] {
        fx.render(app(value));
        assert_eq!(fx.query("div"), div);
        assert_eq!(fx.doc.text_content(div), expected);
    }
}

#[test]
fn test_text_array() {
    let app = |args: &[&str]| html!("\n  <div>", args.to_vec(), "</div>\n").unwrap();
    let mut fx = Fixture::new();

    for (args, expected) in [
        (&["a", "b", "c"][..], "abc"),
        (&["d", "e", "f"][..], "def"),
        (&["d", "e", "f", "g", "h"][..], "defgh"),
        (&["e", "f", "g"][..], "efg"),
        (&["z", "e", "g", "a", "b"][..], "zegab"),
    ] {
        fx.render(app(args));
        let div = fx.query("div");
        assert_eq!(fx.doc.text_content(div), expected);
    }
}

#[test]
fn test_template() {
    let app = |inner: &str| {
        html!(
            "\n  <div>\n    ",
            html!("\n      <p>", inner, "</p>\n    ").unwrap(),
            "\n  </div>\n"
        )
        .unwrap()
    };
    let mut fx = Fixture::new();

    fx.render(app("foo"));
    let div = fx.query("div");
    let p = fx.query("p");
    assert_eq!(fx.doc.inner_html(div), "<!----><p>foo<!----></p><!----><!---->");

    fx.render(app("bar"));
    assert_eq!(fx.doc.inner_html(div), "<!----><p>bar<!----></p><!----><!---->");
    assert_eq!(fx.query("p"), p);
}

#[test]
fn test_template_array_with_key() {
    let mut fx = Fixture::new();

    fx.render(keyed_list(&[(1, "aaa"), (2, "bbb"), (3, "ccc"), (4, "ddd"), (5, "eee")]));
    assert_eq!(fx.texts("li"), ["aaa", "bbb", "ccc", "ddd", "eee"]);
    let li1 = fx.all("li");

    // insert
    fx.render(keyed_list(&[
        (8, "hhh"),
        (1, "aaa"),
        (2, "bbb"),
        (3, "ccc"),
        (6, "fff"),
        (4, "ddd"),
        (5, "eee"),
        (7, "ggg"),
    ]));
    assert_eq!(
        fx.texts("li"),
        ["hhh", "aaa", "bbb", "ccc", "fff", "ddd", "eee", "ggg"]
    );
    let li2 = fx.all("li");
    assert_eq!(li2[1], li1[0]);
    assert_eq!(li2[2], li1[1]);
    assert_eq!(li2[3], li1[2]);
    assert_eq!(li2[5], li1[3]);
    assert_eq!(li2[6], li1[4]);

    // delete
    fx.render(keyed_list(&[(8, "hhh"), (6, "fff"), (4, "ddd"), (5, "eee")]));
    assert_eq!(fx.texts("li"), ["hhh", "fff", "ddd", "eee"]);
    let li3 = fx.all("li");
    assert_eq!(li3[0], li2[0]);
    assert_eq!(li3[1], li2[4]);
    assert_eq!(li3[2], li2[5]);
    assert_eq!(li3[3], li2[6]);

    // delete and insert
    fx.render(keyed_list(&[
        (8, "hhh"),
        (4, "ddd"),
        (9, "iii"),
        (5, "eee"),
        (10, "jjj"),
    ]));
    assert_eq!(fx.texts("li"), ["hhh", "ddd", "iii", "eee", "jjj"]);
    let li4 = fx.all("li");
    assert_eq!(li4[0], li3[0]);
    assert_eq!(li4[1], li3[2]);
    assert_eq!(li4[3], li3[3]);
}

#[test]
fn test_template_array_without_key() {
    let mut fx = Fixture::new();

    fx.render(unkeyed_list(&[(1, "aaa"), (2, "bbb"), (3, "ccc"), (4, "ddd"), (5, "eee")]));
    let li1 = fx.all("li");

    // insert
    fx.render(unkeyed_list(&[
        (8, "hhh"),
        (1, "aaa"),
        (2, "bbb"),
        (3, "ccc"),
        (6, "fff"),
        (4, "ddd"),
        (5, "eee"),
        (7, "ggg"),
    ]));
    assert_eq!(
        fx.texts("li"),
        ["hhh", "aaa", "bbb", "ccc", "fff", "ddd", "eee", "ggg"]
    );
    let li2 = fx.all("li");
    assert_eq!(&li2[..5], &li1[..]);

    // delete
    fx.render(unkeyed_list(&[(8, "hhh"), (6, "fff"), (4, "ddd"), (5, "eee")]));
    assert_eq!(fx.texts("li"), ["hhh", "fff", "ddd", "eee"]);
    let li3 = fx.all("li");
    assert_eq!(&li3[..], &li2[..4]);

    // delete and insert
    fx.render(unkeyed_list(&[
        (8, "hhh"),
        (4, "ddd"),
        (9, "iii"),
        (5, "eee"),
        (10, "jjj"),
    ]));
    assert_eq!(fx.texts("li"), ["hhh", "ddd", "iii", "eee", "jjj"]);
    let li4 = fx.all("li");
    assert_eq!(&li4[..4], &li3[..]);
}

#[test]
fn test_keyed_permutation_reuses_positions() {
    let mut fx = Fixture::new();

    fx.render(keyed_list(&[(1, "a"), (2, "b"), (3, "c")]));
    let before = fx.all("li");

    // No key is added or removed, so items are patched in place
    fx.render(keyed_list(&[(3, "c"), (2, "b"), (1, "a")]));
    assert_eq!(fx.texts("li"), ["c", "b", "a"]);
    assert_eq!(fx.all("li"), before);
}

#[test]
fn test_keyed_list_to_empty_and_back() {
    let mut fx = Fixture::new();

    fx.render(keyed_list(&[(1, "a"), (2, "b")]));
    fx.render(keyed_list(&[]));
    assert!(fx.all("li").is_empty());
    let ul = fx.query("ul");
    assert_eq!(fx.doc.inner_html(ul), "<!---->");

    fx.render(keyed_list(&[(2, "b"), (3, "c")]));
    assert_eq!(fx.texts("li"), ["b", "c"]);
}

#[test]
fn test_attribute() {
    let app = |name: &str, flag: bool, value: i32, onclick: Callback| {
        html!(
            "\n  <div name=",
            name,
            " ?bool=",
            flag,
            " .value=",
            value,
            " @click=",
            onclick,
            ">\n    attributes\n  </div>\n"
        )
        .unwrap()
    };
    let mut fx = Fixture::new();

    let (cb1, calls1) = spy();
    fx.render(app("Alice", false, 100, cb1));
    let div = fx.query("div");
    fx.doc.dispatch(div, "click");

    assert_eq!(fx.doc.attribute(div, "name"), Some("Alice"));
    assert!(!fx.doc.has_attribute(div, "bool"));
    assert!(fx.doc.property(div, "value").unwrap().same(&Value::from(100)));
    assert_eq!(calls1.get(), 1);

    let (cb2, calls2) = spy();
    fx.render(app("Bob", true, 200, cb2));
    fx.doc.dispatch(div, "click");

    assert_eq!(fx.query("div"), div);
    assert_eq!(fx.doc.attribute(div, "name"), Some("Bob"));
    assert!(fx.doc.has_attribute(div, "bool"));
    assert!(fx.doc.property(div, "value").unwrap().same(&Value::from(200)));
    assert_eq!(fx.doc.listener_count(div, "click"), 1);
    assert_eq!(calls2.get(), 1);
    assert_eq!(calls1.get(), 1);
}

#[test]
fn test_null_attribute_removes_it() {
    let app = |title: Option<&str>| html!("<p title=", title, ">x</p>").unwrap();
    let mut fx = Fixture::new();

    fx.render(app(Some("hello")));
    let p = fx.query("p");
    assert_eq!(fx.doc.attribute(p, "title"), Some("hello"));

    fx.render(app(None));
    assert!(!fx.doc.has_attribute(p, "title"));

    fx.render(app(Some("again")));
    assert_eq!(fx.doc.attribute(p, "title"), Some("again"));
}

#[test]
fn test_spread_attribute() {
    let app = |props: Attributes| html!("\n  <div ...", props, ">\n    attributes\n  </div>\n").unwrap();
    let mut fx = Fixture::new();

    let (cb1, calls1) = spy();
    fx.render(app(Attributes::new()
        .with("name", "Alice")
        .with("?bool", true)
        .with(".value", 100)
        .with("@click", cb1)));
    let div = fx.query("div");
    fx.doc.dispatch(div, "click");

    assert_eq!(fx.doc.attribute(div, "name"), Some("Alice"));
    assert!(fx.doc.has_attribute(div, "bool"));
    assert!(fx.doc.property(div, "value").unwrap().same(&Value::from(100)));
    assert_eq!(calls1.get(), 1);

    let (cb2, calls2) = spy();
    fx.render(app(Attributes::new()
        .with("name", "Bob")
        .with("?bool", false)
        .with(".value", 200)
        .with("@click", cb2)));
    fx.doc.dispatch(div, "click");

    assert_eq!(fx.doc.attribute(div, "name"), Some("Bob"));
    assert!(!fx.doc.has_attribute(div, "bool"));
    assert!(fx.doc.property(div, "value").unwrap().same(&Value::from(200)));
    assert_eq!(calls2.get(), 1);
    assert_eq!(calls1.get(), 1);
}

#[test]
fn test_spread_drops_stale_keys() {
    let app = |props: Attributes| html!("<div ...", props, "></div>").unwrap();
    let mut fx = Fixture::new();
    let (cb, calls) = spy();

    fx.render(app(Attributes::new()
        .with("name", "a")
        .with("title", "t")
        .with("@click", cb)));
    let div = fx.query("div");

    fx.render(app(Attributes::new().with("name", "b")));
    assert_eq!(fx.doc.attribute_names(div), ["name"]);
    assert_eq!(fx.doc.dispatch(div, "click"), 0);
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_unsafe_html() {
    let app = |markup: &str| html!("\n  <div unsafe-html=", markup, ">\n    ignored\n  </div>\n").unwrap();
    let mut fx = Fixture::new();

    fx.render(app("<span>unsafe</span>"));
    let span1 = fx.query("span");
    assert_eq!(fx.doc.text_content(span1), "unsafe");

    fx.render(app("<span>unsafe</span>"));
    let span2 = fx.query("span");
    assert_eq!(fx.doc.text_content(span2), "unsafe");
    assert_eq!(span2, span1);

    fx.render(app("<em>safe</em>"));
    let div = fx.query("div");
    assert_eq!(fx.doc.inner_html(div), "<em>safe</em>");
}

#[test]
fn test_content_kind_changes() {
    let app = |value: Value| html!("<div>", value, "</div>").unwrap();
    let mut fx = Fixture::new();

    fx.render(app("x".into()));
    let div = fx.query("div");
    assert_eq!(fx.doc.inner_html(div), "x<!---->");

    fx.render(app(html!("<b>t</b>").unwrap().into()));
    assert_eq!(fx.doc.inner_html(div), "<!----><b>t</b><!----><!---->");

    fx.render(app(vec!["a", "b"].into()));
    assert_eq!(fx.doc.inner_html(div), "ab<!---->");

    fx.render(app(Value::Null));
    assert_eq!(fx.doc.inner_html(div), "<!---->");

    fx.render(app("y".into()));
    assert_eq!(fx.doc.inner_html(div), "y<!---->");
    assert_eq!(fx.query("div"), div);
}

#[test]
fn test_different_template_remounts() {
    let mut fx = Fixture::new();

    let first = || html!("<p>a</p>").unwrap();
    fx.render(first());
    let p = fx.query("p");
    fx.render(first());
    assert_eq!(fx.query("p"), p);

    fx.render(html!("<span>b</span>").unwrap());
    assert_eq!(fx.doc.inner_html(fx.container), "<span>b</span>");
    assert!(fx.doc.parent(p).is_none());
}

#[test]
fn test_unmount() {
    let mut fx = Fixture::new();
    fx.render(html!("<p>", vec!["a", "b"], "</p>").unwrap());
    assert!(fx.renderer.is_mounted(&fx.container));

    assert!(fx.renderer.unmount(&mut fx.doc, &fx.container).unwrap());
    assert_eq!(fx.doc.inner_html(fx.container), "");
    assert!(!fx.renderer.is_mounted(&fx.container));
    assert!(!fx.renderer.unmount(&mut fx.doc, &fx.container).unwrap());

    fx.render(html!("<p>again</p>").unwrap());
    assert_eq!(fx.doc.inner_html(fx.container), "<p>again</p>");
}

#[test]
fn test_containers_are_independent() {
    use slotted::Tree;

    let mut fx = Fixture::new();
    let body = fx.doc.body();
    let other = fx.doc.create_element("section").unwrap();
    fx.doc.append_child(&body, &other).unwrap();

    let app = |n: i32| html!("<i>", n, "</i>").unwrap();
    fx.render(app(1));
    fx.renderer.render(&mut fx.doc, app(2), &other).unwrap();
    fx.render(app(3));

    assert_eq!(fx.doc.inner_html(fx.container), "<i>3<!----></i>");
    assert_eq!(fx.doc.inner_html(other), "<i>2<!----></i>");
}

#[test]
fn test_unsafe_html_owns_dynamic_children() {
    let app = |markup: &str, child: &str| {
        html!("<div unsafe-html=", markup, ">", child, "</div>").unwrap()
    };
    let mut fx = Fixture::new();

    fx.render(app("<b>x</b>", "child"));
    let div = fx.query("div");
    assert_eq!(fx.doc.inner_html(div), "<b>x</b>");
    assert_eq!(fx.renderer.table(&fx.container).unwrap().populated(), 1);

    fx.render(app("<b>x</b>", "other"));
    assert_eq!(fx.doc.inner_html(div), "<b>x</b>");

    fx.render(app("<i>y</i>", "other"));
    assert_eq!(fx.doc.inner_html(div), "<i>y</i>");
}

#[test]
fn test_spread_ignores_unsafe_html() {
    let app = |props: Attributes| html!("<p ...", props, ">", "kept", "</p>").unwrap();
    let mut fx = Fixture::new();

    fx.render(app(Attributes::new().with("id", "a").with("unsafe-html", "<b>x</b>")));
    let p = fx.query("p");
    assert_eq!(fx.doc.inner_html(p), "kept<!---->");
    assert_eq!(fx.doc.attribute(p, "id"), Some("a"));
}
