//! Document tree tests: parsing, serialization, selection, events

use jqtemplate::*;
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_full_document() {
    let doc = Document::parse(
        "<!DOCTYPE html>\n<html><head><title>t</title></head><body><!-- note --><p>Hi</p></body></html>",
    )
    .unwrap();
    let body = doc.select_first("body").unwrap().unwrap();
    assert_eq!(doc.describe(body), "html > body");
    assert_eq!(doc.inner_html(body), "<p>Hi</p>");
}

#[test]
fn test_parse_html_without_body_keeps_head() {
    let doc = Document::parse("<html><head></head><p>x</p></html>").unwrap();
    assert_eq!(doc.to_html(), "<html><head></head><body><p>x</p></body></html>");
}

#[test]
fn test_parse_attributes() {
    let doc = Document::parse(
        r#"<input id=name disabled value='a "quoted" &amp; escaped' jqattr="{title: 'x'}">"#,
    )
    .unwrap();
    let input = doc.select_first("#name").unwrap().unwrap();
    assert_eq!(doc.attr(input, "disabled"), Some(""));
    assert_eq!(doc.attr(input, "value"), Some(r#"a "quoted" & escaped"#));
    assert_eq!(doc.attr(input, "jqattr"), Some("{title: 'x'}"));
    let keys: Vec<&str> = doc.attrs(input).unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "disabled", "value", "jqattr"]);
}

#[test]
fn test_parse_recovers_from_stray_and_unclosed_tags() {
    let doc = Document::parse("<div><span>a</b></span><p>open").unwrap();
    assert_eq!(doc.to_html(), "<body><div><span>a</span><p>open</p></div></body>");
}

#[test]
fn test_parse_literal_less_than() {
    let doc = Document::parse("<p>1 < 2</p>").unwrap();
    let p = doc.select_first("p").unwrap().unwrap();
    assert_eq!(doc.children(p).len(), 1);
    assert_eq!(doc.text_content(p), "1 < 2");
    assert_eq!(doc.inner_html(p), "1 &lt; 2");
}

#[test]
fn test_markup_errors_convert_to_template_errors() {
    let err: TemplateError = Document::parse("<p class='x").unwrap_err().into();
    assert!(matches!(err, TemplateError::Markup(MarkupError { offset: 9, .. })));
}

// ═══════════════════════════════════════════════════════════════════════
// Tree Editing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_build_and_serialize() {
    let mut doc = Document::new();
    let root = doc.root();
    let ul = doc.create_element("ul");
    doc.append_child(root, ul);
    for label in ["a", "b"] {
        let li = doc.create_element("li");
        doc.set_text(li, label);
        doc.append_child(ul, li);
    }
    doc.set_attr(ul, "class", "menu");
    assert_eq!(doc.to_html(), r#"<ul class="menu"><li>a</li><li>b</li></ul>"#);

    assert_eq!(doc.remove_attr(ul, "class"), Some("menu".to_string()));
    assert_eq!(doc.remove_attr(ul, "class"), None);
}

#[test]
fn test_append_moves_existing_node() {
    let mut doc = Document::parse("<div id=a><i></i></div><div id=b></div>").unwrap();
    let a = doc.select_first("#a").unwrap().unwrap();
    let b = doc.select_first("#b").unwrap().unwrap();
    let i = doc.select_first("i").unwrap().unwrap();

    doc.append_child(b, i);
    assert!(doc.children(a).is_empty());
    assert_eq!(doc.parent(i), Some(b));
}

#[test]
fn test_element_children_skip_text() {
    let doc = Document::parse("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>").unwrap();
    let ul = doc.select_first("ul").unwrap().unwrap();
    assert_eq!(doc.children(ul).len(), 5);
    assert_eq!(doc.element_children(ul).len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════
// Selection
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_select_skips_detached_nodes() {
    let mut doc = Document::parse("<p class=x></p><p class=x></p>").unwrap();
    let first = doc.select_first(".x").unwrap().unwrap();
    doc.detach(first);
    assert_eq!(doc.select(".x").unwrap().len(), 1);
}

#[test]
fn test_select_invalid_is_configuration_error() {
    let doc = Document::new();
    assert!(matches!(
        doc.select("div >"),
        Err(TemplateError::Configuration { .. })
    ));
}

#[test]
fn test_selector_matches_node() {
    let doc = Document::parse(r#"<form><input name="q" type="text"></form>"#).unwrap();
    let input = doc.select_first("input").unwrap().unwrap();
    let selector = Selector::parse("form > input[type=text], textarea").unwrap();
    assert!(selector.matches(&doc, input));
    assert_eq!(selector.to_string(), "form > input[type=text], textarea");
}

// ═══════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_handler_can_edit_its_node() {
    let mut doc = Document::parse(r#"<button id="go">0</button>"#).unwrap();
    let button = doc.select_first("#go").unwrap().unwrap();

    let increment = Function::new("increment", |inv| {
        let step = inv.arg(0).as_f64().unwrap_or(1.0);
        let rx = inv
            .receiver
            .as_mut()
            .ok_or_else(|| EvalError::type_error("no receiver"))?;
        let current: f64 = rx.document.text_content(rx.node).parse().unwrap_or(0.0);
        let next = Value::from(current + step);
        rx.document.set_text(rx.node, next.to_string());
        Ok(next)
    });
    doc.bind(button, Handler::new("click", increment, vec![Value::from(2)]));

    doc.trigger(button, "click").unwrap();
    let results = doc.trigger(button, "click").unwrap();
    assert_eq!(results, vec![Value::from(4)]);
    assert_eq!(doc.text_content(button), "4");
}

#[test]
fn test_failing_handler_stops_dispatch() {
    let mut doc = Document::new();
    let node = doc.create_element("a");
    let fail = Function::new("fail", |_| Err(EvalError::type_error("boom")));
    let mark = Function::new("mark", |inv| {
        if let Some(rx) = inv.receiver.as_mut() {
            rx.document.set_attr(rx.node, "marked", "yes");
        }
        Ok(Value::Undefined)
    });
    doc.bind(node, Handler::new("click", fail, vec![]));
    doc.bind(node, Handler::new("click", mark, vec![]));

    assert!(doc.trigger(node, "click").is_err());
    assert_eq!(doc.attr(node, "marked"), None);
}
