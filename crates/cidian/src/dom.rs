//! Small query helpers over `scraper` trees.
//!
//! First match, nth match, text content, attribute value, and text with
//! nested sub-trees excluded. Everything the extractor needs and nothing more.

use scraper::{ElementRef, Node, Selector};

use crate::error::ConfigError;

/// Compile a selector, naming the config field on failure.
pub fn compile(name: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::Selector {
        name,
        selector: selector.to_string(),
    })
}

/// First element under `scope` matching `selector`, in document order.
pub fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// The `n`th (zero-based) element under `scope` matching `selector`.
pub fn nth<'a>(scope: ElementRef<'a>, selector: &Selector, n: usize) -> Option<ElementRef<'a>> {
    scope.select(selector).nth(n)
}

/// All descendant text of `el`, whitespace collapsed.
pub fn text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    normalize_ws(&raw)
}

/// Attribute value of `el`, if present.
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// Text of `el` with direct children named `excluded` left out.
///
/// `<li>to know <dl><dd>example</dd></dl></li>` reads as "to know".
/// Pieces are concatenated as-is; no separator is inserted between children.
pub fn text_excluding(el: ElementRef<'_>, excluded: &str) -> String {
    let mut out = String::new();
    for child in el.children() {
        match child.value() {
            Node::Text(t) => out.push_str(&t.text),
            Node::Element(e) if e.name().eq_ignore_ascii_case(excluded) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    out.extend(child_el.text());
                }
            }
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Whether the text enclosing `el` contains `needle`.
///
/// Walks from `el` upward and stops after the first ancestor named `boundary`.
pub fn enclosing_text_contains(el: ElementRef<'_>, boundary: &str, needle: &str) -> bool {
    if el.text().collect::<String>().contains(needle) {
        return true;
    }
    for ancestor in el.ancestors().filter_map(ElementRef::wrap) {
        if ancestor.text().collect::<String>().contains(needle) {
            return true;
        }
        if ancestor.value().name().eq_ignore_ascii_case(boundary) {
            break;
        }
    }
    false
}

/// Collapse whitespace runs into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_first_and_nth() {
        let html = Html::parse_document("<ul><li>a</li><li>b</li><li>c</li></ul>");
        let root = html.root_element();
        let li = sel("li");
        assert_eq!(text(first(root, &li).unwrap()), "a");
        assert_eq!(text(nth(root, &li, 2).unwrap()), "c");
        assert!(nth(root, &li, 3).is_none());
    }

    #[test]
    fn test_text_collapses_whitespace() {
        let html = Html::parse_document("<p>  to   know;\n  to be <b>aware</b>  </p>");
        let p = first(html.root_element(), &sel("p")).unwrap();
        assert_eq!(text(p), "to know; to be aware");
    }

    #[test]
    fn test_attr() {
        let html = Html::parse_document(r#"<a href="/wiki/x" title="X">x</a>"#);
        let a = first(html.root_element(), &sel("a")).unwrap();
        assert_eq!(attr(a, "href"), Some("/wiki/x"));
        assert_eq!(attr(a, "rel"), None);
    }

    #[test]
    fn test_text_excluding_drops_nested_block() {
        let html = Html::parse_document(
            "<ol><li>to <a>know</a>; to be aware of<dl><dd>我知道。 I know.</dd></dl></li></ol>",
        );
        let li = first(html.root_element(), &sel("li")).unwrap();
        assert_eq!(text_excluding(li, "dl"), "to know; to be aware of");
        assert!(text(li).contains("I know."));
    }

    #[test]
    fn test_text_excluding_joins_children_without_separator() {
        let html = Html::parse_document("<ol><li>a<ol><li>a1</li></ol>b</li></ol>");
        let li = first(html.root_element(), &sel("li")).unwrap();
        assert_eq!(text_excluding(li, "dl"), "aa1b");
    }

    #[test]
    fn test_enclosing_text_contains_stops_at_boundary() {
        let html = Html::parse_document(
            r#"<div>For pronunciation<table><tr><td>See <span><a href="/x">x</a></span></td></tr></table></div>"#,
        );
        let a = first(html.root_element(), &sel("a")).unwrap();
        assert!(enclosing_text_contains(a, "td", "See"));
        assert!(!enclosing_text_contains(a, "td", "For pronunciation"));
    }

    #[test]
    fn test_compile_reports_field() {
        let err = compile("content", "##").unwrap_err();
        assert!(matches!(err, ConfigError::Selector { name: "content", .. }));
    }
}
