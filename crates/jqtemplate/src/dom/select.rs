//! CSS selector subset used to locate templates and render roots
//!
//! Supported: type (`li`), universal (`*`), `#id`, `.class`, `[attr]`,
//! `[attr=value]` (value optionally quoted), compounds of those, the
//! descendant and `>` combinators, and comma-separated groups.

use std::fmt;

use super::{Document, NodeId};
use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq)]
enum Simple {
    Tag(String),
    Id(String),
    Class(String),
    Attr(String, Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

/// One complex selector: compounds joined by combinators, leftmost first.
#[derive(Debug, Clone, PartialEq)]
struct Complex {
    compounds: Vec<Vec<Simple>>,
    // combinators[i] sits between compounds[i] and compounds[i + 1]
    combinators: Vec<Combinator>,
}

/// A parsed selector group.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    group: Vec<Complex>,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn invalid(source: &str, reason: &str) -> TemplateError {
    TemplateError::Configuration {
        message: format!("invalid selector `{}`: {}", source, reason),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_')
}

impl Selector {
    /// Parse a selector.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for empty or malformed selectors.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let group = source
            .split(',')
            .map(|part| parse_complex(source, part.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: source.to_string(),
            group,
        })
    }

    /// Check if `node` matches any selector in the group.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.group
            .iter()
            .any(|c| matches_complex(doc, node, c, c.compounds.len() - 1))
    }
}

fn parse_complex(source: &str, text: &str) -> Result<Complex, TemplateError> {
    if text.is_empty() {
        return Err(invalid(source, "empty selector"));
    }
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut rest = text;
    let mut pending: Option<Combinator> = None;

    loop {
        let (compound, tail) = parse_compound(source, rest)?;
        if compound.is_empty() {
            return Err(invalid(source, "expected a simple selector"));
        }
        if let Some(combinator) = pending.take() {
            combinators.push(combinator);
        }
        compounds.push(compound);

        let trimmed = tail.trim_start();
        if trimmed.is_empty() {
            break;
        }
        if let Some(after) = trimmed.strip_prefix('>') {
            pending = Some(Combinator::Child);
            rest = after.trim_start();
        } else if trimmed.len() < tail.len() {
            pending = Some(Combinator::Descendant);
            rest = trimmed;
        } else {
            return Err(invalid(source, &format!("unexpected `{}`", trimmed)));
        }
        if rest.is_empty() {
            return Err(invalid(source, "dangling combinator"));
        }
    }

    Ok(Complex {
        compounds,
        combinators,
    })
}

fn take_name(text: &str) -> (&str, &str) {
    let end = text.find(|c: char| !is_name_char(c)).unwrap_or(text.len());
    text.split_at(end)
}

fn parse_compound<'a>(source: &str, text: &'a str) -> Result<(Vec<Simple>, &'a str), TemplateError> {
    let mut simples = Vec::new();
    let mut rest = text;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let (name, after) = take_name(rest);
        if !name.is_empty() {
            simples.push(Simple::Tag(name.to_ascii_lowercase()));
            rest = after;
        }
    }

    loop {
        if let Some(after) = rest.strip_prefix('#') {
            let (name, after) = take_name(after);
            if name.is_empty() {
                return Err(invalid(source, "expected an id after `#`"));
            }
            simples.push(Simple::Id(name.to_string()));
            rest = after;
        } else if let Some(after) = rest.strip_prefix('.') {
            let (name, after) = take_name(after);
            if name.is_empty() {
                return Err(invalid(source, "expected a class after `.`"));
            }
            simples.push(Simple::Class(name.to_string()));
            rest = after;
        } else if let Some(after) = rest.strip_prefix('[') {
            let close = after
                .find(']')
                .ok_or_else(|| invalid(source, "unclosed `[`"))?;
            let inner = &after[..close];
            let simple = match inner.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim();
                    let value = value
                        .strip_prefix('"')
                        .and_then(|v| v.strip_suffix('"'))
                        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                        .unwrap_or(value);
                    Simple::Attr(name.trim().to_ascii_lowercase(), Some(value.to_string()))
                }
                None => Simple::Attr(inner.trim().to_ascii_lowercase(), None),
            };
            if matches!(&simple, Simple::Attr(name, _) if name.is_empty()) {
                return Err(invalid(source, "empty attribute name"));
            }
            simples.push(simple);
            rest = &after[close + 1..];
        } else {
            break;
        }
    }

    // `*` alone is a valid compound that matches any element
    if simples.is_empty() && text.starts_with('*') {
        simples.push(Simple::Tag("*".to_string()));
    }
    Ok((simples, rest))
}

fn matches_simple(doc: &Document, node: NodeId, simple: &Simple) -> bool {
    match simple {
        Simple::Tag(tag) => tag == "*" || doc.tag(node) == Some(tag.as_str()),
        Simple::Id(id) => doc.attr(node, "id") == Some(id.as_str()),
        Simple::Class(class) => doc
            .attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
        Simple::Attr(name, None) => doc.has_attr(node, name),
        Simple::Attr(name, Some(value)) => doc.attr(node, name) == Some(value.as_str()),
    }
}

fn matches_complex(doc: &Document, node: NodeId, complex: &Complex, index: usize) -> bool {
    if !doc.is_element(node) || !complex.compounds[index].iter().all(|s| matches_simple(doc, node, s)) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match complex.combinators[index - 1] {
        Combinator::Child => doc
            .parent(node)
            .is_some_and(|p| matches_complex(doc, p, complex, index - 1)),
        Combinator::Descendant => {
            let mut ancestor = doc.parent(node);
            while let Some(a) = ancestor {
                if matches_complex(doc, a, complex, index - 1) {
                    return true;
                }
                ancestor = doc.parent(a);
            }
            false
        }
    }
}

impl Document {
    /// All attached elements matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the selector cannot be parsed.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, TemplateError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(self.root())
            .into_iter()
            .skip(1)
            .filter(|node| selector.matches(self, *node))
            .collect())
    }

    /// First attached element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the selector cannot be parsed.
    pub fn select_first(&self, selector: &str) -> Result<Option<NodeId>, TemplateError> {
        Ok(self.select(selector)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::parse(
            r#"<div id="app">
                 <ul class="menu main"><li data-k="a">A</li><li data-k='b'>B</li></ul>
                 <section><p><span class="x">s</span></p></section>
               </div>"#,
        )
        .unwrap()
    }

    fn paths(doc: &Document, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| doc.describe(*id)).collect()
    }

    #[test]
    fn test_simple_selectors() {
        let doc = doc();
        assert_eq!(doc.select("li").unwrap().len(), 2);
        assert_eq!(doc.select(".menu").unwrap().len(), 1);
        assert_eq!(doc.select("ul.main.menu").unwrap().len(), 1);
        assert_eq!(doc.select("[data-k]").unwrap().len(), 2);
        assert_eq!(doc.select("li[data-k=\"b\"]").unwrap().len(), 1);
        assert_eq!(doc.select("#app").unwrap().len(), 1);
    }

    #[test]
    fn test_combinators() {
        let doc = doc();
        assert_eq!(
            paths(&doc, &doc.select("#app span").unwrap()),
            vec!["body > div#app > section > p > span"]
        );
        assert!(doc.select("section > span").unwrap().is_empty());
        assert_eq!(doc.select("section > p > span").unwrap().len(), 1);
    }

    #[test]
    fn test_group_is_in_document_order() {
        let doc = doc();
        let found = doc.select("span, ul").unwrap();
        assert_eq!(doc.tag(found[0]), Some("ul"));
        assert_eq!(doc.tag(found[1]), Some("span"));
        assert_eq!(doc.select("*").unwrap().len(), doc.select("body *").unwrap().len() + 1);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("ul >").is_err());
        assert!(Selector::parse("[open").is_err());
        assert!(Selector::parse("a,,b").is_err());
        assert!(Selector::parse("#").is_err());
    }
}
