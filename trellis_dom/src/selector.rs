// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector engine.
//!
//! Supported syntax:
//! - `*` and type selectors (`li`), ASCII case-insensitive;
//! - `#id`, `.class`, `[attr]`, `[attr=value]`, `[attr="value"]`, `[attr='value']`;
//! - compound selectors (`li.node[data-index="2"]`);
//! - descendant (`ul li`) and child (`ul > li`) combinators;
//! - selector lists (`a, b`).
//!
//! Matching walks ancestors through the whole document, as `querySelector`
//! does, so `body li` matches rows inside a detached-then-attached list too.

use alloc::{string::String, vec::Vec};
use smallvec::SmallVec;

use crate::Document;
use crate::types::NodeId;

/// Errors produced while parsing a selector.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one of its comma-separated groups) is empty.
    #[error("empty selector")]
    Empty,
    /// A character that cannot start or continue a selector.
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Byte offset into the selector source.
        offset: usize,
    },
    /// An attribute selector is missing its closing `]` or quote.
    #[error("unterminated attribute selector starting at offset {0}")]
    UnterminatedAttribute(usize),
    /// A `>` combinator with nothing after it.
    #[error("combinator at offset {0} has no right-hand selector")]
    DanglingCombinator(usize),
}

/// A parsed selector list.
///
/// ```
/// use trellis_dom::{Document, Selector};
///
/// let mut doc = Document::default();
/// let list = doc.create_element("ul");
/// doc.append_child(doc.body(), list);
/// doc.set_inner_html(list, r#"<li data-index="0">A</li><li data-index="1" class="off">B</li>"#);
///
/// let sel = Selector::parse(r#"ul > li.off[data-index="1"]"#).unwrap();
/// let row = sel.first_in(&doc, doc.body()).unwrap();
/// assert_eq!(doc.text_content(row), "B");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    groups: SmallVec<[Complex; 1]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Compounds from left to right, each with the combinator linking it to the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    parts: SmallVec<[(Combinator, Compound); 2]>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    attributes: SmallVec<[AttrTest; 1]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrTest {
    name: String,
    value: Option<String>,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(src: &str) -> Result<Self, SelectorError> {
        Parser { src, pos: 0 }.selector_list()
    }

    /// Returns true if `el` is a live element matching any selector in the list.
    pub fn matches(&self, doc: &Document, el: NodeId) -> bool {
        doc.is_element(el) && self.groups.iter().any(|g| g.matches_at(doc, el, g.parts.len() - 1))
    }

    /// First descendant of `root` (exclusive) in document order that matches.
    pub fn first_in(&self, doc: &Document, root: NodeId) -> Option<NodeId> {
        doc.descendants(root).find(|&n| self.matches(doc, n))
    }

    /// All descendants of `root` (exclusive) that match, in document order.
    pub fn all_in(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
        doc.descendants(root)
            .filter(|&n| self.matches(doc, n))
            .collect()
    }
}

impl core::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Complex {
    fn matches_at(&self, doc: &Document, el: NodeId, i: usize) -> bool {
        let (combinator, compound) = &self.parts[i];
        if !compound.matches(doc, el) {
            return false;
        }
        if i == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => doc
                .parent_of(el)
                .is_some_and(|p| self.matches_at(doc, p, i - 1)),
            Combinator::Descendant => doc
                .ancestors(el)
                .skip(1)
                .any(|p| self.matches_at(doc, p, i - 1)),
        }
    }
}

impl Compound {
    fn matches(&self, doc: &Document, el: NodeId) -> bool {
        let Some(tag) = doc.tag(el) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        if let Some(id) = &self.id
            && doc.attribute(el, "id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| doc.has_class(el, c)) {
            return false;
        }
        self.attributes.iter().all(|a| match (&a.value, doc.attribute(el, &a.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(want), Some(have)) => want == have,
        })
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Skip whitespace and report whether any was skipped.
    fn skip_ws(&mut self) -> bool {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        rest.len() != trimmed.len()
    }

    fn ident(&mut self) -> Option<&'a str> {
        let rest = &self.src[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_')))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: self.pos,
            },
            None => SelectorError::Empty,
        }
    }

    fn selector_list(mut self) -> Result<Selector, SelectorError> {
        let mut groups = SmallVec::new();
        loop {
            groups.push(self.complex()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => self.bump(),
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Selector { groups })
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        let mut parts = SmallVec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let Some(compound) = self.compound()? else {
                return Err(match (self.peek(), combinator) {
                    (None | Some(','), Combinator::Child) => {
                        SelectorError::DanglingCombinator(self.pos)
                    }
                    (None, Combinator::Descendant) => SelectorError::Empty,
                    _ => self.unexpected(),
                });
            };
            parts.push((combinator, compound));
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    combinator = Combinator::Child;
                }
                Some(_) if had_ws => combinator = Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Option<Compound>, SelectorError> {
        let mut compound = Compound::default();
        let mut any = false;
        if self.peek() == Some('*') {
            self.bump();
            any = true;
        } else if let Some(tag) = self.ident() {
            compound.tag = Some(tag.to_ascii_lowercase());
            any = true;
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    let id = self.ident().ok_or_else(|| self.unexpected())?;
                    compound.id = Some(id.into());
                }
                Some('.') => {
                    self.bump();
                    let class = self.ident().ok_or_else(|| self.unexpected())?;
                    compound.classes.push(class.into());
                }
                Some('[') => {
                    let start = self.pos;
                    self.bump();
                    compound.attributes.push(self.attribute(start)?);
                }
                _ => break,
            }
            any = true;
        }
        Ok(any.then_some(compound))
    }

    fn attribute(&mut self, start: usize) -> Result<AttrTest, SelectorError> {
        let unterminated = SelectorError::UnterminatedAttribute(start);
        self.skip_ws();
        let name = match self.ident() {
            Some(name) => name.to_ascii_lowercase(),
            None if self.peek().is_none() => return Err(unterminated),
            None => return Err(self.unexpected()),
        };
        self.skip_ws();
        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.bump();
                self.skip_ws();
                match self.peek() {
                    Some(q @ ('"' | '\'')) => {
                        self.bump();
                        let rest = &self.src[self.pos..];
                        let end = rest.find(q).ok_or(unterminated.clone())?;
                        self.pos += end + 1;
                        Some(rest[..end].into())
                    }
                    Some(_) => Some(self.ident().ok_or_else(|| self.unexpected())?.into()),
                    None => return Err(unterminated),
                }
            }
            None => return Err(unterminated),
            Some(_) => return Err(self.unexpected()),
        };
        self.skip_ws();
        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(AttrTest { name, value })
            }
            None => Err(unterminated),
            Some(_) => Err(self.unexpected()),
        }
    }
}

/// Return the first descendant of `root` matching `selector`, in document order.
///
/// Mirrors `querySelector`: `root` itself is never returned.
pub fn find(doc: &Document, root: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
    Ok(Selector::parse(selector)?.first_in(doc, root))
}

/// Return every descendant of `root` matching `selector`, in document order.
pub fn find_all(doc: &Document, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
    Ok(Selector::parse(selector)?.all_in(doc, root))
}

/// Returns true if `el` matches `selector`.
pub fn matches(doc: &Document, el: NodeId, selector: &str) -> Result<bool, SelectorError> {
    Ok(Selector::parse(selector)?.matches(doc, el))
}

/// Walk from `el` (inclusive) toward the root and return the first element matching
/// `selector`, stopping before `boundary`.
///
/// - `boundary` defaults to the document body.
/// - With no selector (or an empty one), the boundary itself is returned.
/// - Returns `Ok(None)` when nothing matches before the boundary (or the root is reached).
///
/// ```
/// use trellis_dom::{Document, parent};
///
/// let mut doc = Document::default();
/// let list = doc.create_element("ul");
/// doc.append_child(doc.body(), list);
/// doc.set_inner_html(list, r#"<li data-index="3"><span>x</span></li>"#);
/// let span = doc.children_of(doc.children_of(list)[0])[0];
///
/// let row = parent(&doc, span, Some("[data-index]"), Some(list)).unwrap();
/// assert_eq!(row.and_then(|r| doc.attribute(r, "data-index")), Some("3"));
/// assert_eq!(parent(&doc, span, Some("table"), Some(list)).unwrap(), None);
/// assert_eq!(parent(&doc, span, None, Some(list)).unwrap(), Some(list));
/// ```
pub fn parent(
    doc: &Document,
    el: NodeId,
    selector: Option<&str>,
    boundary: Option<NodeId>,
) -> Result<Option<NodeId>, SelectorError> {
    let boundary = boundary.unwrap_or_else(|| doc.body());
    let Some(selector) = selector.filter(|s| !s.trim().is_empty()) else {
        return Ok(Some(boundary));
    };
    let selector = Selector::parse(selector)?;
    Ok(doc
        .ancestors(el)
        .take_while(|&n| n != boundary)
        .find(|&n| selector.matches(doc, n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::default();
        let list = doc.create_element("ul");
        doc.append_child(doc.body(), list);
        doc.set_attribute(list, "id", "menu");
        doc.set_inner_html(
            list,
            concat!(
                r#"<li data-index="0" class="node node-active"><span>A</span></li>"#,
                r#"<li data-index="1" class="node node-disabled"><span>B</span></li>"#,
                r#"<li data-index="2" class="node"><em><span>C</span></em></li>"#,
            ),
        );
        (doc, list)
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert_eq!(
            Selector::parse("li >"),
            Err(SelectorError::DanglingCombinator(4))
        );
        assert_eq!(
            Selector::parse("li[data-index"),
            Err(SelectorError::UnterminatedAttribute(2))
        );
        assert_eq!(
            Selector::parse(r#"li[data-index="1]"#),
            Err(SelectorError::UnterminatedAttribute(2))
        );
        assert_eq!(
            Selector::parse("li,,a"),
            Err(SelectorError::Unexpected {
                found: ',',
                offset: 3
            })
        );
        assert!(matches!(
            Selector::parse("li!"),
            Err(SelectorError::Unexpected { found: '!', .. })
        ));
    }

    #[test]
    fn compound_and_attribute_forms() {
        let (doc, list) = sample();
        let rows = doc.children_of(list).to_vec();
        assert_eq!(find(&doc, list, "li.node-active").unwrap(), Some(rows[0]));
        assert_eq!(find(&doc, list, "[data-index='1']").unwrap(), Some(rows[1]));
        assert_eq!(find(&doc, list, "li[data-index=2]").unwrap(), Some(rows[2]));
        assert_eq!(find(&doc, list, r#"li[data-index="9"]"#).unwrap(), None);
        assert_eq!(find(&doc, doc.body(), "#menu").unwrap(), Some(list));
        assert_eq!(find(&doc, doc.body(), "UL").unwrap(), Some(list));
        assert_eq!(find_all(&doc, list, "li.node").unwrap(), rows);
        assert_eq!(find_all(&doc, list, "*").unwrap().len(), 7);
    }

    #[test]
    fn root_is_never_its_own_match() {
        let (doc, list) = sample();
        assert_eq!(find(&doc, list, "ul").unwrap(), None);
    }

    #[test]
    fn combinators() {
        let (doc, list) = sample();
        let rows = doc.children_of(list).to_vec();
        let spans = find_all(&doc, list, "li span").unwrap();
        assert_eq!(spans.len(), 3);
        let direct = find_all(&doc, list, "li > span").unwrap();
        assert_eq!(direct.len(), 2);
        assert_eq!(find_all(&doc, list, "ul > li > em > span").unwrap().len(), 1);
        assert_eq!(
            find_all(&doc, list, "li.node-disabled, li.node-active").unwrap(),
            vec![rows[0], rows[1]]
        );
        assert!(matches(&doc, spans[2], "body #menu li em span").unwrap());
        assert!(!matches(&doc, spans[2], "li > span").unwrap());
    }

    #[test]
    fn parent_walk() {
        let (doc, list) = sample();
        let rows = doc.children_of(list).to_vec();
        let deep = find(&doc, rows[2], "span").unwrap().unwrap();
        assert_eq!(
            parent(&doc, deep, Some("li"), Some(list)).unwrap(),
            Some(rows[2])
        );
        // `el` itself is a candidate.
        assert_eq!(
            parent(&doc, rows[2], Some("li"), Some(list)).unwrap(),
            Some(rows[2])
        );
        // The boundary is exclusive.
        assert_eq!(parent(&doc, deep, Some("ul"), Some(list)).unwrap(), None);
        // Defaults to the body as boundary.
        assert_eq!(parent(&doc, deep, Some("ul"), None).unwrap(), Some(list));
        assert_eq!(parent(&doc, deep, Some(""), None).unwrap(), Some(doc.body()));
        assert!(parent(&doc, deep, Some("li["), None).is_err());
    }

    #[test]
    fn text_nodes_never_match() {
        let (doc, list) = sample();
        let any = Selector::parse("*").unwrap();
        let text = doc
            .descendants(list)
            .find(|&n| doc.is_text(n))
            .unwrap();
        assert!(!any.matches(&doc, text));
    }
}
