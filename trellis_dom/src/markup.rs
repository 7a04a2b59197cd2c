// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup helpers: escaping, `${key}` templates, fragment parsing and serialization.
//!
//! [`escape_html`] is the sanitization boundary for any untrusted text placed
//! into markup. The fragment parser behind [`Document::set_inner_html`]
//! accepts the well-formed subset that templates produce: elements with
//! quoted, unquoted, or boolean attributes, void and self-closing elements,
//! comments, text, and the implicit `</li>` rule. It is not a full HTML parser.

use alloc::{string::String, vec, vec::Vec};
use smallvec::SmallVec;

use crate::Document;
use crate::document::NodeData;
use crate::types::NodeId;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Escape text for safe inclusion in markup, as text or inside a quoted attribute.
///
/// Escapes `&`, `<`, `>`, `"`, `'` and `` ` ``.
///
/// ```
/// use trellis_dom::escape_html;
///
/// assert_eq!(
///     escape_html(r#"<b title="x">Tom & 'Jerry'</b>"#),
///     "&lt;b title=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/b&gt;",
/// );
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            c => out.push(c),
        }
    }
    out
}

/// Substitute `${key}` placeholders in `template` with values from `data`.
///
/// Keys consist of ASCII alphanumerics, `_`, `-` and `.`. Unknown keys are
/// replaced with the empty string; anything that is not a well-formed
/// placeholder is copied verbatim. Values are inserted as-is, so escape them
/// first when they carry untrusted text.
///
/// ```
/// use trellis_dom::format_template;
///
/// let html = format_template("<span>${text}</span>${missing}", &[("text", "Copy")]);
/// assert_eq!(html, "<span>Copy</span>");
/// ```
pub fn format_template(template: &str, data: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let key_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
            .unwrap_or(after.len());
        if key_len > 0 && after[key_len..].starts_with('}') {
            let key = &after[..key_len];
            if let Some((_, value)) = data.iter().find(|(k, _)| *k == key) {
                out.push_str(value);
            }
            rest = &after[key_len + 1..];
        } else {
            out.push_str("${");
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Decode the character references produced by [`escape_html`], plus `&apos;`,
/// `&nbsp;` and decimal/hex numeric references. Unknown references stay literal.
pub(crate) fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after.find(';').and_then(|semi| {
            let name = &after[..semi];
            let c = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| name.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Open {
        tag: String,
        attributes: SmallVec<[(String, String); 4]>,
        self_closing: bool,
    },
    Close(String),
    Text(String),
}

fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = src;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }
        if let Some(after) = rest.strip_prefix("</") {
            if let Some(end) = after.find('>') {
                tokens.push(Token::Close(after[..end].trim().to_ascii_lowercase()));
                rest = &after[end + 1..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('<')
            && after.starts_with(|c: char| c.is_ascii_alphabetic())
            && let Some((token, consumed)) = open_tag(after)
        {
            tokens.push(token);
            rest = &after[consumed..];
            continue;
        }
        // Plain text runs to the next `<` (a stray `<` is kept as text).
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
        tokens.push(Token::Text(decode_entities(&rest[..end])));
        rest = &rest[end..];
    }
    tokens
}

/// Parse an opening tag body (after `<`). Returns the token and the bytes consumed
/// including the closing `>`, or `None` if the tag never closes.
fn open_tag(src: &str) -> Option<(Token, usize)> {
    let is_name = |c: char| c.is_ascii_alphanumeric() || c == '-';
    let name_len = src.find(|c: char| !is_name(c)).unwrap_or(src.len());
    let tag = src[..name_len].to_ascii_lowercase();
    let mut attributes = SmallVec::new();
    let mut pos = name_len;
    loop {
        let rest = &src[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if trimmed.starts_with("/>") {
            let token = Token::Open {
                tag,
                attributes,
                self_closing: true,
            };
            return Some((token, pos + 2));
        }
        if trimmed.starts_with('>') {
            let token = Token::Open {
                tag,
                attributes,
                self_closing: false,
            };
            return Some((token, pos + 1));
        }
        let first = trimmed.chars().next()?;
        let attr_len = trimmed
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
            .unwrap_or(trimmed.len());
        if attr_len == 0 {
            // Stray `=` or `/`; skip it.
            pos += first.len_utf8();
            continue;
        }
        let name = trimmed[..attr_len].to_ascii_lowercase();
        pos += attr_len;

        let rest = &src[pos..];
        let after_ws = rest.trim_start();
        let Some(value_src) = after_ws.strip_prefix('=') else {
            attributes.push((name, String::new()));
            continue;
        };
        let value_src_trimmed = value_src.trim_start();
        pos += rest.len() - value_src_trimmed.len();
        let value = match value_src_trimmed.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &value_src_trimmed[1..];
                let end = body.find(q)?;
                pos += end + 2;
                decode_entities(&body[..end])
            }
            Some(_) => {
                let end = value_src_trimmed
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(value_src_trimmed.len());
                pos += end;
                decode_entities(&value_src_trimmed[..end])
            }
            None => return None,
        };
        attributes.push((name, value));
    }
}

impl Document {
    /// Replace the children of `id` with the nodes parsed from `markup`.
    ///
    /// Unmatched closing tags are ignored and unclosed elements are closed at
    /// the end of the fragment. Does nothing for stale ids and text nodes.
    ///
    /// ```
    /// use trellis_dom::Document;
    ///
    /// let mut doc = Document::default();
    /// let list = doc.create_element("ul");
    /// doc.set_inner_html(list, r#"<li data-index="0"><span>A &amp; B</span><li data-index="1">C"#);
    ///
    /// let rows = doc.children_of(list);
    /// assert_eq!(rows.len(), 2);
    /// assert_eq!(doc.attribute(rows[1], "data-index"), Some("1"));
    /// assert_eq!(doc.text_content(rows[0]), "A & B");
    /// ```
    pub fn set_inner_html(&mut self, id: NodeId, markup: &str) {
        if !self.is_element(id) {
            return;
        }
        self.clear_children(id);
        let mut open: Vec<NodeId> = vec![id];
        for token in tokenize(markup) {
            let top = *open.last().unwrap_or(&id);
            match token {
                Token::Text(text) => {
                    if !text.is_empty() {
                        let node = self.create_text(&text);
                        self.append_child(top, node);
                    }
                }
                Token::Open {
                    tag,
                    attributes,
                    self_closing,
                } => {
                    let mut parent = top;
                    if tag == "li" && open.len() > 1 && self.tag(top) == Some("li") {
                        open.pop();
                        parent = *open.last().unwrap_or(&id);
                    }
                    let el = self.create_element(&tag);
                    for (name, value) in &attributes {
                        self.set_attribute(el, name, value);
                    }
                    self.append_child(parent, el);
                    if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
                        open.push(el);
                    }
                }
                Token::Close(tag) => {
                    if let Some(pos) = open
                        .iter()
                        .skip(1)
                        .rposition(|&n| self.tag(n) == Some(tag.as_str()))
                    {
                        open.truncate(pos + 1);
                    } else {
                        tracing::trace!(tag = %tag, "ignoring unmatched closing tag");
                    }
                }
            }
        }
    }

    /// Serialize the children of `id` as markup.
    ///
    /// Text and attribute values are escaped with [`escape_html`].
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children_of(id) {
            self.write_outer_html(child, &mut out);
        }
        out
    }

    /// Serialize `id` itself, including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_outer_html(id, &mut out);
        out
    }

    fn write_outer_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => out.push_str(&escape_html(text)),
            NodeData::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for &child in self.children_of(id) {
                    self.write_outer_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn escape_covers_markup_and_quotes() {
        assert_eq!(escape_html("a`b"), "a&#x60;b");
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(decode_entities(&escape_html("<&\"'`>")), "<&\"'`>");
    }

    #[test]
    fn decode_leaves_unknown_references() {
        assert_eq!(decode_entities("a &bogus; b & c"), "a &bogus; b & c");
        assert_eq!(decode_entities("&#65;&#x42;&apos;"), "AB'");
    }

    #[test]
    fn template_placeholders() {
        let data = [("text", "Save"), ("item.value", "s")];
        assert_eq!(format_template("${text}/${item.value}", &data), "Save/s");
        assert_eq!(format_template("${}", &data), "${}");
        assert_eq!(format_template("${text", &data), "${text");
        assert_eq!(format_template("$${text}$", &data), "$Save$");
        assert_eq!(format_template("${nope}", &data), "");
    }

    #[test]
    fn tokenizer_handles_attribute_forms() {
        let tokens = tokenize(r#"<input disabled value=x data-a='1 2'/>t"#);
        assert_eq!(
            tokens,
            vec![
                Token::Open {
                    tag: "input".to_string(),
                    attributes: SmallVec::from_vec(vec![
                        ("disabled".to_string(), String::new()),
                        ("value".to_string(), "x".to_string()),
                        ("data-a".to_string(), "1 2".to_string()),
                    ]),
                    self_closing: true,
                },
                Token::Text("t".to_string()),
            ]
        );
    }

    #[test]
    fn tokenizer_keeps_stray_angle_brackets_as_text() {
        assert_eq!(
            tokenize("a < b <"),
            vec![
                Token::Text("a ".to_string()),
                Token::Text("< b ".to_string()),
                Token::Text("<".to_string()),
            ]
        );
    }

    #[test]
    fn unterminated_tag_becomes_text() {
        let mut doc = Document::default();
        let div = doc.create_element("div");
        doc.set_inner_html(div, r#"<span title="oops>"#);
        assert_eq!(doc.children_of(div).len(), 1);
        assert!(doc.is_text(doc.children_of(div)[0]));
    }

    #[test]
    fn parse_nested_with_comments_and_void() {
        let mut doc = Document::default();
        let div = doc.create_element("div");
        doc.set_inner_html(div, "<!-- c --><p>a<br>b</p></em>tail");
        let kids = doc.children_of(div).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(doc.tag(kids[0]), Some("p"));
        assert_eq!(doc.children_of(kids[0]).len(), 3);
        assert_eq!(doc.text_content(div), "abtail");
    }

    #[test]
    fn reparse_replaces_children() {
        let mut doc = Document::default();
        let ul = doc.create_element("ul");
        doc.set_inner_html(ul, "<li>a</li><li>b</li>");
        let old = doc.children_of(ul).to_vec();
        doc.set_inner_html(ul, "<li>c</li>");
        assert!(old.iter().all(|&n| !doc.is_alive(n)));
        assert_eq!(doc.children_of(ul).len(), 1);
    }

    #[test]
    fn serialize_round_trips_rendered_rows() {
        let mut doc = Document::default();
        let ul = doc.create_element("ul");
        let markup = r#"<li data-index="0" class="n"><span>&lt;b&gt;</span></li><li data-index="1"><br></li>"#;
        doc.set_inner_html(ul, markup);
        assert_eq!(doc.inner_html(ul), markup);
        assert_eq!(
            doc.outer_html(doc.children_of(ul)[1]),
            r#"<li data-index="1"><br></li>"#
        );
    }
}
