// SPDX-License-Identifier: MPL-2.0
//! In-memory markup document implementing [`DocumentView`].
//!
//! The document is parsed from XHTML/XML text with `quick-xml` into an arena
//! of nodes and serialized back on demand. Text and attribute values are
//! stored in their escaped form so entities the XML parser does not know
//! (`&nbsp;`, `&copy;`, `&eacute;`) survive a round trip untouched. Declarations, doctype, comments, CDATA and
//! processing instructions are kept verbatim.

use crate::error::{MarkupError, Result};
use crate::port::{AnnotatedElement, DocumentView, ElementKind, ElementSpec, NodeId};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        name: String,
        /// Escaped attribute values.
        attributes: Vec<(String, String)>,
        children: Vec<usize>,
        self_closing: bool,
    },
    /// Escaped character data.
    Text(String),
    Raw(Event<'static>),
}

/// A parsed markup document.
///
/// Slots of detached nodes go to a free list and are reused by later
/// insertions, so replacing text does not grow the arena.
#[derive(Debug, Clone)]
pub struct MarkupDocument {
    nodes: Vec<NodeData>,
    free: Vec<usize>,
    top_level: Vec<usize>,
    root: usize,
}

impl MarkupDocument {
    /// Parses a document from markup text.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] variants for malformed input, mismatched or
    /// unclosed tags, and documents without any element.
    pub fn parse(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut top_level = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        loop {
            let event = reader.read_event()?;
            let opens = matches!(event, Event::Start(_));
            let data = match event {
                Event::Eof => break,
                Event::Start(ref start) => element_data(start, false)?,
                Event::Empty(ref start) => element_data(start, true)?,
                Event::End(ref end) => {
                    if stack.pop().is_none() {
                        let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                        return Err(MarkupError::UnexpectedClose(name).into());
                    }
                    continue;
                }
                Event::Text(ref text) => NodeData::Text(String::from_utf8_lossy(text).into_owned()),
                other => NodeData::Raw(other.into_owned()),
            };

            let id = nodes.len();
            let parent = stack.last().copied();
            nodes.push(data);
            match parent {
                Some(parent) => {
                    if let NodeData::Element { children, .. } = &mut nodes[parent] {
                        children.push(id);
                    }
                }
                None => top_level.push(id),
            }
            if opens {
                stack.push(id);
            }
        }

        if let Some(open) = stack.last() {
            let name = match &nodes[*open] {
                NodeData::Element { name, .. } => name.clone(),
                _ => String::new(),
            };
            return Err(MarkupError::UnclosedElement(name).into());
        }

        let root = top_level
            .iter()
            .copied()
            .find(|id| matches!(nodes[*id], NodeData::Element { .. }))
            .ok_or(MarkupError::Empty)?;

        Ok(Self {
            nodes,
            free: Vec::new(),
            top_level,
            root,
        })
    }

    /// Reads and parses a document from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serializes and writes the document to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_markup()?)?;
        Ok(())
    }

    /// Serializes the document back to markup text.
    pub fn to_markup(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for id in &self.top_level {
            self.write_node(&mut writer, *id)?;
        }
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    /// Handle of the document element.
    pub fn root(&self) -> NodeId {
        NodeId(self.root)
    }

    /// Tag name of an element.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0)? {
            NodeData::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: usize) -> Result<()> {
        match &self.nodes[id] {
            NodeData::Element {
                name,
                attributes,
                children,
                self_closing,
            } => {
                let mut start = BytesStart::new(name.as_str());
                for (key, value) in attributes {
                    start.push_attribute(Attribute {
                        key: QName(key.as_bytes()),
                        value: Cow::Borrowed(value.as_bytes()),
                    });
                }
                if children.is_empty() && *self_closing {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    for child in children {
                        self.write_node(writer, *child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
                }
            }
            NodeData::Text(text) => {
                writer.write_event(Event::Text(BytesText::from_escaped(text.as_str())))?;
            }
            NodeData::Raw(event) => writer.write_event(event.clone())?,
        }
        Ok(())
    }

    /// Live elements in document order.
    fn elements(&self) -> Vec<usize> {
        let mut order = Vec::new();
        let mut pending: Vec<usize> = self.top_level.iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            if let NodeData::Element { children, .. } = &self.nodes[id] {
                order.push(id);
                pending.extend(children.iter().rev().copied());
            }
        }
        order
    }

    fn descendant_elements(&self, id: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut pending: Vec<usize> = self.children(id).iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            if let NodeData::Element { children, .. } = &self.nodes[id] {
                order.push(id);
                pending.extend(children.iter().rev().copied());
            }
        }
        order
    }

    fn children(&self, id: usize) -> &[usize] {
        match self.nodes.get(id) {
            Some(NodeData::Element { children, .. }) => children.as_slice(),
            _ => &[],
        }
    }

    fn attr(&self, id: usize, key: &str) -> Option<String> {
        match self.nodes.get(id)? {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, raw)| unescape_lossy(raw)),
            _ => None,
        }
    }

    fn is_tag(&self, id: usize, tag: &str) -> bool {
        matches!(&self.nodes[id], NodeData::Element { name, .. } if name.eq_ignore_ascii_case(tag))
    }

    fn remove_attr(&mut self, id: usize, key: &str) {
        if let NodeData::Element { attributes, .. } = &mut self.nodes[id] {
            attributes.retain(|(k, _)| k != key);
        }
    }

    fn collect_text(&self, id: usize, out: &mut String) {
        match &self.nodes[id] {
            NodeData::Element { children, .. } => {
                for child in children {
                    self.collect_text(*child, out);
                }
            }
            NodeData::Text(text) => out.push_str(&unescape_lossy(text)),
            NodeData::Raw(Event::CData(data)) => out.push_str(&String::from_utf8_lossy(data)),
            NodeData::Raw(_) => {}
        }
    }

    fn push_node(&mut self, data: NodeData) -> usize {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = data;
                id
            }
            None => {
                self.nodes.push(data);
                self.nodes.len() - 1
            }
        }
    }

    /// Returns a detached subtree's slots to the free list.
    fn release(&mut self, ids: Vec<usize>) {
        let mut pending = ids;
        while let Some(id) = pending.pop() {
            let data = std::mem::replace(&mut self.nodes[id], NodeData::Text(String::new()));
            if let NodeData::Element { children, .. } = data {
                pending.extend(children);
            }
            self.free.push(id);
        }
    }

    fn build(&mut self, spec: &ElementSpec) -> usize {
        let id = self.push_node(
            NodeData::Element {
                name: spec.tag.clone(),
                attributes: spec
                    .attributes
                    .iter()
                    .map(|(key, value)| (key.clone(), escape(value.as_str()).into_owned()))
                    .collect(),
                children: Vec::new(),
                self_closing: false,
            },
        );

        let mut children = Vec::new();
        if let Some(text) = &spec.text {
            children.push(self.push_node(NodeData::Text(escape(text.as_str()).into_owned())));
        }
        for child in &spec.children {
            children.push(self.build(child));
        }
        if let NodeData::Element { children: slot, .. } = &mut self.nodes[id] {
            *slot = children;
        }
        id
    }

    fn option_value(&self, option: usize) -> String {
        match self.attr(option, "value") {
            Some(value) => value,
            None => {
                let mut text = String::new();
                self.collect_text(option, &mut text);
                text.trim().to_string()
            }
        }
    }

    fn options(&self, select: usize) -> Vec<usize> {
        self.descendant_elements(select)
            .into_iter()
            .filter(|id| self.is_tag(*id, "option"))
            .collect()
    }
}

fn element_data(start: &BytesStart<'_>, self_closing: bool) -> Result<NodeData> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.html_attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        // Single-quoted values may hold a bare `"`; written back double-quoted.
        let raw = String::from_utf8_lossy(&attribute.value).replace('"', "&quot;");
        attributes.push((key, raw));
    }
    Ok(NodeData::Element {
        name,
        attributes,
        children: Vec::new(),
        self_closing,
    })
}

/// Unescapes stored markup, keeping it verbatim when it holds entities the
/// XML parser does not know.
fn unescape_lossy(raw: &str) -> String {
    match unescape(raw) {
        Ok(plain) => plain.into_owned(),
        Err(_) => raw.to_string(),
    }
}

impl DocumentView for MarkupDocument {
    fn set_language(&mut self, code: &str) {
        self.set_attribute(NodeId(self.root), "lang", code);
    }

    fn language(&self) -> Option<String> {
        self.attr(self.root, "lang")
    }

    fn annotated_elements(&self, attribute: &str) -> Vec<AnnotatedElement> {
        self.elements()
            .into_iter()
            .filter_map(|id| {
                let key = self.attr(id, attribute)?;
                let tag = self.tag_name(NodeId(id)).unwrap_or_default();
                let placeholder = self.attr(id, "placeholder");
                Some(AnnotatedElement {
                    node: NodeId(id),
                    key,
                    kind: ElementKind::classify(tag, placeholder.as_deref()),
                })
            })
            .collect()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let single_text = match self.nodes.get(node.0) {
            Some(NodeData::Element { children, .. }) => match children.as_slice() {
                [only] if matches!(self.nodes[*only], NodeData::Text(_)) => Some(*only),
                _ => None,
            },
            _ => return,
        };

        // A lone text child is rewritten in place.
        if let (Some(child), false) = (single_text, text.is_empty()) {
            self.nodes[child] = NodeData::Text(escape(text).into_owned());
            return;
        }

        let detached = match &mut self.nodes[node.0] {
            NodeData::Element { children, .. } => std::mem::take(children),
            _ => Vec::new(),
        };
        self.release(detached);
        if !text.is_empty() {
            let child = self.push_node(NodeData::Text(escape(text).into_owned()));
            if let NodeData::Element { children, .. } = &mut self.nodes[node.0] {
                children.push(child);
            }
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node.0)?;
        let mut out = String::new();
        self.collect_text(node.0, &mut out);
        Some(out)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attr(node.0, name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(NodeData::Element { attributes, .. }) = self.nodes.get_mut(node.0)
        else {
            return;
        };
        let escaped = escape(value).into_owned();
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = escaped,
            None => attributes.push((name.to_string(), escaped)),
        }
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|node| self.attr(*node, "id").as_deref() == Some(id))
            .map(NodeId)
    }

    fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|node| {
                self.attr(*node, "class")
                    .is_some_and(|list| list.split_whitespace().any(|c| c == class))
            })
            .map(NodeId)
    }

    fn set_control_value(&mut self, node: NodeId, value: &str) {
        if node.0 >= self.nodes.len() {
            return;
        }
        if !self.is_tag(node.0, "select") {
            self.set_attribute(node, "value", value);
            return;
        }

        let mut matched = false;
        for option in self.options(node.0) {
            if !matched && self.option_value(option) == value {
                self.set_attribute(NodeId(option), "selected", "selected");
                matched = true;
            } else {
                self.remove_attr(option, "selected");
            }
        }
    }

    fn control_value(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node.0)?;
        if !self.is_tag(node.0, "select") {
            return self.attr(node.0, "value");
        }

        let options = self.options(node.0);
        options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied())
            .map(|option| self.option_value(option))
    }

    fn prepend_child(&mut self, parent: NodeId, element: &ElementSpec) -> Option<NodeId> {
        if !matches!(
            self.nodes.get(parent.0),
            Some(NodeData::Element { .. })
        ) {
            return None;
        }
        let id = self.build(element);
        if let NodeData::Element { children, .. } = &mut self.nodes[parent.0] {
            children.insert(0, id);
        }
        Some(NodeId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Error;
    use crate::i18n::{Locale, TranslationTable};
    use crate::localizer::Localizer;

    const PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html>
  <body>
    <!-- login form -->
    <div class="card login-container">
      <h1 data-i18n="login_title">Casino Login</h1>
      <input id="email" type="email" data-i18n="email_label" placeholder="Email"/>
      <button data-i18n="login_btn">Iniciar Sesión</button>
      <p>&copy; 2024&nbsp;Royal</p>
    </div>
  </body>
</html>"#;

    fn page() -> MarkupDocument {
        MarkupDocument::parse(PAGE).expect("page parses")
    }

    #[test]
    fn parse_finds_document_element() {
        let doc = page();
        assert_eq!(doc.tag_name(doc.root()), Some("html"));
    }

    #[test]
    fn annotated_elements_are_listed_in_order_with_kinds() {
        let doc = page();
        let elements = doc.annotated_elements("data-i18n");
        let summary: Vec<_> = elements
            .iter()
            .map(|e| (e.key.as_str(), e.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("login_title", ElementKind::Text),
                ("email_label", ElementKind::Placeholder),
                ("login_btn", ElementKind::Text),
            ]
        );
    }

    #[test]
    fn set_text_replaces_children_and_escapes() {
        let mut doc = page();
        let button = doc.annotated_elements("data-i18n")[2].node;
        doc.set_text(button, "Log <In> & go");

        assert_eq!(doc.text(button).as_deref(), Some("Log <In> & go"));
        let markup = doc.to_markup().expect("serialize");
        assert!(markup.contains("Log &lt;In&gt; &amp; go"));
    }

    #[test]
    fn unknown_entities_survive_round_trip() {
        let doc = page();
        let markup = doc.to_markup().expect("serialize");
        assert!(markup.contains("&copy; 2024&nbsp;Royal"));
        assert!(markup.contains("<!-- login form -->"));
        assert!(markup.contains("DOCTYPE"));
    }

    #[test]
    fn entity_attributes_on_untagged_elements_survive_localization() {
        let mut doc = MarkupDocument::parse(
            r#"<div><a title="caf&eacute;" href="?a=1&amp;b=2">x</a><p title="&copy; Royal">c</p><b data-i18n="login_btn">Iniciar</b></div>"#,
        )
        .expect("parse");
        let localizer = Localizer::new(TranslationTable::embedded(), &Config::default());
        localizer.apply_language(Locale::En, &mut doc);

        let markup = doc.to_markup().expect("serialize");
        assert!(markup.contains(r#"<a title="caf&eacute;" href="?a=1&amp;b=2">x</a>"#));
        assert!(markup.contains(r#"<p title="&copy; Royal">c</p>"#));
        assert!(markup.contains("<b data-i18n=\"login_btn\">Log In</b>"));
    }

    #[test]
    fn attribute_values_are_unescaped_on_read_and_escaped_on_write() {
        let mut doc =
            MarkupDocument::parse(r#"<div><a id="l" href="?a=1&amp;b=2" title='say "hi"'/></div>"#)
                .expect("parse");
        let link = doc.element_by_id("l").expect("link");
        assert_eq!(doc.attribute(link, "href").as_deref(), Some("?a=1&b=2"));
        assert_eq!(doc.attribute(link, "title").as_deref(), Some(r#"say "hi""#));

        doc.set_attribute(link, "placeholder", "<Tom & Jerry>");
        assert_eq!(
            doc.attribute(link, "placeholder").as_deref(),
            Some("<Tom & Jerry>")
        );
        let markup = doc.to_markup().expect("serialize");
        assert!(markup.contains(r#"placeholder="&lt;Tom &amp; Jerry&gt;""#));
        assert!(markup.contains(r#"title="say &quot;hi&quot;""#));
    }

    #[test]
    fn repeated_language_switches_do_not_grow_the_arena() {
        let mut doc = page();
        let localizer = Localizer::new(TranslationTable::embedded(), &Config::default());
        localizer.apply_language(Locale::En, &mut doc);
        let settled = doc.nodes.len();

        for round in 0..1_000 {
            let locale = if round % 2 == 0 { Locale::Es } else { Locale::En };
            localizer.apply_language(locale, &mut doc);
        }
        assert_eq!(doc.nodes.len(), settled);
    }

    #[test]
    fn replacing_mixed_content_reuses_detached_slots() {
        let mut doc =
            MarkupDocument::parse("<div><p id=\"p\">a<i>b</i>c</p></div>").expect("parse");
        let paragraph = doc.element_by_id("p").expect("paragraph");
        let before = doc.nodes.len();

        doc.set_text(paragraph, "");
        doc.set_text(paragraph, "one");
        doc.set_text(paragraph, "two");
        doc.prepend_child(NodeId(doc.root), &ElementSpec::new("span").text("s"))
            .expect("inserted");

        assert_eq!(doc.nodes.len(), before);
        assert_eq!(doc.text(paragraph).as_deref(), Some("two"));
        let markup = doc.to_markup().expect("serialize");
        assert!(markup.contains("<p id=\"p\">two</p>"));
        assert!(markup.contains("<span>s</span>"));
    }

    #[test]
    fn language_is_set_on_document_element() {
        let mut doc = page();
        assert_eq!(doc.language(), None);
        doc.set_language("en");
        doc.set_language("es");
        assert_eq!(doc.language().as_deref(), Some("es"));
        assert!(doc.to_markup().expect("serialize").contains(r#"<html lang="es">"#));
    }

    #[test]
    fn lookups_by_id_and_class() {
        let doc = page();
        let email = doc.element_by_id("email").expect("email input");
        assert_eq!(doc.tag_name(email), Some("input"));
        let card = doc.first_by_class("login-container").expect("container");
        assert_eq!(doc.tag_name(card), Some("div"));
        assert!(doc.first_by_class("login").is_none());
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn prepend_child_inserts_first_and_is_queryable() {
        let mut doc = page();
        let card = doc.first_by_class("login-container").expect("container");
        let spec = ElementSpec::new("div")
            .attr("id", "injected")
            .child(ElementSpec::new("span").text("hi"));
        let inserted = doc.prepend_child(card, &spec).expect("inserted");

        assert_eq!(doc.element_by_id("injected"), Some(inserted));
        assert_eq!(doc.text(inserted).as_deref(), Some("hi"));
        let markup = doc.to_markup().expect("serialize");
        let injected_at = markup.find("injected").expect("serialized");
        let title_at = markup.find("login_title").expect("title");
        assert!(injected_at < title_at);
    }

    #[test]
    fn select_value_marks_matching_option() {
        let mut doc = MarkupDocument::parse(
            r#"<form><select id="s"><option value="es">ES</option><option value="en" selected="selected">EN</option></select></form>"#,
        )
        .expect("parse");
        let select = doc.element_by_id("s").expect("select");
        assert_eq!(doc.control_value(select).as_deref(), Some("en"));

        doc.set_control_value(select, "es");
        assert_eq!(doc.control_value(select).as_deref(), Some("es"));
        let markup = doc.to_markup().expect("serialize");
        assert_eq!(markup.matches(r#"selected="selected""#).count(), 1);
    }

    #[test]
    fn unmatched_select_value_clears_selection() {
        let mut doc = MarkupDocument::parse(
            r#"<select id="s"><option value="es" selected="selected">ES</option><option>en</option></select>"#,
        )
        .expect("parse");
        let select = doc.element_by_id("s").expect("select");
        doc.set_control_value(select, "fr");
        assert!(!doc.to_markup().expect("serialize").contains("selected"));

        doc.set_control_value(select, "en");
        assert_eq!(doc.control_value(select).as_deref(), Some("en"));
    }

    #[test]
    fn input_value_is_an_attribute() {
        let mut doc = MarkupDocument::parse(r#"<div><input id="i"/></div>"#).expect("parse");
        let input = doc.element_by_id("i").expect("input");
        doc.set_control_value(input, "en");
        assert_eq!(doc.control_value(input).as_deref(), Some("en"));
    }

    #[test]
    fn empty_elements_keep_explicit_close_tags() {
        let doc = MarkupDocument::parse(r#"<html><script src="a.js"></script><br/></html>"#)
            .expect("parse");
        let markup = doc.to_markup().expect("serialize");
        assert!(markup.contains(r#"<script src="a.js"></script>"#));
        assert!(markup.contains("<br/>"));
    }

    #[test]
    fn valueless_html_attributes_are_accepted() {
        let doc = MarkupDocument::parse(r#"<form><input id="p" required/></form>"#).expect("parse");
        let input = doc.element_by_id("p").expect("input");
        assert_eq!(doc.attribute(input, "required").as_deref(), Some(""));
    }

    #[test]
    fn unclosed_element_is_rejected() {
        let err = MarkupDocument::parse("<html><body>").unwrap_err();
        assert!(matches!(
            err,
            Error::Markup(MarkupError::UnclosedElement(ref name)) if name == "body"
        ));
    }

    #[test]
    fn document_without_elements_is_rejected() {
        let err = MarkupDocument::parse("just text").unwrap_err();
        assert!(matches!(err, Error::Markup(MarkupError::Empty)));
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut doc = page();
        let bogus = NodeId(10_000);
        doc.set_text(bogus, "x");
        doc.set_attribute(bogus, "a", "b");
        doc.set_control_value(bogus, "en");
        assert!(doc.text(bogus).is_none());
        assert!(doc.prepend_child(bogus, &ElementSpec::new("div")).is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("out").join("page.html");
        let mut doc = page();
        doc.set_language("en");
        doc.save(&path).expect("save");

        let loaded = MarkupDocument::load(&path).expect("load");
        assert_eq!(loaded.language().as_deref(), Some("en"));
        assert_eq!(loaded.annotated_elements("data-i18n").len(), 3);
    }
}
