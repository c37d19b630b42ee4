// SPDX-License-Identifier: MPL-2.0
//! Document view port: the slice of a page the localizer reads and writes.

/// Opaque handle to an element inside a [`DocumentView`].
///
/// Handles are only meaningful for the view that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// How a translated string is written into an annotated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// The translation replaces the element's text content.
    Text,
    /// The translation replaces the element's `placeholder` attribute.
    Placeholder,
}

impl ElementKind {
    /// An `input` with a non-empty `placeholder` is placeholder-bearing;
    /// everything else is text-bearing.
    pub fn classify(tag: &str, placeholder: Option<&str>) -> Self {
        let has_placeholder = placeholder.is_some_and(|p| !p.is_empty());
        if tag.eq_ignore_ascii_case("input") && has_placeholder {
            ElementKind::Placeholder
        } else {
            ElementKind::Text
        }
    }

    /// Writes `value` into `node` the way this kind requires.
    pub fn write(self, document: &mut dyn DocumentView, node: NodeId, value: &str) {
        match self {
            ElementKind::Text => document.set_text(node, value),
            ElementKind::Placeholder => document.set_attribute(node, "placeholder", value),
        }
    }
}

/// An element carrying the translation-key attribute, as seen at apply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedElement {
    pub node: NodeId,
    pub key: String,
    pub kind: ElementKind,
}

/// A detached element tree to be inserted into a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementSpec {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// Read/write access to a live page.
///
/// Every method is total. Handles that no longer resolve are ignored by
/// setters and yield `None` from getters.
pub trait DocumentView {
    /// Sets the document-level language attribute.
    fn set_language(&mut self, code: &str);

    /// Returns the document-level language attribute.
    fn language(&self) -> Option<String>;

    /// Lists every element carrying `attribute`, in document order.
    fn annotated_elements(&self, attribute: &str) -> Vec<AnnotatedElement>;

    /// Replaces all children of `node` with a single text node.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Concatenated text content of `node` and its descendants.
    fn text(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// First element, in document order, whose class list contains `class`.
    fn first_by_class(&self, class: &str) -> Option<NodeId>;

    /// Sets the displayed value of a form control. For a `select` this
    /// selects the matching option.
    fn set_control_value(&mut self, node: NodeId, value: &str);

    fn control_value(&self, node: NodeId) -> Option<String>;

    /// Inserts `element` as the first child of `parent` and returns its handle.
    fn prepend_child(&mut self, parent: NodeId, element: &ElementSpec) -> Option<NodeId>;
}

// Consumed as `&mut dyn DocumentView`.
const _: Option<&dyn DocumentView> = None;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_with_placeholder_is_placeholder_bearing() {
        assert_eq!(
            ElementKind::classify("input", Some("Email")),
            ElementKind::Placeholder
        );
        assert_eq!(
            ElementKind::classify("INPUT", Some("Email")),
            ElementKind::Placeholder
        );
    }

    #[test]
    fn input_without_placeholder_is_text_bearing() {
        assert_eq!(ElementKind::classify("input", None), ElementKind::Text);
        assert_eq!(ElementKind::classify("input", Some("")), ElementKind::Text);
    }

    #[test]
    fn other_tags_are_text_bearing_even_with_placeholder() {
        assert_eq!(
            ElementKind::classify("textarea", Some("Write here")),
            ElementKind::Text
        );
        assert_eq!(ElementKind::classify("button", None), ElementKind::Text);
    }

    #[test]
    fn element_spec_builder_collects_parts() {
        let spec = ElementSpec::new("select")
            .attr("id", "lang-selector")
            .child(ElementSpec::new("option").attr("value", "es").text("Español"));

        assert_eq!(spec.tag, "select");
        assert_eq!(
            spec.attributes,
            vec![("id".to_string(), "lang-selector".to_string())]
        );
        assert_eq!(spec.children.len(), 1);
        assert_eq!(spec.children[0].text.as_deref(), Some("Español"));
    }
}
