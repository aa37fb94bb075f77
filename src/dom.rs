// src/dom.rs
//! A small element tree standing in for the hosting page's DOM.
//!
//! Only what the results view needs is modelled: tags, an id, a class,
//! ordered attributes, text content and children. Everything serializes to
//! HTML so the live page can embed it.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub class: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            class: None,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    /// Number of elements with `tag` in this subtree, including itself.
    pub fn count_tag(&self, tag: &str) -> usize {
        let own = usize::from(self.tag == tag);
        own + self.children.iter().map(|c| c.count_tag(tag)).sum::<usize>()
    }

    /// Every element with `tag` in this subtree, in document order.
    pub fn elements_by_tag<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        if self.tag == tag {
            out.push(self);
        }
        for child in &self.children {
            child.elements_by_tag(tag, out);
        }
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    pub fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape(id));
        }
        if let Some(class) = &self.class {
            let _ = write!(out, " class=\"{}\"", escape(class));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The mount point the results view is rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    children: Vec<Element>,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn append(&mut self, element: Element) {
        self.children.push(element);
    }

    /// Replace all children with `element`.
    pub fn replace_with(&mut self, element: Element) {
        self.clear();
        self.append(element);
    }

    /// True when the container holds exactly one child, carrying `id`.
    pub fn sole_child_has_id(&self, id: &str) -> bool {
        matches!(self.children.as_slice(), [only] if only.id.as_deref() == Some(id))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    pub fn count_tag(&self, tag: &str) -> usize {
        self.children.iter().map(|c| c.count_tag(tag)).sum()
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        for child in &self.children {
            child.elements_by_tag(tag, &mut out);
        }
        out
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Element::text_content).collect()
    }

    /// The container's inner HTML.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    /// The container itself as a `div`, wrapping its inner HTML.
    pub fn outer_html(&self) -> String {
        format!("<div id=\"{}\">{}</div>", escape(&self.id), self.inner_html())
    }
}

pub type SharedContainer = Arc<RwLock<Container>>;

/// The hosting page: a set of mount points addressable by id.
#[derive(Debug, Clone, Default)]
pub struct Document {
    containers: HashMap<String, SharedContainer>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with a single, empty mount point.
    pub fn with_container(id: &str) -> Self {
        let mut document = Self::new();
        document.mount(id);
        document
    }

    /// Add an empty mount point, or return the existing one with that id.
    pub fn mount(&mut self, id: &str) -> SharedContainer {
        self.containers
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(Container::new(id))))
            .clone()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<SharedContainer> {
        self.containers.get(id).cloned()
    }
}
