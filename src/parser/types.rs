use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of a parsed page. Text is raw character data, exactly as it sat
/// between tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Appends to the class list instead of replacing it.
    pub fn with_class(mut self, class: &str) -> Self {
        let entry = self.attrs.entry("class".to_string()).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(class);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn href(&self) -> Option<&str> {
        self.attr("href")
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// All descendant elements in document order, not including `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        fn walk<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
            for child in &element.children {
                if let Node::Element(child) = child {
                    out.push(child);
                    walk(child, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    /// First descendant matching `predicate`, depth first.
    pub fn find(&self, predicate: impl Fn(&Element) -> bool) -> Option<&Element> {
        self.descendants().into_iter().find(|e| predicate(e))
    }

    pub fn find_tag(&self, tag: &str) -> Option<&Element> {
        self.find(|e| e.is(tag))
    }

    /// Concatenated character data, verbatim.
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => out.push_str(&element.raw_text()),
            }
        }
        out
    }

    /// Visible text with every whitespace run folded into one space and the
    /// ends trimmed.
    pub fn text_content(&self) -> String {
        self.raw_text().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::classify(self)
    }
}

/// Element kinds the walker knows how to decorate. Anything else is
/// [`NodeKind::Other`] and is walked through transparently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Anchor,
    LineBreak,
    Code,
    Emphasis,
    Strong,
    Term,
    Description,
    ListItem,
    List,
    Heading,
    Subheading,
    Listing,
    Paragraph,
    SectionBody,
    Sidebar,
    Admonition,
    Span,
    Subscript,
    Table,
    Other,
}

impl NodeKind {
    pub fn classify(element: &Element) -> Self {
        match element.tag.to_ascii_lowercase().as_str() {
            "a" => NodeKind::Anchor,
            "br" => NodeKind::LineBreak,
            "code" => NodeKind::Code,
            "em" => NodeKind::Emphasis,
            "strong" => NodeKind::Strong,
            "dt" => NodeKind::Term,
            "dd" => NodeKind::Description,
            "li" => NodeKind::ListItem,
            "ul" | "ol" | "dl" => NodeKind::List,
            "h2" => NodeKind::Heading,
            "h3" => NodeKind::Subheading,
            "span" => NodeKind::Span,
            "sub" => NodeKind::Subscript,
            "table" => NodeKind::Table,
            "div" => Self::classify_div(element),
            _ => NodeKind::Other,
        }
    }

    fn classify_div(element: &Element) -> Self {
        if element.has_class("admonitionblock") {
            NodeKind::Admonition
        } else if element.has_class("listingblock") {
            NodeKind::Listing
        } else if element.has_class("sidebarblock") {
            NodeKind::Sidebar
        } else if element.has_class("sectionbody") {
            NodeKind::SectionBody
        } else if element.has_class("paragraph") {
            NodeKind::Paragraph
        } else if element.has_class("title") {
            NodeKind::Heading
        } else {
            NodeKind::Other
        }
    }

    /// Looks up a kind by the name a caller asks for explicitly. Names are
    /// tag names (`h2`, `li`, ...) or block class names (`paragraph`,
    /// `listingblock`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "a" => NodeKind::Anchor,
            "br" => NodeKind::LineBreak,
            "code" => NodeKind::Code,
            "em" => NodeKind::Emphasis,
            "strong" => NodeKind::Strong,
            "dt" => NodeKind::Term,
            "dd" => NodeKind::Description,
            "li" => NodeKind::ListItem,
            "ul" | "ol" | "dl" => NodeKind::List,
            "h2" | "title" => NodeKind::Heading,
            "h3" => NodeKind::Subheading,
            "listingblock" => NodeKind::Listing,
            "paragraph" => NodeKind::Paragraph,
            "sectionbody" => NodeKind::SectionBody,
            "sidebarblock" => NodeKind::Sidebar,
            "admonitionblock" => NodeKind::Admonition,
            "span" => NodeKind::Span,
            "sub" => NodeKind::Subscript,
            "table" => NodeKind::Table,
            _ => return None,
        };
        Some(kind)
    }
}
