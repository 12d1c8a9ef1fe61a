use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::*;
use crate::VULKAN_REGISTRY;

static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap());
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"  +").unwrap());
static LINE_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\n[ \t\n]*").unwrap());

/// What an anchor's `href` points at once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Absolute address, kept verbatim.
    Direct(String),
    /// `#fragment` on the record's own page.
    SamePage(String),
    /// Another man page of the registry.
    Registry(String),
    /// Nothing usable; only the anchor text is shown.
    TextOnly,
}

impl LinkTarget {
    pub fn url(&self) -> Option<&str> {
        match self {
            LinkTarget::Direct(url) | LinkTarget::SamePage(url) | LinkTarget::Registry(url) => {
                Some(url)
            }
            LinkTarget::TextOnly => None,
        }
    }
}

/// Helper for resolving anchors against the record page and the registry
pub struct LinkResolver<'a> {
    pub base_url: &'a str,
}

impl<'a> LinkResolver<'a> {
    pub fn new(base_url: &'a str) -> Self {
        Self { base_url }
    }

    pub fn resolve(&self, href: &str) -> LinkTarget {
        let href = href.trim();
        if SCHEME.is_match(href) {
            LinkTarget::Direct(href.to_string())
        } else if href.starts_with('#') {
            LinkTarget::SamePage(format!("{}{}", self.base_url, href))
        } else if href.ends_with(".html") {
            LinkTarget::Registry(format!("{}{}", VULKAN_REGISTRY, href))
        } else {
            LinkTarget::TextOnly
        }
    }
}

/// Helper for normalizing character data before it reaches the buffer
pub struct TextNormalizer;

impl TextNormalizer {
    /// Folds newlines into spaces and space runs into one space. Leading
    /// whitespace becomes `lead`.
    pub fn inline_text(text: &str, lead: &str) -> String {
        let trimmed = text.trim_start_matches([' ', '\n', '\t', '\r']);
        let body = if trimmed.len() < text.len() {
            format!("{}{}", lead, trimmed)
        } else {
            trimmed.to_string()
        };
        let body = body.replace(['\n', '\t', '\r'], " ");
        SPACES.replace_all(&body, " ").into_owned()
    }

    /// Text of a table cell. `<br>` becomes a line break, everything else
    /// flows as inline text.
    pub fn cell_text(cell: &Element) -> String {
        fn walk(element: &Element, out: &mut String) {
            for child in &element.children {
                match child {
                    Node::Text(text) => out.push_str(&text.replace(['\n', '\t', '\r'], " ")),
                    Node::Element(e) if e.is("br") => out.push('\n'),
                    Node::Element(e) => walk(e, out),
                }
            }
        }

        let mut raw = String::new();
        walk(cell, &mut raw);
        let joined = LINE_GAP.replace_all(raw.trim(), "\n");
        SPACES.replace_all(&joined, " ").into_owned()
    }
}
