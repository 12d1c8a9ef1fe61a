use crate::parser::types::*;
use crate::{NOT_PRINTED_SECTIONS, VULKAN_REGISTRY};

/// The documented parts of one man page: the `Name` heading, the overview
/// paragraph that follows it, and the labeled sections worth printing.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub heading: Element,
    pub overview: Element,
    pub sections: Vec<Element>,
}

impl Record {
    pub fn new(name: impl Into<String>, heading: Element, overview: Element) -> Self {
        Self {
            name: name.into(),
            heading,
            overview,
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: Element) -> Self {
        self.sections.push(section);
        self
    }

    /// Pulls a record out of a full page. Returns `None` when the page lacks
    /// the title, the name heading, the overview or the content container;
    /// such pages are simply not documented.
    pub fn from_page(name: &str, page: &Node) -> Option<Self> {
        let root = page.as_element()?;
        let all = root.descendants();

        let start = all.iter().position(|e| e.is("h1"))?;
        let after = &all[start + 1..];

        let heading = after.iter().find(|e| e.is("h2"))?;
        let overview = after
            .iter()
            .find(|e| e.is("div") && e.has_class("sectionbody"))?;
        let content = all
            .iter()
            .find(|e| e.is("div") && e.id() == Some("content"))?;

        let sections = content
            .descendants()
            .into_iter()
            .filter(|e| e.is("div") && e.has_class("sect1"))
            .filter(|e| is_printed(e))
            .cloned()
            .collect();

        Some(Self {
            name: name.to_string(),
            heading: (*heading).clone(),
            overview: (*overview).clone(),
            sections,
        })
    }

    /// Page address used to resolve `#fragment` links.
    pub fn url(&self) -> String {
        record_url(&self.name)
    }
}

pub fn record_url(name: &str) -> String {
    format!("{}{}.html", VULKAN_REGISTRY, name)
}

/// Sections titled with one of [`NOT_PRINTED_SECTIONS`] are left out.
pub fn is_printed(section: &Element) -> bool {
    match section.find_tag("h2") {
        Some(title) => !NOT_PRINTED_SECTIONS.contains(&title.text_content().as_str()),
        None => true,
    }
}
