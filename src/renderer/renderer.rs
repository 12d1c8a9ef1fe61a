use serde::Deserialize;
use tracing::{debug, warn};

use crate::parser::*;
use crate::renderer::block::DocumentationBlock;
use crate::renderer::style::Style;
use crate::renderer::traits::*;

/// How records are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub style: Style,
    /// Declarations are wrapped in a namespace, so comments are indented
    /// one level.
    pub namespace: bool,
}

impl RenderOptions {
    pub fn new(style: Style, namespace: bool) -> Self {
        Self { style, namespace }
    }

    pub fn indentation_level(&self) -> usize {
        usize::from(self.namespace)
    }
}

impl Render for Node {
    fn render(&self, block: &mut DocumentationBlock, context: &RenderContext) {
        block.add(self, context);
    }
}

impl Render for Element {
    fn render(&self, block: &mut DocumentationBlock, context: &RenderContext) {
        block.add_element(self, context);
    }
}

impl Render for Record {
    fn render(&self, block: &mut DocumentationBlock, context: &RenderContext) {
        block.add_kind(NodeKind::Heading, &self.heading, context);
        block.add_kind(NodeKind::Paragraph, &self.overview, context);

        for section in self.sections.iter().filter(|s| is_printed(s)) {
            section.render(block, context);
        }
    }
}

pub struct RecordRenderer {
    options: RenderOptions,
}

impl RecordRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, record: &Record) -> String {
        let mut block = DocumentationBlock::for_record(
            &record.name,
            self.options.style,
            self.options.indentation_level(),
        );
        let context = block.context();
        record.render(&mut block, &context);

        debug!(
            name = %record.name,
            style = %self.options.style,
            sections = record.sections.len(),
            "rendered record"
        );
        block.finish()
    }

    /// Extracts the record from a full page and renders it. Pages without a
    /// name heading or overview are not documented.
    pub fn render_page(&self, name: &str, page: &Node) -> Option<String> {
        match Record::from_page(name, page) {
            Some(record) => Some(self.render(&record)),
            None => {
                warn!(name, "page has no documentable record, skipping");
                None
            }
        }
    }
}

impl Default for RecordRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
