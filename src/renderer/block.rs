use anyhow::{anyhow, Result};
use tracing::trace;

use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::finish::finish;
use crate::renderer::style::*;
use crate::renderer::table::{collect_rows, TableFormatter};
use crate::renderer::traits::RenderContext;
use crate::BLANK_CHAR;

/// Append-only text buffer for one documentation comment, together with
/// everything needed to decorate it: the style, the page address used for
/// `#fragment` links and the indentation of the comment.
///
/// Every line written starts with the style's prefix at that indentation.
/// The buffer only grows while nodes are added; [`DocumentationBlock::finish`]
/// consumes the block and returns the closed comment.
#[derive(Debug, Clone)]
pub struct DocumentationBlock {
    value: String,
    style: Style,
    url: String,
    indentation_level: usize,
    prefix: String,
}

impl DocumentationBlock {
    pub fn new(style: Style, url: impl Into<String>, indentation_level: usize) -> Self {
        Self {
            value: String::new(),
            style,
            url: url.into(),
            indentation_level,
            prefix: style.prefix(indentation_level),
        }
    }

    pub fn for_record(name: &str, style: Style, indentation_level: usize) -> Self {
        Self::new(style, record_url(name), indentation_level)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Context for a top level call: depth zero, starting new lines.
    pub fn context(&self) -> RenderContext {
        RenderContext::new(self.prefix.clone())
    }

    /// Runs the finishing pass and returns the closed comment.
    pub fn finish(self) -> String {
        finish(&self.value, self.style, self.indentation_level)
    }

    pub fn add(&mut self, node: &Node, context: &RenderContext) {
        match node {
            Node::Text(text) => self.add_text(text, context),
            Node::Element(element) => self.add_element(element, context),
        }
    }

    pub fn add_element(&mut self, element: &Element, context: &RenderContext) {
        self.add_kind(element.kind(), element, context);
    }

    /// Renders `node` as the kind called `name`, whatever its tag says. A
    /// name the walker has no handler for is an error.
    pub fn add_as(&mut self, node: &Node, name: &str, context: &RenderContext) -> Result<()> {
        let kind = NodeKind::from_name(name)
            .ok_or_else(|| anyhow!("unsupported element kind '{}'", name))?;

        match node {
            Node::Text(text) => self.add_text(text, context),
            Node::Element(element) => self.add_kind(kind, element, context),
        }
        Ok(())
    }

    pub fn add_kind(&mut self, kind: NodeKind, e: &Element, context: &RenderContext) {
        match kind {
            NodeKind::Anchor => self.add_anchor(e, context),
            NodeKind::LineBreak => self.add_line_break(context),
            NodeKind::Code => {
                let text = e.text_content();
                self.add_formatted(&self.style.make_bold(&text), context);
            }
            NodeKind::Emphasis => {
                let text = e.text_content();
                self.add_formatted(&self.style.make_italic(&text), context);
            }
            NodeKind::Strong => self.add_strong(e, context),
            NodeKind::Term => self.add_term(e, context),
            NodeKind::Description => {
                if self.style.capabilities().description_as_item {
                    self.add_item(e, context);
                } else {
                    self.add_children(e, context);
                }
            }
            NodeKind::ListItem => self.add_item(e, context),
            NodeKind::List => self.add_list(e, context),
            NodeKind::Heading => self.add_heading(e, 2, context),
            NodeKind::Subheading => self.add_heading(e, 3, context),
            NodeKind::Listing => self.add_listing(e, context),
            NodeKind::Paragraph => self.add_paragraph(e, context),
            NodeKind::SectionBody => self.add_children(e, context),
            NodeKind::Sidebar => {
                let content = e.find(|c| c.is("div") && c.has_class("content"));
                self.add_children(content.unwrap_or(e), context);
            }
            NodeKind::Admonition => self.add_admonition(e, context),
            NodeKind::Span => self.add_span(e, context),
            NodeKind::Subscript => self.add_sub(e, context),
            NodeKind::Table => self.add_table(e, context),
            NodeKind::Other => {
                trace!(tag = %e.tag, "walking through unmodeled element");
                self.add_children(e, context);
            }
        }
    }

    fn add_children(&mut self, e: &Element, context: &RenderContext) {
        for child in &e.children {
            self.add(child, context);
        }
    }

    // Line bookkeeping

    fn base(&self, context: &RenderContext) -> String {
        format!("{}{}", context.prefix, self.style.indent_step().repeat(context.depth))
    }

    fn blank_line(&self) -> String {
        format!("{}\n", self.prefix)
    }

    fn ends_with_blank(&self) -> bool {
        let blank = self.blank_line();
        self.value == blank || self.value.ends_with(&format!("\n{}", blank))
    }

    fn ensure_line_break(&mut self) {
        if !self.value.is_empty() && !self.value.ends_with('\n') {
            self.value.push('\n');
        }
    }

    fn push_blank(&mut self) {
        self.ensure_line_break();
        if !self.ends_with_blank() {
            let blank = self.blank_line();
            self.value.push_str(&blank);
        }
    }

    /// Block calls start a fresh line; inline calls only need the prefix
    /// when the previous content ended a line.
    fn start(&mut self, context: &RenderContext) {
        if !context.inline {
            self.ensure_line_break();
            let base = self.base(context);
            self.value.push_str(&base);
        } else if self.value.ends_with('\n') {
            let base = self.base(context);
            self.value.push_str(&base);
        }
    }

    fn end(&mut self, context: &RenderContext) {
        if !context.inline {
            self.value.push('\n');
        }
    }

    fn ends_with_separator(&self) -> bool {
        self.value.is_empty() || self.value.ends_with([' ', '\n', BLANK_CHAR])
    }

    // Handlers

    fn add_text(&mut self, text: &str, context: &RenderContext) {
        if text.trim().is_empty() {
            return;
        }

        if self.value.ends_with('\n') {
            let base = self.base(context);
            self.value.push_str(&base);
        }

        let lead = if self.ends_with_separator() { "" } else { " " };
        let text = TextNormalizer::inline_text(text, lead);
        self.value.push_str(&text);
    }

    fn add_formatted(&mut self, text: &str, context: &RenderContext) {
        if text.is_empty() {
            return;
        }
        self.start(context);
        self.value.push_str(text);
        self.end(context);
    }

    fn add_strong(&mut self, e: &Element, context: &RenderContext) {
        // Pages often glue <strong> to the preceding word.
        if context.inline && !self.ends_with_separator() && !self.value.ends_with(['(', '[']) {
            self.value.push(' ');
        }
        let text = e.text_content();
        self.add_formatted(&self.style.make_bold_italic(&text), context);
    }

    fn add_anchor(&mut self, e: &Element, context: &RenderContext) {
        let text = e.text_content();
        let target = match e.href() {
            Some(href) => LinkResolver::new(&self.url).resolve(href),
            None => LinkTarget::TextOnly,
        };

        let rendered = match target.url() {
            Some(url) => self.style.make_ref(&text, url),
            None => text,
        };
        self.add_formatted(&rendered, context);
    }

    fn add_line_break(&mut self, context: &RenderContext) {
        self.value.push_str(self.style.line_break());
        self.value.push('\n');
        let base = self.base(context);
        self.value.push_str(&base);
    }

    fn add_term(&mut self, e: &Element, context: &RenderContext) {
        let text = e.text_content();
        if text.is_empty() {
            return;
        }

        self.ensure_line_break();
        if self.style.capabilities().term != Term::Html {
            self.push_blank();
        }

        let line = format!("{}{}\n", self.base(context), self.style.make_term(&text));
        self.value.push_str(&line);

        if self.style.capabilities().term == Term::Markdown {
            self.push_blank();
        }
    }

    fn add_item(&mut self, e: &Element, context: &RenderContext) {
        self.ensure_line_break();

        let marker = match self.style.capabilities().lists {
            Lists::Html => format!("{}<{}>", self.base(context), e.tag.to_ascii_lowercase()),
            Lists::Indented => format!("{}- ", self.base(context)),
            Lists::MarkerFirst => format!(
                "{}- {}",
                context.prefix,
                self.style.filler(4 * context.depth)
            ),
        };
        self.value.push_str(&marker);

        self.add_children(e, &context.nested().inline());
        self.ensure_line_break();
    }

    fn add_list(&mut self, e: &Element, context: &RenderContext) {
        let tag = e.tag.to_ascii_lowercase();
        self.ensure_line_break();

        match self.style.capabilities().lists {
            Lists::Html => {
                let open = format!("{}<{}>\n", self.base(context), tag);
                self.value.push_str(&open);

                self.add_children(e, &context.nested().block());

                self.ensure_line_break();
                let close = format!("{}</{}>\n", self.base(context), tag);
                self.value.push_str(&close);
            }
            Lists::Indented | Lists::MarkerFirst => {
                self.add_children(e, &context.block());
                self.ensure_line_break();
            }
        }

        if !context.inline {
            self.push_blank();
        }
    }

    fn add_heading(&mut self, e: &Element, level: usize, context: &RenderContext) {
        let text = heading_text(e);
        if text.is_empty() {
            return;
        }

        if !self.value.is_empty() {
            self.push_blank();
        }

        let header = match self.heading_reference(e) {
            Some(reference) => self.style.make_linked_header(&reference, &text, level),
            None => self.style.make_header(&text, level),
        };
        let line = format!("{}{}\n", context.prefix, header);
        self.value.push_str(&line);
        self.push_blank();
    }

    /// Self link of a section title, usually an empty `<a href="#_id">`.
    /// Only emitted by styles that can show references.
    fn heading_reference(&self, e: &Element) -> Option<String> {
        if self.style.capabilities().reference == Reference::Unsupported {
            return None;
        }

        let anchor = e.find_tag("a")?;
        let target = LinkResolver::new(&self.url).resolve(anchor.href()?);
        let url = target.url()?;
        Some(self.style.make_ref(&anchor.text_content(), url))
    }

    fn add_listing(&mut self, e: &Element, context: &RenderContext) {
        let text = match e.find_tag("pre") {
            Some(pre) => pre.raw_text(),
            None => e.raw_text(),
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let p = &context.prefix;
        let body: String = text
            .lines()
            .map(|line| format!("{}{}\n", p, line.trim_end()))
            .collect();

        self.ensure_line_break();
        match self.style.capabilities().preformatted {
            Preformatted::Doxygen => {
                self.value.push_str(&format!("{}@code\n{}{}@endcode\n", p, body, p));
            }
            Preformatted::Fenced => {
                self.value.push_str(&format!("{}```cpp\n{}{}```\n", p, body, p));
            }
            Preformatted::Raw => {
                self.push_blank();
                self.value.push_str(&body);
            }
        }
        self.push_blank();
    }

    fn add_paragraph(&mut self, e: &Element, context: &RenderContext) {
        if e.text_content().is_empty() {
            return;
        }

        self.start(context);
        self.add_children(e, &context.inline());

        // Nested paragraph blocks already closed the text.
        let paragraph_break = self.style.paragraph_break();
        if !self.value.ends_with(paragraph_break) {
            self.value.push_str(paragraph_break);
        }

        if !context.inline {
            self.push_blank();
        }
    }

    fn add_admonition(&mut self, e: &Element, context: &RenderContext) {
        let Some(content) = e.find(|c| c.has_class("content")) else {
            return;
        };
        if content.text_content().is_empty() {
            return;
        }

        self.ensure_line_break();
        let marker = format!("{}{}", self.base(context), self.style.note_marker());
        self.value.push_str(&marker);

        self.add_children(content, &context.inline());
        self.push_blank();
    }

    /// Isolated block with the same settings, for inline spans whose
    /// rendering must not touch the current line.
    fn scratch(&self) -> Self {
        Self::new(self.style, self.url.clone(), self.indentation_level)
    }

    /// Renders the children of `e` on one logical line. Breaks inside the
    /// span do not repeat the comment prefix.
    fn scratch_render(&self, e: &Element) -> String {
        let mut scratch = self.scratch();
        let context = RenderContext::new(String::new()).inline();
        scratch.add_children(e, &context);
        scratch.value
    }

    fn add_span(&mut self, e: &Element, context: &RenderContext) {
        // `eq` spans hold math with nested markup.
        let text = if e.has_class("eq") {
            self.scratch_render(e)
        } else {
            e.text_content()
        };

        let text = text.replace('\n', " ");
        if text.trim().is_empty() {
            return;
        }
        self.add_formatted(&text, context);
    }

    fn add_sub(&mut self, e: &Element, context: &RenderContext) {
        let text = self.scratch_render(e);
        if text.trim().is_empty() {
            return;
        }
        self.add_formatted(&self.style.make_sub(&text), context);
    }

    fn add_table(&mut self, e: &Element, context: &RenderContext) {
        let rows = collect_rows(e);
        let lines = TableFormatter::new(self.style, &context.prefix).format(&rows);
        if lines.is_empty() {
            trace!(style = %self.style, rows = rows.len(), "table not rendered");
            return;
        }

        self.ensure_line_break();
        for line in lines {
            self.value.push_str(&line);
            self.value.push('\n');
        }
        self.push_blank();
    }
}

/// Title text without the text of its anchors, which is rendered as the
/// reference.
fn heading_text(e: &Element) -> String {
    fn walk(element: &Element, out: &mut String) {
        for child in &element.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(child) if child.is("a") => {}
                Node::Element(child) => walk(child, out),
            }
        }
    }

    let mut raw = String::new();
    walk(e, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
