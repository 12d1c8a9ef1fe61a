use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{BLANK_CHAR, FAKE_PIPE_CHAR, LINK_PLACEHOLDER};

/// Output dialect of a documentation block. Each variant is named after the
/// tool whose hover popup it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    /// Plain text.
    #[default]
    Txt,
    /// CLion, HTML-like markup with native lists.
    CLion,
    /// ReSharper, a smaller HTML subset.
    ReSharper,
    /// Visual Studio Code, Markdown.
    VsCode,
}

// One enum per capability. A dialect can only pick a variant that exists, so
// a lookup never lands on an undeclared combination.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    Html,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoldItalic {
    Plain,
    Html,
    /// Only `<b>` is understood.
    HtmlBold,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtext {
    Html,
    /// No subscript markup; `a_b` is spelled `Ab` instead.
    Uppercase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Unsupported,
    Html,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    Plain,
    Html,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lists {
    /// `<ul>`, `<dl>`, `<li>` ... with open and close markers.
    Html,
    /// Indentation then `- `.
    Indented,
    /// `- ` then indentation.
    MarkerFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tables {
    Unsupported,
    /// Dashed rules and `|` columns; `preformatted` wraps the table in
    /// `<pre>` and ends each row with `<br>`.
    Boxed { preformatted: bool },
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preformatted {
    Raw,
    Doxygen,
    Fenced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    Html,
    Newline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Plain,
    Html,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    Verbatim,
    Doxygen,
    Markdown,
}

/// Everything a dialect declares, one field per feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub bold: Emphasis,
    pub italic: Emphasis,
    pub bold_italic: BoldItalic,
    pub subtext: Subtext,
    pub reference: Reference,
    pub header: Header,
    pub lists: Lists,
    pub table: Tables,
    pub preformatted: Preformatted,
    pub line_break: LineBreak,
    pub term: Term,
    pub note: Note,
    /// Appended after a paragraph's text.
    pub paragraph_break: &'static str,
    /// Definition descriptions become list entries.
    pub description_as_item: bool,
    /// Adjacent same-level lists are joined after rendering.
    pub merge_lists: bool,
    /// Alignment filler is [`BLANK_CHAR`] instead of spaces.
    pub blank_glyph: bool,
    /// `|` inside table cells is written as [`FAKE_PIPE_CHAR`].
    pub pipe_glyph: bool,
    /// Every line starts with ` * ` after the indentation.
    pub starred: bool,
}

const TXT: Capabilities = Capabilities {
    bold: Emphasis::Plain,
    italic: Emphasis::Plain,
    bold_italic: BoldItalic::Plain,
    subtext: Subtext::Uppercase,
    reference: Reference::Unsupported,
    header: Header::Plain,
    lists: Lists::MarkerFirst,
    table: Tables::Boxed { preformatted: false },
    preformatted: Preformatted::Raw,
    line_break: LineBreak::Newline,
    term: Term::Plain,
    note: Note::Verbatim,
    paragraph_break: "",
    description_as_item: false,
    merge_lists: false,
    blank_glyph: true,
    pipe_glyph: false,
    starred: false,
};

const CLION: Capabilities = Capabilities {
    bold: Emphasis::Html,
    italic: Emphasis::Html,
    bold_italic: BoldItalic::Html,
    subtext: Subtext::Html,
    reference: Reference::Html,
    header: Header::Html,
    lists: Lists::Html,
    table: Tables::Boxed { preformatted: true },
    preformatted: Preformatted::Doxygen,
    line_break: LineBreak::Html,
    term: Term::Html,
    note: Note::Doxygen,
    paragraph_break: "<br><br>",
    description_as_item: true,
    merge_lists: true,
    blank_glyph: false,
    pipe_glyph: false,
    starred: true,
};

const RESHARPER: Capabilities = Capabilities {
    bold: Emphasis::Html,
    italic: Emphasis::Html,
    bold_italic: BoldItalic::HtmlBold,
    subtext: Subtext::Html,
    reference: Reference::Unsupported,
    header: Header::Html,
    lists: Lists::Indented,
    table: Tables::Unsupported,
    preformatted: Preformatted::Doxygen,
    line_break: LineBreak::Newline,
    term: Term::Plain,
    note: Note::Doxygen,
    paragraph_break: "<br>",
    description_as_item: false,
    merge_lists: false,
    blank_glyph: false,
    pipe_glyph: false,
    starred: true,
};

const VSCODE: Capabilities = Capabilities {
    bold: Emphasis::Markdown,
    italic: Emphasis::Markdown,
    bold_italic: BoldItalic::Markdown,
    subtext: Subtext::Uppercase,
    reference: Reference::Markdown,
    header: Header::Markdown,
    lists: Lists::MarkerFirst,
    table: Tables::Markdown,
    preformatted: Preformatted::Fenced,
    line_break: LineBreak::Newline,
    term: Term::Markdown,
    note: Note::Markdown,
    paragraph_break: "",
    description_as_item: false,
    merge_lists: false,
    blank_glyph: true,
    pipe_glyph: true,
    starred: true,
};

impl Style {
    pub const ALL: [Style; 4] = [Style::Txt, Style::CLion, Style::ReSharper, Style::VsCode];

    pub fn capabilities(self) -> &'static Capabilities {
        match self {
            Style::Txt => &TXT,
            Style::CLion => &CLION,
            Style::ReSharper => &RESHARPER,
            Style::VsCode => &VSCODE,
        }
    }

    pub fn make_bold(self, text: &str) -> String {
        emphasize(self.capabilities().bold, text, "b", "**")
    }

    pub fn make_italic(self, text: &str) -> String {
        emphasize(self.capabilities().italic, text, "i", "*")
    }

    pub fn make_bold_italic(self, text: &str) -> String {
        match self.capabilities().bold_italic {
            BoldItalic::Plain => text.to_string(),
            BoldItalic::Html => format!("<b><i>{}</i></b>", text),
            BoldItalic::HtmlBold => format!("<b>{}</b>", text),
            BoldItalic::Markdown => format!("***{}***", text),
        }
    }

    /// Wraps in subscript markup when there is any; otherwise the text is
    /// returned as is.
    pub fn make_sub(self, text: &str) -> String {
        match self.capabilities().subtext {
            Subtext::Html => format!("<sub>{}</sub>", text),
            Subtext::Uppercase => text.to_string(),
        }
    }

    pub fn make_ref(self, text: &str, url: &str) -> String {
        match self.capabilities().reference {
            Reference::Html => format!("<a href=\"{}\">{}</a>", url, text),
            Reference::Markdown => format!("[{}]({})", placeholder_if_empty(text), url),
            Reference::Unsupported => placeholder_if_empty(text).to_string(),
        }
    }

    /// `level` is 2 for section titles, 3 for subsections.
    pub fn make_header(self, text: &str, level: usize) -> String {
        match self.capabilities().header {
            Header::Plain => text.to_string(),
            Header::Html => format!("<b>{}</b><hr>", text),
            Header::Markdown => format!("{} {}", "#".repeat(level), text),
        }
    }

    /// Header preceded by a reference, e.g. a section's self link. Markdown
    /// keeps the reference after the `#` marks so the line stays a header.
    pub fn make_linked_header(self, reference: &str, text: &str, level: usize) -> String {
        match self.capabilities().header {
            Header::Markdown => format!("{} {}{}", "#".repeat(level), reference, text),
            Header::Plain | Header::Html => {
                format!("{}{}", reference, self.make_header(text, level))
            }
        }
    }

    pub fn make_term(self, text: &str) -> String {
        match self.capabilities().term {
            Term::Plain => text.to_string(),
            Term::Html => format!("<dt><b>{}</b>", text),
            Term::Markdown => format!("#### {}{}", BLANK_CHAR, text),
        }
    }

    pub fn note_marker(self) -> &'static str {
        match self.capabilities().note {
            Note::Verbatim => "",
            Note::Doxygen => "@note ",
            Note::Markdown => "**Note:** ",
        }
    }

    /// Marker appended to a line before breaking it.
    pub fn line_break(self) -> &'static str {
        match self.capabilities().line_break {
            LineBreak::Html => "<br>",
            LineBreak::Newline => "",
        }
    }

    /// Appended after a paragraph's text.
    pub fn paragraph_break(self) -> &'static str {
        self.capabilities().paragraph_break
    }

    /// One nesting step of list indentation.
    pub fn indent_step(self) -> String {
        match self.capabilities().lists {
            Lists::Html => "    ".to_string(),
            Lists::Indented => "  ".to_string(),
            Lists::MarkerFirst => self.filler(2),
        }
    }

    /// `width` columns of alignment filler.
    pub fn filler(self, width: usize) -> String {
        let glyph = if self.capabilities().blank_glyph { BLANK_CHAR } else { ' ' };
        std::iter::repeat(glyph).take(width).collect()
    }

    pub fn cell_text(self, text: &str) -> String {
        if self.capabilities().pipe_glyph {
            text.replace('|', &FAKE_PIPE_CHAR.to_string())
        } else {
            text.to_string()
        }
    }

    /// Literal start of every line of a block at `indent`.
    pub fn prefix(self, indent: usize) -> String {
        let spaces = "    ".repeat(indent);
        if self.capabilities().starred {
            format!("{} * ", spaces)
        } else {
            spaces
        }
    }

    pub fn opening(self, indent: usize) -> String {
        format!("{}/**", "    ".repeat(indent))
    }

    pub fn closing(self, indent: usize) -> String {
        if self.capabilities().starred {
            format!("{} */", "    ".repeat(indent))
        } else {
            format!("{}*/", "    ".repeat(indent))
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Style::Txt => "TXT",
            Style::CLion => "CL",
            Style::ReSharper => "RS",
            Style::VsCode => "VSC",
        }
    }
}

fn emphasize(kind: Emphasis, text: &str, tag: &str, marker: &str) -> String {
    match kind {
        Emphasis::Plain => text.to_string(),
        Emphasis::Html => format!("<{tag}>{text}</{tag}>"),
        Emphasis::Markdown => format!("{marker}{text}{marker}"),
    }
}

fn placeholder_if_empty(text: &str) -> &str {
    if text.is_empty() {
        LINK_PLACEHOLDER
    } else {
        text
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for Style {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" | "plain" => Ok(Style::Txt),
            "cl" | "clion" => Ok(Style::CLion),
            "rs" | "resharper" => Ok(Style::ReSharper),
            "vsc" | "vscode" => Ok(Style::VsCode),
            _ => bail!("unknown documentation style '{}', expected TXT, CL, RS or VSC", s),
        }
    }
}
