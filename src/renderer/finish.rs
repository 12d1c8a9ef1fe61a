//! Finishing pass over a fully rendered buffer.
//!
//! The passes run in a fixed order: math escapes, subscript inference,
//! structural clean-up, comment delimiter neutralization, and finally closing
//! the block. Delimiters are neutralized before the closing line is added so
//! the block's own terminator is left alone.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::renderer::style::{Lists, Preformatted, Style, Subtext};
use crate::{CHAR_FIX_MAP, FAKE_SLASH_CHAR};

static SUBTEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]_[a-zA-Z]+").unwrap());

/// Deepest list nesting considered when merging adjacent lists.
const MAX_LIST_DEPTH: usize = 8;

/// Upper bound on clean-up rounds; every round only ever shortens the text.
const MAX_COLLAPSE_ROUNDS: usize = 16;

pub fn finish(raw: &str, style: Style, indent: usize) -> String {
    let prefix = style.prefix(indent);

    let text = fix_chars(raw);
    let text = fix_subtext(&text, style);
    let text = collapse(&text, style, &prefix);
    let text = neutralize_delimiters(&text);
    let text = close(&text, style, indent);

    format!("{}\n{}", style.opening(indent), text)
}

pub fn fix_chars(text: &str) -> String {
    CHAR_FIX_MAP
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '.' | '=')
}

/// `x_word` between separators is subscript notation in the source pages.
/// Styles without subscripts spell it `Xword`.
pub fn fix_subtext(text: &str, style: Style) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in SUBTEXT.find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if !(before.is_some_and(is_boundary) && after.is_some_and(is_boundary)) {
            continue;
        }

        let letter = &text[m.start()..m.start() + 1];
        let word = &text[m.start() + 2..m.end()];

        out.push_str(&text[last..m.start()]);
        match style.capabilities().subtext {
            Subtext::Html => {
                out.push_str(letter);
                out.push_str(&style.make_sub(word));
            }
            Subtext::Uppercase => {
                out.push_str(&letter.to_ascii_uppercase());
                out.push_str(word);
            }
        }
        last = m.end();
    }

    out.push_str(&text[last..]);
    out
}

/// Removes the leftovers of structurally adjacent elements: filler-only
/// lines, repeated blank lines, back to back lists and breaks that would
/// double up with a following block. Runs to a fixed point, so applying it
/// again changes nothing.
pub fn collapse(text: &str, style: Style, prefix: &str) -> String {
    let passes = CollapsePasses::new(style, prefix);

    let mut current = text.to_string();
    for _ in 0..MAX_COLLAPSE_ROUNDS {
        let next = passes.apply(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

struct CollapsePasses {
    prefix: String,
    filler_line: Regex,
    blank_run: Regex,
    leading_blanks: Regex,
    merge_lists: bool,
    list_before_heading: Option<Regex>,
    break_before_code: Option<Regex>,
    break_after_code: Option<Regex>,
}

impl CollapsePasses {
    fn new(style: Style, prefix: &str) -> Self {
        let p = regex::escape(prefix);
        let caps = style.capabilities();
        let compile = |pattern: String| Regex::new(&pattern).unwrap();

        let html_lists = caps.lists == Lists::Html;
        let doxygen = caps.preformatted == Preformatted::Doxygen;

        Self {
            prefix: prefix.to_string(),
            filler_line: compile(format!("(?m)^{p}[ \u{2800}]+$")),
            blank_run: compile(format!("(?m)^{p}\n(?:{p}\n)+")),
            leading_blanks: compile(format!("^(?:{p}\n)+")),
            merge_lists: caps.merge_lists,
            list_before_heading: html_lists.then(|| {
                compile(format!(
                    "(?m)^({p}(?:    )*)</(?:ul|dl)>\n({p}\n{p}(?:<a [^\n]*</a>)?<b>[^\n]*</b><hr>)$"
                ))
            }),
            break_before_code: doxygen.then(|| compile(format!("(?:<br>)+(\n{p}\n{p}@code)"))),
            // Only ReSharper drops the break after a code block.
            break_after_code: (style == Style::ReSharper)
                .then(|| compile(format!("(?m)^({p}@endcode\n(?:{p}\n)*{p})<br>"))),
        }
    }

    fn apply(&self, text: &str) -> String {
        let blank = format!("{}\n", self.prefix);

        let mut text = self
            .filler_line
            .replace_all(text, NoExpand(&self.prefix))
            .into_owned();
        text = self.blank_run.replace_all(&text, NoExpand(&blank)).into_owned();
        text = self.leading_blanks.replace(&text, "").into_owned();

        if self.merge_lists {
            text = text.replace("<li> ", "<li>").replace("<dd> ", "<dd>");
            for depth in 0..MAX_LIST_DEPTH {
                let indent = format!("{}{}", self.prefix, "    ".repeat(depth));
                for tag in ["ul", "dl", "ol"] {
                    let seam = format!("{indent}</{tag}>\n{blank}{indent}<{tag}>\n");
                    text = text.replace(&seam, "");
                }
            }
        }

        if let Some(re) = &self.list_before_heading {
            text = re.replace_all(&text, "${1}<br>\n${2}").into_owned();
        }
        if let Some(re) = &self.break_before_code {
            text = re.replace_all(&text, "${1}").into_owned();
        }
        if let Some(re) = &self.break_after_code {
            text = re.replace_all(&text, "${1}").into_owned();
        }

        text
    }
}

/// Breaks up `*/` and `/*` coming from code samples or math so they cannot
/// end or nest the generated comment.
pub fn neutralize_delimiters(text: &str) -> String {
    text.replace("*/", &format!("*{}", FAKE_SLASH_CHAR))
        .replace("/*", &format!("{}*", FAKE_SLASH_CHAR))
}

/// Appends the closing delimiter. A trailing blank line becomes the
/// delimiter itself.
pub fn close(text: &str, style: Style, indent: usize) -> String {
    let blank = format!("{}\n", style.prefix(indent));
    let closing = format!("{}\n", style.closing(indent));

    if text.is_empty() || text == blank {
        return closing;
    }

    if let Some(body) = text.strip_suffix(&blank) {
        if body.ends_with('\n') {
            return format!("{}{}", body, closing);
        }
    }

    let mut out = text.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&closing);
    out
}
