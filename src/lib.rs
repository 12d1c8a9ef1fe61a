//! # vkdoc
//!
//! Turns one man-page record of the Vulkan registry (already parsed into an
//! element tree) into a documentation comment block that can be placed above
//! the matching declaration in a generated header.
//!
//! The pipeline is: [`Record`] extraction, a depth-first walk of the record
//! into a [`DocumentationBlock`] under a [`Style`], and a single finishing
//! pass that normalizes the buffer into a closed `/** ... */` block.

pub mod parser;
pub mod renderer;

#[cfg(test)]
mod tests;

pub use parser::*;
pub use renderer::*;

/// Root used to resolve relative `*.html` links between man pages.
pub const VULKAN_REGISTRY: &str =
    "https://registry.khronos.org/vulkan/specs/1.3-extensions/man/html/";

/// Section titles that are never rendered.
pub const NOT_PRINTED_SECTIONS: [&str; 3] = ["Document Notes", "See Also", "Copyright"];

/// Braille blank, survives whitespace collapsing in IDE hover popups.
pub const BLANK_CHAR: char = '\u{2800}';

/// Fullwidth vertical line, stands in for `|` inside Markdown table cells.
pub const FAKE_PIPE_CHAR: char = '\u{FF5C}';

/// Big solidus, used to break up comment delimiters found in rendered text.
pub const FAKE_SLASH_CHAR: char = '\u{29F8}';

/// Shown in place of an empty link text.
pub const LINK_PLACEHOLDER: &str = "↖";

/// Literal math escapes and their display glyphs.
pub const CHAR_FIX_MAP: [(&str, &str); 7] = [
    ("\\rfloor", "⌋"),
    ("\\lfloor", "⌊"),
    ("\\rceil", "⌉"),
    ("\\lceil", "⌈"),
    ("\\times", "\u{00D7}"),
    ("\\(", ""),
    ("\\)", ""),
];
