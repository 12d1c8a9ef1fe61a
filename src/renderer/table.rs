use crate::parser::*;
use crate::renderer::components::TextNormalizer;
use crate::renderer::style::{Style, Tables};
use crate::{BLANK_CHAR, FAKE_PIPE_CHAR};

/// One table cell. `None` marks a column covered by the `colspan` of the
/// cell to its left; it is never rendered on its own.
pub type Cell = Option<String>;

/// Reads the cells of every `tr` in `table`. Short rows are padded with
/// empty cells so that every row has the same number of columns.
pub fn collect_rows(table: &Element) -> Vec<Vec<Cell>> {
    let mut rows: Vec<Vec<Cell>> = table
        .descendants()
        .into_iter()
        .filter(|e| e.is("tr"))
        .map(|tr| {
            let mut row = Vec::new();
            for cell in tr.descendants().into_iter().filter(|e| e.is("th") || e.is("td")) {
                let span = cell
                    .attr("colspan")
                    .and_then(|s| s.trim().parse::<usize>().ok())
                    .unwrap_or(1)
                    .max(1);
                row.push(Some(TextNormalizer::cell_text(cell)));
                row.extend(std::iter::repeat(None).take(span - 1));
            }
            row
        })
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(columns, Some(String::new()));
    }
    rows
}

/// Lays out rows as aligned text lines, each starting with `prefix`.
pub struct TableFormatter<'a> {
    style: Style,
    prefix: &'a str,
}

impl<'a> TableFormatter<'a> {
    pub fn new(style: Style, prefix: &'a str) -> Self {
        Self { style, prefix }
    }

    /// Returns no lines when there is nothing to show or the style has no
    /// tables.
    pub fn format(&self, rows: &[Vec<Cell>]) -> Vec<String> {
        if rows.is_empty() || rows[0].is_empty() {
            return Vec::new();
        }

        let rows: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_deref().map(|text| self.style.cell_text(text)))
                    .collect()
            })
            .collect();
        let widths = column_widths(&rows);

        match self.style.capabilities().table {
            Tables::Unsupported => Vec::new(),
            Tables::Boxed { preformatted } => self.boxed(&rows, &widths, preformatted),
            Tables::Markdown => self.markdown(&rows, &widths),
        }
    }

    fn boxed(&self, rows: &[Vec<Cell>], widths: &[usize], preformatted: bool) -> Vec<String> {
        let term = if preformatted { "<br>" } else { "" };
        let rule = format!(
            "{}{}{}",
            self.prefix,
            "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len() + 1),
            term
        );

        let mut table = Vec::new();
        if preformatted {
            table.push(format!("{}<pre>", self.prefix));
        }
        table.push(rule.clone());
        for row in rows {
            for line in self.row_lines(row) {
                table.push(self.boxed_line(&line, widths, term));
            }
            table.push(rule.clone());
        }
        if preformatted {
            table.push(format!("{}</pre><br>", self.prefix));
        }
        table
    }

    fn boxed_line(&self, line: &[(Option<&str>, bool)], widths: &[usize], term: &str) -> String {
        let mut out = String::from("|  ");
        for ((text, continues), width) in line.iter().zip(widths) {
            let sep = if *continues { '|' } else { ' ' };
            out.push_str(&pad(text.unwrap_or(""), width - 2));
            out.push_str("  ");
            out.push(sep);
            out.push_str("  ");
        }
        out.truncate(out.len() - 2);

        if self.style.capabilities().blank_glyph {
            out = out.replace(' ', &BLANK_CHAR.to_string());
        }
        format!("{}{}{}", self.prefix, out, term)
    }

    fn markdown(&self, rows: &[Vec<Cell>], widths: &[usize]) -> Vec<String> {
        let rule = format!("{}{}|", self.prefix, "| :-- ".repeat(widths.len() + 1));

        let mut table = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            for line in self.row_lines(row) {
                table.push(self.markdown_line(&line, widths));
            }
            if i == 0 {
                table.push(rule.clone());
            }
        }
        table
    }

    fn markdown_line(&self, line: &[(Option<&str>, bool)], widths: &[usize]) -> String {
        let mut out = format!("{}|{} ", self.prefix, FAKE_PIPE_CHAR);
        for ((text, continues), width) in line.iter().zip(widths) {
            out.push_str(&pad(text.unwrap_or(""), width - 2));
            out.push_str(" |");
            if *continues {
                out.push(FAKE_PIPE_CHAR);
            }
            out.push(' ');
        }
        out.push('|');
        out
    }

    /// Splits a row into physical lines. Each entry holds the cell's text on
    /// that line and whether the column separator after it is drawn, which
    /// is only the case when the next column also has content there.
    fn row_lines<'r>(&self, row: &'r [Cell]) -> Vec<Vec<(Option<&'r str>, bool)>> {
        let cells: Vec<Vec<Option<&str>>> = row
            .iter()
            .map(|cell| match cell {
                Some(text) => text.split('\n').map(Some).collect(),
                None => vec![None],
            })
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(0);

        (0..height)
            .map(|index| {
                (0..cells.len())
                    .map(|column| {
                        let text = cells[column].get(index).copied().flatten();
                        let continues = column + 1 == cells.len()
                            || matches!(cells[column + 1].get(index), Some(Some(_)));
                        (text, continues)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Longest line of any rendered cell per column, plus two columns of padding.
fn column_widths(rows: &[Vec<Cell>]) -> Vec<usize> {
    let columns = rows.first().map(Vec::len).unwrap_or(0);
    (0..columns)
        .map(|column| {
            rows.iter()
                .filter_map(|row| row.get(column).and_then(|cell| cell.as_deref()))
                .flat_map(|text| text.split('\n'))
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0)
                + 2
        })
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
