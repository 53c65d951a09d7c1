//! Plain-text table rendering

/// Shorten `value` to at most `width` characters, marking the cut with `...`.
pub fn truncate_value(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let mut truncated: String = value.chars().take(width).collect();
        truncated.push_str("...");
        truncated
    } else {
        value.to_string()
    }
}

/// A bordered table with one separator line under every row.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row; missing cells render blank, extra cells are dropped.
    pub fn add_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(self.headers[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width - cell.chars().count();
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect();
            format!(" | {} |", padded.join(" | "))
        };

        let inner: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
        let divider = format!(" {}", "-".repeat(inner + 4));

        let mut out = String::new();
        out.push_str(&divider);
        out.push('\n');
        out.push_str(&line(&self.headers));
        out.push('\n');
        out.push_str(&divider);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
            out.push_str(&divider);
            out.push('\n');
        }
        out
    }
}
