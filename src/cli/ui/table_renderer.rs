use crate::cli::output::current_preferences;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            max_width: None,
            alignment,
        }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Column-aligned text table with an optional footer row under a rule.
pub struct TextTable {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<Vec<String>>,
    pub padding: usize,
}

impl TextTable {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            footer: None,
            padding: 1,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn set_footer(&mut self, row: Vec<String>) {
        self.footer = Some(row);
    }

    /// Content width of each column, bounded by the column constraints.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in self.rows.iter().chain(self.footer.iter()) {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                if let Some(max_width) = column.max_width {
                    width = width.min(max_width);
                }
                width
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect();
        cells.join(" ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let rule = horizontal_rule(&widths, self.padding);
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();

        let mut lines = vec![self.render_row(&header, &widths), rule.clone()];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        if let Some(footer) = &self.footer {
            lines.push(rule);
            lines.push(self.render_row(footer, &widths));
        }
        lines.join("\n")
    }
}

/// Character count ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for code in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&code) {
                    break;
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut result: String = text.chars().take(width - 1).collect();
    result.push('…');
    result
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    let pad = " ".repeat(padding);
    match alignment {
        Alignment::Left => format!("{pad}{fitted}{}{pad}", " ".repeat(remaining)),
        Alignment::Right => format!("{pad}{}{fitted}{pad}", " ".repeat(remaining)),
    }
}

pub fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let total_width: usize =
        widths.iter().map(|w| w + (padding * 2)).sum::<usize>() + widths.len().saturating_sub(1);
    let ch = if current_preferences().plain_mode {
        '-'
    } else {
        '─'
    };
    ch.to_string().repeat(total_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TextTable {
        let mut table = TextTable::new(vec![
            TableColumn::new("#", Alignment::Right),
            TableColumn::new("Label", Alignment::Left),
            TableColumn::new("Amount", Alignment::Right),
        ]);
        table.push_row(vec!["1".into(), "Internet".into(), "30 €".into()]);
        table.push_row(vec!["2".into(), "Gym".into(), "1 200 €".into()]);
        table.set_footer(vec!["".into(), "Total".into(), "1 230 €".into()]);
        table
    }

    #[test]
    fn columns_fit_the_widest_cell() {
        assert_eq!(sample().compute_widths(), vec![1, 8, 7]);
    }

    #[test]
    fn amounts_are_right_aligned() {
        let rendered = sample().render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[2], " 1   Internet      30 €");
        assert!(lines[5].ends_with("1 230 €"));
    }

    #[test]
    fn long_labels_are_truncated() {
        let mut table = TextTable::new(vec![TableColumn::new("Label", Alignment::Left).max_width(5)]);
        table.push_row(vec!["Electricity".into()]);
        assert!(table.render().contains("Elec…"));
    }

    #[test]
    fn ansi_sequences_do_not_count_towards_width() {
        assert_eq!(visible_width("\u{1b}[1mBold\u{1b}[0m"), 4);
    }
}
