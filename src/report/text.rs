//! Plain-text leaderboard

use super::{ReportError, ReportRenderer, ReportTable};
use std::fs;
use std::path::Path;

/// Writes the table as fixed-width text with a rule under the header
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Format the table as a string (also used by `gmrz table`)
    pub fn format(table: &ReportTable) -> String {
        let widths = table.column_widths();
        let mut out = String::new();

        if !table.title.is_empty() {
            out.push_str(&table.title);
            out.push('\n');
        }
        out.push_str(&format_line(&table.header, &widths));
        out.push('\n');
        let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        out.push_str(&"-".repeat(total));
        out.push('\n');
        for row in &table.rows {
            out.push_str(&format_line(row, &widths));
            out.push('\n');
        }
        out
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, table: &ReportTable, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::format(table))?;
        Ok(())
    }
}

fn format_line(cells: &[String; 9], widths: &[usize; 9]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
