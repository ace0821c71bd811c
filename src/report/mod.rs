//! Leaderboard export
//!
//! Renderers turn a [`ReportTable`] into a file. The PDF renderer delegates
//! page layout to `printpdf`; the text renderer writes a fixed-width table.
//! [`ReportJob`] runs a render on a background thread.

mod pdf;
mod text;
mod worker;

pub use pdf::PdfRenderer;
pub use text::TextRenderer;
pub use worker::{JobStatus, ReportJob};

use crate::config::ReportFormat;
use crate::stats::{LeaderboardRow, COLUMNS};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while producing a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render report: {0}")]
    Render(String),
    #[error("report worker stopped before finishing")]
    WorkerGone,
}

/// Header plus formatted body rows, owned so it can move to a worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub title: String,
    pub header: [String; 9],
    pub rows: Vec<[String; 9]>,
}

impl ReportTable {
    /// Build the table from ranked leaderboard rows
    pub fn from_rows(title: impl Into<String>, rows: &[LeaderboardRow]) -> Self {
        ReportTable {
            title: title.into(),
            header: COLUMNS.map(str::to_string),
            rows: rows.iter().map(LeaderboardRow::cells).collect(),
        }
    }

    /// Widest cell per column, header included, in characters
    pub fn column_widths(&self) -> [usize; 9] {
        let mut widths = self.header.clone().map(|h| h.chars().count());
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }
        widths
    }
}

/// Writes a report table to a file
pub trait ReportRenderer: Send {
    fn render(&self, table: &ReportTable, path: &Path) -> Result<(), ReportError>;
}

/// Renderer for the configured format
pub fn renderer_for(format: ReportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Pdf => Box::new(PdfRenderer::default()),
        ReportFormat::Text => Box::new(TextRenderer),
    }
}
