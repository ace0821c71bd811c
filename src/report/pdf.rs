//! PDF leaderboard via `printpdf`
//!
//! Layout: US-letter pages, title on the first page, a header row (black
//! fill, red bold text) repeated at the top of every page, beige body rows,
//! black cell borders, centered cell text.

use super::{ReportError, ReportRenderer, ReportTable};
use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};
use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;
use std::path::Path;

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 15.0;
const TITLE_HEIGHT: f32 = 14.0;

/// Millimetres per typographic point
const MM_PER_PT: f32 = 0.3528;
/// Rough Helvetica advance width, as a fraction of the font size
const AVG_CHAR_WIDTH: f32 = 0.55;

type Rgb3 = (f32, f32, f32);

const BLACK: Rgb3 = (0.0, 0.0, 0.0);
const RED: Rgb3 = (1.0, 0.0, 0.0);
const BEIGE: Rgb3 = (0.96, 0.96, 0.86);

/// Print-styled leaderboard table
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    pub header_font_size: f32,
    pub body_font_size: f32,
    pub header_row_height: f32,
    pub body_row_height: f32,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        PdfRenderer {
            header_font_size: 12.0,
            body_font_size: 10.0,
            header_row_height: 10.0,
            body_row_height: 8.0,
        }
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfRenderer {
    /// Body rows that fit on a page.
    ///
    /// The first page also carries the title, so it holds fewer rows.
    fn rows_per_page(&self, first_page: bool) -> usize {
        let mut available = PAGE_HEIGHT - 2.0 * MARGIN - self.header_row_height;
        if first_page {
            available -= TITLE_HEIGHT;
        }
        ((available / self.body_row_height).floor() as usize).max(1)
    }

    /// Split `row_count` body rows into per-page ranges. Always at least one page.
    fn paginate(&self, row_count: usize) -> Vec<Range<usize>> {
        let mut pages = Vec::new();
        let mut start = 0;
        let mut first = true;
        loop {
            let end = (start + self.rows_per_page(first)).min(row_count);
            pages.push(start..end);
            if end >= row_count {
                break;
            }
            start = end;
            first = false;
        }
        pages
    }

    /// Column widths in mm, proportional to content and filling the usable width
    fn column_widths(table: &ReportTable) -> [f32; 9] {
        let chars = table.column_widths();
        // Pad every column by two characters so short columns stay readable
        let weights = chars.map(|c| c as f32 + 2.0);
        let total: f32 = weights.iter().sum();
        let usable = PAGE_WIDTH - 2.0 * MARGIN;
        weights.map(|w| usable * w / total)
    }

    fn draw_row(
        &self,
        layer: &PdfLayerReference,
        cells: &[String; 9],
        widths: &[f32; 9],
        top: f32,
        header: bool,
        fonts: &Fonts,
    ) {
        let (height, size, font, fill, text) = if header {
            (self.header_row_height, self.header_font_size, &fonts.bold, BLACK, RED)
        } else {
            (self.body_row_height, self.body_font_size, &fonts.regular, BEIGE, BLACK)
        };

        let mut x = MARGIN;
        for (cell, width) in cells.iter().zip(widths) {
            set_fill(layer, fill);
            layer.add_rect(
                Rect::new(Mm(x), Mm(top - height), Mm(x + width), Mm(top))
                    .with_mode(PaintMode::FillStroke),
            );

            set_fill(layer, text);
            let text_width = cell.chars().count() as f32 * size * AVG_CHAR_WIDTH * MM_PER_PT;
            let text_x = x + ((width - text_width) / 2.0).max(0.5);
            // Baseline roughly centers cap height in the row
            let text_y = top - height / 2.0 - size * MM_PER_PT * 0.35;
            layer.use_text(cell.clone(), size, Mm(text_x), Mm(text_y), font);

            x += width;
        }
    }
}

impl ReportRenderer for PdfRenderer {
    fn render(&self, table: &ReportTable, path: &Path) -> Result<(), ReportError> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(table.title.clone(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Leaderboard");
        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(render_error)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(render_error)?,
        };
        let widths = Self::column_widths(table);

        for (page_no, range) in self.paginate(table.rows.len()).into_iter().enumerate() {
            let layer = if page_no == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Leaderboard");
                doc.get_page(page).get_layer(layer)
            };

            set_outline(&layer, BLACK);
            layer.set_outline_thickness(1.0);

            let mut top = PAGE_HEIGHT - MARGIN;
            if page_no == 0 && !table.title.is_empty() {
                set_fill(&layer, BLACK);
                layer.use_text(table.title.clone(), 16.0, Mm(MARGIN), Mm(top - 8.0), &fonts.bold);
                top -= TITLE_HEIGHT;
            }

            self.draw_row(&layer, &table.header, &widths, top, true, &fonts);
            top -= self.header_row_height;

            for row in &table.rows[range] {
                self.draw_row(&layer, row, &widths, top, false, &fonts);
                top -= self.body_row_height;
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        doc.save(&mut writer).map_err(render_error)?;
        Ok(())
    }
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): Rgb3) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn set_outline(layer: &PdfLayerReference, (r, g, b): Rgb3) {
    layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn render_error<E: std::fmt::Debug>(e: E) -> ReportError {
    ReportError::Render(format!("{:?}", e))
}
