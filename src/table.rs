use crate::document::{Color, Document, FONT_BODY, FONT_HEADER};
use crate::layout::LayoutCursor;

/// Height shared by header and body bands.
pub const ROW_HEIGHT: f32 = 20.0;
const CELL_PADDING: f32 = 5.0;
const TEXT_BASELINE: f32 = 15.0;
const SEPARATOR_THICKNESS: f32 = 0.5;

pub struct Col {
    pub label: &'static str,
    pub width: f32,
}

/// One body row. `emphasis` paints the last cell, e.g. a status value.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<String>,
    pub emphasis: Option<Color>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            emphasis: None,
        }
    }

    pub fn emphasized(cells: Vec<String>, color: Color) -> Self {
        Self {
            cells,
            emphasis: Some(color),
        }
    }
}

/// A fixed-column table anchored at `x`.
///
/// Drawing never checks for page overflow: callers decide where pages break
/// before asking for a band.
pub struct Table<'a> {
    pub x: f32,
    pub cols: &'a [Col],
}

impl<'a> Table<'a> {
    pub fn new(x: f32, cols: &'a [Col]) -> Self {
        Self { x, cols }
    }

    pub fn width(&self) -> f32 {
        self.cols.iter().map(|c| c.width).sum()
    }

    pub fn header(&self, doc: &mut Document, cursor: &mut LayoutCursor) {
        let y = cursor.y();
        doc.rect(self.x, y, self.width(), ROW_HEIGHT, Color::LIGHT_GRAY);
        let mut x = self.x;
        for col in self.cols {
            doc.text(col.label, x + CELL_PADDING, y + TEXT_BASELINE, FONT_HEADER, true, Color::BLACK);
            x += col.width;
        }
        cursor.advance(ROW_HEIGHT);
    }

    pub fn row(&self, doc: &mut Document, cursor: &mut LayoutCursor, row: &Row) {
        let y = cursor.y();
        doc.line(
            self.x,
            y,
            self.x + self.width(),
            y,
            SEPARATOR_THICKNESS,
            Color::LIGHT_GRAY,
        );
        let last = row.cells.len().saturating_sub(1);
        let mut x = self.x;
        for (i, (col, cell)) in self.cols.iter().zip(&row.cells).enumerate() {
            let color = match row.emphasis {
                Some(c) if i == last => c,
                _ => Color::BLACK,
            };
            doc.text(cell, x + CELL_PADDING, y + TEXT_BASELINE, FONT_BODY, false, color);
            x += col.width;
        }
        cursor.advance(ROW_HEIGHT);
    }
}
