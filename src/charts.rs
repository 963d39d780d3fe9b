//! Pie and horizontal bar charts.
//!
//! Each chart is drawn as one unit starting at the cursor; charts never break
//! the page themselves.

use tracing::debug;

use crate::aggregate::{total, AggregatedGroup};
use crate::document::{color_for_index, Color, Document, FONT_HEADER, FONT_SMALL};
use crate::fmt::{number, percent};
use crate::layout::LayoutCursor;

/// At most this many legend lines or bars are drawn per chart.
pub const MAX_ENTRIES: usize = 6;

const PIE_TITLE_ADVANCE: f32 = 25.0;
const PIE_SIZE: f32 = 120.0;
const PIE_OFFSET_X: f32 = 310.0;
const PIE_PADDING: f32 = 20.0;
const LEGEND_TOP: f32 = 10.0;
const LEGEND_STEP: f32 = 18.0;
const LEGEND_TEXT_X: f32 = 20.0;
const SWATCH: f32 = 10.0;

const BAR_TITLE_ADVANCE: f32 = 25.0;
pub const BAR_MAX_WIDTH: f32 = 350.0;
const BAR_OFFSET_X: f32 = 110.0;
const BAR_HEIGHT: f32 = 15.0;
const BAR_ROW: f32 = 20.0;
const BAR_TEXT_BASELINE: f32 = 11.0;
const BAR_VALUE_GAP: f32 = 5.0;

fn title(doc: &mut Document, cursor: &mut LayoutCursor, text: &str, advance: f32) {
    doc.text(text, cursor.left_margin(), cursor.y(), FONT_HEADER, true, Color::BLACK);
    cursor.advance(advance);
}

/// Draw a pie of `groups` with a legend to its left.
///
/// Slices follow group order starting at 0° and use the palette by position.
/// The legend lists only the first [`MAX_ENTRIES`] groups. With no counts at
/// all only the title is drawn.
pub fn pie_chart(
    doc: &mut Document,
    cursor: &mut LayoutCursor,
    heading: &str,
    groups: &[AggregatedGroup],
) {
    title(doc, cursor, heading, PIE_TITLE_ADVANCE);

    let sum = total(groups);
    if sum == 0 {
        debug!(heading, "pie chart has no data, drawing title only");
        return;
    }
    let sum_f = sum as f32;

    let x0 = cursor.left_margin();
    let top = cursor.y();
    let radius = PIE_SIZE / 2.0;
    let (cx, cy) = (x0 + PIE_OFFSET_X + radius, top + radius);

    let mut start = 0.0_f32;
    let mut legend_y = top + LEGEND_TOP;
    for (i, group) in groups.iter().enumerate() {
        let sweep = group.count as f32 / sum_f * 360.0;
        let color = color_for_index(i);
        doc.sector(cx, cy, radius, start, sweep, color);

        if i < MAX_ENTRIES {
            doc.rect(x0, legend_y, SWATCH, SWATCH, color);
            let line = format!(
                "{}: {} ({})",
                group.label,
                group.count,
                percent(group.count as f64, sum as f64, 1)
            );
            doc.text(&line, x0 + LEGEND_TEXT_X, legend_y + 9.0, FONT_SMALL, false, Color::BLACK);
            legend_y += LEGEND_STEP;
        }

        start += sweep;
    }

    cursor.advance(PIE_SIZE + PIE_PADDING);
}

/// Draw up to [`MAX_ENTRIES`] horizontal bars scaled so the largest value
/// spans [`BAR_MAX_WIDTH`]. Extra entries are dropped.
///
/// When there is nothing positive to scale against (no values, or all zero)
/// only the title is drawn.
pub fn bar_chart(
    doc: &mut Document,
    cursor: &mut LayoutCursor,
    heading: &str,
    labels: &[&str],
    values: &[f64],
    color: Color,
) {
    title(doc, cursor, heading, BAR_TITLE_ADVANCE);

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() || max <= 0.0 || !max.is_finite() {
        debug!(heading, bars = values.len(), "bar chart has no positive values, drawing title only");
        return;
    }

    let x0 = cursor.left_margin();
    let bar_x = x0 + BAR_OFFSET_X;
    for (label, &value) in labels.iter().zip(values).take(MAX_ENTRIES) {
        let y = cursor.y();
        let width = ((value / max).max(0.0) * BAR_MAX_WIDTH as f64) as f32;
        doc.text(label, x0, y + BAR_TEXT_BASELINE, FONT_SMALL, false, Color::BLACK);
        doc.rect(bar_x, y, width, BAR_HEIGHT, color);
        doc.text(
            &number(value),
            bar_x + width + BAR_VALUE_GAP,
            y + BAR_TEXT_BASELINE,
            FONT_SMALL,
            false,
            Color::BLACK,
        );
        cursor.advance(BAR_ROW);
    }
}
