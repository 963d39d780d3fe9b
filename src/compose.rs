//! Report composers: aggregate the records, lay out the fixed chart/table
//! sequence for each report type and persist the finished PDF.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use crate::aggregate::{group_by_count, AggregatedGroup};
use crate::charts::{bar_chart, pie_chart};
use crate::document::{approx_text_width, Color, Document, FONT_BODY, FONT_HEADER, FONT_TITLE};
use crate::error::{ReportError, Result};
use crate::fmt::{percent, short_date, timestamp};
use crate::layout::{LayoutCursor, PageGeometry, Paper};
use crate::models::{Camera, Incident};
use crate::table::{Col, Row, Table, ROW_HEIGHT};

pub const ACTIVE_LABEL: &str = "Activas";
pub const INACTIVE_LABEL: &str = "Inactivas";

const TITLE_ADVANCE: f32 = 40.0;
const SUMMARY_LINE: f32 = 20.0;
const SUMMARY_GAP: f32 = 40.0;
const SECTION_GAP: f32 = 40.0;
const SECTION_LABEL: f32 = 20.0;
const TOTAL_GAP: f32 = 10.0;

const STATUS_COLS: &[Col] = &[
    Col { label: "Estado", width: 250.0 },
    Col { label: "Cantidad", width: 100.0 },
    Col { label: "%", width: 100.0 },
];

/// Label, header, two status rows, the gap before the total and the total row.
const STATUS_BLOCK: f32 = SECTION_LABEL + ROW_HEIGHT * 4.0 + TOTAL_GAP;

const DETAIL_COLS: &[Col] = &[
    Col { label: "Nombre", width: 170.0 },
    Col { label: "Tipo", width: 120.0 },
    Col { label: "Inicio", width: 80.0 },
    Col { label: "Causa", width: 145.0 },
];

/// Everything a build needs besides the records. Keeping the timestamp here
/// makes two builds over the same input produce identical documents.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub generated_at: NaiveDateTime,
    pub paper: Paper,
}

impl ReportContext {
    pub fn now(paper: Paper) -> Self {
        Self {
            generated_at: chrono::Local::now().naive_local(),
            paper,
        }
    }
}

/// Break the page when a band of `needed` height no longer fits.
/// Returns whether a new page was started.
pub fn ensure_room(doc: &mut Document, cursor: &mut LayoutCursor, needed: f32) -> bool {
    if !cursor.would_overflow(needed) {
        return false;
    }
    doc.new_page();
    cursor.reset();
    debug!(page = doc.page_count(), "page break");
    true
}

/// Draw `rows` one band at a time, breaking pages as needed. The header is not
/// repeated on continuation pages. Returns the number of page breaks.
pub fn draw_rows(doc: &mut Document, cursor: &mut LayoutCursor, table: &Table, rows: &[Row]) -> usize {
    let mut breaks = 0;
    for row in rows {
        if ensure_room(doc, cursor, ROW_HEIGHT) {
            breaks += 1;
        }
        table.row(doc, cursor, row);
    }
    breaks
}

fn header_block(
    doc: &mut Document,
    cursor: &mut LayoutCursor,
    ctx: &ReportContext,
    title: &str,
    title_color: Color,
    count_line: &str,
) {
    let x = ((doc.page_width - approx_text_width(title, FONT_TITLE)) / 2.0).max(0.0);
    doc.text(title, x, cursor.y(), FONT_TITLE, true, title_color);
    cursor.advance(TITLE_ADVANCE);

    let left = cursor.left_margin();
    let date_line = format!("Fecha: {}", timestamp(ctx.generated_at));
    doc.text(&date_line, left, cursor.y(), FONT_BODY, false, Color::BLACK);
    cursor.advance(SUMMARY_LINE);
    doc.text(count_line, left, cursor.y(), FONT_BODY, false, Color::BLACK);
    cursor.advance(SUMMARY_GAP);
}

fn section_label(doc: &mut Document, cursor: &mut LayoutCursor, label: &str) {
    doc.text(label, cursor.left_margin(), cursor.y(), FONT_HEADER, true, Color::BLACK);
    cursor.advance(SECTION_LABEL);
}

fn new_document(title: &str, ctx: &ReportContext) -> (Document, LayoutCursor) {
    let geometry = PageGeometry::for_paper(ctx.paper);
    (
        Document::new(title, geometry.width, geometry.height),
        LayoutCursor::new(geometry),
    )
}

// ---------------------------------------------------------------------------
// Incident report
// ---------------------------------------------------------------------------

pub fn incident_groups(records: &[Incident]) -> Vec<AggregatedGroup> {
    group_by_count(records, |i| i.incident_type.as_deref())
}

pub fn build_incident_document(records: &[Incident], ctx: &ReportContext) -> Document {
    let (mut doc, mut cursor) = new_document("Informe de Incidencias", ctx);
    header_block(
        &mut doc,
        &mut cursor,
        ctx,
        "Informe de Incidencias InfoCam",
        Color::DARK_BLUE,
        &format!("Total Incidencias: {}", records.len()),
    );

    let groups = incident_groups(records);
    pie_chart(&mut doc, &mut cursor, "Distribución Porcentual por Tipo", &groups);
    cursor.advance(SECTION_GAP);

    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    let values: Vec<f64> = groups.iter().map(|g| g.count as f64).collect();
    bar_chart(
        &mut doc,
        &mut cursor,
        "Principales Causas",
        &labels,
        &values,
        Color::ORANGE_RED,
    );

    if !records.is_empty() {
        cursor.advance(SUMMARY_LINE);
        incident_detail(&mut doc, &mut cursor, records);
    }
    doc
}

fn incident_detail(doc: &mut Document, cursor: &mut LayoutCursor, records: &[Incident]) {
    ensure_room(doc, cursor, SECTION_LABEL + ROW_HEIGHT * 2.0);
    section_label(doc, cursor, "Detalle de Incidencias");

    let table = Table::new(cursor.left_margin(), DETAIL_COLS);
    table.header(doc, cursor);

    let rows: Vec<Row> = records
        .iter()
        .map(|i| {
            Row::new(vec![
                i.name.clone().unwrap_or_default(),
                i.incident_type.clone().unwrap_or_default(),
                short_date(i.started_at.as_deref()),
                i.cause.clone().unwrap_or_default(),
            ])
        })
        .collect();
    draw_rows(doc, cursor, &table, &rows);
}

pub fn generate_incident_report(records: &[Incident], output: &Path, paper: Paper) -> Result<()> {
    let doc = build_incident_document(records, &ReportContext::now(paper));
    write_document(&doc, output)
}

// ---------------------------------------------------------------------------
// Camera report
// ---------------------------------------------------------------------------

fn status_label(active: bool) -> &'static str {
    if active {
        ACTIVE_LABEL
    } else {
        INACTIVE_LABEL
    }
}

pub fn camera_groups(records: &[Camera]) -> Vec<AggregatedGroup> {
    group_by_count(records, |c| Some(status_label(c.active)))
}

fn count_of(groups: &[AggregatedGroup], label: &str) -> usize {
    groups
        .iter()
        .find(|g| g.label == label)
        .map_or(0, |g| g.count)
}

/// Rows of the camera status table: active, inactive, then the total.
pub fn camera_status_rows(groups: &[AggregatedGroup]) -> Vec<Row> {
    let active = count_of(groups, ACTIVE_LABEL);
    let inactive = count_of(groups, INACTIVE_LABEL);
    let total = active + inactive;
    let pct = |n: usize| percent(n as f64, total as f64, 1);
    vec![
        Row::emphasized(
            vec![ACTIVE_LABEL.to_string(), active.to_string(), pct(active)],
            Color::GREEN,
        ),
        Row::emphasized(
            vec![INACTIVE_LABEL.to_string(), inactive.to_string(), pct(inactive)],
            Color::RED,
        ),
        Row::new(vec![
            "TOTAL".to_string(),
            total.to_string(),
            if total > 0 { "100%" } else { "0%" }.to_string(),
        ]),
    ]
}

pub fn build_camera_document(records: &[Camera], ctx: &ReportContext) -> Document {
    let (mut doc, mut cursor) = new_document("Informe de Cámaras", ctx);
    header_block(
        &mut doc,
        &mut cursor,
        ctx,
        "Informe de Cámaras InfoCam",
        Color::DARK_GREEN,
        &format!("Total Cámaras: {}", records.len()),
    );

    let groups = camera_groups(records);
    pie_chart(&mut doc, &mut cursor, "Estado de Cámaras", &groups);
    cursor.advance(SECTION_GAP);
    camera_summary(&mut doc, &mut cursor, &groups);
    doc
}

/// The status block moves to a new page as a whole when it does not fit.
fn camera_summary(doc: &mut Document, cursor: &mut LayoutCursor, groups: &[AggregatedGroup]) {
    ensure_room(doc, cursor, STATUS_BLOCK);
    section_label(doc, cursor, "Resumen Estadístico:");

    let table = Table::new(cursor.left_margin(), STATUS_COLS);
    table.header(doc, cursor);

    let mut rows = camera_status_rows(groups);
    let total_row = rows.pop();
    draw_rows(doc, cursor, &table, &rows);

    let y = cursor.y();
    doc.line(table.x, y, table.x + table.width(), y, 1.0, Color::BLACK);
    cursor.advance(TOTAL_GAP);
    if let Some(row) = total_row {
        draw_rows(doc, cursor, &table, std::slice::from_ref(&row));
    }
}

pub fn generate_camera_report(records: &[Camera], output: &Path, paper: Paper) -> Result<()> {
    let doc = build_camera_document(records, &ReportContext::now(paper));
    write_document(&doc, output)
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

fn write_document(doc: &Document, output: &Path) -> Result<()> {
    let bytes = crate::pdf::render(doc)?;
    persist(&bytes, output)?;
    info!(
        path = %output.display(),
        pages = doc.page_count(),
        shapes = doc.primitives().filter(|p| p.is_shape()).count(),
        bytes = bytes.len(),
        "report written"
    );
    Ok(())
}

/// Write `bytes` to `path` through a temporary file in the same directory, so
/// the destination either keeps its old content or gets the complete file.
pub fn persist(bytes: &[u8], path: &Path) -> Result<()> {
    let fail = |source: std::io::Error| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(fail)?;
    let mut tmp = temp_file_for(dir, path).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}

/// The temp file is created the way `fs::write` would create the target
/// (0o666 less the umask), or with the mode of the file it replaces.
fn temp_file_for(dir: &Path, path: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;
    if let Ok(meta) = std::fs::metadata(path) {
        if meta.is_file() {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
    }
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Primitive;
    use chrono::NaiveDate;

    fn ctx() -> ReportContext {
        ReportContext {
            generated_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            paper: Paper::A4,
        }
    }

    fn incident(kind: Option<&str>, name: &str) -> Incident {
        Incident {
            id: 0,
            incident_type: kind.map(String::from),
            name: Some(name.to_string()),
            cause: Some("Lluvia".to_string()),
            started_at: Some("2025-05-30T08:00:00".to_string()),
        }
    }

    fn cameras(active: usize, inactive: usize) -> Vec<Camera> {
        (0..active + inactive)
            .map(|i| Camera {
                id: i as i64,
                name: Some(format!("Cam {i}")),
                active: i < active,
            })
            .collect()
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.primitives()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn cells(row: &Row) -> Vec<&str> {
        row.cells.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_camera_status_rows() {
        let groups = camera_groups(&cameras(7, 3));
        let rows = camera_status_rows(&groups);
        assert_eq!(cells(&rows[0]), vec!["Activas", "7", "70.0%"]);
        assert_eq!(cells(&rows[1]), vec!["Inactivas", "3", "30.0%"]);
        assert_eq!(cells(&rows[2]), vec!["TOTAL", "10", "100%"]);
        assert_eq!(rows[0].emphasis, Some(Color::GREEN));
        assert_eq!(rows[1].emphasis, Some(Color::RED));
        assert_eq!(rows[2].emphasis, None);
    }

    #[test]
    fn test_camera_status_rows_keep_order_when_inactive_dominates() {
        let groups = camera_groups(&cameras(1, 4));
        assert_eq!(groups[0].label, INACTIVE_LABEL);
        let rows = camera_status_rows(&groups);
        assert_eq!(cells(&rows[0]), vec!["Activas", "1", "20.0%"]);
        assert_eq!(cells(&rows[1]), vec!["Inactivas", "4", "80.0%"]);
    }

    #[test]
    fn test_camera_status_rows_without_cameras() {
        let rows = camera_status_rows(&[]);
        assert_eq!(cells(&rows[0]), vec!["Activas", "0", "0.0%"]);
        assert_eq!(cells(&rows[2]), vec!["TOTAL", "0", "0%"]);
    }

    #[test]
    fn test_camera_summary_moves_whole_to_next_page() {
        let (mut doc, mut cursor) = new_document("Informe de Cámaras", &ctx());
        // leave less room than the status block needs, but more than one row
        cursor.advance(841.89 - 40.0 - 40.0 - STATUS_BLOCK + 5.0);
        assert!(!cursor.would_overflow(ROW_HEIGHT * 2.0));

        camera_summary(&mut doc, &mut cursor, &camera_groups(&cameras(2, 1)));
        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].primitives.is_empty());

        let second: Vec<(&str, f32)> = doc.pages[1]
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, y, .. } => Some((text.as_str(), *y)),
                _ => None,
            })
            .collect();
        assert_eq!(second[0], ("Resumen Estadístico:", 40.0));
        assert!(second.iter().any(|(t, _)| *t == "TOTAL"));
    }

    #[test]
    fn test_camera_document_contents() {
        let doc = build_camera_document(&cameras(7, 3), &ctx());
        let t = texts(&doc);
        assert_eq!(t[0], "Informe de Cámaras InfoCam");
        assert_eq!(t[1], "Fecha: 2025-06-01 09:30");
        assert_eq!(t[2], "Total Cámaras: 10");
        assert!(t.contains(&"Activas: 7 (70.0%)".to_string()));
        assert!(t.contains(&"Resumen Estadístico:".to_string()));
        assert!(t.ends_with(&["TOTAL".to_string(), "10".to_string(), "100%".to_string()]));
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_empty_camera_report_has_no_chart_shapes() {
        let doc = build_camera_document(&[], &ctx());
        let sectors = doc
            .primitives()
            .filter(|p| matches!(p, Primitive::Sector { .. }))
            .count();
        assert_eq!(sectors, 0);
        assert!(texts(&doc).contains(&"Total Cámaras: 0".to_string()));
    }

    #[test]
    fn test_incident_document_draws_pie_and_bars_from_same_groups() {
        let records = vec![
            incident(Some("Accidente"), "a"),
            incident(Some("Obras"), "b"),
            incident(Some("Accidente"), "c"),
            incident(None, "d"),
        ];
        let doc = build_incident_document(&records, &ctx());
        let t = texts(&doc);
        assert!(t.contains(&"Total Incidencias: 4".to_string()));
        assert!(t.contains(&"Accidente: 2 (50.0%)".to_string()));
        assert!(t.contains(&"Otros: 1 (25.0%)".to_string()));
        assert!(t.contains(&"Detalle de Incidencias".to_string()));
        assert!(t.contains(&"30/05/2025".to_string()));

        let sectors = doc
            .primitives()
            .filter(|p| matches!(p, Primitive::Sector { .. }))
            .count();
        assert_eq!(sectors, 3);
        let bars: Vec<f32> = doc
            .primitives()
            .filter_map(|p| match p {
                // legend swatches are 10pt tall, bars 15pt
                Primitive::Rect { width, height, .. } if *height == 15.0 => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(bars, vec![350.0, 175.0, 175.0]);
    }

    #[test]
    fn test_empty_incident_report_is_minimal() {
        let doc = build_incident_document(&[], &ctx());
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.primitives().filter(|p| p.is_shape()).count(), 0);
        let t = texts(&doc);
        assert!(t.contains(&"Total Incidencias: 0".to_string()));
        assert!(t.contains(&"Distribución Porcentual por Tipo".to_string()));
        assert!(t.contains(&"Principales Causas".to_string()));
    }

    #[test]
    fn test_long_incident_list_spills_onto_new_pages() {
        let records: Vec<Incident> = (0..80)
            .map(|i| incident(Some("Accidente"), &format!("inc {i}")))
            .collect();
        let doc = build_incident_document(&records, &ctx());
        assert!(doc.page_count() >= 2);
        // header is drawn once
        let headers = texts(&doc).iter().filter(|t| *t == "Nombre").count();
        assert_eq!(headers, 1);
        let rows: usize = doc
            .primitives()
            .filter(|p| matches!(p, Primitive::Line { .. }))
            .count();
        assert_eq!(rows, 80);
    }

    #[test]
    fn test_rows_crossing_the_bottom_break_exactly_once() {
        let geo = PageGeometry::for_paper(Paper::A4);
        let mut doc = Document::new("t", geo.width, geo.height);
        let mut cursor = LayoutCursor::new(geo);
        // two rows still fit on the first page
        cursor.advance(geo.height - geo.bottom_margin - geo.top_margin - 2.0 * ROW_HEIGHT - 1.0);

        let table = Table::new(40.0, STATUS_COLS);
        let rows: Vec<Row> = (0..5).map(|i| Row::new(vec![i.to_string()])).collect();
        let breaks = draw_rows(&mut doc, &mut cursor, &table, &rows);

        assert_eq!(breaks, 1);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].primitives.len(), 4);
        assert_eq!(doc.pages[1].primitives.len(), 6);
        assert!(texts(&doc).iter().all(|t| t != "Estado"));
        assert_eq!(cursor.y(), geo.top_margin + 3.0 * ROW_HEIGHT);
    }

    #[test]
    fn test_builds_are_deterministic() {
        let records = vec![
            incident(Some("Accidente"), "a"),
            incident(Some("Nieve"), "b"),
            incident(Some("Obras"), "c"),
        ];
        assert_eq!(
            build_incident_document(&records, &ctx()),
            build_incident_document(&records, &ctx())
        );
        let cams = cameras(4, 9);
        assert_eq!(
            build_camera_document(&cams, &ctx()),
            build_camera_document(&cams, &ctx())
        );
    }

    #[test]
    fn test_generate_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("camaras.pdf");
        generate_camera_report(&cameras(2, 1), &path, Paper::A4).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // only the final file is left behind
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_generate_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidencias.pdf");
        std::fs::write(&path, b"old").unwrap();
        generate_incident_report(&[incident(Some("Obras"), "x")], &path, Paper::Letter).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_keeps_mode_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camaras.pdf");
        std::fs::write(&path, b"old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        generate_camera_report(&cameras(1, 1), &path, Paper::A4).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_same_mode_as_plain_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.pdf");
        std::fs::write(&plain, b"%PDF").unwrap();
        let path = dir.path().join("fresh.pdf");
        persist(b"%PDF", &path).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[test]
    fn test_write_failure_is_reported_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("report.pdf");

        let err = generate_camera_report(&cameras(1, 1), &path, Paper::A4).unwrap_err();
        assert!(matches!(err, ReportError::WriteFailed { .. }), "got {err:?}");
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_persist_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory at the destination cannot be replaced by a file
        let path = dir.path().join("report.pdf");
        std::fs::create_dir(&path).unwrap();

        let err = persist(b"%PDF-1.3", &path).unwrap_err();
        assert!(matches!(err, ReportError::WriteFailed { .. }));
        assert!(path.is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
