use std::path::Path;

use colored::{ColoredString, Colorize};
use comfy_table::{Cell, Table};

use crate::aggregate::total;
use crate::compose::{camera_groups, camera_status_rows, incident_groups};
use crate::document::Color;
use crate::error::Result;
use crate::fmt::percent;
use crate::models::{load_cameras, load_incidents};

/// Terminal rendering of a PDF emphasis color.
fn paint(text: &str, color: Color) -> ColoredString {
    match color {
        Color::GREEN => text.green(),
        Color::RED => text.red(),
        Color { r, g, b } => text.truecolor(r, g, b),
    }
}

pub fn incidents(file: &str) -> Result<()> {
    let records = load_incidents(Path::new(file))?;
    let groups = incident_groups(&records);
    let sum = total(&groups);

    let mut table = Table::new();
    table.set_header(vec!["Tipo", "Cantidad", "%"]);
    for g in &groups {
        table.add_row(vec![
            Cell::new(&g.label),
            Cell::new(g.count),
            Cell::new(percent(g.count as f64, sum as f64, 1)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL".bold()),
        Cell::new(sum.to_string().bold()),
        Cell::new(""),
    ]);

    println!("{}\n{table}", "Incidencias por tipo".bold());
    Ok(())
}

pub fn cameras(file: &str) -> Result<()> {
    let records = load_cameras(Path::new(file))?;
    let rows = camera_status_rows(&camera_groups(&records));

    let mut table = Table::new();
    table.set_header(vec!["Estado", "Cantidad", "%"]);
    for row in &rows {
        let cells: Vec<Cell> = row
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match row.emphasis {
                Some(color) if i + 1 == row.cells.len() => Cell::new(paint(cell, color)),
                Some(_) => Cell::new(cell),
                None => Cell::new(cell.bold()),
            })
            .collect();
        table.add_row(cells);
    }

    println!("{}\n{table}", "Estado de Cámaras".bold());
    Ok(())
}
