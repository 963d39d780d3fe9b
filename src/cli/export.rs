use std::path::{Path, PathBuf};

use crate::compose;
use crate::error::Result;
use crate::layout::Paper;
use crate::models::{load_cameras, load_incidents};
use crate::settings::{export_dir, load_settings};

fn default_path(name: &str) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    export_dir().join(format!("{name}-{date}.pdf"))
}

fn resolve(output: Option<String>, name: &str, paper: Option<Paper>) -> (PathBuf, Paper) {
    let path = output.map(PathBuf::from).unwrap_or_else(|| default_path(name));
    let paper = paper.unwrap_or_else(|| load_settings().paper);
    (path, paper)
}

pub fn incidents(file: &str, output: Option<String>, paper: Option<Paper>) -> Result<()> {
    let records = load_incidents(Path::new(file))?;
    let (path, paper) = resolve(output, "incidencias", paper);
    compose::generate_incident_report(&records, &path, paper)?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn cameras(file: &str, output: Option<String>, paper: Option<Paper>) -> Result<()> {
    let records = load_cameras(Path::new(file))?;
    let (path, paper) = resolve(output, "camaras", paper);
    compose::generate_camera_report(&records, &path, paper)?;
    println!("Wrote {}", path.display());
    Ok(())
}
