use crate::error::Result;
use crate::layout::Paper;
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run(export_dir: Option<String>, paper: Option<Paper>) -> Result<()> {
    let mut settings = load_settings();
    let changed = export_dir.is_some() || paper.is_some();
    if let Some(dir) = export_dir {
        settings.export_dir = dir;
    }
    if let Some(p) = paper {
        settings.paper = p;
    }
    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    println!("Settings:    {}", settings_path().display());
    println!("Export dir:  {}", settings.export_dir);
    println!(
        "Paper:       {}",
        match settings.paper {
            Paper::A4 => "a4",
            Paper::Letter => "letter",
        }
    );
    Ok(())
}
