use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::layout::Paper;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_export_dir_string")]
    pub export_dir: String,
    #[serde(default)]
    pub paper: Paper,
}

fn default_export_dir_string() -> String {
    default_export_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir_string(),
            paper: Paper::default(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("infocam")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_export_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("infocam")
        .join("exports")
}

pub fn load_settings() -> Settings {
    load_from(&settings_path())
}

fn load_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_to(settings, &settings_path())
}

fn save_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ReportError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn export_dir() -> PathBuf {
    PathBuf::from(&load_settings().export_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("infocam").join("settings.json");
        let settings = Settings {
            export_dir: "/tmp/informes".to_string(),
            paper: Paper::Letter,
        };
        save_to(&settings, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""paper": "letter""#), "got {content}");
        let loaded = load_from(&path);
        assert_eq!(loaded.export_dir, "/tmp/informes");
        assert_eq!(loaded.paper, Paper::Letter);
    }

    #[test]
    fn test_load_falls_back_on_missing_or_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(load_from(&path).paper, Paper::A4);

        std::fs::write(&path, "{not json").unwrap();
        let loaded = load_from(&path);
        assert_eq!(loaded.paper, Paper::A4);
        assert!(loaded.export_dir.ends_with("exports"));
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.paper, Paper::A4);
        assert!(s.export_dir.ends_with("exports"));
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"paper": "letter"}"#).unwrap();
        assert_eq!(s.paper, Paper::Letter);
        assert!(!s.export_dir.is_empty());

        let s: Settings = serde_json::from_str(r#"{"export_dir": "/srv/pdf"}"#).unwrap();
        assert_eq!(s.paper, Paper::A4);
        assert_eq!(s.export_dir, "/srv/pdf");
    }

    #[test]
    fn test_paper_serializes_lowercase() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains(r#""paper":"a4""#), "got {json}");
    }
}
