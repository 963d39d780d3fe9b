use std::path::Path;

use serde::Deserialize;

use crate::error::{ReportError, Result};

/// An incident as returned by the InfoCam API. Only the fields the reports
/// read are kept; everything else in the payload is ignored.
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct Incident {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "tipoIncidencia", default)]
    pub incident_type: Option<String>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "causa", default)]
    pub cause: Option<String>,
    #[serde(rename = "fecha_inicio", default)]
    pub started_at: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct Camera {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "activa", default)]
    pub active: bool,
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ReportError::Input(format!("{}: {e}", path.display())))
}

pub fn load_incidents(path: &Path) -> Result<Vec<Incident>> {
    load_json(path)
}

pub fn load_cameras(path: &Path) -> Result<Vec<Camera>> {
    load_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_from_api_payload() {
        let json = r#"[{
            "id": 4,
            "tipoIncidencia": "Accidente",
            "externalId": "X-1",
            "causa": "Hielo",
            "nombre": "A-8 km 12",
            "fecha_inicio": "2025-01-15T10:30:00",
            "latitud": "43.1",
            "usuario": {"id": 1, "username": "ana"}
        }]"#;
        let rows: Vec<Incident> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].incident_type.as_deref(), Some("Accidente"));
        assert_eq!(rows[0].name.as_deref(), Some("A-8 km 12"));
        assert_eq!(rows[0].cause.as_deref(), Some("Hielo"));
    }

    #[test]
    fn test_incident_missing_type_is_none() {
        let rows: Vec<Incident> =
            serde_json::from_str(r#"[{"id": 1, "tipoIncidencia": null}, {"id": 2}]"#).unwrap();
        assert!(rows.iter().all(|r| r.incident_type.is_none()));
    }

    #[test]
    fn test_load_cameras_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cameras.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "nombre": "Cam 1", "activa": true}, {"id": 2, "nombre": "Cam 2"}]"#,
        )
        .unwrap();
        let cams = load_cameras(&path).unwrap();
        assert_eq!(cams.len(), 2);
        assert!(cams[0].active);
        assert!(!cams[1].active);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_incidents(&path).unwrap_err();
        assert!(matches!(err, ReportError::Input(_)));
    }
}
