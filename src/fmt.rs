use chrono::{DateTime, NaiveDateTime};

/// Format a count or measure: integral values print without decimals ("7"),
/// anything else with up to two decimals ("2.5", "0.33").
pub fn number(val: f64) -> String {
    if val.fract() == 0.0 && val.abs() < 1e15 {
        return format!("{}", val as i64);
    }
    let s = format!("{val:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Share of `part` in `total` as a percentage string: `percent(7.0, 10.0, 1)` is "70.0%".
pub fn percent(part: f64, total: f64, decimals: usize) -> String {
    let pct = if total != 0.0 { part / total * 100.0 } else { 0.0 };
    format!("{pct:.decimals$}%")
}

pub fn timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Render an API date string as dd/mm/yyyy, or "-" when it cannot be read.
pub fn short_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d/%m/%Y").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%d/%m/%Y").to_string();
        }
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%d/%m/%Y").to_string();
    }
    "-".to_string()
}
