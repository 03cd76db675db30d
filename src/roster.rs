use std::collections::HashSet;
use std::io::Read;
use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};
use crate::error::{Result, ScheduleError};
use crate::schedule::Agent;

/// Parses the "active" checkbox column of the spreadsheet export
fn parse_active(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    matches!(lower.as_str(), "true" | "si" | "sí" | "yes" | "1" | "✅")
}

const ACTIVE_HEADERS: &[&str] = &["activo", "activa", "activos", "active", "check"];
const NAME_HEADERS: &[&str] = &["nombre", "name", "agente", "agent"];

/// Column whose whole header (trimmed, any case) is one of `names`
fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        names.contains(&h.as_str())
    })
}

/// Reads active agents from a spreadsheet CSV export.
///
/// The first row is a header. The active flag defaults to column A and the name to
/// column B, unless a header cell is exactly one of the known names ("activo", "nombre", ...).
/// Order is preserved; duplicates are kept and only reported.
pub fn parse_roster<R: Read>(input: R) -> Result<Vec<Agent>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers()?.clone();
    let active_col = find_column(&headers, ACTIVE_HEADERS).unwrap_or(0);
    let name_col = find_column(&headers, NAME_HEADERS).unwrap_or(1);

    let mut agents = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.records() {
        let record = result?;
        if record.len() < 2 {
            continue;
        }
        if !parse_active(record.get(active_col).unwrap_or("")) {
            continue;
        }
        let name = record.get(name_col).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_string()) {
            warn!(agent = name, "duplicate agent in roster");
        }
        agents.push(name.to_string());
    }

    Ok(agents)
}

/// Loads the roster from a local CSV path or an http(s) URL
pub async fn load_roster(client: &reqwest::Client, source: &str) -> Result<Vec<Agent>> {
    let agents = if source.starts_with("http://") || source.starts_with("https://") {
        let response = client.get(source).send().await?;
        if !response.status().is_success() {
            return Err(ScheduleError::Roster(format!("{} returned {}", source, response.status())));
        }
        let body = response.text().await?;
        parse_roster(body.as_bytes())?
    } else {
        let file = std::fs::File::open(source)?;
        parse_roster(file)?
    };

    info!(count = agents.len(), "loaded active agents");
    Ok(agents)
}
