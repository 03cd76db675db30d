use std::collections::BTreeMap;
use std::path::Path;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};
use crate::error::{Result, ScheduleError};
use crate::schedule::HolidaySet;

pub const NAGER_BASE_URL: &str = "https://date.nager.at/api/v3";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicHoliday {
    date: String,
    #[serde(default)]
    local_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(date = raw, "skipping holiday with invalid date");
            None
        }
    }
}

/// Parses the public holiday API response, preferring the local-language name
pub fn parse_public_holidays(body: &str) -> Result<HolidaySet> {
    let entries: Vec<PublicHoliday> = serde_json::from_str(body)?;
    Ok(entries
        .into_iter()
        .filter_map(|h| {
            let date = parse_date(&h.date)?;
            let label = h
                .local_name
                .filter(|n| !n.trim().is_empty())
                .or(h.name)
                .unwrap_or_else(|| "Feriado".to_string());
            Some((date, label))
        })
        .collect())
}

/// Parses a local `{ "YYYY-MM-DD": "label" }` file
pub fn parse_holiday_map(body: &str) -> Result<HolidaySet> {
    let raw: BTreeMap<String, String> = serde_json::from_str(body)?;
    Ok(raw
        .into_iter()
        .filter_map(|(date, label)| Some((parse_date(&date)?, label)))
        .collect())
}

async fn fetch_public_holidays(
    client: &reqwest::Client,
    base_url: &str,
    year: i32,
    country: &str,
) -> Result<HolidaySet> {
    let url = format!("{}/PublicHolidays/{}/{}", base_url.trim_end_matches('/'), year, country);
    let response = client.get(&url).send().await?.error_for_status()?;
    let body = response.text().await?;
    parse_public_holidays(&body)
}

/// Public holidays for `year`. Any failure degrades to an empty set.
pub async fn holidays_for_year(client: &reqwest::Client, base_url: &str, year: i32, country: &str) -> HolidaySet {
    match fetch_public_holidays(client, base_url, year, country).await {
        Ok(holidays) => {
            info!(year, country, count = holidays.len(), "loaded public holidays");
            holidays
        }
        Err(e) => {
            warn!(year, country, error = %e, "could not load public holidays, continuing without them");
            HolidaySet::new()
        }
    }
}

/// Holidays from a local JSON file. Any failure degrades to an empty set.
pub fn holidays_from_file(path: &Path) -> HolidaySet {
    let loaded = std::fs::read_to_string(path)
        .map_err(ScheduleError::from)
        .and_then(|body| parse_holiday_map(&body));
    match loaded {
        Ok(holidays) => {
            info!(path = %path.display(), count = holidays.len(), "loaded holidays file");
            holidays
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not load holidays file, continuing without them");
            HolidaySet::new()
        }
    }
}
