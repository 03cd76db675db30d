use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::info;
use crate::error::{Result, ScheduleError};
use crate::io::atomic_write;
use crate::schedule::types::{day_key, weekday_index, HOLIDAY_PREFIX};
use crate::schedule::MonthSchedule;

/// "YYYY-MM" -> "YYYY-MM-DD" -> agents, or a single "Feriado: ..." entry
pub type GuardCalendar = BTreeMap<String, BTreeMap<String, Vec<String>>>;

const WEEKDAY_NAMES: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];

/// Holiday label of a persisted day entry, if it is one
pub fn holiday_label(entry: &[String]) -> Option<&str> {
    match entry {
        [single] => single.strip_prefix(HOLIDAY_PREFIX),
        _ => None,
    }
}

/// Validates a "YYYY-MM" key and returns its first day
pub fn parse_month_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
        .ok()
        .filter(|_| key.len() == 7)
        .ok_or_else(|| ScheduleError::InvalidMonthKey(key.to_string()))
}

/// JSON file accumulating every generated month
#[derive(Debug, Clone)]
pub struct CalendarFile {
    path: PathBuf,
}

impl CalendarFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file is an empty calendar; a malformed one is an error so earlier months are never dropped
    pub fn load(&self) -> Result<GuardCalendar> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(GuardCalendar::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, calendar: &GuardCalendar) -> Result<()> {
        let json = serde_json::to_vec_pretty(calendar)?;
        atomic_write(&self.path, &json)
    }

    /// Merges one month into the file, leaving other months untouched
    pub fn store_month(&self, schedule: &MonthSchedule) -> Result<()> {
        let mut calendar = self.load()?;
        merge_month(&mut calendar, schedule);
        self.save(&calendar)?;
        info!(path = %self.path.display(), period = %schedule.month_key(), "saved guard calendar");
        Ok(())
    }
}

/// Inserts the month's days, overwriting any day already present for that month
pub fn merge_month(calendar: &mut GuardCalendar, schedule: &MonthSchedule) {
    let month = calendar.entry(schedule.month_key()).or_default();
    for (date, assignment) in &schedule.days {
        month.insert(day_key(*date), assignment.to_entry());
    }
}

/// Guards per agent within one month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub total: u32,
    /// weekday index (Monday=0) -> guards
    pub by_weekday: BTreeMap<u8, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthStats {
    pub month: String,
    pub working_days: u32,
    pub holidays: Vec<String>,
    pub agents: BTreeMap<String, AgentStats>,
}

pub fn month_stats(month: &str, days: &BTreeMap<String, Vec<String>>) -> MonthStats {
    let mut stats = MonthStats { month: month.to_string(), ..Default::default() };

    for (day, entry) in days {
        if let Some(label) = holiday_label(entry) {
            stats.holidays.push(format!("{} {}", day, label));
            continue;
        }
        stats.working_days += 1;
        let weekday = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok().map(|d| weekday_index(d.weekday()));
        for agent in entry {
            let agent_stats = stats.agents.entry(agent.clone()).or_default();
            agent_stats.total += 1;
            if let Some(weekday) = weekday {
                *agent_stats.by_weekday.entry(weekday).or_insert(0) += 1;
            }
        }
    }

    stats
}

/// Plain-text view of one month: one line per day, then guard totals per agent
pub fn render_month(month: &str, days: &BTreeMap<String, Vec<String>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Guardias {} ===", month);

    for (day, entry) in days {
        let weekday = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map(|d| WEEKDAY_NAMES[d.weekday().num_days_from_monday() as usize])
            .unwrap_or("???");
        match holiday_label(entry) {
            Some(label) => {
                let _ = writeln!(out, "{} {}  [Feriado] {}", weekday, day, label);
            }
            None => {
                let _ = writeln!(out, "{} {}  {}", weekday, day, entry.join(" / "));
            }
        }
    }

    let stats = month_stats(month, days);
    let _ = writeln!(out, "\nTotal por agente:");
    for (agent, agent_stats) in &stats.agents {
        let _ = writeln!(out, "  {:<24} {}", agent, agent_stats.total);
    }
    out
}
