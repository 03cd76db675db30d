use std::path::PathBuf;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};
use crate::error::ScheduleError;
use crate::holidays::{holidays_for_year, holidays_from_file};
use crate::http::{client, FETCH_TIMEOUT};
use crate::output::{render_month, CalendarFile, GuardCalendar, merge_month};
use crate::roster::load_roster;
use crate::schedule::calendar::first_of_month;
use crate::schedule::{assign_month, month_days, next_month, Agent, HistoryStore, HolidaySet, MonthAssignment};

/// Where holidays come from for a run
#[derive(Debug, Clone)]
pub enum HolidaySource {
    Api { base_url: String, country: String },
    File(PathBuf),
    None,
}

/// Everything one `generate` run needs
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub roster: String,
    pub holidays: HolidaySource,
    pub history_path: PathBuf,
    pub output_path: PathBuf,
    pub period: Option<(i32, u32)>,
    pub dry_run: bool,
}

/// Target period, defaulting to the month after `today`
pub fn resolve_period(period: Option<(i32, u32)>, today: NaiveDate) -> (i32, u32) {
    period.unwrap_or_else(|| next_month(today))
}

/// Runs the engine for one month and persists the result.
///
/// Nothing is written unless the whole month was assigned. The calendar is saved before
/// the history so a failed history save can be fixed by simply re-running the month.
pub fn plan_month(
    year: i32,
    month: u32,
    roster: &[Agent],
    holidays: &HolidaySet,
    history_store: &HistoryStore,
    calendar: &CalendarFile,
    dry_run: bool,
) -> anyhow::Result<MonthAssignment> {
    if roster.len() < 2 {
        return Err(ScheduleError::NotEnoughAgents(roster.len()).into());
    }

    let days = month_days(year, month, holidays)?;
    let history = history_store.load();
    let result = assign_month(year, month, &days, roster, history)?;
    for agent in roster {
        let guards = result.monthly.get(agent).copied().unwrap_or(0);
        debug!(agent = %agent, guards, "guards this month");
    }

    if dry_run {
        info!(period = %result.schedule.month_key(), "dry run, nothing persisted");
        return Ok(result);
    }

    calendar
        .store_month(&result.schedule)
        .with_context(|| format!("writing guard calendar {}", calendar.path().display()))?;
    history_store
        .save(&result.history)
        .with_context(|| format!("writing fairness history {}", history_store.path().display()))?;

    Ok(result)
}

/// Full batch run: collect inputs, assign the month, persist, and return the printable month
pub async fn generate(config: &GenerateConfig) -> anyhow::Result<String> {
    let (year, month) = resolve_period(config.period, Local::now().date_naive());
    first_of_month(year, month)?;
    info!(year, month, "generating guards");

    let http = client(FETCH_TIMEOUT)?;
    let roster = load_roster(&http, &config.roster)
        .await
        .with_context(|| format!("loading roster from {}", config.roster))?;
    if roster.len() < 2 {
        return Err(ScheduleError::NotEnoughAgents(roster.len()).into());
    }
    info!(agents = ?roster, "active agents");

    let holidays = match &config.holidays {
        HolidaySource::Api { base_url, country } => holidays_for_year(&http, base_url, year, country).await,
        HolidaySource::File(path) => holidays_from_file(path),
        HolidaySource::None => {
            warn!("holiday lookup disabled");
            HolidaySet::new()
        }
    };

    let history_store = HistoryStore::new(&config.history_path);
    let calendar = CalendarFile::new(&config.output_path);
    let result = plan_month(year, month, &roster, &holidays, &history_store, &calendar, config.dry_run)?;

    let mut view = GuardCalendar::new();
    merge_month(&mut view, &result.schedule);
    let key = result.schedule.month_key();
    Ok(view.get(&key).map(|days| render_month(&key, days)).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use crate::schedule::history::FairnessHistory;

    fn roster(names: &[&str]) -> Vec<Agent> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn stores(dir: &TempDir) -> (HistoryStore, CalendarFile) {
        (
            HistoryStore::new(dir.path().join("data/historial.json")),
            CalendarFile::new(dir.path().join("public/guardias.json")),
        )
    }

    #[test]
    fn persists_calendar_and_history() {
        let dir = TempDir::new().unwrap();
        let (history, calendar) = stores(&dir);
        let mut holidays = HolidaySet::new();
        holidays.insert(NaiveDate::from_ymd_opt(2025, 7, 9).unwrap(), "Día de la Independencia".into());

        let names = roster(&["Ana", "Bruno", "Carla", "Diego"]);
        plan_month(2025, 7, &names, &holidays, &history, &calendar, false).unwrap();

        let saved = calendar.load().unwrap();
        assert_eq!(saved["2025-07"]["2025-07-09"], vec!["Feriado: Día de la Independencia"]);
        assert!(saved["2025-07"].values().all(|e| e.len() == 2 || e[0].starts_with("Feriado: ")));
        assert!(history.load().pair_counts.values().sum::<u32>() > 0);
    }

    #[test]
    fn second_month_builds_on_saved_history() {
        let dir = TempDir::new().unwrap();
        let (history, calendar) = stores(&dir);
        let names = roster(&["Ana", "Bruno", "Carla"]);

        plan_month(2025, 7, &names, &HolidaySet::new(), &history, &calendar, false).unwrap();
        let after_july = history.load();
        plan_month(2025, 8, &names, &HolidaySet::new(), &history, &calendar, false).unwrap();
        let after_august = history.load();

        for (key, count) in &after_july.pair_counts {
            assert!(after_august.pair_counts[key] >= *count);
        }
        assert_eq!(calendar.load().unwrap().len(), 2);
    }

    #[test]
    fn too_few_agents_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let (history, calendar) = stores(&dir);

        let err = plan_month(2025, 7, &roster(&["Ana"]), &HolidaySet::new(), &history, &calendar, false).unwrap_err();
        assert!(matches!(err.downcast_ref::<ScheduleError>(), Some(ScheduleError::NotEnoughAgents(1))));
        assert!(!history.path().exists());
        assert!(!calendar.path().exists());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let (history, calendar) = stores(&dir);
        let result = plan_month(2025, 7, &roster(&["Ana", "Bruno"]), &HolidaySet::new(), &history, &calendar, true)
            .unwrap();
        assert!(!result.schedule.days.is_empty());
        // 27 non-Sunday days in July 2025, two agents each
        assert_eq!(result.monthly.values().sum::<u32>(), 54);
        assert!(!history.path().exists());
        assert!(!calendar.path().exists());
    }

    #[test]
    fn corrupted_history_still_runs() {
        let dir = TempDir::new().unwrap();
        let (history, calendar) = stores(&dir);
        std::fs::create_dir_all(history.path().parent().unwrap()).unwrap();
        std::fs::write(history.path(), "garbage").unwrap();

        let result =
            plan_month(2025, 7, &roster(&["Ana", "Bruno", "Carla"]), &HolidaySet::new(), &history, &calendar, false)
                .unwrap();
        assert_ne!(history.load(), FairnessHistory::default());
        assert_eq!(history.load(), result.history);
    }

    #[test]
    fn default_period_is_next_month() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        assert_eq!(resolve_period(None, today), (2026, 1));
        assert_eq!(resolve_period(Some((2025, 3)), today), (2025, 3));
    }

    #[tokio::test]
    async fn generate_from_local_sources() {
        let dir = TempDir::new().unwrap();
        let roster_path = dir.path().join("agentes.csv");
        std::fs::write(&roster_path, "Activo,Nombre\nTRUE,Ana\nTRUE,Bruno\nFALSE,Carla\nTRUE,Diego\n").unwrap();
        let holidays_path = dir.path().join("feriados.json");
        std::fs::write(&holidays_path, r#"{"2025-12-25":"Navidad"}"#).unwrap();

        let config = GenerateConfig {
            roster: roster_path.to_string_lossy().into_owned(),
            holidays: HolidaySource::File(holidays_path),
            history_path: dir.path().join("historial.json"),
            output_path: dir.path().join("guardias.json"),
            period: Some((2025, 12)),
            dry_run: false,
        };
        let text = generate(&config).await.unwrap();
        assert!(text.contains("[Feriado] Navidad"));

        let saved = CalendarFile::new(&config.output_path).load().unwrap();
        assert!(saved["2025-12"].values().flatten().all(|name| name != "Carla"));
    }

    #[tokio::test]
    async fn generate_aborts_on_short_roster() {
        let dir = TempDir::new().unwrap();
        let roster_path = dir.path().join("agentes.csv");
        std::fs::write(&roster_path, "Activo,Nombre\nTRUE,Ana\nFALSE,Bruno\n").unwrap();

        let config = GenerateConfig {
            roster: roster_path.to_string_lossy().into_owned(),
            holidays: HolidaySource::None,
            history_path: dir.path().join("historial.json"),
            output_path: dir.path().join("guardias.json"),
            period: Some((2025, 12)),
            dry_run: false,
        };
        assert!(generate(&config).await.is_err());
        assert!(!config.output_path.exists());
        assert!(!config.history_path.exists());
    }
}
