use std::collections::{BTreeMap, HashMap};
use chrono::{Datelike, NaiveDate, Weekday};

/// Prefix downstream consumers use to recognise holiday entries in the calendar file
pub const HOLIDAY_PREFIX: &str = "Feriado: ";

/// Agents are identified by their exact name
pub type Agent = String;

/// Holiday date -> display label, for one target year
pub type HolidaySet = BTreeMap<NaiveDate, String>;

/// Guards assigned to each agent within the current run only
pub type MonthlyCounters = HashMap<Agent, u32>;

/// Canonical weekday index: Monday=0 ... Saturday=5, Sunday=6.
/// This is the only numbering used for history keys and scoring.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

/// A working day that needs two agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibleDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
}

impl EligibleDay {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, weekday: date.weekday() }
    }

    pub fn weekday_index(&self) -> u8 {
        weekday_index(self.weekday)
    }
}

/// One non-Sunday day of the target month
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarDay {
    Working(EligibleDay),
    Holiday { date: NaiveDate, label: String },
}

/// What a single day ends up with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayAssignment {
    Holiday(String),
    Pair(Agent, Agent),
}

impl DayAssignment {
    /// Array form used in the persisted calendar
    pub fn to_entry(&self) -> Vec<String> {
        match self {
            DayAssignment::Holiday(label) => vec![format!("{}{}", HOLIDAY_PREFIX, label)],
            DayAssignment::Pair(a, b) => vec![a.clone(), b.clone()],
        }
    }
}

/// Assignments for every non-Sunday day of one month, in date order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSchedule {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<NaiveDate, DayAssignment>,
}

impl MonthSchedule {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month, days: BTreeMap::new() }
    }

    /// "YYYY-MM"
    pub fn month_key(&self) -> String {
        month_key(self.year, self.month)
    }
}

pub fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
