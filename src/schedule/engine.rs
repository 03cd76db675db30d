use tracing::{debug, info};
use crate::error::{Result, ScheduleError};
use super::history::FairnessHistory;
use super::pool::AvailabilityPool;
use super::scorer::score_pair;
use super::types::{Agent, CalendarDay, DayAssignment, EligibleDay, MonthSchedule, MonthlyCounters};

/// Result of one month run. `history` includes this month's assignments and is
/// only meant to be persisted once the whole month went through.
#[derive(Debug, Clone)]
pub struct MonthAssignment {
    pub schedule: MonthSchedule,
    pub monthly: MonthlyCounters,
    pub history: FairnessHistory,
}

/// Picks the cheapest pair among `available`.
///
/// Pairs are enumerated as (i, j) with i < j over `available` in its given order, and a
/// pair only replaces the current best on a strictly lower score. Ties therefore go to the
/// first pair enumerated, which is what makes the result deterministic.
pub fn select_pair<'a>(
    available: &[&'a Agent],
    day: &EligibleDay,
    monthly: &MonthlyCounters,
    history: &FairnessHistory,
) -> Option<(&'a Agent, &'a Agent, u64)> {
    let mut best: Option<(&'a Agent, &'a Agent, u64)> = None;

    for (i, a) in available.iter().enumerate() {
        for b in &available[i + 1..] {
            let score = score_pair(a, b, day, monthly, history);
            let better = match best {
                Some((_, _, best_score)) => score < best_score,
                None => true,
            };
            if better {
                best = Some((*a, *b, score));
            }
        }
    }

    best
}

/// Assigns a pair of agents to every working day of the month, one day at a time in date order.
/// Holidays pass through untouched and never affect counters or the availability pool.
pub fn assign_month(
    year: i32,
    month: u32,
    days: &[CalendarDay],
    roster: &[Agent],
    mut history: FairnessHistory,
) -> Result<MonthAssignment> {
    if roster.len() < 2 {
        return Err(ScheduleError::NotEnoughAgents(roster.len()));
    }

    let mut schedule = MonthSchedule::new(year, month);
    let mut monthly: MonthlyCounters = roster.iter().map(|a| (a.clone(), 0)).collect();
    let mut pool = AvailabilityPool::new();

    for day in days {
        match day {
            CalendarDay::Holiday { date, label } => {
                debug!(%date, label = %label, "holiday, skipping assignment");
                schedule.days.insert(*date, DayAssignment::Holiday(label.clone()));
            }
            CalendarDay::Working(day) => {
                let available = pool.available(roster);
                let (a, b, score) = select_pair(&available, day, &monthly, &history)
                    .ok_or(ScheduleError::NotEnoughAgents(available.len()))?;

                debug!(date = %day.date, first = %a, second = %b, score, "assigned");

                pool.mark_used(a, b);
                *monthly.entry(a.clone()).or_insert(0) += 1;
                *monthly.entry(b.clone()).or_insert(0) += 1;
                history.record(a, b, day.weekday_index());
                schedule.days.insert(day.date, DayAssignment::Pair(a.clone(), b.clone()));
            }
        }
    }

    info!(
        period = %schedule.month_key(),
        days = schedule.days.len(),
        agents = roster.len(),
        "month assigned"
    );

    Ok(MonthAssignment { schedule, monthly, history })
}
