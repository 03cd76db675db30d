use super::history::FairnessHistory;
use super::types::{EligibleDay, MonthlyCounters};

/// Weight of the historical pair repetition count
pub const PAIR_WEIGHT: u64 = 1;
/// Weight of guards already assigned this month
pub const LOAD_WEIGHT: u64 = 10;
/// Weight of how often each agent already covered this weekday
pub const WEEKDAY_WEIGHT: u64 = 5;

/// Cost of assigning `a` and `b` together on `day`. Lower is better.
/// Monthly load dominates, weekday repetition comes second, pair repetition breaks near-ties.
pub fn score_pair(
    a: &str,
    b: &str,
    day: &EligibleDay,
    monthly: &MonthlyCounters,
    history: &FairnessHistory,
) -> u64 {
    let monthly_count = |agent: &str| u64::from(monthly.get(agent).copied().unwrap_or(0));
    let weekday = day.weekday_index();

    u64::from(history.pair_score(a, b)) * PAIR_WEIGHT
        + (monthly_count(a) + monthly_count(b)) * LOAD_WEIGHT
        + (u64::from(history.weekday_score(a, weekday)) + u64::from(history.weekday_score(b, weekday)))
            * WEEKDAY_WEIGHT
}
