pub mod types;
pub mod calendar;
pub mod history;
pub mod scorer;
pub mod pool;
pub mod engine;

pub use types::{Agent, HolidaySet, MonthSchedule};
pub use calendar::{month_days, next_month};
pub use history::HistoryStore;
pub use engine::{assign_month, MonthAssignment};
