use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("not enough active agents: need at least 2, found {0}")]
    NotEnoughAgents(usize),

    #[error("invalid period {year}-{month:02}")]
    InvalidPeriod { year: i32, month: u32 },

    #[error("invalid month key '{0}': expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("roster source unavailable: {0}")]
    Roster(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
