use std::time::Duration;
use crate::error::Result;

/// Upper bound for any single outbound request (roster export, holiday API)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared client for outbound fetches, so a stalled server fails the request instead of hanging the run
pub fn client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("guard-rotation/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?)
}
