use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};
use crate::error::Result;
use crate::io::atomic_write;

/// Separator between the two sorted names of a pair key
pub const PAIR_SEPARATOR: char = '|';

/// Order-independent key for a pair: the two names sorted, then joined
pub fn pair_key(a: &str, b: &str) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!("{}{}{}", first, PAIR_SEPARATOR, second)
}

/// Cross-run fairness counters. Values only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessHistory {
    #[serde(default)]
    pub pair_counts: BTreeMap<String, u32>,
    /// agent -> weekday index (Monday=0) -> count
    #[serde(default)]
    pub weekday_counts: BTreeMap<String, BTreeMap<String, u32>>,
}

impl FairnessHistory {
    pub fn pair_score(&self, a: &str, b: &str) -> u32 {
        self.pair_counts.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn weekday_score(&self, agent: &str, weekday: u8) -> u32 {
        self.weekday_counts
            .get(agent)
            .and_then(|days| days.get(&weekday.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Counts one assigned day for the pair
    pub fn record(&mut self, a: &str, b: &str, weekday: u8) {
        *self.pair_counts.entry(pair_key(a, b)).or_insert(0) += 1;
        for agent in [a, b] {
            *self
                .weekday_counts
                .entry(agent.to_string())
                .or_default()
                .entry(weekday.to_string())
                .or_insert(0) += 1;
        }
    }
}

/// JSON file holding the fairness history between runs
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted history. A missing or unreadable file yields an empty history.
    pub fn load(&self) -> FairnessHistory {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no fairness history yet, starting empty");
                return FairnessHistory::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read fairness history, starting empty");
                return FairnessHistory::default();
            }
        };

        match serde_json::from_str::<FairnessHistory>(&raw) {
            Ok(history) => {
                debug!(
                    pairs = history.pair_counts.len(),
                    agents = history.weekday_counts.len(),
                    "loaded fairness history"
                );
                history
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "fairness history is malformed, starting empty");
                FairnessHistory::default()
            }
        }
    }

    /// Replaces the persisted history with `history` in a single atomic write
    pub fn save(&self, history: &FairnessHistory) -> Result<()> {
        let json = serde_json::to_vec_pretty(history)?;
        atomic_write(&self.path, &json)?;
        info!(path = %self.path.display(), pairs = history.pair_counts.len(), "saved fairness history");
        Ok(())
    }
}
