//! Score persistence boundary
//!
//! The simulation never talks to the score service directly. Records and
//! fetch requests go through [`ScoreClient`], which runs the service on a
//! worker thread and only ever mutates the display list below.

mod client;
mod table;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::GameOverSummary;

pub use client::{ScoreClient, SubmitOutcome};
pub use table::{JsonFileScoreService, LeaderboardTable, MAX_ENTRIES};

/// Name used when the player leaves the field blank
pub const DEFAULT_PLAYER_NAME: &str = "Runner";
/// Shown when the leaderboard cannot be fetched
pub const FETCH_FAILED_MESSAGE: &str = "Leaderboard unavailable";
/// Shown when a score submission fails
pub const SUBMIT_FAILED_MESSAGE: &str = "Score save failed";

/// Errors raised by a score service or the client talking to it
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score data is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("score service rejected the request: {0}")]
    Rejected(String),
    #[error("score service did not answer in time")]
    Timeout,
    #[error("score service worker is gone")]
    Disconnected,
}

/// One leaderboard row, also the submit payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub name: String,
    pub distance: u32,
    pub kills: u32,
    pub weapon_level: u32,
    pub squad_size: u32,
    #[serde(default)]
    pub sector: u32,
}

impl ScoreRecord {
    /// Build the submit payload for a finished run
    pub fn from_summary(summary: &GameOverSummary, name: &str) -> Self {
        Self {
            name: normalize_name(name),
            distance: summary.distance,
            kills: summary.kills,
            weapon_level: summary.weapon_level,
            squad_size: summary.squad_size,
            sector: summary.sector,
        }
    }
}

impl std::fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}m / {} kills / W{} / S{}",
            self.name, self.distance, self.kills, self.weapon_level, self.squad_size
        )
    }
}

/// Trim a player-supplied name, falling back to the default
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// A record store reachable over some protocol.
///
/// Calls may block; the client only invokes them from its worker thread.
pub trait ScoreService: Send {
    /// Current top records, best first
    fn fetch_top(&mut self) -> Result<Vec<ScoreRecord>, ScoreError>;

    /// Store one record
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), ScoreError>;
}

/// What the leaderboard panel should show
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LeaderboardDisplay {
    #[default]
    Loading,
    Rows(Vec<ScoreRecord>),
    /// Static fallback text after a failure
    Message(&'static str),
}

impl LeaderboardDisplay {
    /// One text line per row (or the single message)
    pub fn lines(&self) -> Vec<String> {
        match self {
            LeaderboardDisplay::Loading => vec!["Loading...".to_string()],
            LeaderboardDisplay::Rows(rows) => rows.iter().map(ToString::to_string).collect(),
            LeaderboardDisplay::Message(message) => vec![(*message).to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_summary() {
        let summary = GameOverSummary {
            sector: 3,
            distance: 812,
            kills: 14,
            weapon_level: 2,
            squad_size: 2,
        };
        let record = ScoreRecord::from_summary(&summary, "  ace  ");
        assert_eq!(record.name, "ace");
        assert_eq!(record.distance, 812);
        assert_eq!(record.sector, 3);

        let record = ScoreRecord::from_summary(&summary, "   ");
        assert_eq!(record.name, "Runner");
    }

    #[test]
    fn test_record_wire_format() {
        let record = ScoreRecord {
            name: "ace".into(),
            distance: 812,
            kills: 14,
            weapon_level: 2,
            squad_size: 3,
            sector: 4,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["weaponLevel"], 2);
        assert_eq!(json["squadSize"], 3);

        // rows from the service may omit the sector
        let row: ScoreRecord = serde_json::from_str(
            r#"{"name":"b","distance":10,"kills":1,"weaponLevel":1,"squadSize":1}"#,
        )
        .unwrap();
        assert_eq!(row.sector, 0);
    }

    #[test]
    fn test_display_lines() {
        let rows = LeaderboardDisplay::Rows(vec![ScoreRecord {
            name: "ace".into(),
            distance: 812,
            kills: 14,
            weapon_level: 2,
            squad_size: 3,
            sector: 4,
        }]);
        assert_eq!(rows.lines(), vec!["ace - 812m / 14 kills / W2 / S3"]);
        assert_eq!(
            LeaderboardDisplay::Message(FETCH_FAILED_MESSAGE).lines(),
            vec!["Leaderboard unavailable"]
        );
    }
}
