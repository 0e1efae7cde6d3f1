//! Ranked leaderboard storage
//!
//! Keeps the top runs sorted by distance (kills break ties). The JSON file
//! service persists the table next to the game for native play.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ScoreError, ScoreRecord, ScoreService};

/// Maximum number of records to keep
pub const MAX_ENTRIES: usize = 10;

/// Ordering of two records: better runs sort first
fn rank_order(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.distance
        .cmp(&a.distance)
        .then_with(|| b.kills.cmp(&a.kills))
}

/// Top-N leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeaderboardTable {
    pub entries: Vec<ScoreRecord>,
}

impl LeaderboardTable {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a record would make the table
    pub fn qualifies(&self, record: &ScoreRecord) -> bool {
        if record.distance == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries
            .last()
            .map(|last| rank_order(record, last) == Ordering::Less)
            .unwrap_or(true)
    }

    /// Get the rank a record would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, record: &ScoreRecord) -> Option<usize> {
        if !self.qualifies(record) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| rank_order(record, e) == Ordering::Less);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a record if it qualifies, returning the rank achieved
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        let rank = self.potential_rank(&record)?;
        self.entries.insert(rank - 1, record);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best distance on the board (if any)
    pub fn top_distance(&self) -> Option<u32> {
        self.entries.first().map(|e| e.distance)
    }
}

/// Score service backed by a JSON file on disk
#[derive(Debug)]
pub struct JsonFileScoreService {
    path: PathBuf,
    table: LeaderboardTable,
}

impl JsonFileScoreService {
    /// Open the store, starting fresh when the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        let path = path.as_ref().to_path_buf();
        let table = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No leaderboard at {}, starting fresh", path.display());
                LeaderboardTable::new()
            }
            Err(e) => return Err(e.into()),
        };
        log::info!(
            "Loaded {} leaderboard entries from {}",
            table.entries.len(),
            path.display()
        );
        Ok(Self { path, table })
    }

    pub fn table(&self) -> &LeaderboardTable {
        &self.table
    }

    /// Write through a temporary file so a crash never leaves a torn table
    fn save(&self, table: &LeaderboardTable) -> Result<(), ScoreError> {
        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreService for JsonFileScoreService {
    fn fetch_top(&mut self) -> Result<Vec<ScoreRecord>, ScoreError> {
        Ok(self.table.entries.clone())
    }

    /// The in-memory table only changes once the new one is on disk
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), ScoreError> {
        let mut updated = self.table.clone();
        match updated.add(record.clone()) {
            Some(rank) => {
                self.save(&updated)?;
                self.table = updated;
                log::info!("{} placed #{} on the leaderboard", record.name, rank);
                Ok(())
            }
            None => {
                log::info!("{} did not place on the leaderboard", record.name);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, distance: u32, kills: u32) -> ScoreRecord {
        ScoreRecord {
            name: name.to_string(),
            distance,
            kills,
            weapon_level: 1,
            squad_size: 1,
            sector: 1,
        }
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sector-runner-{}-{}.json",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn test_ranking_by_distance_then_kills() {
        let mut table = LeaderboardTable::new();
        assert_eq!(table.add(record("a", 500, 3)), Some(1));
        assert_eq!(table.add(record("b", 900, 1)), Some(1));
        assert_eq!(table.add(record("c", 500, 7)), Some(2));
        let names: Vec<&str> = table.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(table.top_distance(), Some(900));
    }

    #[test]
    fn test_zero_distance_never_qualifies() {
        let mut table = LeaderboardTable::new();
        assert_eq!(table.add(record("a", 0, 5)), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_table_truncates() {
        let mut table = LeaderboardTable::new();
        for i in 1..=MAX_ENTRIES as u32 {
            table.add(record("r", i * 100, 0));
        }
        assert_eq!(table.entries.len(), MAX_ENTRIES);
        assert!(!table.qualifies(&record("low", 50, 0)));
        assert_eq!(table.potential_rank(&record("mid", 550, 0)), Some(6));
        assert_eq!(table.add(record("top", 5000, 0)), Some(1));
        assert_eq!(table.entries.len(), MAX_ENTRIES);
        assert_eq!(table.entries.last().map(|e| e.distance), Some(200));
    }

    #[test]
    fn test_file_service_round_trip() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut service = JsonFileScoreService::open(&path).unwrap();
        assert!(service.fetch_top().unwrap().is_empty());
        service.submit(&record("ace", 812, 14)).unwrap();

        let mut reopened = JsonFileScoreService::open(&path).unwrap();
        let rows = reopened.fetch_top().unwrap();
        assert_eq!(rows, vec![record("ace", 812, 14)]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_save_leaves_table_unchanged() {
        let path = std::env::temp_dir()
            .join(format!("sector-runner-missing-{}", std::process::id()))
            .join("board.json");

        let mut service = JsonFileScoreService::open(&path).unwrap();
        assert!(matches!(
            service.submit(&record("ace", 812, 14)),
            Err(ScoreError::Io(_))
        ));
        assert!(service.submit(&record("ace", 812, 14)).is_err());
        assert!(service.fetch_top().unwrap().is_empty());
        assert!(service.table().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileScoreService::open(&path),
            Err(ScoreError::Json(_))
        ));
        let _ = fs::remove_file(&path);
    }
}
