//! File persistence for per-(version, band) collection state.
//!
//! Snapshots (pool, validity, priorities) are JSON objects replaced
//! atomically via a temp file and rename. Match logs are newline-delimited
//! id files, append-only, so a crashed run resumes without losing or
//! double-counting anything already on disk.

use std::collections::{HashMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use match_structs::{SummonerInfo, TierGroup};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Which append-only match log an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLog {
    /// Matches admitted into the sample
    Accepted,
    /// Matches rejected by validation or homogeneity checks
    Rejected,
}

impl MatchLog {
    const fn file_suffix(self) -> &'static str {
        match self {
            Self::Accepted => "match_list.txt",
            Self::Rejected => "invalid_match_list.txt",
        }
    }
}

/// Storage location for one (version, band) pair.
pub struct SaveStore {
    directory: PathBuf,
    band: TierGroup,
}

impl SaveStore {
    /// Opens (creating if needed) the store under `<root>/<version>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: &Path, version: &str, band: TierGroup) -> Result<Self> {
        let directory = root.join(version);
        std::fs::create_dir_all(&directory)
            .with_context(|| format!("Failed to create save directory {}", directory.display()))?;
        Ok(Self { directory, band })
    }

    fn path(&self, suffix: &str) -> PathBuf {
        self.directory.join(format!("{}_{suffix}", self.band))
    }

    /// Removes the pool and validity snapshots so a renew run starts from
    /// a fresh candidate pool. Match logs are never pruned.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot cannot be removed.
    pub fn discard_pool_snapshots(&self) -> Result<()> {
        for suffix in ["user_list.json", "user_validity.json"] {
            let path = self.path(suffix);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }

    /// Loads the candidate pool snapshot, or `None` if no snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    pub fn load_users(&self) -> Result<Option<HashMap<String, SummonerInfo>>> {
        self.load_snapshot("user_list.json")
    }

    /// Atomically overwrites the candidate pool snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on any write failure; these are fatal to the run.
    pub fn save_users(&self, users: &HashMap<String, SummonerInfo>) -> Result<()> {
        self.save_snapshot("user_list.json", users)
    }

    /// Loads the validity snapshot, or `None` if no snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    pub fn load_validity(&self) -> Result<Option<HashMap<String, bool>>> {
        self.load_snapshot("user_validity.json")
    }

    /// Atomically overwrites the validity snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on any write failure.
    pub fn save_validity(&self, validity: &HashMap<String, bool>) -> Result<()> {
        self.save_snapshot("user_validity.json", validity)
    }

    /// Loads the priority map, defaulting to empty when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load_priorities(&self) -> Result<HashMap<String, u32>> {
        Ok(self.load_snapshot("user_record.json")?.unwrap_or_default())
    }

    /// Rewrites the priority map in full.
    ///
    /// # Errors
    ///
    /// Returns an error on any write failure.
    pub fn save_priorities(&self, priorities: &HashMap<String, u32>) -> Result<()> {
        self.save_snapshot("user_record.json", priorities)
    }

    /// Loads every id already recorded in a match log.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn load_match_log(&self, log: MatchLog) -> Result<HashSet<String>> {
        let path = self.path(log.file_suffix());
        if !path.exists() {
            return Ok(HashSet::new());
        }
        let file =
            File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut ids = HashSet::new();
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
            if !line.is_empty() {
                ids.insert(line);
            }
        }
        Ok(ids)
    }

    /// Appends one match id to a log.
    ///
    /// # Errors
    ///
    /// Returns an error on any write failure; these are fatal to the run,
    /// and everything appended so far remains valid for resume.
    pub fn append_match(&self, log: MatchLog, match_id: &str) -> Result<()> {
        let path = self.path(log.file_suffix());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        writeln!(file, "{match_id}")
            .with_context(|| format!("Failed to append to {}", path.display()))?;
        Ok(())
    }

    fn load_snapshot<T: DeserializeOwned>(&self, suffix: &str) -> Result<Option<T>> {
        let path = self.path(suffix);
        if !path.exists() {
            return Ok(None);
        }
        let file =
            File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(value))
    }

    fn save_snapshot<T: Serialize>(&self, suffix: &str, value: &T) -> Result<()> {
        let path = self.path(suffix);
        let tmp_path = self.path(&format!("{suffix}.tmp"));
        let json = serde_json::to_vec(value).context("Failed to serialize snapshot")?;
        std::fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(puuid: &str, tier: &str, division: &str) -> SummonerInfo {
        SummonerInfo {
            puuid: puuid.to_owned(),
            summoner_id: format!("sid-{puuid}"),
            name: format!("name-{puuid}"),
            tier: tier.to_owned(),
            division: division.to_owned(),
            league_points: 10,
            wins: 50,
            losses: 48,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "12.23", TierGroup::GoldHigh).unwrap();

        let mut users = HashMap::new();
        users.insert("p1".to_owned(), record("p1", "GOLD", "I"));
        users.insert("p2".to_owned(), record("p2", "GOLD", "II"));
        let mut validity = HashMap::new();
        validity.insert("p1".to_owned(), true);
        validity.insert("p2".to_owned(), false);
        let mut priorities = HashMap::new();
        priorities.insert("p1".to_owned(), 3u32);
        priorities.insert("p2".to_owned(), 0u32);

        store.save_users(&users).unwrap();
        store.save_validity(&validity).unwrap();
        store.save_priorities(&priorities).unwrap();

        assert_eq!(store.load_users().unwrap().unwrap(), users);
        assert_eq!(store.load_validity().unwrap().unwrap(), validity);
        assert_eq!(store.load_priorities().unwrap(), priorities);
    }

    #[test]
    fn test_missing_snapshots_are_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "12.23", TierGroup::IronLow).unwrap();
        assert!(store.load_users().unwrap().is_none());
        assert!(store.load_validity().unwrap().is_none());
        assert!(store.load_priorities().unwrap().is_empty());
        assert!(store.load_match_log(MatchLog::Accepted).unwrap().is_empty());
    }

    #[test]
    fn test_match_log_append_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "12.23", TierGroup::GoldHigh).unwrap();

        store.append_match(MatchLog::Accepted, "KR_1").unwrap();
        store.append_match(MatchLog::Accepted, "KR_2").unwrap();
        store.append_match(MatchLog::Rejected, "KR_3").unwrap();

        let accepted = store.load_match_log(MatchLog::Accepted).unwrap();
        assert_eq!(accepted.len(), 2);
        assert!(accepted.contains("KR_1"));
        assert!(accepted.contains("KR_2"));

        let rejected = store.load_match_log(MatchLog::Rejected).unwrap();
        assert_eq!(rejected.len(), 1);
        assert!(rejected.contains("KR_3"));
    }

    #[test]
    fn test_discard_pool_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path(), "12.23", TierGroup::GoldHigh).unwrap();

        store.save_users(&HashMap::new()).unwrap();
        store.save_validity(&HashMap::new()).unwrap();
        store.append_match(MatchLog::Accepted, "KR_1").unwrap();
        store.discard_pool_snapshots().unwrap();

        assert!(store.load_users().unwrap().is_none());
        assert!(store.load_validity().unwrap().is_none());
        // Match logs survive a renew.
        assert_eq!(store.load_match_log(MatchLog::Accepted).unwrap().len(), 1);
    }
}
