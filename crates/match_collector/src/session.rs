//! Per-run collection state.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use match_structs::{SummonerInfo, TierGroup};

use crate::storage::{MatchLog, SaveStore};

/// All mutable state of one collection run for one (version, band) pair.
///
/// Owned by the coordinating task for the duration of the run and dropped
/// when it ends; workers only ever hand results back to the owner. The
/// accepted/rejected sets are pre-seeded from the persisted logs so a
/// resumed run never re-evaluates a match it has already settled.
///
/// Two concurrent sessions over the same storage would interleave the
/// append-only logs; runs against the same (version, band) must not
/// overlap.
pub struct CollectionSession {
    /// Band this run samples for
    pub tier_group: TierGroup,

    /// Patch version prefix every accepted match must carry
    pub version: String,

    /// Backing files for this (version, band)
    pub store: SaveStore,

    /// Candidate pool, keyed by puuid
    pub users: HashMap<String, SummonerInfo>,

    /// Win-rate eligibility per pooled player
    pub validity: HashMap<String, bool>,

    /// Accepted-match count per player, used as fairness priority
    pub priorities: HashMap<String, u32>,

    /// Matches admitted into the sample
    pub accepted: HashSet<String>,

    /// Matches rejected by validation or homogeneity checks
    pub rejected: HashSet<String>,

    users_initialized: bool,
    validity_initialized: bool,
}

impl CollectionSession {
    /// Loads a session from the store, resuming whatever a previous run
    /// persisted there.
    ///
    /// # Errors
    ///
    /// Returns an error if any persisted file cannot be read.
    pub fn load(tier_group: TierGroup, version: String, store: SaveStore) -> Result<Self> {
        let users = store.load_users()?;
        let validity = store.load_validity()?;
        let priorities = store.load_priorities()?;
        let accepted = store.load_match_log(MatchLog::Accepted)?;
        let rejected = store.load_match_log(MatchLog::Rejected)?;

        Ok(Self {
            tier_group,
            version,
            store,
            users_initialized: users.is_some(),
            validity_initialized: validity.is_some(),
            users: users.unwrap_or_default(),
            validity: validity.unwrap_or_default(),
            priorities,
            accepted,
            rejected,
        })
    }

    /// Whether a pool snapshot existed on disk when this session loaded.
    #[must_use]
    pub const fn users_initialized(&self) -> bool {
        self.users_initialized
    }

    /// Whether a validity snapshot existed on disk when this session loaded.
    #[must_use]
    pub const fn validity_initialized(&self) -> bool {
        self.validity_initialized
    }

    /// Drops the cached pool so the next sampling pass rebuilds it from
    /// the ladder.
    ///
    /// # Errors
    ///
    /// Returns an error if the stale snapshots cannot be removed.
    pub fn renew_pool(&mut self) -> Result<()> {
        self.store.discard_pool_snapshots()?;
        self.users.clear();
        self.validity.clear();
        self.users_initialized = false;
        self.validity_initialized = false;
        Ok(())
    }

    /// Persists the pool and validity snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error on any write failure; these abort the run.
    pub fn persist_pool(&mut self) -> Result<()> {
        self.store.save_users(&self.users)?;
        self.store.save_validity(&self.validity)?;
        self.users_initialized = true;
        self.validity_initialized = true;
        Ok(())
    }

    /// Rewrites the priority map in full.
    ///
    /// # Errors
    ///
    /// Returns an error on any write failure.
    pub fn persist_priorities(&self) -> Result<()> {
        self.store.save_priorities(&self.priorities)
    }

    /// Admits a match: in-memory set plus append-only log.
    ///
    /// # Errors
    ///
    /// Returns an error on any write failure.
    pub fn record_accepted(&mut self, match_id: &str) -> Result<()> {
        if self.accepted.insert(match_id.to_owned()) {
            self.store.append_match(MatchLog::Accepted, match_id)?;
        }
        Ok(())
    }

    /// Rejects a match: in-memory set plus append-only log.
    ///
    /// # Errors
    ///
    /// Returns an error on any write failure.
    pub fn record_rejected(&mut self, match_id: &str) -> Result<()> {
        if self.rejected.insert(match_id.to_owned()) {
            self.store.append_match(MatchLog::Rejected, match_id)?;
        }
        Ok(())
    }

    /// Whether a match id has already been settled either way.
    #[must_use]
    pub fn is_settled(&self, match_id: &str) -> bool {
        self.accepted.contains(match_id) || self.rejected.contains(match_id)
    }
}
