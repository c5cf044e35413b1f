//! Wires one collection run together: window resolution, persisted
//! priority state, user sampling, then match sampling.

use std::cmp::Reverse;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::CONFIG;
use match_structs::TierGroup;
use riot_client::RiotApi;
use tracing::info;

use crate::match_sampler::{self, CandidateHeap};
use crate::session::CollectionSession;
use crate::storage::SaveStore;
use crate::user_sampler;
use crate::validator;

/// Entry point for collection runs over one tier band.
///
/// Storage is partitioned per (patch version, band); two collectors for
/// the same pair must not run concurrently.
pub struct MatchCollector {
    tier_group: TierGroup,
    version: String,
    save_root: PathBuf,
    timezone_offset: f64,
}

impl MatchCollector {
    /// Creates a collector for the current patch using the process
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no patch is live for the configured timezone.
    pub fn new(tier_group: TierGroup) -> Result<Self> {
        Self::with_settings(
            tier_group,
            CONFIG.save_file_root.clone(),
            CONFIG.timezone_offset_hours,
        )
    }

    /// Creates a collector with explicit storage root and timezone offset.
    ///
    /// # Errors
    ///
    /// Returns an error if no patch is live for the given timezone.
    pub fn with_settings(
        tier_group: TierGroup,
        save_root: PathBuf,
        timezone_offset: f64,
    ) -> Result<Self> {
        let version = match_structs::current_version(timezone_offset)
            .context("No live patch version found")?
            .to_owned();
        Ok(Self {
            tier_group,
            version,
            save_root,
            timezone_offset,
        })
    }

    /// The patch version this collector samples for.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Quota-sampled collection: `daily_quota` matches per day across the
    /// window, fairly spread over up to `user_count` sampled players.
    ///
    /// Daily-cadence runs (`daily = true`) use yesterday-through-today
    /// and ignore the explicit dates.
    ///
    /// # Errors
    ///
    /// Returns an error on persistence failure, unsupported bands, or
    /// ladder-listing failure.
    #[allow(clippy::too_many_arguments)]
    pub async fn collect_tier_match<A: RiotApi>(
        &self,
        api: &Arc<A>,
        daily_quota: usize,
        user_count: usize,
        daily: bool,
        renew: bool,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<()> {
        let (start_date, end_date) = self.effective_dates(daily, start_date, end_date);
        let days = match (start_date, end_date) {
            (Some(start), Some(end)) => (end - start).num_days().max(1),
            _ => 1,
        };
        let window = self.resolve_window(start_date, end_date)?;

        let mut session = self.open_session()?;
        let queue = user_sampler::sample_users(&mut session, api, user_count, renew).await?;

        // Every queued candidate gets a priority slot; past contributors
        // keep theirs from the persisted map.
        for puuid in &queue {
            session.priorities.entry(puuid.clone()).or_insert(0);
        }
        let mut candidates: CandidateHeap = session
            .priorities
            .iter()
            .map(|(puuid, &priority)| Reverse((priority, puuid.clone())))
            .collect();

        match_sampler::sample_matches(&mut session, api, daily_quota, window, &mut candidates, days)
            .await?;

        session.persist_priorities()?;
        info!("{}: collection run complete", self.tier_group);
        Ok(())
    }

    /// Exhaustive collection for apex bands: sweep every pooled player's
    /// history within the window.
    ///
    /// # Errors
    ///
    /// Returns an error on persistence failure, unsupported bands, or
    /// ladder-listing failure.
    pub async fn collect_all_match<A: RiotApi>(
        &self,
        api: &Arc<A>,
        daily: bool,
        renew: bool,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<()> {
        let (start_date, end_date) = self.effective_dates(daily, start_date, end_date);
        let window = self.resolve_window(start_date, end_date)?;

        let mut session = self.open_session()?;
        let candidates = user_sampler::collect_users(&mut session, api, renew).await?;
        match_sampler::sweep_matches(&mut session, api, window, &candidates).await?;

        info!("{}: sweep run complete", self.tier_group);
        Ok(())
    }

    fn effective_dates(
        &self,
        daily: bool,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> (Option<NaiveDate>, Option<NaiveDate>) {
        if daily {
            let (start, end) = validator::daily_window(self.timezone_offset);
            (Some(start), Some(end))
        } else {
            (start_date, end_date)
        }
    }

    fn resolve_window(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<(i64, Option<i64>)> {
        let patch_start =
            match_structs::patch_start_timestamp(&self.version, self.timezone_offset)
                .with_context(|| format!("Unknown patch version {}", self.version))?;
        Ok(validator::resolve_window(
            start_date,
            end_date,
            patch_start,
            self.timezone_offset,
        ))
    }

    fn open_session(&self) -> Result<CollectionSession> {
        let store = SaveStore::new(&self.save_root, &self.version, self.tier_group)?;
        CollectionSession::load(self.tier_group, self.version.clone(), store)
    }
}
