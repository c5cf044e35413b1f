//! Candidate-pool construction for one (band, version) run.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use match_structs::{Division, LadderSource, Tier};
use riot_client::{LeagueEntry, RiotApi};
use tracing::{debug, info};

use crate::fanout;
use crate::session::CollectionSession;
use crate::validator::has_proper_win_lose;

/// Pool size used when sweep mode builds a division-band pool without an
/// explicit request.
const DEFAULT_POOL_SIZE: usize = 408;

/// Builds or refreshes the eligible candidate queue for quota sampling.
///
/// When a cached pool and validity snapshot already cover `user_count`
/// players and the caller did not ask for renewal, the cached eligible
/// ids are reused without any network calls. Otherwise the band's ladder
/// listings are fetched, every entry is resolved to a stable id through
/// the bounded fan-out, eligibility is computed, and both snapshots are
/// persisted.
///
/// Requesting zero players returns an empty queue without touching the
/// network.
///
/// # Errors
///
/// Returns an error on ladder-listing failure, unsupported bands, or
/// snapshot write failure. Individual player resolutions that fail are
/// dropped, not errors.
pub async fn sample_users<A: RiotApi>(
    session: &mut CollectionSession,
    api: &Arc<A>,
    user_count: usize,
    renew: bool,
) -> Result<VecDeque<String>> {
    if user_count == 0 {
        return Ok(VecDeque::new());
    }

    if renew {
        session.renew_pool()?;
    } else if session.validity_initialized() && session.users.len() >= user_count {
        info!(
            "Reusing cached pool of {} players for {}",
            session.users.len(),
            session.tier_group
        );
        return Ok(eligible_queue(session));
    }

    info!("'{}' user sampling ({user_count} requested)", session.tier_group);

    let entries = ladder_entries(api.as_ref(), session, user_count).await?;
    let records = fanout::resolve_entries(api, entries).await?;

    let mut queue = VecDeque::new();
    for record in records {
        let valid = has_proper_win_lose(record.wins, record.losses);
        session.validity.insert(record.puuid.clone(), valid);
        if valid {
            queue.push_back(record.puuid.clone());
        }
        session.users.insert(record.puuid.clone(), record);
    }

    session.persist_pool()?;
    info!(
        "Sampled {} players for {}, {} eligible",
        session.users.len(),
        session.tier_group,
        queue.len()
    );
    Ok(queue)
}

/// Builds the full candidate queue for an exhaustive sweep: every pooled
/// player, no eligibility gate.
///
/// # Errors
///
/// Returns an error on ladder-listing or snapshot write failure.
pub async fn collect_users<A: RiotApi>(
    session: &mut CollectionSession,
    api: &Arc<A>,
    renew: bool,
) -> Result<VecDeque<String>> {
    if renew {
        session.renew_pool()?;
    } else if session.users_initialized() {
        info!(
            "Reusing cached pool of {} players for {}",
            session.users.len(),
            session.tier_group
        );
        return Ok(session.users.keys().cloned().collect());
    }

    info!("ALL '{}' user collecting", session.tier_group);

    let entries = ladder_entries(api.as_ref(), session, DEFAULT_POOL_SIZE).await?;
    let records = fanout::resolve_entries(api, entries).await?;
    for record in records {
        session.users.insert(record.puuid.clone(), record);
    }

    session.store.save_users(&session.users)?;
    Ok(session.users.keys().cloned().collect())
}

fn eligible_queue(session: &CollectionSession) -> VecDeque<String> {
    session
        .validity
        .iter()
        .filter(|&(_, &valid)| valid)
        .map(|(puuid, _)| puuid.clone())
        .collect()
}

/// Fetches the ladder listings behind a band's pool, deduplicated by
/// summoner id. Sub-tier bands split the request roughly evenly between
/// their two divisions, remainder to the first; apex bands take their
/// whole listing(s).
async fn ladder_entries<A: RiotApi>(
    api: &A,
    session: &CollectionSession,
    user_count: usize,
) -> Result<Vec<LeagueEntry>> {
    let mut entries = Vec::new();
    match session.tier_group.ladder_sources()? {
        LadderSource::ApexLeagues(tiers) => {
            for tier in tiers {
                entries.extend(api.apex_league(tier).await?);
            }
        }
        LadderSource::Divisions(tier, [first, second]) => {
            let first_count = user_count - user_count / 2;
            entries.extend(division_entries(api, tier, first, first_count).await?);
            entries.extend(division_entries(api, tier, second, user_count / 2).await?);
        }
    }

    let mut seen = std::collections::HashSet::new();
    entries.retain(|entry| seen.insert(entry.summoner_id.clone()));
    Ok(entries)
}

/// Pages through one division's listing until enough unique entries are
/// collected or the ladder runs out.
async fn division_entries<A: RiotApi>(
    api: &A,
    tier: Tier,
    division: Division,
    user_count: usize,
) -> Result<Vec<LeagueEntry>> {
    let mut entries: Vec<LeagueEntry> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut page = 1u32;

    while entries.len() < user_count {
        let batch = api.league_entries(tier, division, page).await?;
        if batch.is_empty() {
            debug!("Ladder {tier} {division} exhausted at page {page}");
            break;
        }
        for entry in batch {
            if seen.insert(entry.summoner_id.clone()) {
                entries.push(entry);
            }
        }
        page += 1;
    }

    entries.truncate(user_count);
    Ok(entries)
}
