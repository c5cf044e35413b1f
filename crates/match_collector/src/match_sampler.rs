//! The fairness-and-quota engine over per-player match histories.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::Arc;

use anyhow::Result;
use match_structs::TierGroup;
use riot_client::RiotApi;
use tracing::{debug, info, warn};

use crate::fanout;
use crate::session::CollectionSession;
use crate::validator::{has_proper_win_lose, is_abnormal_match};

/// Cap on matches one player may contribute in a single pass.
pub const MAX_GAME_PER_USER: usize = 3;

/// Page size for quota sampling (one page per candidate per pass).
const QUOTA_PAGE_SIZE: u32 = 50;

/// Page size for exhaustive sweeps.
const SWEEP_PAGE_SIZE: u32 = 100;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Min-heap of (accepted-match count, puuid): players with fewer accepted
/// matches are searched first.
pub type CandidateHeap = BinaryHeap<Reverse<(u32, String)>>;

/// Quota-samples matches until `daily_quota * days` new matches are
/// accepted or the candidate heap runs dry.
///
/// Candidates are popped lowest-priority first, enforcing round-robin
/// fairness over player histories rather than exhausting one player
/// before moving on. Whenever a day's quota fills, the window advances
/// one day and the day counter resets. Every match id settles exactly
/// once: already-settled ids are never re-fetched, detail-fetch failures
/// stay unsettled for a later pass.
///
/// # Errors
///
/// Returns an error only on storage write failure; upstream call
/// failures degrade to skips.
pub async fn sample_matches<A: RiotApi>(
    session: &mut CollectionSession,
    api: &Arc<A>,
    daily_quota: usize,
    window: (i64, Option<i64>),
    candidates: &mut CandidateHeap,
    days: i64,
) -> Result<()> {
    let (mut start_ts, mut end_ts) = window;
    let target = daily_quota * usize::try_from(days.max(1)).unwrap_or(1) + session.accepted.len();
    let mut collected_today = 0usize;

    info!(
        "{}: sampling up to {} new matches ({daily_quota}/day over {days} day(s))",
        session.tier_group,
        target - session.accepted.len()
    );

    while session.accepted.len() < target {
        let Some(Reverse((priority, puuid))) = candidates.pop() else {
            break;
        };
        debug!("Searching {puuid} (priority {priority})");

        if collected_today >= daily_quota {
            start_ts += SECONDS_PER_DAY;
            end_ts = end_ts.map(|ts| ts + SECONDS_PER_DAY);
            collected_today = 0;
        }

        let match_ids = match api
            .recent_match_ids(&puuid, 0, QUOTA_PAGE_SIZE, Some(start_ts), end_ts)
            .await
        {
            Ok(ids) => ids,
            Err(error) => {
                warn!("Skipping history of {puuid}: {error:#}");
                continue;
            }
        };

        let mut games_from_user = 0usize;
        for match_id in match_ids {
            if session.accepted.len() >= target
                || collected_today >= daily_quota
                || games_from_user >= MAX_GAME_PER_USER
            {
                break;
            }
            if session.is_settled(&match_id) {
                continue;
            }

            let detail = match api.match_detail(&match_id).await {
                Ok(detail) => detail,
                Err(error) => {
                    // Not settled either way, so a later pass retries it.
                    debug!("Skipping {match_id}: {error:#}");
                    continue;
                }
            };

            if !detail.version.starts_with(&session.version) {
                // Histories are newest-first; everything further down is
                // from an older patch.
                session.record_rejected(&match_id)?;
                break;
            }

            if is_abnormal_match(&detail) {
                session.record_rejected(&match_id)?;
                continue;
            }

            let puuids: Vec<String> =
                detail.participant_puuids().into_iter().map(str::to_owned).collect();
            if puuids.len() < 10 || puuids.iter().any(|p| p.is_empty() || p == "BOT") {
                warn!("Invalid roster in match {match_id}");
                session.record_rejected(&match_id)?;
                continue;
            }

            discover_participants(session, api, &puuids, candidates).await?;

            if is_match_qualified(session, &puuids) {
                session.record_accepted(&match_id)?;
                *session.priorities.entry(puuid.clone()).or_insert(0) += 1;
                games_from_user += 1;
                collected_today += 1;
            } else {
                session.record_rejected(&match_id)?;
            }
        }
    }

    info!("{}: accepted set now holds {} matches", session.tier_group, session.accepted.len());
    Ok(())
}

/// Exhaustively sweeps every candidate's history within the window.
///
/// Used for apex bands, whose small pools are definitionally homogeneous:
/// only dedup, version and anomaly rejection apply, and there is no quota
/// or priority bookkeeping.
///
/// # Errors
///
/// Returns an error only on storage write failure.
pub async fn sweep_matches<A: RiotApi>(
    session: &mut CollectionSession,
    api: &Arc<A>,
    window: (i64, Option<i64>),
    candidates: &VecDeque<String>,
) -> Result<()> {
    let (start_ts, end_ts) = window;

    for puuid in candidates {
        let mut skip = 0u32;
        'player: loop {
            let match_ids = match api
                .recent_match_ids(puuid, skip, SWEEP_PAGE_SIZE, Some(start_ts), end_ts)
                .await
            {
                Ok(ids) => ids,
                Err(error) => {
                    warn!("Skipping history of {puuid}: {error:#}");
                    break;
                }
            };
            let full_page = match_ids.len() as u32 == SWEEP_PAGE_SIZE;
            skip += SWEEP_PAGE_SIZE;

            for match_id in match_ids {
                if session.is_settled(&match_id) {
                    continue;
                }
                let detail = match api.match_detail(&match_id).await {
                    Ok(detail) => detail,
                    Err(error) => {
                        debug!("Skipping {match_id}: {error:#}");
                        continue;
                    }
                };
                if !detail.version.starts_with(&session.version) {
                    session.record_rejected(&match_id)?;
                    break 'player;
                }
                if is_abnormal_match(&detail) {
                    session.record_rejected(&match_id)?;
                } else {
                    session.record_accepted(&match_id)?;
                }
            }

            if !full_page {
                break;
            }
        }
    }

    info!("{}: accepted set now holds {} matches", session.tier_group, session.accepted.len());
    Ok(())
}

/// Resolves roster members not yet on record through the bounded fan-out.
/// Eligible players landing in the target band join the heap at priority
/// 0 so they are searched next.
async fn discover_participants<A: RiotApi>(
    session: &mut CollectionSession,
    api: &Arc<A>,
    puuids: &[String],
    candidates: &mut CandidateHeap,
) -> Result<()> {
    let unknown: Vec<String> = puuids
        .iter()
        .filter(|puuid| !session.users.contains_key(*puuid))
        .cloned()
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }

    for record in fanout::fetch_records(api, unknown).await? {
        let valid = has_proper_win_lose(record.wins, record.losses);
        let in_band = record.tier_group() == session.tier_group;
        let puuid = record.puuid.clone();

        session.validity.insert(puuid.clone(), valid);
        session.users.insert(puuid.clone(), record);

        if valid && in_band {
            debug!("Discovered eligible player {puuid}");
            session.priorities.entry(puuid.clone()).or_insert(0);
            candidates.push(Reverse((0, puuid)));
        }
    }
    Ok(())
}

/// The tier-homogeneity gate.
///
/// Admits a match only when every participant already found ineligible is
/// absent (players not yet on record do not disqualify), every
/// participant's rank number sits inside the band's adjacency window, and
/// the two players straddling the median classify exactly into the target
/// band. A roster member with no record counts as unranked and therefore
/// fails adjacency.
fn is_match_qualified(session: &CollectionSession, puuids: &[String]) -> bool {
    let all_eligible = puuids
        .iter()
        .filter_map(|puuid| session.validity.get(puuid))
        .all(|&valid| valid);
    if !all_eligible {
        debug!("Roster contains an ineligible player");
        return false;
    }

    let mut rank_numbers: Vec<u8> = puuids
        .iter()
        .map(|puuid| session.users.get(puuid).map_or(0, match_structs::SummonerInfo::rank_number))
        .collect();
    rank_numbers.sort_unstable();

    if rank_numbers.len() < 10 {
        return false;
    }
    let all_adjacent = rank_numbers.iter().all(|&n| session.tier_group.is_adjacent(n));
    let median_in_group = TierGroup::from_rank_number(rank_numbers[4]) == session.tier_group
        && TierGroup::from_rank_number(rank_numbers[5]) == session.tier_group;

    all_adjacent && median_in_group
}
