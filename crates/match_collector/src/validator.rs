//! Pure admission predicates: window resolution, player eligibility and
//! per-match anomaly screening.
//!
//! The anomaly rules are deliberate heuristics tuned against observed
//! data (early surrenders, AFK players, off-role picks); they trade some
//! false positives for an automated clean-up of the sample. Thresholds
//! are fixed and not meant to be re-tuned per patch.

use chrono::{Days, FixedOffset, NaiveDate, NaiveTime, Utc};
use match_structs::{MatchInfo, ParticipantInfo};

/// Minimum ranked games before a win rate is meaningful.
const MIN_TOTAL_GAMES: i32 = 30;

/// Eligible win-rate band, inclusive on both ends.
const MIN_WIN_RATE: f64 = 0.4;
const MAX_WIN_RATE: f64 = 0.6;

/// Matches shorter than this are early surrenders.
const MIN_DURATION_SECS: i64 = 20 * 60;

/// A participant who spent this little gold and lost was likely AFK.
const MIN_GOLD_SPENT: i64 = 2500;

/// Champion only played meaningfully in the UTILITY role.
const UTILITY_ONLY_CHAMPION: &str = "Yuumi";

/// Summoner spell id for Smite, required (and reserved) for junglers.
const SMITE_SPELL_ID: i32 = 11;

/// Feeding threshold.
const MAX_DEATHS_PER_MINUTE: f64 = 0.5;

/// Unix timestamp of midnight on `date` in the given timezone offset.
#[must_use]
pub fn local_midnight_timestamp(date: NaiveDate, offset_hours: f64) -> i64 {
    let offset = FixedOffset::east_opt((offset_hours * 3600.0) as i32)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(offset)
        .single()
        .map_or(0, |dt| dt.timestamp())
}

/// Resolves the active search window.
///
/// The start bound is midnight of `start_date` clamped up to the current
/// patch start (never search before the running patch), or the patch
/// start itself when no date is given. The end bound stays open (`None`,
/// meaning "now") when `end_date` is omitted.
#[must_use]
pub fn resolve_window(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    patch_start_ts: i64,
    offset_hours: f64,
) -> (i64, Option<i64>) {
    let start_ts = start_date.map_or(patch_start_ts, |date| {
        local_midnight_timestamp(date, offset_hours).max(patch_start_ts)
    });
    let end_ts = end_date.map(|date| local_midnight_timestamp(date, offset_hours));
    (start_ts, end_ts)
}

/// Yesterday-through-today window for daily-cadence runs, in the given
/// timezone offset.
#[must_use]
pub fn daily_window(offset_hours: f64) -> (NaiveDate, NaiveDate) {
    let offset = FixedOffset::east_opt((offset_hours * 3600.0) as i32)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
    let today = Utc::now().with_timezone(&offset).date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    (yesterday, today)
}

/// Whether a player's record qualifies them as a sample candidate:
/// enough games, and a win rate close enough to even that their matches
/// were competitive.
#[must_use]
pub fn has_proper_win_lose(wins: i32, losses: i32) -> bool {
    if wins < 0 || losses < 0 {
        return false;
    }
    let total = wins + losses;
    if total < MIN_TOTAL_GAMES {
        return false;
    }
    let win_rate = f64::from(wins) / f64::from(total);
    (MIN_WIN_RATE..=MAX_WIN_RATE).contains(&win_rate)
}

/// Whether a match shows any sign of not being a clean, seriously played
/// game. A single offending participant rejects the whole match.
#[must_use]
pub fn is_abnormal_match(info: &MatchInfo) -> bool {
    if info.duration < MIN_DURATION_SECS {
        return true;
    }
    info.participants
        .iter()
        .any(|p| is_abnormal_participant(p, info.duration))
}

fn is_abnormal_participant(p: &ParticipantInfo, duration_secs: i64) -> bool {
    if p.gold_spent <= MIN_GOLD_SPENT && !p.win {
        return true;
    }
    if p.champion_name == UTILITY_ONLY_CHAMPION && p.team_position != "UTILITY" {
        return true;
    }
    let has_smite = p.summoner1_id == SMITE_SPELL_ID || p.summoner2_id == SMITE_SPELL_ID;
    if p.team_position == "JUNGLE" {
        if !has_smite {
            return true;
        }
        if p.total_minions_killed > p.neutral_minions_killed {
            return true;
        }
    } else {
        if has_smite {
            return true;
        }
        if p.total_minions_killed < p.neutral_minions_killed {
            return true;
        }
    }
    let deaths_per_minute = f64::from(p.deaths) / (duration_secs as f64 / 60.0);
    deaths_per_minute >= MAX_DEATHS_PER_MINUTE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(position: &str) -> ParticipantInfo {
        let jungle = position == "JUNGLE";
        ParticipantInfo {
            puuid: "p".to_owned(),
            champion_name: "Ahri".to_owned(),
            team_position: position.to_owned(),
            summoner1_id: if jungle { SMITE_SPELL_ID } else { 4 },
            summoner2_id: 14,
            gold_spent: 11_000,
            total_minions_killed: if jungle { 12 } else { 180 },
            neutral_minions_killed: if jungle { 140 } else { 4 },
            kills: 4,
            deaths: 3,
            win: false,
        }
    }

    fn clean_match() -> MatchInfo {
        let positions = ["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY"];
        let participants = positions
            .iter()
            .chain(positions.iter())
            .map(|&position| participant(position))
            .collect();
        MatchInfo {
            game_id: 1,
            version: "12.23.480.100".to_owned(),
            creation: 0,
            duration: 1800,
            end_time: 0,
            participants,
        }
    }

    #[test]
    fn test_win_lose_eligibility() {
        assert!(has_proper_win_lose(40, 60));
        assert!(has_proper_win_lose(50, 50));
        assert!(has_proper_win_lose(60, 40));
        assert!(!has_proper_win_lose(70, 30));
        assert!(!has_proper_win_lose(10, 10));
        assert!(!has_proper_win_lose(-1, 40));
        // Exactly 30 games at exactly 40% sits on both inclusive bounds.
        assert!(has_proper_win_lose(12, 18));
    }

    #[test]
    fn test_duration_boundary() {
        let mut info = clean_match();
        info.duration = 1199;
        assert!(is_abnormal_match(&info));
        info.duration = 1200;
        assert!(!is_abnormal_match(&info));
    }

    #[test]
    fn test_afk_gold_rejection() {
        let mut info = clean_match();
        info.participants[0].gold_spent = 2500;
        assert!(is_abnormal_match(&info));
        // A winner with low gold is not flagged.
        info.participants[0].win = true;
        assert!(!is_abnormal_match(&info));
    }

    #[test]
    fn test_utility_only_champion() {
        let mut info = clean_match();
        info.participants[2].champion_name = UTILITY_ONLY_CHAMPION.to_owned();
        assert!(is_abnormal_match(&info));
        info.participants[2].team_position = "UTILITY".to_owned();
        info.participants[2].total_minions_killed = 20;
        assert!(!is_abnormal_match(&info));
    }

    #[test]
    fn test_jungle_heuristics() {
        // Jungler without Smite.
        let mut info = clean_match();
        info.participants[1].summoner1_id = 4;
        assert!(is_abnormal_match(&info));

        // Jungler farming lanes more than camps.
        let mut info = clean_match();
        info.participants[1].total_minions_killed = 200;
        assert!(is_abnormal_match(&info));

        // Laner carrying Smite.
        let mut info = clean_match();
        info.participants[0].summoner2_id = SMITE_SPELL_ID;
        assert!(is_abnormal_match(&info));

        // Laner with more camps than lane minions.
        let mut info = clean_match();
        info.participants[0].total_minions_killed = 3;
        assert!(is_abnormal_match(&info));
    }

    #[test]
    fn test_deaths_per_minute() {
        let mut info = clean_match();
        // 15 deaths over 30 minutes is exactly the 0.5 threshold.
        info.participants[3].deaths = 15;
        assert!(is_abnormal_match(&info));
        info.participants[3].deaths = 14;
        assert!(!is_abnormal_match(&info));
    }

    #[test]
    fn test_resolve_window() {
        let patch_start = 1_668_547_800; // 12.22, UTC+9
        let before_patch = NaiveDate::from_ymd_opt(2022, 11, 1).unwrap();
        let after_patch = NaiveDate::from_ymd_opt(2022, 11, 20).unwrap();

        // Explicit start before the patch is clamped up to it.
        let (start, end) = resolve_window(Some(before_patch), None, patch_start, 9.0);
        assert_eq!(start, patch_start);
        assert_eq!(end, None);

        // Explicit start after the patch stands as-is.
        let (start, _) = resolve_window(Some(after_patch), None, patch_start, 9.0);
        assert_eq!(start, local_midnight_timestamp(after_patch, 9.0));
        assert!(start > patch_start);

        // No start means the patch start.
        let (start, end) = resolve_window(None, Some(after_patch), patch_start, 9.0);
        assert_eq!(start, patch_start);
        assert_eq!(end, Some(local_midnight_timestamp(after_patch, 9.0)));
    }
}
