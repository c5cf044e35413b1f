//! Ranked-ladder tier definitions and the total order over them.
//!
//! This module provides the tier/division enums, the rank-number mapping
//! used everywhere else, and the sampling buckets (`TierGroup`) the
//! collection engine partitions the ladder into.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors produced when classifying upstream rank strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    /// The tier string is not one of the known ladder tiers.
    #[error("invalid tier: {0}")]
    InvalidTier(String),

    /// The division string is not I, II, III or IV.
    #[error("invalid division: {0}")]
    InvalidDivision(String),

    /// The tier group has no ladder listing behind it.
    #[error("tier group {0} has no ladder mapping")]
    UnsupportedBand(TierGroup),
}

/// A ladder tier as reported by the upstream API (UPPERCASE strings).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    /// Base rank number of the tier's highest division.
    #[must_use]
    pub const fn base_rank_number(self) -> u8 {
        match self {
            Self::Iron => 4,
            Self::Bronze => 8,
            Self::Silver => 12,
            Self::Gold => 16,
            Self::Platinum => 20,
            Self::Diamond => 24,
            Self::Master => 25,
            Self::Grandmaster => 26,
            Self::Challenger => 27,
        }
    }

    /// Whether the tier has no sub-division structure.
    #[must_use]
    pub const fn is_apex(self) -> bool {
        matches!(self, Self::Master | Self::Grandmaster | Self::Challenger)
    }
}

/// A ladder division within a tier (I is highest).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Division {
    I,
    II,
    III,
    IV,
}

impl Division {
    /// Offset subtracted from the tier base (I:0, II:1, III:2, IV:3).
    #[must_use]
    pub const fn offset(self) -> u8 {
        match self {
            Self::I => 0,
            Self::II => 1,
            Self::III => 2,
            Self::IV => 3,
        }
    }
}

/// Maps a (tier, division) pair to the total order over skill.
///
/// Apex tiers carry no division, so the division argument is ignored for
/// Master and above. Higher number means higher or equal skill; 0 is
/// reserved for unranked.
#[must_use]
pub fn rank_number(tier: Tier, division: Division) -> u8 {
    let base = tier.base_rank_number();
    if tier.is_apex() {
        base
    } else {
        base - division.offset()
    }
}

/// String-level entry point for [`rank_number`].
///
/// Blank tier and division together mean unranked (0). Anything else
/// outside the known enumerations is an error, so callers cannot feed
/// unvalidated upstream strings further down.
///
/// # Errors
///
/// Returns [`RankError::InvalidTier`] or [`RankError::InvalidDivision`].
pub fn rank_number_str(tier: &str, division: &str) -> Result<u8, RankError> {
    if tier.is_empty() && division.is_empty() {
        return Ok(0);
    }
    let tier = Tier::from_str(tier).map_err(|_| RankError::InvalidTier(tier.to_owned()))?;
    if tier.is_apex() {
        return Ok(tier.base_rank_number());
    }
    let division =
        Division::from_str(division).map_err(|_| RankError::InvalidDivision(division.to_owned()))?;
    Ok(rank_number(tier, division))
}

/// A sampling bucket grouping two adjacent divisions (or one apex tier).
///
/// `Low` covers divisions IV–III, `High` covers II–I. `Apex` is the
/// Grandmaster + Challenger union used for exhaustive sweeps; `Unranked`
/// is a sentinel that never admits anything.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum TierGroup {
    IronLow,
    IronHigh,
    BronzeLow,
    BronzeHigh,
    SilverLow,
    SilverHigh,
    GoldLow,
    GoldHigh,
    PlatinumLow,
    PlatinumHigh,
    DiamondLow,
    DiamondHigh,
    Master,
    Grandmaster,
    Challenger,
    Apex,
    Unranked,
}

/// Which ladder listings feed a tier group's candidate pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LadderSource {
    /// Paginated league-entry listings for two divisions of one tier.
    Divisions(Tier, [Division; 2]),

    /// Unpaginated apex league listings, concatenated in order.
    ApexLeagues(Vec<Tier>),
}

impl TierGroup {
    /// Classifies a rank number into its tier group.
    ///
    /// Inverse partition of [`rank_number`]: inclusive upper bounds
    /// evaluated in order, apex tiers matched exactly.
    #[must_use]
    pub fn from_rank_number(rank_number: u8) -> Self {
        match rank_number {
            0 => Self::Unranked,
            1..=2 => Self::IronLow,
            3..=4 => Self::IronHigh,
            5..=6 => Self::BronzeLow,
            7..=8 => Self::BronzeHigh,
            9..=10 => Self::SilverLow,
            11..=12 => Self::SilverHigh,
            13..=14 => Self::GoldLow,
            15..=16 => Self::GoldHigh,
            17..=18 => Self::PlatinumLow,
            19..=20 => Self::PlatinumHigh,
            21..=22 => Self::DiamondLow,
            23..=24 => Self::DiamondHigh,
            25 => Self::Master,
            26 => Self::Grandmaster,
            27 => Self::Challenger,
            _ => Self::Unranked,
        }
    }

    /// Classifies upstream tier/division strings into a tier group.
    ///
    /// # Errors
    ///
    /// Returns [`RankError`] for strings outside the known enumerations.
    pub fn classify(tier: &str, division: &str) -> Result<Self, RankError> {
        Ok(Self::from_rank_number(rank_number_str(tier, division)?))
    }

    /// The half-open rank-number window considered close enough to this
    /// group to admit a player into its sample.
    ///
    /// `Apex` and `Unranked` have no window.
    #[must_use]
    pub const fn adjacent_window(self) -> Option<(u8, u8)> {
        match self {
            Self::IronLow => Some((1, 4)),
            Self::IronHigh => Some((2, 6)),
            Self::BronzeLow => Some((4, 8)),
            Self::BronzeHigh => Some((6, 10)),
            Self::SilverLow => Some((8, 12)),
            Self::SilverHigh => Some((10, 14)),
            Self::GoldLow => Some((12, 16)),
            Self::GoldHigh => Some((14, 18)),
            Self::PlatinumLow => Some((16, 20)),
            Self::PlatinumHigh => Some((18, 22)),
            Self::DiamondLow => Some((20, 24)),
            Self::DiamondHigh => Some((22, 26)),
            Self::Master => Some((24, 28)),
            Self::Grandmaster => Some((25, 28)),
            Self::Challenger => Some((25, 28)),
            Self::Apex | Self::Unranked => None,
        }
    }

    /// Whether a rank number falls inside this group's adjacency window.
    #[must_use]
    pub fn is_adjacent(self, rank_number: u8) -> bool {
        self.adjacent_window()
            .is_some_and(|(low, high)| (low..high).contains(&rank_number))
    }

    /// The ladder listings behind this group's candidate pool.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::UnsupportedBand`] for `Unranked`, which has no
    /// listing behind it.
    pub fn ladder_sources(self) -> Result<LadderSource, RankError> {
        match self {
            Self::IronLow => Ok(LadderSource::Divisions(Tier::Iron, [Division::III, Division::IV])),
            Self::IronHigh => Ok(LadderSource::Divisions(Tier::Iron, [Division::I, Division::II])),
            Self::BronzeLow => {
                Ok(LadderSource::Divisions(Tier::Bronze, [Division::III, Division::IV]))
            }
            Self::BronzeHigh => {
                Ok(LadderSource::Divisions(Tier::Bronze, [Division::I, Division::II]))
            }
            Self::SilverLow => {
                Ok(LadderSource::Divisions(Tier::Silver, [Division::III, Division::IV]))
            }
            Self::SilverHigh => {
                Ok(LadderSource::Divisions(Tier::Silver, [Division::I, Division::II]))
            }
            Self::GoldLow => Ok(LadderSource::Divisions(Tier::Gold, [Division::III, Division::IV])),
            Self::GoldHigh => Ok(LadderSource::Divisions(Tier::Gold, [Division::I, Division::II])),
            Self::PlatinumLow => {
                Ok(LadderSource::Divisions(Tier::Platinum, [Division::III, Division::IV]))
            }
            Self::PlatinumHigh => {
                Ok(LadderSource::Divisions(Tier::Platinum, [Division::I, Division::II]))
            }
            Self::DiamondLow => {
                Ok(LadderSource::Divisions(Tier::Diamond, [Division::III, Division::IV]))
            }
            Self::DiamondHigh => {
                Ok(LadderSource::Divisions(Tier::Diamond, [Division::I, Division::II]))
            }
            Self::Master => Ok(LadderSource::ApexLeagues(vec![Tier::Master])),
            Self::Grandmaster => Ok(LadderSource::ApexLeagues(vec![Tier::Grandmaster])),
            Self::Challenger => Ok(LadderSource::ApexLeagues(vec![Tier::Challenger])),
            Self::Apex => Ok(LadderSource::ApexLeagues(vec![Tier::Challenger, Tier::Grandmaster])),
            Self::Unranked => Err(RankError::UnsupportedBand(self)),
        }
    }

    /// Whether this group is searched exhaustively rather than quota-sampled.
    #[must_use]
    pub const fn is_apex_group(self) -> bool {
        matches!(self, Self::Master | Self::Grandmaster | Self::Challenger | Self::Apex)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_rank_number_table() {
        assert_eq!(rank_number_str("IRON", "IV").unwrap(), 1);
        assert_eq!(rank_number_str("IRON", "I").unwrap(), 4);
        assert_eq!(rank_number_str("GOLD", "I").unwrap(), 16);
        assert_eq!(rank_number_str("GOLD", "IV").unwrap(), 13);
        assert_eq!(rank_number_str("DIAMOND", "I").unwrap(), 24);
        assert_eq!(rank_number_str("MASTER", "I").unwrap(), 25);
        assert_eq!(rank_number_str("GRANDMASTER", "I").unwrap(), 26);
        assert_eq!(rank_number_str("CHALLENGER", "I").unwrap(), 27);
        assert_eq!(rank_number_str("", "").unwrap(), 0);
    }

    #[test]
    fn test_rank_number_monotonic_with_skill() {
        let divisions = [Division::IV, Division::III, Division::II, Division::I];
        let mut previous = 0u8;
        for tier in Tier::iter() {
            if tier.is_apex() {
                let n = rank_number(tier, Division::I);
                assert!(n > previous, "{tier} should rank above {previous}");
                previous = n;
                continue;
            }
            for division in divisions {
                let n = rank_number(tier, division);
                assert!(n > previous, "{tier} {division} should rank above {previous}");
                previous = n;
            }
        }
    }

    #[test]
    fn test_invalid_strings_rejected() {
        assert_eq!(
            rank_number_str("WOOD", "I"),
            Err(RankError::InvalidTier("WOOD".to_owned()))
        );
        assert_eq!(
            rank_number_str("GOLD", "V"),
            Err(RankError::InvalidDivision("V".to_owned()))
        );
    }

    #[test]
    fn test_classify_is_inverse_partition() {
        assert_eq!(TierGroup::from_rank_number(0), TierGroup::Unranked);
        assert_eq!(TierGroup::from_rank_number(1), TierGroup::IronLow);
        assert_eq!(TierGroup::from_rank_number(2), TierGroup::IronLow);
        assert_eq!(TierGroup::from_rank_number(3), TierGroup::IronHigh);
        assert_eq!(TierGroup::from_rank_number(16), TierGroup::GoldHigh);
        assert_eq!(TierGroup::from_rank_number(24), TierGroup::DiamondHigh);
        assert_eq!(TierGroup::from_rank_number(25), TierGroup::Master);
        assert_eq!(TierGroup::from_rank_number(26), TierGroup::Grandmaster);
        assert_eq!(TierGroup::from_rank_number(27), TierGroup::Challenger);
        assert_eq!(TierGroup::from_rank_number(28), TierGroup::Unranked);

        assert_eq!(TierGroup::classify("GOLD", "I").unwrap(), TierGroup::GoldHigh);
        assert_eq!(TierGroup::classify("CHALLENGER", "I").unwrap(), TierGroup::Challenger);
    }

    #[test]
    fn test_adjacency_bounds() {
        // Inclusive lower bound, exclusive upper bound.
        assert!(TierGroup::IronLow.is_adjacent(1));
        assert!(TierGroup::IronLow.is_adjacent(3));
        assert!(!TierGroup::IronLow.is_adjacent(0));
        assert!(!TierGroup::IronLow.is_adjacent(4));

        assert!(TierGroup::GoldHigh.is_adjacent(14));
        assert!(TierGroup::GoldHigh.is_adjacent(17));
        assert!(!TierGroup::GoldHigh.is_adjacent(13));
        assert!(!TierGroup::GoldHigh.is_adjacent(18));

        assert!(TierGroup::Master.is_adjacent(24));
        assert!(TierGroup::Master.is_adjacent(27));
        assert!(!TierGroup::Master.is_adjacent(28));
    }

    #[test]
    fn test_unranked_never_adjacent() {
        for n in 0..=30 {
            assert!(!TierGroup::Unranked.is_adjacent(n));
            assert!(!TierGroup::Apex.is_adjacent(n));
        }
    }

    #[test]
    fn test_ladder_sources() {
        assert_eq!(
            TierGroup::GoldHigh.ladder_sources().unwrap(),
            LadderSource::Divisions(Tier::Gold, [Division::I, Division::II])
        );
        assert_eq!(
            TierGroup::Apex.ladder_sources().unwrap(),
            LadderSource::ApexLeagues(vec![Tier::Challenger, Tier::Grandmaster])
        );
        assert_eq!(
            TierGroup::Unranked.ladder_sources(),
            Err(RankError::UnsupportedBand(TierGroup::Unranked))
        );
    }
}
