use std::fmt;

use super::card::Card;
use super::rank::{CoreRank, Rank, Rankable};

/// Hand strength as seen by the showdown code: lower is stronger.
///
/// Hands with fewer than five cards cannot be compared and all map to
/// `HandStrength::UNRANKABLE`, which ties with itself and loses to every
/// ranked hand.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct HandStrength(pub u32);

impl HandStrength {
    pub const UNRANKABLE: HandStrength = HandStrength(u32::MAX);

    pub fn is_rankable(&self) -> bool {
        *self != Self::UNRANKABLE
    }

    /// The category this strength falls in, if it came from a `Rank`.
    pub fn core_rank(&self) -> Option<CoreRank> {
        if !self.is_rankable() {
            return None;
        }
        Rank::from_ordinal(u32::MAX - 1 - self.0).map(CoreRank::from)
    }

    /// Human readable category, `"Unranked"` for short hands.
    pub fn description(&self) -> String {
        match self.core_rank() {
            Some(core) => core.to_string(),
            None => "Unranked".to_string(),
        }
    }
}

impl From<Rank> for HandStrength {
    fn from(rank: Rank) -> Self {
        HandStrength(u32::MAX - 1 - rank.ordinal())
    }
}

impl fmt::Display for HandStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Something that can order hands at showdown.
pub trait HandEvaluator {
    /// Strength of the best five card hand in `cards`.
    fn rank(&self, cards: &[Card]) -> HandStrength;
}

/// The default evaluator, built on the bitset ranker.
#[derive(Debug, Default, Clone, Copy)]
pub struct RankEvaluator;

impl HandEvaluator for RankEvaluator {
    fn rank(&self, cards: &[Card]) -> HandStrength {
        if cards.len() < 5 {
            HandStrength::UNRANKABLE
        } else {
            HandStrength::from(cards.rank())
        }
    }
}

impl<E: HandEvaluator + ?Sized> HandEvaluator for &E {
    fn rank(&self, cards: &[Card]) -> HandStrength {
        (**self).rank(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_cards;

    fn strength(s: &str) -> HandStrength {
        RankEvaluator.rank(&parse_cards(s).unwrap())
    }

    #[test]
    fn test_lower_is_stronger() {
        let royal = strength("AsKsQsJsTs2c3d");
        let quads = strength("9s9c9h9d2c3d5h");
        let junk = strength("2c3d5h9sJc4h8d");
        assert!(royal < quads);
        assert!(quads < junk);
        assert!(junk < HandStrength::UNRANKABLE);
    }

    #[test]
    fn test_short_hands_are_unrankable() {
        assert_eq!(HandStrength::UNRANKABLE, strength("AsAd"));
        assert_eq!(HandStrength::UNRANKABLE, strength("AsAdAcKs"));
        assert_eq!("Unranked", HandStrength::UNRANKABLE.description());
    }

    #[test]
    fn test_descriptions() {
        assert_eq!("Straight Flush", strength("AsKsQsJsTs").description());
        assert_eq!("Four of a Kind", strength("9s9c9h9d2c").description());
        assert_eq!("Full House", strength("9s9c9h2d2c").description());
        assert_eq!("Flush", strength("As9s7s4s2s").description());
        assert_eq!("Straight", strength("5s6c7h8d9c").description());
        assert_eq!("Three of a Kind", strength("9s9c9hKd2c").description());
        assert_eq!("Two Pair", strength("9s9cKhKd2c").description());
        assert_eq!("One Pair", strength("9s9cAhKd2c").description());
        assert_eq!("High Card", strength("9s7cAhKd2c").description());
    }

    #[test]
    fn test_equal_hands_tie() {
        // Board plays for both.
        assert_eq!(strength("2c3dAsKsQsJsTs"), strength("4h5hAsKsQsJsTs"));
    }
}
