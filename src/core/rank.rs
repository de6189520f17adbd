use std::fmt;

use super::card::Card;
use super::card_bit_set::CardBitSet;

/// The made hand a set of cards represents.
///
/// Variants are ordered weakest to strongest and the payload orders hands
/// inside a category, so `Rank` can be compared directly.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub enum Rank {
    HighCard(u32),
    OnePair(u32),
    TwoPair(u32),
    ThreeOfAKind(u32),
    Straight(u32),
    Flush(u32),
    FullHouse(u32),
    FourOfAKind(u32),
    StraightFlush(u32),
}

/// A `Rank` with the kicker detail stripped off.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub enum CoreRank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl From<Rank> for CoreRank {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::HighCard(_) => CoreRank::HighCard,
            Rank::OnePair(_) => CoreRank::OnePair,
            Rank::TwoPair(_) => CoreRank::TwoPair,
            Rank::ThreeOfAKind(_) => CoreRank::ThreeOfAKind,
            Rank::Straight(_) => CoreRank::Straight,
            Rank::Flush(_) => CoreRank::Flush,
            Rank::FullHouse(_) => CoreRank::FullHouse,
            Rank::FourOfAKind(_) => CoreRank::FourOfAKind,
            Rank::StraightFlush(_) => CoreRank::StraightFlush,
        }
    }
}

impl fmt::Display for CoreRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoreRank::HighCard => "High Card",
            CoreRank::OnePair => "One Pair",
            CoreRank::TwoPair => "Two Pair",
            CoreRank::ThreeOfAKind => "Three of a Kind",
            CoreRank::Straight => "Straight",
            CoreRank::Flush => "Flush",
            CoreRank::FullHouse => "Full House",
            CoreRank::FourOfAKind => "Four of a Kind",
            CoreRank::StraightFlush => "Straight Flush",
        };
        f.write_str(name)
    }
}

/// Bits per block of values inside a packed payload.
const VALUE_BITS: u32 = 13;
/// Room reserved for the payload when a rank is packed into one integer.
const PAYLOAD_BITS: u32 = 2 * VALUE_BITS;

impl Rank {
    /// Pack category and payload into one integer where larger is stronger.
    pub fn ordinal(&self) -> u32 {
        let (category, payload) = match *self {
            Rank::HighCard(p) => (0, p),
            Rank::OnePair(p) => (1, p),
            Rank::TwoPair(p) => (2, p),
            Rank::ThreeOfAKind(p) => (3, p),
            Rank::Straight(p) => (4, p),
            Rank::Flush(p) => (5, p),
            Rank::FullHouse(p) => (6, p),
            Rank::FourOfAKind(p) => (7, p),
            Rank::StraightFlush(p) => (8, p),
        };
        (category << PAYLOAD_BITS) | payload
    }

    /// Inverse of `ordinal`.
    pub fn from_ordinal(ordinal: u32) -> Option<Rank> {
        let payload = ordinal & ((1 << PAYLOAD_BITS) - 1);
        match ordinal >> PAYLOAD_BITS {
            0 => Some(Rank::HighCard(payload)),
            1 => Some(Rank::OnePair(payload)),
            2 => Some(Rank::TwoPair(payload)),
            3 => Some(Rank::ThreeOfAKind(payload)),
            4 => Some(Rank::Straight(payload)),
            5 => Some(Rank::Flush(payload)),
            6 => Some(Rank::FullHouse(payload)),
            7 => Some(Rank::FourOfAKind(payload)),
            8 => Some(Rank::StraightFlush(payload)),
            _ => None,
        }
    }
}

/// Ace, five, four, three, two.
const WHEEL: u32 = 0b1_0000_0000_1111;

/// Index of the top card of the best straight in `values`, where the wheel
/// is 0 and broadway is 9.
fn rank_straight(values: u32) -> Option<u32> {
    // A bit survives only if it and the four bits below it are all set.
    let runs = values & (values << 1) & (values << 2) & (values << 3) & (values << 4);
    let lead = runs.leading_zeros();
    if lead < 32 {
        Some(32 - 4 - lead)
    } else if values & WHEEL == WHEEL {
        Some(0)
    } else {
        None
    }
}

fn keep_highest(values: u32) -> u32 {
    1 << (32 - values.leading_zeros() - 1)
}

/// Clear low bits until only `n` remain.
fn keep_n(values: u32, n: u32) -> u32 {
    let mut kept = values;
    while kept.count_ones() > n {
        kept &= kept - 1;
    }
    kept
}

/// Per-hand tallies the ranker works from.
struct Tally {
    // Every value present.
    values: u32,
    // Values present in each suit.
    by_suit: [u32; 4],
    // Values appearing exactly n times, indexed by n.
    by_count: [u32; 5],
}

impl Tally {
    fn new(cards: impl Iterator<Item = Card>) -> Self {
        let mut counts = [0u8; 13];
        let mut tally = Tally {
            values: 0,
            by_suit: [0; 4],
            by_count: [0; 5],
        };
        for card in cards {
            let v = card.value as u32;
            tally.values |= 1 << v;
            tally.by_suit[card.suit as usize] |= 1 << v;
            counts[v as usize] = counts[v as usize].saturating_add(1).min(4);
        }
        for (value, &count) in counts.iter().enumerate() {
            tally.by_count[count as usize] |= 1 << value;
        }
        tally
    }

    fn rank(&self) -> Rank {
        let quads = self.by_count[4];
        let sets = self.by_count[3];
        let pairs = self.by_count[2];

        if let Some(suited) = self.by_suit.iter().find(|s| s.count_ones() >= 5) {
            return match rank_straight(*suited) {
                Some(top) => Rank::StraightFlush(top),
                None => Rank::Flush(keep_n(*suited, 5)),
            };
        }
        if quads != 0 {
            let kicker = keep_highest(self.values ^ quads);
            return Rank::FourOfAKind((quads << VALUE_BITS) | kicker);
        }
        if sets.count_ones() >= 2 {
            let top = keep_highest(sets);
            return Rank::FullHouse((top << VALUE_BITS) | keep_highest(sets ^ top));
        }
        if sets != 0 && pairs != 0 {
            return Rank::FullHouse((sets << VALUE_BITS) | keep_highest(pairs));
        }
        if let Some(top) = rank_straight(self.values) {
            return Rank::Straight(top);
        }
        if sets != 0 {
            let kickers = keep_n(self.values ^ sets, 2);
            return Rank::ThreeOfAKind((sets << VALUE_BITS) | kickers);
        }
        if pairs.count_ones() >= 2 {
            let top_two = keep_n(pairs, 2);
            let kicker = keep_highest(self.values ^ top_two);
            return Rank::TwoPair((top_two << VALUE_BITS) | kicker);
        }
        if pairs != 0 {
            let kickers = keep_n(self.values ^ pairs, 3);
            return Rank::OnePair((pairs << VALUE_BITS) | kickers);
        }
        Rank::HighCard(keep_n(self.values, 5))
    }
}

/// Anything that can produce its cards can be ranked.
pub trait Rankable {
    fn cards(&self) -> impl Iterator<Item = Card>;

    /// Best five card hand out of all the cards, usually five to seven.
    ///
    /// ```
    /// use holdem_env::core::{parse_cards, Rank, Rankable};
    ///
    /// let cards = parse_cards("2h2d8d8sKd6sTh").unwrap();
    /// let rank = cards.rank();
    /// assert!(Rank::TwoPair(0) <= rank);
    /// assert!(Rank::TwoPair(u32::MAX) >= rank);
    /// ```
    fn rank(&self) -> Rank {
        Tally::new(self.cards()).rank()
    }
}

impl Rankable for Vec<Card> {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

impl Rankable for [Card] {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.iter().copied()
    }
}

impl Rankable for CardBitSet {
    fn cards(&self) -> impl Iterator<Item = Card> {
        self.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{Value, parse_cards};

    fn rank_of(s: &str) -> Rank {
        parse_cards(s).unwrap().rank()
    }

    fn bit(v: Value) -> u32 {
        1 << v as u32
    }

    #[test]
    fn test_category_order() {
        assert!(Rank::HighCard(u32::MAX >> 8) < Rank::OnePair(0));
        assert!(Rank::Flush(0) < Rank::FullHouse(0));
        assert!(Rank::FourOfAKind(0) < Rank::StraightFlush(0));
    }

    #[test]
    fn test_ordinal_round_trip_and_order() {
        let weak = rank_of("2c3d5h9sJc");
        let strong = rank_of("AsKsQsJsTs");
        assert!(weak.ordinal() < strong.ordinal());
        assert_eq!(Some(strong), Rank::from_ordinal(strong.ordinal()));
        assert_eq!(None, Rank::from_ordinal(9 << PAYLOAD_BITS));
    }

    #[test]
    fn test_high_card() {
        let expected =
            bit(Value::Ace) | bit(Value::Ten) | bit(Value::Nine) | bit(Value::Eight) | bit(Value::Five);
        assert_eq!(Rank::HighCard(expected), rank_of("Ad8h9cTc5c"));
    }

    #[test]
    fn test_two_cards_rank_as_high_card() {
        assert_eq!(
            Rank::HighCard(bit(Value::Ace) | bit(Value::Eight)),
            rank_of("Ad8h")
        );
    }

    #[test]
    fn test_one_pair_keeps_three_kickers() {
        let expected = (bit(Value::Ace) << 13) | bit(Value::King) | bit(Value::Ten) | bit(Value::Nine);
        assert_eq!(Rank::OnePair(expected), rank_of("AdAc9d8cTsKh2s"));
    }

    #[test]
    fn test_two_pair_from_three_pair() {
        let pairs = (bit(Value::King) | bit(Value::Eight)) << 13;
        assert_eq!(
            Rank::TwoPair(pairs | bit(Value::Ten)),
            rank_of("2h2d8d8sKdKsTh")
        );
    }

    #[test]
    fn test_full_house_from_two_sets() {
        let expected = (bit(Value::Eight) << 13) | bit(Value::Two);
        assert_eq!(Rank::FullHouse(expected), rank_of("As2h2d2c8d8s8c"));
    }

    #[test]
    fn test_four_of_a_kind_beats_extra_set() {
        let expected = (bit(Value::Two) << 13) | bit(Value::Eight);
        assert_eq!(Rank::FourOfAKind(expected), rank_of("2s2h2d2c8d8s8c"));
    }

    #[test]
    fn test_straights() {
        assert_eq!(Rank::Straight(0), rank_of("Ad2c3s4h5s"));
        assert_eq!(Rank::Straight(1), rank_of("2c3s4h5s6d"));
        assert_eq!(Rank::Straight(9), rank_of("TsJcQhKdAs2c3c"));
    }

    #[test]
    fn test_straight_flush_prefers_higher_run() {
        assert_eq!(Rank::StraightFlush(1), rank_of("6dKdAd2d5d4d3d"));
        assert_eq!(Rank::StraightFlush(0), rank_of("2d3d4d5d6h7cAd"));
    }

    #[test]
    fn test_flush_keeps_five() {
        let expected =
            bit(Value::Ace) | bit(Value::King) | bit(Value::Nine) | bit(Value::Eight) | bit(Value::Five);
        assert_eq!(Rank::Flush(expected), rank_of("AdKd9d8d5d3d2h"));
    }

    #[test]
    fn test_core_rank_display() {
        assert_eq!("Full House", CoreRank::from(rank_of("AdAcAs9c9s")).to_string());
        assert_eq!("High Card", CoreRank::HighCard.to_string());
    }
}
