use std::fmt;

use super::card::{Card, NUM_CARDS};

/// A set of cards packed into a single `u64`, one bit per card index.
///
/// Used wherever the engine needs to know whether a card is already in
/// play, and as the canonical key for a board.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardBitSet {
    cards: u64,
}

impl CardBitSet {
    pub fn new() -> Self {
        Self { cards: 0 }
    }

    /// A set holding all 52 cards.
    pub fn full() -> Self {
        Self {
            cards: (1u64 << NUM_CARDS) - 1,
        }
    }

    #[inline]
    pub fn insert(&mut self, card: Card) -> bool {
        let mask = 1u64 << card.index();
        let was_present = self.cards & mask != 0;
        self.cards |= mask;
        !was_present
    }

    #[inline]
    pub fn remove(&mut self, card: Card) -> bool {
        let mask = 1u64 << card.index();
        let was_present = self.cards & mask != 0;
        self.cards &= !mask;
        was_present
    }

    #[inline]
    pub fn contains(&self, card: Card) -> bool {
        self.cards & (1u64 << card.index()) != 0
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.cards.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards == 0
    }

    /// Raw bits, lowest bit is card index 0.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.cards
    }
}

impl FromIterator<Card> for CardBitSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let mut set = CardBitSet::new();
        for card in iter {
            set.insert(card);
        }
        set
    }
}

impl fmt::Debug for CardBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.into_iter()).finish()
    }
}

/// Iterates the set in ascending card index order.
pub struct CardBitSetIter {
    remaining: u64,
}

impl Iterator for CardBitSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.remaining.trailing_zeros() as u8;
        self.remaining &= self.remaining - 1;
        Card::from_index(idx)
    }
}

impl IntoIterator for CardBitSet {
    type Item = Card;
    type IntoIter = CardBitSetIter;

    fn into_iter(self) -> CardBitSetIter {
        CardBitSetIter {
            remaining: self.cards,
        }
    }
}
