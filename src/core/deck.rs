use rand::Rng;
use rand::seq::SliceRandom;

use super::card::{Card, NUM_CARDS};
use super::card_bit_set::CardBitSet;

/// The cards left to deal in the current hand.
///
/// The deck is an ordered vector: `draw` and `burn` take from the front so
/// that a restored deck deals exactly what the original would have.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    // Position of the next card to hand out.
    position: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// A fresh deck in index order.
    pub fn new() -> Self {
        Self {
            cards: (0..NUM_CARDS as u8).filter_map(Card::from_index).collect(),
            position: 0,
        }
    }

    /// A fresh deck in a uniformly random order.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::new();
        deck.shuffle(rng);
        deck
    }

    /// Shuffle the cards that have not been dealt yet.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards[self.position..].shuffle(rng);
    }

    /// Rebuild a deck from an explicit order, e.g. when restoring a hand.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.get(self.position).copied();
        if card.is_some() {
            self.position += 1;
        }
        card
    }

    pub fn burn(&mut self) -> Option<Card> {
        self.draw()
    }

    /// Pull a specific card out of the undealt cards.
    ///
    /// Returns `false` when the card is not there, which means it has
    /// already been dealt or pinned elsewhere.
    pub fn remove_specific(&mut self, card: Card) -> bool {
        match self.cards[self.position..].iter().position(|c| *c == card) {
            Some(offset) => {
                self.cards.remove(self.position + offset);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards[self.position..].contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Undealt cards in dealing order.
    pub fn remaining(&self) -> &[Card] {
        &self.cards[self.position..]
    }

    pub fn remaining_set(&self) -> CardBitSet {
        self.remaining().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::core::{Suit, Value};

    #[test]
    fn test_new_deck_has_every_card() {
        let deck = Deck::new();
        assert_eq!(52, deck.len());
        assert_eq!(52, deck.remaining_set().count());
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(Deck::shuffled(&mut a), Deck::shuffled(&mut b));
        assert_eq!(52, Deck::shuffled(&mut a).remaining_set().count());
    }

    #[test]
    fn test_draw_and_burn() {
        let mut deck = Deck::new();
        let first = deck.draw().unwrap();
        assert_eq!(0, first.index());
        let burned = deck.burn().unwrap();
        assert_eq!(1, burned.index());
        assert_eq!(50, deck.len());
        assert!(!deck.contains(first));
    }

    #[test]
    fn test_remove_specific() {
        let mut deck = Deck::new();
        let ace = Card::new(Value::Ace, Suit::Heart);
        assert!(deck.remove_specific(ace));
        assert!(!deck.remove_specific(ace));
        assert_eq!(51, deck.len());
        assert!(!deck.contains(ace));
    }

    #[test]
    fn test_runs_dry() {
        let mut deck = Deck::new();
        for _ in 0..52 {
            assert!(deck.draw().is_some());
        }
        assert!(deck.is_empty());
        assert_eq!(None, deck.draw());
    }
}
