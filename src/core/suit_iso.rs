use std::collections::HashMap;

use super::card::{Card, Suit};
use super::card_bit_set::CardBitSet;

/// Default number of boards remembered before the cache is flushed.
pub const DEFAULT_SUIT_CACHE_CAPACITY: usize = 4096;

/// Maps each original suit to its canonical slot for a board.
///
/// `map[suit as usize]` is the slot. Suits with more cards on the board come
/// first; ties break on the higher ranks, then on the original suit order.
pub type SuitMap = [u8; 4];

/// Compute the canonical suit permutation for a board without caching.
pub fn canonical_suit_map(board: &[Card]) -> SuitMap {
    let mut counts = [0u32; 4];
    let mut masks = [0u32; 4];
    for card in board {
        counts[card.suit as usize] += 1;
        masks[card.suit as usize] |= 1 << card.value as u32;
    }

    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|&a, &b| {
        counts[b]
            .cmp(&counts[a])
            .then(masks[b].cmp(&masks[a]))
            .then(a.cmp(&b))
    });

    let mut map = [0u8; 4];
    for (slot, suit) in order.iter().enumerate() {
        map[*suit] = slot as u8;
    }
    map
}

/// A bounded per-engine cache of canonical suit maps keyed by board.
#[derive(Debug, Clone)]
pub struct SuitCanonicalizer {
    capacity: usize,
    cache: HashMap<CardBitSet, SuitMap>,
}

impl Default for SuitCanonicalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SUIT_CACHE_CAPACITY)
    }
}

impl SuitCanonicalizer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            cache: HashMap::new(),
        }
    }

    pub fn suit_map(&mut self, board: &[Card]) -> SuitMap {
        let key: CardBitSet = board.iter().copied().collect();
        if let Some(map) = self.cache.get(&key) {
            return *map;
        }
        if self.cache.len() >= self.capacity {
            self.cache.clear();
        }
        let map = canonical_suit_map(board);
        self.cache.insert(key, map);
        map
    }

    /// Rewrite a card into its canonical suit for `map`.
    pub fn canonical_card(card: Card, map: &SuitMap) -> Card {
        let suit = Suit::from_u8(map[card.suit as usize]).unwrap_or(card.suit);
        Card::new(card.value, suit)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
