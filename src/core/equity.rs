use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::card::Card;
use super::card_bit_set::CardBitSet;
use super::deck::Deck;
use super::evaluator::{HandEvaluator, RankEvaluator};

/// Scale equities are reported on.
pub const EQUITY_SCALE: u16 = 10_000;

/// Winning chances of a hand, scaled to `0..=EQUITY_SCALE`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Equity {
    /// Against one random hand.
    pub vs_all: u16,
    /// Against one random pocket pair.
    pub vs_pair_sets: u16,
}

/// Optional auxiliary signal for a seat's hole cards on the current board.
///
/// The hand engine caches one value per seat after every deal when an
/// evaluator is installed. Nothing in the betting rules reads it.
pub trait EquityEvaluator {
    fn equity(&mut self, hole: [Card; 2], board: &[Card]) -> Equity;
}

/// Estimates equity by running the board out at random.
#[derive(Debug, Clone)]
pub struct MonteCarloEquity {
    samples: usize,
    rng: StdRng,
}

impl MonteCarloEquity {
    pub fn new(samples: usize, seed: u64) -> Self {
        Self {
            samples: samples.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn run(&mut self, hole: [Card; 2], board: &[Card], villains: &[[Card; 2]]) -> u16 {
        if villains.is_empty() {
            return 0;
        }
        let mut dead: CardBitSet = board.iter().copied().collect();
        dead.insert(hole[0]);
        dead.insert(hole[1]);
        let needed = 5usize.saturating_sub(board.len());

        let mut score = 0u64;
        for _ in 0..self.samples {
            let Some(villain) = villains.choose(&mut self.rng) else {
                continue;
            };
            let mut stub: Vec<Card> = Deck::new()
                .remaining()
                .iter()
                .copied()
                .filter(|c| !dead.contains(*c) && !villain.contains(c))
                .collect();
            let (runout, _) = stub.partial_shuffle(&mut self.rng, needed);

            let mut hero_cards = Vec::with_capacity(7);
            hero_cards.extend_from_slice(board);
            hero_cards.extend_from_slice(runout);
            let mut villain_cards = hero_cards.clone();
            hero_cards.extend_from_slice(&hole);
            villain_cards.extend_from_slice(villain);

            let hero = RankEvaluator.rank(&hero_cards);
            let other = RankEvaluator.rank(&villain_cards);
            // Two points per win, one per tie.
            score += match hero.cmp(&other) {
                std::cmp::Ordering::Less => 2,
                std::cmp::Ordering::Equal => 1,
                std::cmp::Ordering::Greater => 0,
            };
        }
        let scaled = score * EQUITY_SCALE as u64 / (2 * self.samples as u64);
        scaled.min(EQUITY_SCALE as u64) as u16
    }
}

impl EquityEvaluator for MonteCarloEquity {
    fn equity(&mut self, hole: [Card; 2], board: &[Card]) -> Equity {
        let mut dead: CardBitSet = board.iter().copied().collect();
        dead.insert(hole[0]);
        dead.insert(hole[1]);
        let live: Vec<Card> = Deck::new()
            .remaining()
            .iter()
            .copied()
            .filter(|c| !dead.contains(*c))
            .collect();

        let mut any = Vec::with_capacity(live.len() * live.len() / 2);
        let mut pairs = Vec::new();
        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                any.push([*a, *b]);
                if a.value == b.value {
                    pairs.push([*a, *b]);
                }
            }
        }

        Equity {
            vs_all: self.run(hole, board, &any),
            vs_pair_sets: self.run(hole, board, &pairs),
        }
    }
}
