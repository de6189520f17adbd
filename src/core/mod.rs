//! Card level building blocks: cards, decks, compact sets, and the
//! hand ranking seams the betting engine depends on.

mod card;
pub use self::card::{Card, CardParseError, NUM_CARDS, Suit, Value, parse_cards};

mod card_bit_set;
pub use self::card_bit_set::{CardBitSet, CardBitSetIter};

mod player_bit_set;
pub use self::player_bit_set::PlayerBitSet;

mod deck;
pub use self::deck::Deck;

mod rank;
pub use self::rank::{CoreRank, Rank, Rankable};

mod evaluator;
pub use self::evaluator::{HandEvaluator, HandStrength, RankEvaluator};

mod equity;
pub use self::equity::{EQUITY_SCALE, Equity, EquityEvaluator, MonteCarloEquity};

mod suit_iso;
pub use self::suit_iso::{
    DEFAULT_SUIT_CACHE_CAPACITY, SuitCanonicalizer, SuitMap, canonical_suit_map,
};
