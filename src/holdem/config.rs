//! # Table configuration
//!
//! Every option the hand engine reads lives in [`TableConfig`], defaulted in
//! one place and validated once when the engine is built.
//!
//! ```rust
//! use holdem_env::holdem::{LimitType, Round, TableConfig};
//!
//! let config = TableConfig {
//!     num_seats: 3,
//!     small_blind: 5,
//!     big_blind: 10,
//!     default_stack: 1_000,
//!     limit: LimitType::PotLimit,
//!     end_with_round: Round::Turn,
//!     ..TableConfig::default()
//! };
//! config.validate().unwrap();
//! ```
//!
//! With the `serde` feature a config can also come from JSON, where any
//! missing field takes its default:
//!
//! ```json
//! {
//!   "num_seats": 2,
//!   "small_blind": 5,
//!   "big_blind": 10,
//!   "bet_sizes": [0.5, 1.0],
//!   "limit": "fixed_limit",
//!   "max_raises_per_round": [4, 4, 4, 4]
//! }
//! ```

use thiserror::Error;

use super::Chips;
use super::round::Round;
use crate::core::DEFAULT_SUIT_CACHE_CAPACITY;

/// Largest table the engine supports.
pub const MAX_SEATS: usize = 16;

/// Raise indices are kept in a `u64` set, two slots go to fold and call.
pub const MAX_BET_SIZES: usize = 62;

/// Stack used for every seat on tables that stop after preflop.
pub const PREFLOP_ONLY_STACK_IN_BB: Chips = 200;

/// Betting structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LimitType {
    #[default]
    NoLimit,
    /// Raises are capped at the size of the pot after calling.
    PotLimit,
    /// Raises are one fixed unit: the big blind on preflop and flop, two on
    /// turn and river. Raises per street are capped by
    /// `max_raises_per_round` after preflop.
    FixedLimit,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    pub num_seats: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    /// Stack for seats without an explicit entry in `starting_stacks`.
    pub default_stack: Chips,
    /// Optional per-seat stacks, indexed by seat.
    pub starting_stacks: Vec<Chips>,
    /// Raise sizes for the discrete action space, as fractions of the pot.
    pub bet_sizes: Vec<f32>,
    /// Draw raise sizes uniformly between neighbouring fractions.
    /// Ignored while evaluating.
    pub uniform_action_interpolation: bool,
    pub limit: LimitType,
    /// Per-street raise cap for fixed-limit games, indexed by `Round`.
    pub max_raises_per_round: [u32; 4],
    /// The first action of a hand may not be a call.
    pub first_action_no_call: bool,
    /// Last street that is played out with betting.
    pub end_with_round: Round,
    pub fix_utg_position: Option<usize>,
    /// Evaluation mode: random distinct stacks, no interpolation.
    pub is_evaluating: bool,
    /// Divide rewards by the average starting stack.
    pub scale_rewards: bool,
    /// After this many actions by one player on one street, raises are
    /// turned into calls. `None` disables the guard.
    pub max_actions_per_street: Option<u32>,
    pub suit_cache_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_seats: 6,
            small_blind: 50,
            big_blind: 100,
            ante: 0,
            default_stack: 20_000,
            starting_stacks: Vec::new(),
            bet_sizes: vec![0.5, 1.0, 2.0],
            uniform_action_interpolation: false,
            limit: LimitType::NoLimit,
            max_raises_per_round: [u32::MAX; 4],
            first_action_no_call: false,
            end_with_round: Round::River,
            fix_utg_position: None,
            is_evaluating: false,
            scale_rewards: false,
            max_actions_per_street: Some(1000),
            suit_cache_capacity: DEFAULT_SUIT_CACHE_CAPACITY,
        }
    }
}

/// Errors that can occur while building a table configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("num_seats must be between 2 and {max}, got {actual}", max = MAX_SEATS)]
    InvalidSeatCount { actual: usize },

    #[error("big_blind must be positive")]
    InvalidBigBlind,

    #[error("small_blind {small} must not exceed big_blind {big}")]
    SmallBlindAboveBigBlind { small: Chips, big: Chips },

    #[error("starting_stacks has {len} entries for {num_seats} seats")]
    StartingStacksLength { len: usize, num_seats: usize },

    #[error("default_stack {0} is below the big blind")]
    DefaultStackBelowBigBlind(Chips),

    #[error("bet size at index {index} must be finite and positive, got {value}")]
    InvalidBetSize { index: usize, value: f32 },

    #[error("bet sizes must be strictly ascending")]
    BetSizesNotAscending,

    #[error("at most {max} bet sizes are supported, got {actual}", max = MAX_BET_SIZES)]
    TooManyBetSizes { actual: usize },

    #[error("fix_utg_position {seat} is not a seat at a {num_seats} seat table")]
    InvalidUtgSeat { seat: usize, num_seats: usize },

    #[error("suit_cache_capacity must be positive")]
    InvalidCacheCapacity,

    #[cfg(feature = "serde")]
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableConfig {
    /// Check every rule the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_SEATS).contains(&self.num_seats) {
            return Err(ConfigError::InvalidSeatCount {
                actual: self.num_seats,
            });
        }
        if self.big_blind == 0 {
            return Err(ConfigError::InvalidBigBlind);
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::SmallBlindAboveBigBlind {
                small: self.small_blind,
                big: self.big_blind,
            });
        }
        if self.starting_stacks.len() > self.num_seats {
            return Err(ConfigError::StartingStacksLength {
                len: self.starting_stacks.len(),
                num_seats: self.num_seats,
            });
        }
        if self.default_stack < self.big_blind {
            return Err(ConfigError::DefaultStackBelowBigBlind(self.default_stack));
        }
        if self.bet_sizes.len() > MAX_BET_SIZES {
            return Err(ConfigError::TooManyBetSizes {
                actual: self.bet_sizes.len(),
            });
        }
        for (index, &value) in self.bet_sizes.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidBetSize { index, value });
            }
        }
        if self.bet_sizes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::BetSizesNotAscending);
        }
        if let Some(seat) = self.fix_utg_position {
            if seat >= self.num_seats {
                return Err(ConfigError::InvalidUtgSeat {
                    seat,
                    num_seats: self.num_seats,
                });
            }
        }
        if self.suit_cache_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity);
        }
        Ok(())
    }

    /// Size of the discrete action space: fold, check/call, then one slot
    /// per bet size.
    pub fn num_actions(&self) -> usize {
        2 + self.bet_sizes.len()
    }

    pub fn is_fixed_limit(&self) -> bool {
        self.limit == LimitType::FixedLimit
    }

    /// Raise cap for a street, only meaningful in fixed-limit games.
    pub fn raise_cap(&self, round: Round) -> u32 {
        self.max_raises_per_round[round.index()]
    }

    /// Fixed-limit raise unit for a street.
    pub fn limit_unit(&self, round: Round) -> Chips {
        match round {
            Round::Preflop | Round::Flop => self.big_blind,
            Round::Turn | Round::River => 2 * self.big_blind,
        }
    }

    /// Parse and validate a JSON config.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON config file.
    #[cfg(feature = "serde")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TableConfig::default();
        config.validate().unwrap();
        assert_eq!(5, config.num_actions());
    }

    #[test]
    fn test_seat_count_bounds() {
        for num_seats in [0, 1, MAX_SEATS + 1] {
            let config = TableConfig {
                num_seats,
                ..TableConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidSeatCount { actual }) if actual == num_seats
            ));
        }
    }

    #[test]
    fn test_blinds() {
        let zero_bb = TableConfig {
            big_blind: 0,
            small_blind: 0,
            ..TableConfig::default()
        };
        assert!(matches!(
            zero_bb.validate(),
            Err(ConfigError::InvalidBigBlind)
        ));

        let inverted = TableConfig {
            small_blind: 200,
            ..TableConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::SmallBlindAboveBigBlind { small: 200, big: 100 })
        ));
    }

    #[test]
    fn test_bet_sizes() {
        let negative = TableConfig {
            bet_sizes: vec![0.5, -1.0],
            ..TableConfig::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::InvalidBetSize { index: 1, .. })
        ));

        let nan = TableConfig {
            bet_sizes: vec![f32::NAN],
            ..TableConfig::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::InvalidBetSize { index: 0, .. })
        ));

        let unsorted = TableConfig {
            bet_sizes: vec![1.0, 0.5],
            ..TableConfig::default()
        };
        assert!(matches!(
            unsorted.validate(),
            Err(ConfigError::BetSizesNotAscending)
        ));

        let too_many = TableConfig {
            bet_sizes: (1..=63).map(|i| i as f32).collect(),
            ..TableConfig::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(ConfigError::TooManyBetSizes { actual: 63 })
        ));

        let none = TableConfig {
            bet_sizes: vec![],
            ..TableConfig::default()
        };
        none.validate().unwrap();
        assert_eq!(2, none.num_actions());
    }

    #[test]
    fn test_utg_seat_must_exist() {
        let config = TableConfig {
            num_seats: 3,
            fix_utg_position: Some(3),
            ..TableConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUtgSeat { seat: 3, num_seats: 3 })
        ));
    }

    #[test]
    fn test_stacks() {
        let too_many = TableConfig {
            num_seats: 2,
            starting_stacks: vec![100, 100, 100],
            ..TableConfig::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(ConfigError::StartingStacksLength { len: 3, num_seats: 2 })
        ));

        let tiny = TableConfig {
            default_stack: 10,
            ..TableConfig::default()
        };
        assert!(matches!(
            tiny.validate(),
            Err(ConfigError::DefaultStackBelowBigBlind(10))
        ));
    }

    #[test]
    fn test_limit_units() {
        let config = TableConfig::default();
        assert_eq!(100, config.limit_unit(Round::Preflop));
        assert_eq!(100, config.limit_unit(Round::Flop));
        assert_eq!(200, config.limit_unit(Round::Turn));
        assert_eq!(200, config.limit_unit(Round::River));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_fills_defaults() {
        let json = r#"{
            "num_seats": 2,
            "small_blind": 5,
            "big_blind": 10,
            "limit": "fixed_limit",
            "max_raises_per_round": [4, 4, 4, 4],
            "end_with_round": "turn",
            "fix_utg_position": 1
        }"#;
        let config = TableConfig::from_json(json).unwrap();
        assert_eq!(2, config.num_seats);
        assert_eq!(LimitType::FixedLimit, config.limit);
        assert_eq!(4, config.raise_cap(Round::Flop));
        assert_eq!(Round::Turn, config.end_with_round);
        assert_eq!(Some(1), config.fix_utg_position);
        assert_eq!(TableConfig::default().bet_sizes, config.bet_sizes);
        assert_eq!(Some(1000), config.max_actions_per_street);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_validates() {
        let json = r#"{"num_seats": 1}"#;
        assert!(matches!(
            TableConfig::from_json(json),
            Err(ConfigError::InvalidSeatCount { actual: 1 })
        ));
        assert!(matches!(
            TableConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            TableConfig::from_file("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
