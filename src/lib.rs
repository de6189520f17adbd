//! `holdem_env` is a Texas Hold'em hand engine built for running huge
//! numbers of hands, for example as a reinforcement learning environment.
//!
//! The [`core`] module has the card level building blocks: cards, decks,
//! bitsets and hand ranking. The [`holdem`] module has the hand state
//! machine itself.
//!
//! ```rust
//! use holdem_env::holdem::{HandEngine, StepAction, TableConfig};
//!
//! let config = TableConfig {
//!     num_seats: 2,
//!     small_blind: 5,
//!     big_blind: 10,
//!     default_stack: 1_000,
//!     ..TableConfig::default()
//! };
//! let mut engine = HandEngine::with_seed(config, 42).unwrap();
//! engine.reset().unwrap();
//!
//! // The first player to act folds and the hand is over.
//! let result = engine.step(StepAction::Discrete(0)).unwrap();
//! assert!(result.done);
//! assert_eq!(result.rewards.len(), 2);
//! ```

/// Cards, decks, bitsets and hand ranking.
pub mod core;

/// The hand state machine.
pub mod holdem;
