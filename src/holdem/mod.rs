//! The hand state machine: seats, pots, betting rules, street advancement
//! and showdown, driven one action at a time through [`HandEngine`].

/// Chip amounts. Chips are whole units, there are no fractional bets.
pub type Chips = u64;

/// Module with the betting streets.
mod round;
/// Export `Round`
pub use self::round::Round;

/// Module with the table configuration and its validation.
mod config;
/// Export `TableConfig` and friends
pub use self::config::{
    ConfigError, LimitType, MAX_BET_SIZES, MAX_SEATS, PREFLOP_ONLY_STACK_IN_BB, TableConfig,
};

/// Module with the errors the engine returns.
mod errors;
/// Export `HoldemError`
pub use self::errors::HoldemError;

/// Module for per-seat state.
mod player;
/// Export `Player`
pub use self::player::Player;

/// Module for main and side pot accounting.
mod pot;
/// Export `Pot`
pub use self::pot::{Layering, Pot, layer_investments};

/// Module with action types, history records and payouts.
mod action;
/// Export the action types
pub use self::action::{
    ActionRecord, ActionType, CHECK_CALL_INDEX, FIRST_RAISE_INDEX, FOLD_INDEX, Payout,
    PotLabel, ResolvedAction, StepAction, StepResult,
};

/// Module for the set of legal discrete actions.
mod action_set;
/// Export `ActionSet`
pub use self::action_set::ActionSet;

/// Module with turn order and the street and hand completion predicates.
pub mod betting;
/// Export `TableState`
pub use self::betting::{CappedRaise, TableState};

/// Module that turns requested actions into legal ones.
mod resolver;
/// Export `Resolver`
pub use self::resolver::{Resolver, nearest_action_index};

/// Module that pays out pots at the end of a hand.
pub mod showdown;

/// Module with resumable hand snapshots.
mod snapshot;
/// Export `HandSnapshot`
pub use self::snapshot::HandSnapshot;

/// Module with the hand engine.
mod engine;
/// Export `HandEngine`
pub use self::engine::{DealScenario, HandEngine};

/// Assertions shared by tests and downstream test suites.
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;
