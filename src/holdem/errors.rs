use thiserror::Error;

use super::config::ConfigError;
use crate::core::Card;

/// Caller bugs the engine refuses to act on.
///
/// Illegal bet sizes and similar in-game requests are never errors, they are
/// clamped to the closest legal action instead.
#[derive(Error, Debug)]
pub enum HoldemError {
    #[error("invalid table configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("duplicate card {card} in dealt scenario")]
    DuplicateCard { card: Card },

    #[error("board must have 0, 3, 4, or 5 cards, got {0}")]
    InvalidBoardSize(usize),

    #[error("seat {seat} does not exist at a {num_seats} seat table")]
    InvalidSeat { seat: usize, num_seats: usize },

    #[error("action index {index} is outside the action space of {num_actions}")]
    InvalidActionIndex { index: usize, num_actions: usize },

    #[error("there is no player to act")]
    NoCurrentPlayer,

    #[error("at least 2 seats need chips to deal a hand")]
    NotEnoughPlayers,

    #[error("the deck ran out of cards")]
    DeckExhausted,

    #[error("snapshot is for {actual} seats but the table has {expected}")]
    SnapshotMismatch { expected: usize, actual: usize },

    #[error("seat {seat} is to act but cannot")]
    SeatCannotAct { seat: usize },

    #[error("seat {seat} has pot rank {rank} but there are {num_layers} pot layers")]
    InvalidPotRank {
        seat: usize,
        rank: usize,
        num_layers: usize,
    },
}
