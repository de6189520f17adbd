use core::fmt;
use std::fmt::Display;

/// A betting street.
///
/// Streets only ever move forward inside a hand. `Ord` follows play order,
/// so `round < end_with_round` reads the way it sounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Round {
    #[default]
    Preflop,
    Flop,
    Turn,
    River,
}

impl Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::Preflop => write!(f, "Preflop"),
            Round::Flop => write!(f, "Flop"),
            Round::Turn => write!(f, "Turn"),
            Round::River => write!(f, "River"),
        }
    }
}

impl Round {
    pub const ALL: [Round; 4] = [Round::Preflop, Round::Flop, Round::Turn, Round::River];

    /// The following street, `None` after the river.
    pub fn next(&self) -> Option<Round> {
        match *self {
            Round::Preflop => Some(Round::Flop),
            Round::Flop => Some(Round::Turn),
            Round::Turn => Some(Round::River),
            Round::River => None,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Community cards on the table once this street's cards are out.
    pub fn board_len(&self) -> usize {
        match *self {
            Round::Preflop => 0,
            Round::Flop => 3,
            Round::Turn => 4,
            Round::River => 5,
        }
    }

    /// The street a board of `len` cards belongs to.
    pub fn from_board_len(len: usize) -> Option<Round> {
        match len {
            0 => Some(Round::Preflop),
            3 => Some(Round::Flop),
            4 => Some(Round::Turn),
            5 => Some(Round::River),
            _ => None,
        }
    }
}
