use core::fmt;

use super::Chips;
use super::round::Round;
use crate::core::Card;

/// Discrete index for folding.
pub const FOLD_INDEX: usize = 0;
/// Discrete index for checking or calling.
pub const CHECK_CALL_INDEX: usize = 1;
/// First discrete index that raises.
pub const FIRST_RAISE_INDEX: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionType {
    Fold,
    CheckCall,
    BetRaise,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Fold => write!(f, "fold"),
            ActionType::CheckCall => write!(f, "check/call"),
            ActionType::BetRaise => write!(f, "bet/raise"),
        }
    }
}

/// What the caller asks the current player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepAction {
    /// An index into the discrete action space.
    Discrete(usize),
    /// An action with a target total bet for this street. The amount is
    /// ignored unless the action is a bet or raise.
    Explicit {
        action_type: ActionType,
        amount: Chips,
    },
}

impl StepAction {
    pub fn fold() -> Self {
        StepAction::Explicit {
            action_type: ActionType::Fold,
            amount: 0,
        }
    }

    pub fn check_call() -> Self {
        StepAction::Explicit {
            action_type: ActionType::CheckCall,
            amount: 0,
        }
    }

    /// Raise so that this street's bet totals `amount`.
    pub fn raise_to(amount: Chips) -> Self {
        StepAction::Explicit {
            action_type: ActionType::BetRaise,
            amount,
        }
    }
}

/// An action after it has been made legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAction {
    pub action_type: ActionType,
    /// The player's total bet for this street after acting.
    pub total_bet: Chips,
}

/// One entry of the hand's action history.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    pub player: usize,
    pub action_type: ActionType,
    /// Chips added by this action.
    pub bet_amount: Chips,
    pub round: Round,
    pub pot_at_action: Chips,
    /// Stack plus current bet before acting.
    pub stack_at_action: Chips,
    pub action_index: usize,
}

/// Which pot a payout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PotLabel {
    Main,
    /// Side pots are numbered from 1.
    Side(usize),
}

impl PotLabel {
    pub fn for_layer(layer: usize) -> Self {
        if layer == 0 {
            PotLabel::Main
        } else {
            PotLabel::Side(layer)
        }
    }
}

impl fmt::Display for PotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PotLabel::Main => write!(f, "Main Pot"),
            PotLabel::Side(n) => write!(f, "Side Pot {n}"),
        }
    }
}

/// Chips paid to one seat out of one pot layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payout {
    pub seat: usize,
    pub amount: Chips,
    pub pot: PotLabel,
    pub hand_description: String,
    pub hole_cards: Option<[Card; 2]>,
}

/// What `step` hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Per-seat reward, all zero until the hand ends.
    pub rewards: Vec<f32>,
    pub done: bool,
}
