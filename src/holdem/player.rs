use super::Chips;
use crate::core::Card;

/// One seat's state for the current hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub seat: usize,
    /// Chips behind, not yet wagered.
    pub stack: Chips,
    /// Chips in front of the player on this street, not yet swept.
    pub current_bet: Chips,
    /// Everything put in this hand, including `current_bet`.
    pub total_invested: Chips,
    /// Stack when the hand was dealt.
    pub starting_stack: Chips,
    pub folded: bool,
    pub all_in: bool,
    /// Acted since the last full bet or raise on this street.
    pub has_acted: bool,
    /// Highest pot layer this player can win, 0 is the main pot.
    pub side_pot_rank: usize,
    pub hand: Option<[Card; 2]>,
    pub actions_this_street: u32,
}

impl Player {
    pub fn new(seat: usize, stack: Chips) -> Self {
        Self {
            seat,
            stack,
            current_bet: 0,
            total_invested: 0,
            starting_stack: stack,
            folded: false,
            all_in: false,
            has_acted: false,
            side_pot_rank: 0,
            hand: None,
            actions_this_street: 0,
        }
    }

    /// Clear everything for a new hand. A seat without chips sits the hand
    /// out and is treated as folded.
    pub fn start_hand(&mut self, stack: Chips) {
        *self = Player::new(self.seat, stack);
        self.folded = stack == 0;
    }

    /// Can still make betting decisions this hand.
    #[inline]
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in && self.stack > 0
    }

    /// Bring `current_bet` up to `total`, limited by the stack.
    ///
    /// Returns the chips actually moved.
    pub fn bet_to(&mut self, total: Chips) -> Chips {
        let delta = total.saturating_sub(self.current_bet).min(self.stack);
        self.stack -= delta;
        self.current_bet += delta;
        self.total_invested += delta;
        if self.stack == 0 && delta > 0 {
            self.all_in = true;
        }
        delta
    }

    /// A blind or ante. Posting does not count as acting.
    pub fn post(&mut self, amount: Chips) -> Chips {
        let moved = self.bet_to(self.current_bet + amount);
        self.has_acted = false;
        moved
    }

    pub fn fold(&mut self) {
        self.folded = true;
        self.has_acted = true;
    }

    /// Take this street's bet off the table for the pot.
    pub fn sweep(&mut self) -> Chips {
        std::mem::take(&mut self.current_bet)
    }

    pub fn award(&mut self, amount: Chips) {
        self.stack += amount;
    }

    pub fn start_street(&mut self) {
        self.actions_this_street = 0;
        if !self.folded {
            self.has_acted = false;
        }
    }

    /// Chips won or lost since the hand was dealt.
    pub fn net_result(&self) -> i64 {
        self.stack as i64 - self.starting_stack as i64
    }
}
