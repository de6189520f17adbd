//! Turn order and the predicates that decide when a street or a hand is
//! over. Everything here reads player state and never mutates it.

use super::Chips;
use super::player::Player;
use super::round::Round;
use crate::core::PlayerBitSet;

/// Set by an all-in raise too small to count as a full raise. Players in
/// `cannot_reopen` had already acted and may only call or fold until a full
/// raise clears the cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CappedRaise {
    pub happened: bool,
    pub raiser: Option<usize>,
    pub cannot_reopen: PlayerBitSet,
}

impl CappedRaise {
    pub fn blocks(&self, seat: usize) -> bool {
        self.happened && self.cannot_reopen.get(seat)
    }
}

/// Button, blinds and the betting bookkeeping for the current street.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableState {
    pub button: usize,
    pub sb: usize,
    pub bb: usize,
    pub current_player: Option<usize>,
    pub round: Round,
    pub last_raiser: Option<usize>,
    /// Size of the last full raise this street, 0 before any.
    pub last_raise_delta: Chips,
    pub n_raises_this_round: u32,
    pub n_actions_this_hand: u32,
    pub capped_raise: CappedRaise,
    pub hand_over: bool,
}

impl TableState {
    /// Forget the previous street's raises.
    pub fn start_street(&mut self, round: Round) {
        self.round = round;
        self.last_raiser = None;
        self.last_raise_delta = 0;
        self.n_raises_this_round = 0;
        self.capped_raise = CappedRaise::default();
    }
}

/// Button and blind seats. A fixed under-the-gun seat pins the blinds to
/// the seats before it; heads-up the button posts the small blind.
pub fn blind_positions(
    num_seats: usize,
    button: usize,
    fix_utg: Option<usize>,
) -> (usize, usize, usize) {
    match fix_utg {
        Some(utg) if num_seats == 2 => (utg, utg, (utg + 1) % num_seats),
        Some(utg) => {
            let bb = (utg + num_seats - 1) % num_seats;
            let sb = (bb + num_seats - 1) % num_seats;
            let button = (sb + num_seats - 1) % num_seats;
            (button, sb, bb)
        }
        None if num_seats == 2 => (button, button, (button + 1) % num_seats),
        None => (
            button,
            (button + 1) % num_seats,
            (button + 2) % num_seats,
        ),
    }
}

/// The highest bet in front of anyone this street.
pub fn max_bet(players: &[Player]) -> Chips {
    players.iter().map(|p| p.current_bet).max().unwrap_or(0)
}

pub fn num_not_folded(players: &[Player]) -> usize {
    players.iter().filter(|p| !p.folded).count()
}

pub fn num_can_act(players: &[Player]) -> usize {
    players.iter().filter(|p| p.can_act()).count()
}

/// Every player still able to act has matched the high bet and has acted
/// since the last full raise. Blinds do not count as acting, which is what
/// gives the big blind its option.
///
/// With at most one such player left there is nobody to bet against, so the
/// street is closed as soon as that player owes nothing.
pub fn is_betting_done(players: &[Player]) -> bool {
    let high = max_bet(players);
    let mut actors = players.iter().filter(|p| p.can_act());
    if num_can_act(players) <= 1 {
        return actors.all(|p| p.current_bet >= high);
    }
    actors.all(|p| p.has_acted && p.current_bet >= high)
}

/// The hand is over once one player is left, or once betting is closed and
/// no more than one player could still bet.
pub fn is_hand_done(players: &[Player], table: &TableState) -> bool {
    table.hand_over
        || num_not_folded(players) <= 1
        || (num_can_act(players) <= 1 && is_betting_done(players))
}

/// First seat at or after `start`, going clockwise, that can act.
fn first_can_act_from(players: &[Player], start: usize) -> Option<usize> {
    let n = players.len();
    (0..n)
        .map(|offset| (start + offset) % n)
        .find(|&seat| players[seat].can_act())
}

/// Preflop the action opens left of the big blind, or on the fixed
/// under-the-gun seat.
pub fn first_to_act_preflop(
    players: &[Player],
    table: &TableState,
    fix_utg: Option<usize>,
) -> Option<usize> {
    let start = fix_utg.unwrap_or((table.bb + 1) % players.len());
    first_can_act_from(players, start)
}

/// After the flop the small blind acts first, which heads-up is the button.
pub fn first_to_act_postflop(players: &[Player], table: &TableState) -> Option<usize> {
    first_can_act_from(players, table.sb)
}

/// The next seat after `current` that can act.
pub fn next_to_act(players: &[Player], current: usize) -> Option<usize> {
    let n = players.len();
    (1..=n)
        .map(|offset| (current + offset) % n)
        .find(|&seat| players[seat].can_act())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(n: usize, stack: Chips) -> Vec<Player> {
        (0..n).map(|seat| Player::new(seat, stack)).collect()
    }

    #[test]
    fn test_positions_multiway() {
        assert_eq!((3, 4, 5), blind_positions(6, 3, None));
        assert_eq!((5, 0, 1), blind_positions(6, 5, None));
    }

    #[test]
    fn test_positions_heads_up() {
        assert_eq!((1, 1, 0), blind_positions(2, 1, None));
    }

    #[test]
    fn test_positions_fixed_utg() {
        // UTG is seat 0, so the blinds sit on the last two seats.
        assert_eq!((3, 4, 5), blind_positions(6, 2, Some(0)));
        assert_eq!((0, 1, 2), blind_positions(4, 2, Some(3)));
        // Heads-up the fixed seat is the button and small blind.
        assert_eq!((1, 1, 0), blind_positions(2, 0, Some(1)));
    }

    #[test]
    fn test_big_blind_option() {
        let mut players = table(2, 100);
        players[0].post(5);
        players[1].post(10);
        assert!(!is_betting_done(&players));

        // Small blind completes, the big blind still has to act.
        players[0].bet_to(10);
        players[0].has_acted = true;
        assert!(!is_betting_done(&players));

        players[1].has_acted = true;
        assert!(is_betting_done(&players));
    }

    #[test]
    fn test_unmatched_bet_keeps_street_open() {
        let mut players = table(3, 100);
        for p in players.iter_mut() {
            p.has_acted = true;
        }
        players[1].bet_to(20);
        assert!(!is_betting_done(&players));
    }

    #[test]
    fn test_lone_actor_facing_all_in_must_act() {
        let mut players = table(2, 100);
        players[0].bet_to(100);
        assert!(players[0].all_in);
        assert_eq!(1, num_can_act(&players));
        assert!(!is_betting_done(&players));
        assert!(!is_hand_done(&players, &TableState::default()));

        players[1].bet_to(100);
        assert!(is_betting_done(&players));
        assert!(is_hand_done(&players, &TableState::default()));
    }

    #[test]
    fn test_lone_actor_covering_short_all_in_is_done() {
        let mut players = table(2, 100);
        players[0].stack = 5;
        players[0].post(5);
        players[1].post(10);
        assert!(is_betting_done(&players));
        assert!(is_hand_done(&players, &TableState::default()));
    }

    #[test]
    fn test_everyone_folds() {
        let mut players = table(3, 100);
        players[0].fold();
        players[1].fold();
        assert_eq!(1, num_not_folded(&players));
        assert!(is_hand_done(&players, &TableState::default()));
    }

    #[test]
    fn test_turn_order_skips() {
        let mut players = table(4, 100);
        let state = TableState {
            button: 0,
            sb: 1,
            bb: 2,
            ..TableState::default()
        };
        assert_eq!(Some(3), first_to_act_preflop(&players, &state, None));
        assert_eq!(Some(1), first_to_act_postflop(&players, &state));

        players[3].fold();
        players[1].stack = 0;
        players[1].all_in = true;
        assert_eq!(Some(0), first_to_act_preflop(&players, &state, None));
        assert_eq!(Some(2), first_to_act_postflop(&players, &state));
        assert_eq!(Some(2), first_to_act_preflop(&players, &state, Some(2)));
        assert_eq!(Some(2), next_to_act(&players, 0));
        assert_eq!(Some(0), next_to_act(&players, 2));
    }

    #[test]
    fn test_next_to_act_none_when_nobody_can() {
        let mut players = table(3, 100);
        players[0].fold();
        players[1].bet_to(100);
        players[2].bet_to(100);
        assert_eq!(None, next_to_act(&players, 1));
        assert_eq!(None, next_to_act(&players, 0));
    }

    #[test]
    fn test_capped_raise_blocks_only_listed_seats() {
        let mut cannot_reopen = PlayerBitSet::default();
        cannot_reopen.enable(2);
        let capped = CappedRaise {
            happened: true,
            raiser: Some(0),
            cannot_reopen,
        };
        assert!(capped.blocks(2));
        assert!(!capped.blocks(1));
        assert!(!CappedRaise::default().blocks(2));
    }
}
