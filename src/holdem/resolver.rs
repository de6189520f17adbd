//! Turning what an agent asks for into something the rules allow.
//!
//! Nothing a caller requests during a hand is rejected. Folding for free
//! becomes a check, raises that are too small or too large are clamped,
//! and raises the rules forbid are demoted to calls.

use rand::Rng;

use super::Chips;
use super::action::{
    ActionType, CHECK_CALL_INDEX, FIRST_RAISE_INDEX, FOLD_INDEX, ResolvedAction,
};
use super::action_set::ActionSet;
use super::betting::{TableState, max_bet};
use super::config::{LimitType, TableConfig};
use super::errors::HoldemError;
use super::player::Player;
use super::pot::Pot;
use super::round::Round;

/// A read-only view of the table used to legalize actions.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    pub config: &'a TableConfig,
    pub table: &'a TableState,
    pub players: &'a [Player],
    pub pot: &'a Pot,
}

impl<'a> Resolver<'a> {
    pub fn new(
        config: &'a TableConfig,
        table: &'a TableState,
        players: &'a [Player],
        pot: &'a Pot,
    ) -> Self {
        Self {
            config,
            table,
            players,
            pot,
        }
    }

    #[inline]
    pub fn max_bet(&self) -> Chips {
        max_bet(self.players)
    }

    /// Chips `seat` still owes to stay in.
    pub fn to_call(&self, seat: usize) -> Chips {
        self.max_bet()
            .saturating_sub(self.players[seat].current_bet)
    }

    /// Everything in the middle, including bets not yet swept.
    pub fn pot_size(&self) -> Chips {
        self.pot.total() + self.players.iter().map(|p| p.current_bet).sum::<Chips>()
    }

    /// Smallest total bet that counts as a full raise.
    pub fn min_raise_total(&self) -> Chips {
        self.max_bet() + self.config.big_blind.max(self.table.last_raise_delta)
    }

    /// Largest total bet `seat` may make.
    pub fn max_raise_total(&self, seat: usize) -> Chips {
        let player = &self.players[seat];
        let all_in = player.stack + player.current_bet;
        match self.config.limit {
            LimitType::NoLimit => all_in,
            LimitType::PotLimit => {
                let cap = self.max_bet() + self.pot_size() + self.to_call(seat);
                cap.max(self.min_raise_total()).min(all_in)
            }
            LimitType::FixedLimit => {
                (self.max_bet() + self.config.limit_unit(self.table.round)).min(all_in)
            }
        }
    }

    /// Total bet for a raise of `fraction` of the pot after calling.
    pub fn fraction_of_pot_raise(&self, seat: usize, fraction: f32) -> Chips {
        let to_call = self.to_call(seat);
        let pot_after_call = self.pot_size() + to_call;
        let raise = (pot_after_call as f64 * fraction as f64).max(0.0) as Chips;
        // Huge fractions saturate, the resolver clamps them to all in.
        self.players[seat]
            .current_bet
            .saturating_add(to_call)
            .saturating_add(raise)
    }

    fn check_call(&self, seat: usize) -> ResolvedAction {
        let player = &self.players[seat];
        ResolvedAction {
            action_type: ActionType::CheckCall,
            total_bet: player.current_bet + self.to_call(seat).min(player.stack),
        }
    }

    fn others_can_respond(&self, seat: usize) -> bool {
        self.players
            .iter()
            .any(|p| p.seat != seat && p.can_act())
    }

    /// Legalize a request for `seat`. Idempotent: resolving a resolved
    /// action returns it unchanged.
    pub fn resolve(&self, seat: usize, requested: ActionType, amount: Chips) -> ResolvedAction {
        let player = &self.players[seat];
        match requested {
            ActionType::Fold => {
                if self.to_call(seat) == 0 {
                    self.check_call(seat)
                } else {
                    ResolvedAction {
                        action_type: ActionType::Fold,
                        total_bet: player.current_bet,
                    }
                }
            }
            ActionType::CheckCall => {
                if self.config.first_action_no_call
                    && self.table.n_actions_this_hand == 0
                    && self.table.round == Round::Preflop
                {
                    ResolvedAction {
                        action_type: ActionType::Fold,
                        total_bet: player.current_bet,
                    }
                } else {
                    self.check_call(seat)
                }
            }
            ActionType::BetRaise => {
                if self.config.is_fixed_limit()
                    && self.table.round != Round::Preflop
                    && self.table.n_raises_this_round >= self.config.raise_cap(self.table.round)
                {
                    return self.check_call(seat);
                }
                if player.stack + player.current_bet <= self.max_bet()
                    || self.table.capped_raise.blocks(seat)
                    || !self.others_can_respond(seat)
                {
                    return self.check_call(seat);
                }
                let ceiling = self.max_raise_total(seat);
                let total = match self.config.limit {
                    LimitType::FixedLimit => ceiling,
                    _ => amount.max(self.min_raise_total()).min(ceiling),
                };
                ResolvedAction {
                    action_type: ActionType::BetRaise,
                    total_bet: total,
                }
            }
        }
    }

    /// The request a discrete action index stands for, before legalizing.
    pub fn discrete_request(
        &self,
        seat: usize,
        index: usize,
    ) -> Result<(ActionType, Chips), HoldemError> {
        match index {
            FOLD_INDEX => Ok((ActionType::Fold, 0)),
            CHECK_CALL_INDEX => Ok((ActionType::CheckCall, 0)),
            _ => {
                let fraction = self
                    .config
                    .bet_sizes
                    .get(index.wrapping_sub(FIRST_RAISE_INDEX))
                    .ok_or(HoldemError::InvalidActionIndex {
                        index,
                        num_actions: self.config.num_actions(),
                    })?;
                Ok((ActionType::BetRaise, self.fraction_of_pot_raise(seat, *fraction)))
            }
        }
    }

    /// Like `discrete_request`, but a raise is drawn uniformly from the
    /// band between its neighbours: from the midpoint with the next smaller
    /// size (or the min raise) up to the midpoint with the next larger size
    /// (or all in).
    pub fn interpolated_request<R: Rng + ?Sized>(
        &self,
        seat: usize,
        index: usize,
        rng: &mut R,
    ) -> Result<(ActionType, Chips), HoldemError> {
        let (action_type, amount) = self.discrete_request(seat, index)?;
        if action_type != ActionType::BetRaise {
            return Ok((action_type, amount));
        }
        let sizes = &self.config.bet_sizes;
        let k = index - FIRST_RAISE_INDEX;
        let player = &self.players[seat];

        let high = match sizes.get(k + 1) {
            Some(bigger) => midpoint(amount, self.fraction_of_pot_raise(seat, *bigger)),
            None => player.stack + player.current_bet,
        };
        let low = match k.checked_sub(1) {
            Some(prev) => midpoint(amount, self.fraction_of_pot_raise(seat, sizes[prev])),
            None => self.min_raise_total(),
        };
        if low >= high {
            return Ok((ActionType::BetRaise, low));
        }
        Ok((ActionType::BetRaise, rng.random_range(low..high)))
    }

    /// Discrete indices that are open to `seat`.
    ///
    /// Fold is always listed. Raise sizes are scanned from small to large:
    /// a run of sizes that all clamp up to the min raise collapses into its
    /// largest index, and the scan stops at the first size that is demoted
    /// or clamped down to the ceiling.
    pub fn legal_actions(&self, seat: usize) -> ActionSet {
        let mut legal = ActionSet::new();
        legal.insert(FOLD_INDEX);
        if self.resolve(seat, ActionType::CheckCall, 0).action_type == ActionType::CheckCall {
            legal.insert(CHECK_CALL_INDEX);
        }

        let mut too_small = None;
        for index in FIRST_RAISE_INDEX..self.config.num_actions() {
            let Ok((_, requested)) = self.discrete_request(seat, index) else {
                break;
            };
            let fixed = self.resolve(seat, ActionType::BetRaise, requested);
            if fixed.action_type != ActionType::BetRaise {
                break;
            }
            if requested < fixed.total_bet {
                too_small = Some(index);
            } else {
                if let Some(pending) = too_small.take() {
                    legal.insert(pending);
                }
                legal.insert(index);
            }
            if requested > fixed.total_bet {
                break;
            }
        }
        if let Some(pending) = too_small {
            legal.insert(pending);
        }
        legal
    }

    /// Nearest discrete index for a raise to `bb_multiple` big blinds.
    pub fn action_index_for_bb_multiple(&self, seat: usize, bb_multiple: f32) -> usize {
        if bb_multiple <= 0.0 {
            return FOLD_INDEX;
        }
        let big_blind = self.config.big_blind as f32;
        let target = bb_multiple * big_blind;
        if target <= self.max_bet() as f32 + 0.1 {
            return CHECK_CALL_INDEX;
        }
        let mut best = CHECK_CALL_INDEX;
        let mut best_diff = f32::MAX;
        for (k, fraction) in self.config.bet_sizes.iter().enumerate() {
            let amount = self.fraction_of_pot_raise(seat, *fraction) as f32;
            let diff = (amount - target).abs();
            if diff < best_diff {
                best_diff = diff;
                best = FIRST_RAISE_INDEX + k;
            }
            if diff < big_blind * 0.1 {
                break;
            }
        }
        best
    }
}

/// Halfway between two amounts, rounded down, without overflowing.
fn midpoint(a: Chips, b: Chips) -> Chips {
    a / 2 + b / 2 + (a % 2 + b % 2) / 2
}

/// Nearest discrete index for an action that was already taken.
///
/// Raises are matched on `bet_amount / pot_at_action` against the bet
/// sizes; an all-in raise maps to the largest size.
pub fn nearest_action_index(
    config: &TableConfig,
    action_type: ActionType,
    bet_amount: Chips,
    pot_at_action: Chips,
    all_in: bool,
) -> usize {
    match action_type {
        ActionType::Fold => FOLD_INDEX,
        ActionType::CheckCall => CHECK_CALL_INDEX,
        ActionType::BetRaise => {
            if config.bet_sizes.is_empty() {
                return CHECK_CALL_INDEX;
            }
            if all_in {
                return config.num_actions() - 1;
            }
            let pot = if pot_at_action == 0 {
                config.big_blind
            } else {
                pot_at_action
            };
            let multiple = bet_amount as f32 / pot as f32;
            let mut best = FIRST_RAISE_INDEX;
            let mut best_diff = f32::MAX;
            for (k, fraction) in config.bet_sizes.iter().enumerate() {
                let diff = (multiple - fraction).abs();
                if diff < best_diff {
                    best_diff = diff;
                    best = FIRST_RAISE_INDEX + k;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::core::PlayerBitSet;
    use crate::holdem::betting::CappedRaise;

    struct Fixture {
        config: TableConfig,
        table: TableState,
        players: Vec<Player>,
        pot: Pot,
    }

    impl Fixture {
        /// Heads-up preflop with the blinds in, seat 0 on the button.
        fn heads_up(stack: Chips) -> Self {
            let config = TableConfig {
                num_seats: 2,
                small_blind: 5,
                big_blind: 10,
                default_stack: stack,
                bet_sizes: vec![0.5, 1.0, 2.0],
                ..TableConfig::default()
            };
            let mut players = vec![Player::new(0, stack), Player::new(1, stack)];
            players[0].post(5);
            players[1].post(10);
            let table = TableState {
                button: 0,
                sb: 0,
                bb: 1,
                current_player: Some(0),
                ..TableState::default()
            };
            Self {
                config,
                table,
                players,
                pot: Pot::default(),
            }
        }

        fn resolver(&self) -> Resolver<'_> {
            Resolver::new(&self.config, &self.table, &self.players, &self.pot)
        }
    }

    #[test]
    fn test_pot_and_min_raise() {
        let fx = Fixture::heads_up(1000);
        let r = fx.resolver();
        assert_eq!(15, r.pot_size());
        assert_eq!(5, r.to_call(0));
        assert_eq!(0, r.to_call(1));
        assert_eq!(20, r.min_raise_total());
    }

    #[test]
    fn test_free_fold_is_a_check() {
        let fx = Fixture::heads_up(1000);
        let r = fx.resolver();
        let fixed = r.resolve(1, ActionType::Fold, 0);
        assert_eq!(ActionType::CheckCall, fixed.action_type);
        assert_eq!(10, fixed.total_bet);

        assert_eq!(ActionType::Fold, r.resolve(0, ActionType::Fold, 0).action_type);
    }

    #[test]
    fn test_call_is_capped_by_stack() {
        let mut fx = Fixture::heads_up(1000);
        fx.players[1].bet_to(500);
        fx.players[0].stack = 100;
        let fixed = fx.resolver().resolve(0, ActionType::CheckCall, 0);
        assert_eq!(ActionType::CheckCall, fixed.action_type);
        assert_eq!(105, fixed.total_bet);
    }

    #[test]
    fn test_first_action_no_call() {
        let mut fx = Fixture::heads_up(1000);
        fx.config.first_action_no_call = true;
        assert_eq!(
            ActionType::Fold,
            fx.resolver().resolve(0, ActionType::CheckCall, 0).action_type
        );
        fx.table.n_actions_this_hand = 1;
        assert_eq!(
            ActionType::CheckCall,
            fx.resolver().resolve(0, ActionType::CheckCall, 0).action_type
        );
    }

    #[test]
    fn test_raise_is_clamped() {
        let fx = Fixture::heads_up(1000);
        let r = fx.resolver();
        let small = r.resolve(0, ActionType::BetRaise, 12);
        assert_eq!(ActionType::BetRaise, small.action_type);
        assert_eq!(20, small.total_bet);

        let huge = r.resolve(0, ActionType::BetRaise, 10_000);
        assert_eq!(1000, huge.total_bet);

        let exact = r.resolve(0, ActionType::BetRaise, 70);
        assert_eq!(70, exact.total_bet);
        assert_eq!(exact, r.resolve(0, exact.action_type, exact.total_bet));
    }

    #[test]
    fn test_min_raise_follows_last_raise() {
        let mut fx = Fixture::heads_up(1000);
        fx.players[0].bet_to(40);
        fx.table.last_raise_delta = 30;
        let r = fx.resolver();
        assert_eq!(70, r.min_raise_total());
        assert_eq!(70, r.resolve(1, ActionType::BetRaise, 50).total_bet);
    }

    #[test]
    fn test_cannot_raise_without_covering() {
        let mut fx = Fixture::heads_up(1000);
        fx.players[1].bet_to(300);
        fx.players[0].stack = 200;
        let fixed = fx.resolver().resolve(0, ActionType::BetRaise, 500);
        assert_eq!(ActionType::CheckCall, fixed.action_type);
        assert_eq!(205, fixed.total_bet);
    }

    #[test]
    fn test_no_raise_when_nobody_can_respond() {
        let mut fx = Fixture::heads_up(1000);
        fx.players[1].bet_to(1000);
        assert!(fx.players[1].all_in);
        let fixed = fx.resolver().resolve(0, ActionType::BetRaise, 2000);
        assert_eq!(ActionType::CheckCall, fixed.action_type);
        assert_eq!(1000, fixed.total_bet);
    }

    #[test]
    fn test_capped_raise_blocks_reopen() {
        let mut fx = Fixture::heads_up(1000);
        let mut cannot_reopen = PlayerBitSet::default();
        cannot_reopen.enable(0);
        fx.table.capped_raise = CappedRaise {
            happened: true,
            raiser: Some(1),
            cannot_reopen,
        };
        let r = fx.resolver();
        assert_eq!(
            ActionType::CheckCall,
            r.resolve(0, ActionType::BetRaise, 100).action_type
        );
        assert_eq!(
            ActionType::BetRaise,
            r.resolve(1, ActionType::BetRaise, 100).action_type
        );
    }

    #[test]
    fn test_fixed_limit_cap_and_unit() {
        let mut fx = Fixture::heads_up(1000);
        fx.config.limit = LimitType::FixedLimit;
        fx.config.max_raises_per_round = [4, 4, 4, 4];
        fx.table.round = Round::Turn;
        for p in fx.players.iter_mut() {
            p.sweep();
        }

        let bet = fx.resolver().resolve(0, ActionType::BetRaise, 5);
        assert_eq!(ActionType::BetRaise, bet.action_type);
        assert_eq!(20, bet.total_bet);

        fx.table.n_raises_this_round = 4;
        let capped = fx.resolver().resolve(0, ActionType::BetRaise, 500);
        assert_eq!(ActionType::CheckCall, capped.action_type);
        assert_eq!(0, capped.total_bet);

        // Preflop is never capped.
        fx.table.round = Round::Preflop;
        assert_eq!(
            ActionType::BetRaise,
            fx.resolver().resolve(0, ActionType::BetRaise, 500).action_type
        );
    }

    #[test]
    fn test_pot_limit_ceiling() {
        let mut fx = Fixture::heads_up(1000);
        fx.config.limit = LimitType::PotLimit;
        let r = fx.resolver();
        // Call 5 then raise the 20 in the middle.
        assert_eq!(30, r.max_raise_total(0));
        assert_eq!(30, r.resolve(0, ActionType::BetRaise, 900).total_bet);
    }

    #[test]
    fn test_fraction_of_pot_raise() {
        let fx = Fixture::heads_up(1000);
        let r = fx.resolver();
        // Pot 15, call 5, pot after call 20.
        assert_eq!(20, r.fraction_of_pot_raise(0, 0.5));
        assert_eq!(30, r.fraction_of_pot_raise(0, 1.0));
        assert_eq!(50, r.fraction_of_pot_raise(0, 2.0));
    }

    #[test]
    fn test_discrete_request_bounds() {
        let fx = Fixture::heads_up(1000);
        let r = fx.resolver();
        assert_eq!((ActionType::Fold, 0), r.discrete_request(0, 0).unwrap());
        assert_eq!((ActionType::BetRaise, 50), r.discrete_request(0, 4).unwrap());
        assert!(matches!(
            r.discrete_request(0, 5),
            Err(HoldemError::InvalidActionIndex {
                index: 5,
                num_actions: 5
            })
        ));
    }

    #[test]
    fn test_legal_actions_full_range() {
        let fx = Fixture::heads_up(1000);
        let legal = fx.resolver().legal_actions(0);
        assert_eq!(vec![0, 1, 2, 3, 4], legal.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_legal_actions_stop_at_all_in() {
        let mut fx = Fixture::heads_up(1000);
        fx.config.bet_sizes = vec![0.5, 1.0, 2.0, 4.0];
        fx.players[0].stack = 40;
        let legal = fx.resolver().legal_actions(0);
        // Twice pot clamps down to the 45 all in and ends the scan, so four
        // times pot is never offered.
        assert_eq!(vec![0, 1, 2, 3, 4], legal.iter().collect::<Vec<_>>());
        assert!(!legal.contains(5));
    }

    #[test]
    fn test_legal_actions_collapse_small_sizes() {
        let mut fx = Fixture::heads_up(1000);
        fx.config.bet_sizes = vec![0.05, 0.1, 1.0];
        let legal = fx.resolver().legal_actions(0);
        // 0.05 and 0.1 both clamp up to the min raise, only the larger stays.
        assert_eq!(vec![0, 1, 3, 4], legal.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_legal_actions_when_raising_is_closed() {
        let mut fx = Fixture::heads_up(1000);
        fx.players[1].bet_to(1000);
        let legal = fx.resolver().legal_actions(0);
        assert_eq!(vec![0, 1], legal.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_interpolated_request_stays_in_band() {
        let mut fx = Fixture::heads_up(1000);
        fx.config.uniform_action_interpolation = true;
        let r = fx.resolver();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            // Half pot: from the min raise to halfway to a pot raise.
            let (_, first) = r.interpolated_request(0, 2, &mut rng).unwrap();
            assert!((20..25).contains(&first), "got {first}");
            // Twice pot: from halfway down to a pot raise up to all in.
            let (_, last) = r.interpolated_request(0, 4, &mut rng).unwrap();
            assert!((40..1000).contains(&last), "got {last}");
        }
        assert_eq!(
            (ActionType::CheckCall, 0),
            r.interpolated_request(0, 1, &mut rng).unwrap()
        );
    }

    #[test]
    fn test_huge_bet_size_goes_all_in() {
        let mut fx = Fixture::heads_up(1000);
        fx.config.bet_sizes = vec![0.5, 1e20];
        fx.config.validate().unwrap();
        let r = fx.resolver();

        assert_eq!(Chips::MAX, r.fraction_of_pot_raise(0, 1e20));
        assert_eq!(vec![0, 1, 2, 3], r.legal_actions(0).iter().collect::<Vec<_>>());
        let (_, requested) = r.discrete_request(0, 3).unwrap();
        assert_eq!(1000, r.resolve(0, ActionType::BetRaise, requested).total_bet);

        let mut rng = StdRng::seed_from_u64(3);
        for index in [2, 3] {
            let (action_type, amount) = r.interpolated_request(0, index, &mut rng).unwrap();
            let fixed = r.resolve(0, action_type, amount);
            assert_eq!(ActionType::BetRaise, fixed.action_type);
            assert!((20..=1000).contains(&fixed.total_bet));
        }
    }

    #[test]
    fn test_midpoint_does_not_overflow() {
        assert_eq!(25, midpoint(20, 30));
        assert_eq!(20, midpoint(20, 21));
        assert_eq!(Chips::MAX - 1, midpoint(Chips::MAX, Chips::MAX - 1));
    }

    #[test]
    fn test_action_index_for_bb_multiple() {
        let fx = Fixture::heads_up(1000);
        let r = fx.resolver();
        assert_eq!(FOLD_INDEX, r.action_index_for_bb_multiple(0, 0.0));
        assert_eq!(CHECK_CALL_INDEX, r.action_index_for_bb_multiple(0, 1.0));
        assert_eq!(3, r.action_index_for_bb_multiple(0, 3.0));
        assert_eq!(4, r.action_index_for_bb_multiple(0, 40.0));
    }

    #[test]
    fn test_nearest_action_index() {
        let config = TableConfig::default();
        assert_eq!(0, nearest_action_index(&config, ActionType::Fold, 0, 100, false));
        assert_eq!(1, nearest_action_index(&config, ActionType::CheckCall, 50, 100, false));
        assert_eq!(2, nearest_action_index(&config, ActionType::BetRaise, 55, 100, false));
        assert_eq!(3, nearest_action_index(&config, ActionType::BetRaise, 90, 100, false));
        assert_eq!(4, nearest_action_index(&config, ActionType::BetRaise, 90, 100, true));
        // An empty pot is measured in big blinds.
        assert_eq!(3, nearest_action_index(&config, ActionType::BetRaise, 100, 0, false));
    }
}
