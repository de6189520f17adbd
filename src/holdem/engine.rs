//! # Hand engine
//!
//! [`HandEngine`] owns one table and plays it one action at a time. Every
//! call to [`HandEngine::step`] legalizes the request, moves chips, advances
//! the street when betting closes and pays out once the hand is over.
//!
//! ```rust
//! use holdem_env::holdem::{HandEngine, StepAction, TableConfig};
//!
//! let config = TableConfig {
//!     num_seats: 3,
//!     small_blind: 5,
//!     big_blind: 10,
//!     default_stack: 1_000,
//!     ..TableConfig::default()
//! };
//! let mut engine = HandEngine::with_seed(config, 7).unwrap();
//! engine.reset().unwrap();
//!
//! // Everyone just calls or checks until the hand is over.
//! let mut result = engine.step(StepAction::check_call()).unwrap();
//! while !result.done {
//!     result = engine.step(StepAction::check_call()).unwrap();
//! }
//! let total: f32 = result.rewards.iter().sum();
//! assert!(total.abs() < 1e-3);
//! ```

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument, trace};

use super::Chips;
use super::action::{
    ActionRecord, ActionType, Payout, ResolvedAction, StepAction, StepResult,
};
use super::action_set::ActionSet;
use super::betting::{
    CappedRaise, TableState, blind_positions, first_to_act_postflop, first_to_act_preflop,
    is_betting_done, is_hand_done, max_bet, next_to_act, num_not_folded,
};
use super::config::{PREFLOP_ONLY_STACK_IN_BB, TableConfig};
use super::errors::HoldemError;
use super::player::Player;
use super::pot::Pot;
use super::resolver::{Resolver, nearest_action_index};
use super::round::Round;
use super::showdown;
use super::snapshot::HandSnapshot;
use crate::core::{
    Card, CardBitSet, Deck, Equity, EquityEvaluator, HandEvaluator, PlayerBitSet,
    RankEvaluator, SuitCanonicalizer, SuitMap,
};

/// Cards to pin for the next hand.
///
/// Seats without an entry, or with `None`, are dealt at random. The board
/// length picks the street the hand starts on: 0 preflop, 3 flop, 4 turn,
/// 5 river. Blinds and antes are posted either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DealScenario {
    pub hole_cards: Vec<Option<[Card; 2]>>,
    pub board: Vec<Card>,
    /// Button seat, random when `None`. Ignored with a fixed UTG seat.
    pub button: Option<usize>,
}

pub struct HandEngine<E: HandEvaluator = RankEvaluator> {
    config: TableConfig,
    evaluator: E,
    equity_evaluator: Option<Box<dyn EquityEvaluator>>,
    rng: StdRng,
    deck: Deck,
    players: Vec<Player>,
    pot: Pot,
    table: TableState,
    board: Vec<Card>,
    history: Vec<ActionRecord>,
    payouts: Vec<Payout>,
    reward_scalar: f32,
    suit_cache: SuitCanonicalizer,
    equities: Vec<Option<Equity>>,
}

impl<E: HandEvaluator> fmt::Debug for HandEngine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandEngine")
            .field("table", &self.table)
            .field("players", &self.players)
            .field("pot", &self.pot)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}

impl HandEngine<RankEvaluator> {
    /// An engine seeded from the thread rng.
    pub fn new(config: TableConfig) -> Result<Self, HoldemError> {
        Self::with_evaluator(config, RankEvaluator, StdRng::from_rng(&mut rand::rng()))
    }

    /// An engine whose shuffles and random choices are reproducible.
    pub fn with_seed(config: TableConfig, seed: u64) -> Result<Self, HoldemError> {
        Self::with_evaluator(config, RankEvaluator, StdRng::seed_from_u64(seed))
    }
}

impl<E: HandEvaluator> HandEngine<E> {
    /// Build an engine around a custom showdown evaluator.
    ///
    /// No hand is dealt until one of the reset methods is called.
    pub fn with_evaluator(
        config: TableConfig,
        evaluator: E,
        rng: StdRng,
    ) -> Result<Self, HoldemError> {
        config.validate()?;
        let num_seats = config.num_seats;
        let players = (0..num_seats)
            .map(|seat| {
                let stack = config
                    .starting_stacks
                    .get(seat)
                    .copied()
                    .unwrap_or(config.default_stack);
                Player::new(seat, stack)
            })
            .collect();
        let suit_cache = SuitCanonicalizer::new(config.suit_cache_capacity);
        Ok(Self {
            config,
            evaluator,
            equity_evaluator: None,
            rng,
            deck: Deck::new(),
            players,
            pot: Pot::default(),
            table: TableState {
                hand_over: true,
                ..TableState::default()
            },
            board: Vec::new(),
            history: Vec::new(),
            payouts: Vec::new(),
            reward_scalar: 1.0,
            suit_cache,
            equities: vec![None; num_seats],
        })
    }

    /// Install an equity estimator. Equities are refreshed after every deal.
    pub fn set_equity_evaluator(&mut self, evaluator: Box<dyn EquityEvaluator>) {
        self.equity_evaluator = Some(evaluator);
        self.refresh_equities();
    }

    /// Deal a new hand with fresh stacks and a random button.
    #[instrument(level = "trace", skip(self))]
    pub fn reset(&mut self) -> Result<(), HoldemError> {
        let stacks = self.fresh_stacks();
        let button = self.rng.random_range(0..self.config.num_seats);
        let deck = Deck::shuffled(&mut self.rng);
        self.start_hand(&stacks, button, deck, None)
    }

    /// Deal the next hand of the orbit: stacks carry over and the button
    /// moves one seat.
    #[instrument(level = "trace", skip(self))]
    pub fn reset_new_orbit(&mut self) -> Result<(), HoldemError> {
        let stacks: Vec<Chips> = self.players.iter().map(|p| p.stack).collect();
        let button = (self.table.button + 1) % self.config.num_seats;
        let deck = Deck::shuffled(&mut self.rng);
        self.start_hand(&stacks, button, deck, None)
    }

    /// Deal a hand with some or all of the cards chosen by the caller.
    ///
    /// The scenario is checked in full before anything changes, so an error
    /// leaves the previous hand untouched.
    #[instrument(level = "trace", skip(self))]
    pub fn reset_with_cards(&mut self, scenario: &DealScenario) -> Result<(), HoldemError> {
        let num_seats = self.config.num_seats;
        if scenario.hole_cards.len() > num_seats {
            return Err(HoldemError::InvalidSeat {
                seat: scenario.hole_cards.len() - 1,
                num_seats,
            });
        }
        if let Some(seat) = scenario.button.filter(|&b| b >= num_seats) {
            return Err(HoldemError::InvalidSeat { seat, num_seats });
        }
        // The pinned board may not start the hand past the last street.
        match Round::from_board_len(scenario.board.len()) {
            Some(round) if round <= self.config.end_with_round => {}
            _ => return Err(HoldemError::InvalidBoardSize(scenario.board.len())),
        }
        let mut pinned = CardBitSet::new();
        for &card in scenario
            .hole_cards
            .iter()
            .flatten()
            .flatten()
            .chain(scenario.board.iter())
        {
            if !pinned.insert(card) {
                return Err(HoldemError::DuplicateCard { card });
            }
        }

        let mut deck = Deck::shuffled(&mut self.rng);
        for card in pinned {
            if !deck.remove_specific(card) {
                return Err(HoldemError::DuplicateCard { card });
            }
        }
        let stacks = self.fresh_stacks();
        let button = match scenario.button {
            Some(button) => button,
            None => self.rng.random_range(0..num_seats),
        };
        self.start_hand(&stacks, button, deck, Some(scenario))
    }

    /// Stacks for a full reset.
    fn fresh_stacks(&mut self) -> Vec<Chips> {
        let config = &self.config;
        let explicit = |seat: usize| config.starting_stacks.get(seat).copied();

        if config.end_with_round == Round::Preflop {
            let stack = PREFLOP_ONLY_STACK_IN_BB * config.big_blind;
            return (0..config.num_seats)
                .map(|seat| explicit(seat).unwrap_or(stack))
                .collect();
        }
        if !config.is_evaluating {
            return (0..config.num_seats)
                .map(|seat| explicit(seat).unwrap_or(config.default_stack))
                .collect();
        }

        // Evaluation stacks are distinct draws from [big blind, default stack].
        let low = config.big_blind;
        let span = (config.default_stack - low + 1) as usize;
        if span >= config.num_seats {
            let picks = sample(&mut self.rng, span, config.num_seats);
            return picks
                .iter()
                .enumerate()
                .map(|(seat, offset)| explicit(seat).unwrap_or(low + offset as Chips))
                .collect();
        }
        (0..config.num_seats)
            .map(|seat| {
                explicit(seat).unwrap_or_else(|| self.rng.random_range(low..=config.default_stack))
            })
            .collect()
    }

    fn start_hand(
        &mut self,
        stacks: &[Chips],
        button: usize,
        mut deck: Deck,
        scenario: Option<&DealScenario>,
    ) -> Result<(), HoldemError> {
        if stacks.iter().filter(|&&s| s > 0).count() < 2 {
            return Err(HoldemError::NotEnoughPlayers);
        }

        for (player, &stack) in self.players.iter_mut().zip(stacks) {
            player.start_hand(stack);
        }
        let num_seats = self.config.num_seats;
        let (button, sb, bb) = blind_positions(num_seats, button, self.config.fix_utg_position);
        self.table = TableState {
            button,
            sb,
            bb,
            ..TableState::default()
        };
        self.pot.clear();
        self.board.clear();
        self.history.clear();
        self.payouts.clear();
        self.reward_scalar = self.compute_reward_scalar();

        if self.config.ante > 0 {
            for player in self.players.iter_mut().filter(|p| !p.folded) {
                player.post(self.config.ante);
            }
            self.pot.sweep(&mut self.players);
        }
        for (seat, blind) in [(sb, self.config.small_blind), (bb, self.config.big_blind)] {
            if !self.players[seat].folded {
                self.players[seat].post(blind);
            }
        }

        let pinned_hands = scenario.map(|s| s.hole_cards.as_slice()).unwrap_or(&[]);
        for seat in 0..num_seats {
            if self.players[seat].folded {
                continue;
            }
            let hand = match pinned_hands.get(seat).copied().flatten() {
                Some(hand) => hand,
                None => [draw(&mut deck)?, draw(&mut deck)?],
            };
            self.players[seat].hand = Some(hand);
        }

        if let Some(scenario) = scenario.filter(|s| !s.board.is_empty()) {
            self.board = scenario.board.clone();
            self.table.round =
                Round::from_board_len(self.board.len()).unwrap_or(Round::Preflop);
        }
        self.deck = deck;

        self.table.current_player = if self.table.round == Round::Preflop {
            first_to_act_preflop(&self.players, &self.table, self.config.fix_utg_position)
        } else {
            first_to_act_postflop(&self.players, &self.table)
        };
        debug!(
            button,
            sb,
            bb,
            round = %self.table.round,
            ?stacks,
            current_player = ?self.table.current_player,
            "Hand started"
        );
        self.refresh_equities();

        if self.table.current_player.is_none() || is_hand_done(&self.players, &self.table) {
            self.finish_hand()?;
        }
        Ok(())
    }

    fn compute_reward_scalar(&self) -> f32 {
        if !self.config.scale_rewards {
            return 1.0;
        }
        let total: Chips = self.players.iter().map(|p| p.starting_stack).sum();
        let average = total as f32 / self.players.len() as f32;
        if average > 0.0 {
            average
        } else {
            self.config.default_stack as f32
        }
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.config, &self.table, &self.players, &self.pot)
    }

    fn acting_seat(&self) -> Result<usize, HoldemError> {
        self.table
            .current_player
            .filter(|_| !self.table.hand_over)
            .ok_or(HoldemError::NoCurrentPlayer)
    }

    /// Apply one action for the current player.
    ///
    /// Discrete indices outside the action space and calls with nobody to
    /// act are errors. Anything else is made legal first.
    #[instrument(level = "trace", skip(self))]
    pub fn step(&mut self, action: StepAction) -> Result<StepResult, HoldemError> {
        let seat = self.acting_seat()?;

        let (requested, amount, discrete_index) = match action {
            StepAction::Discrete(index) => {
                let resolver = Resolver::new(&self.config, &self.table, &self.players, &self.pot);
                let (action_type, amount) = if self.config.uniform_action_interpolation
                    && !self.config.is_evaluating
                {
                    resolver.interpolated_request(seat, index, &mut self.rng)?
                } else {
                    resolver.discrete_request(seat, index)?
                };
                (action_type, amount, Some(index))
            }
            StepAction::Explicit {
                action_type,
                amount,
            } => (action_type, amount, None),
        };

        let requested = self.limit_actions(seat, requested);
        let resolved = self.resolver().resolve(seat, requested, amount);
        trace!(
            seat,
            ?requested,
            amount,
            resolved = ?resolved.action_type,
            total_bet = resolved.total_bet,
            "Resolved action"
        );
        self.record(seat, resolved, discrete_index);
        self.apply(seat, resolved);

        let round_before = self.table.round;
        let mut done = is_hand_done(&self.players, &self.table);
        if !done && is_betting_done(&self.players) {
            self.move_to_next_round()?;
            done = is_hand_done(&self.players, &self.table);
        }
        if !done && self.table.round == round_before {
            self.table.current_player = next_to_act(&self.players, seat);
        }
        done |= self.table.current_player.is_none();
        if done {
            self.finish_hand()?;
        }

        Ok(StepResult {
            rewards: self.rewards(),
            done,
        })
    }

    /// Once a player has acted too often on one street their raises become
    /// calls, or folds when calling is not allowed either.
    fn limit_actions(&self, seat: usize, requested: ActionType) -> ActionType {
        let Some(limit) = self.config.max_actions_per_street else {
            return requested;
        };
        if requested != ActionType::BetRaise || self.players[seat].actions_this_street < limit {
            return requested;
        }
        let call = self.resolver().resolve(seat, ActionType::CheckCall, 0);
        debug!(seat, limit, "Action limit reached, raise converted");
        if call.action_type == ActionType::CheckCall {
            ActionType::CheckCall
        } else {
            ActionType::Fold
        }
    }

    fn record(&mut self, seat: usize, resolved: ResolvedAction, discrete_index: Option<usize>) {
        let pot_at_action = self.resolver().pot_size();
        let player = &self.players[seat];
        let stack_at_action = player.stack + player.current_bet;
        let bet_amount = match resolved.action_type {
            ActionType::Fold => 0,
            _ => resolved.total_bet.saturating_sub(player.current_bet),
        };
        let action_index = discrete_index.unwrap_or_else(|| {
            nearest_action_index(
                &self.config,
                resolved.action_type,
                bet_amount,
                pot_at_action,
                resolved.total_bet >= stack_at_action,
            )
        });
        self.history.push(ActionRecord {
            player: seat,
            action_type: resolved.action_type,
            bet_amount,
            round: self.table.round,
            pot_at_action,
            stack_at_action,
            action_index,
        });
    }

    fn apply(&mut self, seat: usize, resolved: ResolvedAction) {
        let previous_max = max_bet(&self.players);
        match resolved.action_type {
            ActionType::Fold => self.players[seat].fold(),
            ActionType::CheckCall => {
                self.players[seat].bet_to(resolved.total_bet);
            }
            ActionType::BetRaise => {
                self.players[seat].bet_to(resolved.total_bet);
                let raise = self.players[seat].current_bet.saturating_sub(previous_max);
                self.track_raise(seat, raise);
            }
        }
        let player = &mut self.players[seat];
        player.has_acted = true;
        player.actions_this_street += 1;
        self.table.n_actions_this_hand += 1;
    }

    /// A full raise re-opens the action for everyone. A short all-in raise
    /// only lets those who have not acted yet raise again.
    fn track_raise(&mut self, seat: usize, raise: Chips) {
        let full_raise = self.config.big_blind.max(self.table.last_raise_delta);
        self.table.last_raiser = Some(seat);
        self.table.n_raises_this_round += 1;

        if raise >= full_raise {
            self.table.last_raise_delta = raise;
            self.table.capped_raise = CappedRaise::default();
            for player in self.players.iter_mut() {
                if player.seat != seat && !player.folded {
                    player.has_acted = false;
                }
            }
            return;
        }

        let mut cannot_reopen = PlayerBitSet::default();
        for player in &self.players {
            if player.seat != seat && !player.folded && player.has_acted {
                cannot_reopen.enable(player.seat);
            }
        }
        debug!(seat, raise, full_raise, ?cannot_reopen, "Short all-in raise caps re-raising");
        self.table.capped_raise = CappedRaise {
            happened: true,
            raiser: Some(seat),
            cannot_reopen,
        };
    }

    /// Close the street: sweep bets, then deal the next street or stop if
    /// this was the last one played.
    fn move_to_next_round(&mut self) -> Result<(), HoldemError> {
        self.pot.sweep(&mut self.players);
        self.pot.recalculate(&mut self.players);

        let next = self
            .table
            .round
            .next()
            .filter(|_| self.table.round < self.config.end_with_round);
        let Some(next) = next else {
            self.table.hand_over = true;
            return Ok(());
        };

        self.deal_street(next)?;
        for player in self.players.iter_mut() {
            player.start_street();
        }
        self.table.start_street(next);
        self.table.current_player = first_to_act_postflop(&self.players, &self.table);
        debug!(round = %next, board = ?self.board, pot = self.pot.total(), "Street dealt");
        self.refresh_equities();
        Ok(())
    }

    /// Burn one and bring the board up to `round`'s length.
    fn deal_street(&mut self, round: Round) -> Result<(), HoldemError> {
        if self.board.len() >= round.board_len() {
            return Ok(());
        }
        draw(&mut self.deck)?;
        while self.board.len() < round.board_len() {
            self.board.push(draw(&mut self.deck)?);
        }
        Ok(())
    }

    /// Run the board out, pay every pot and stop the hand.
    fn finish_hand(&mut self) -> Result<(), HoldemError> {
        if num_not_folded(&self.players) >= 2 && self.config.end_with_round != Round::Preflop {
            for round in Round::ALL {
                self.deal_street(round)?;
            }
        }
        self.pot.sweep(&mut self.players);
        self.pot.recalculate(&mut self.players);
        self.payouts =
            showdown::distribute(&self.evaluator, &mut self.players, &self.pot, &self.board);
        self.pot.clear();
        self.table.hand_over = true;
        self.table.current_player = None;
        debug!(
            board = ?self.board,
            payouts = self.payouts.len(),
            stacks = ?self.players.iter().map(|p| p.stack).collect::<Vec<_>>(),
            "Hand finished"
        );
        self.refresh_equities();
        Ok(())
    }

    /// Per-seat rewards: zeros while the hand runs, the scaled chip result
    /// once it is over. The result sums to zero.
    ///
    /// Results are measured against the stacks the hand was dealt with, so
    /// chips put in on earlier streets count in the final reward. They are
    /// not measured from the start of the step that ended the hand.
    pub fn rewards(&self) -> Vec<f32> {
        if !self.table.hand_over {
            return vec![0.0; self.players.len()];
        }
        let mut rewards: Vec<f32> = self
            .players
            .iter()
            .map(|p| p.net_result() as f32 / self.reward_scalar)
            .collect();
        let sum: f32 = rewards.iter().sum();
        if sum.abs() > 1e-5 {
            let mean = sum / rewards.len() as f32;
            for reward in rewards.iter_mut() {
                *reward -= mean;
            }
        }
        rewards
    }

    fn refresh_equities(&mut self) {
        let Some(evaluator) = self.equity_evaluator.as_mut() else {
            return;
        };
        for (slot, player) in self.equities.iter_mut().zip(&self.players) {
            *slot = match player.hand {
                Some(hand) if !player.folded => Some(evaluator.equity(hand, &self.board)),
                _ => None,
            };
        }
    }

    /// Discrete actions open to the current player, empty when nobody is to
    /// act.
    pub fn legal_actions(&self) -> ActionSet {
        match self.acting_seat() {
            Ok(seat) => self.resolver().legal_actions(seat),
            Err(_) => ActionSet::new(),
        }
    }

    /// What an action by the current player would turn into, without
    /// applying it.
    pub fn resolve(
        &self,
        action_type: ActionType,
        amount: Chips,
    ) -> Result<ResolvedAction, HoldemError> {
        let seat = self.acting_seat()?;
        Ok(self.resolver().resolve(seat, action_type, amount))
    }

    pub fn min_raise_total(&self) -> Chips {
        self.resolver().min_raise_total()
    }

    /// Total bet for the current player raising `fraction` of the pot.
    pub fn fraction_of_pot_raise(&self, fraction: f32) -> Result<Chips, HoldemError> {
        let seat = self.acting_seat()?;
        Ok(self.resolver().fraction_of_pot_raise(seat, fraction))
    }

    pub fn action_index_for_bb_multiple(&self, bb_multiple: f32) -> Result<usize, HoldemError> {
        let seat = self.acting_seat()?;
        Ok(self.resolver().action_index_for_bb_multiple(seat, bb_multiple))
    }

    /// Pot plus every bet still in front of the players.
    pub fn pot_size(&self) -> Chips {
        self.resolver().pot_size()
    }

    /// What the current player owes, 0 when nobody is to act.
    pub fn to_call(&self) -> Chips {
        self.acting_seat()
            .map(|seat| self.resolver().to_call(seat))
            .unwrap_or(0)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn community_cards(&self) -> &[Card] {
        &self.board
    }

    pub fn player(&self, seat: usize) -> Result<&Player, HoldemError> {
        self.players.get(seat).ok_or(HoldemError::InvalidSeat {
            seat,
            num_seats: self.players.len(),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player(&self) -> Option<usize> {
        self.table.current_player
    }

    pub fn round(&self) -> Round {
        self.table.round
    }

    pub fn button(&self) -> usize {
        self.table.button
    }

    pub fn small_blind_seat(&self) -> usize {
        self.table.sb
    }

    pub fn big_blind_seat(&self) -> usize {
        self.table.bb
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }

    /// Pot layers as if every bet on the table were swept now.
    pub fn live_pots(&self) -> Pot {
        Pot::live(&self.players)
    }

    /// Pot layers as of the last completed street.
    pub fn committed_pots(&self) -> &Pot {
        &self.pot
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn is_done(&self) -> bool {
        self.table.hand_over
    }

    pub fn reward_scalar(&self) -> f32 {
        self.reward_scalar
    }

    /// Canonical suit order for the current board.
    pub fn canonical_suits(&mut self) -> SuitMap {
        self.suit_cache.suit_map(&self.board)
    }

    pub fn equity(&self, seat: usize) -> Option<Equity> {
        self.equities.get(seat).copied().flatten()
    }

    pub fn current_player_equity(&self) -> Option<Equity> {
        self.table.current_player.and_then(|seat| self.equity(seat))
    }

    pub fn snapshot(&self) -> HandSnapshot {
        HandSnapshot {
            players: self.players.clone(),
            pot: self.pot.clone(),
            table: self.table.clone(),
            board: self.board.clone(),
            deck: Some(self.deck.clone()),
            history: self.history.clone(),
            payouts: self.payouts.clone(),
            reward_scalar: self.reward_scalar,
        }
    }

    /// Continue from a snapshot.
    ///
    /// Missing pieces of a redacted snapshot are filled in at random: the
    /// unseen cards are shuffled into a new deck and live seats without
    /// hole cards are dealt from it.
    pub fn restore(&mut self, snapshot: HandSnapshot) -> Result<(), HoldemError> {
        let expected = self.config.num_seats;
        if snapshot.players.len() != expected {
            return Err(HoldemError::SnapshotMismatch {
                expected,
                actual: snapshot.players.len(),
            });
        }
        validate_snapshot_seats(&snapshot)?;
        let mut known = CardBitSet::new();
        for card in snapshot.known_cards() {
            if !known.insert(card) {
                return Err(HoldemError::DuplicateCard { card });
            }
            if snapshot.deck.as_ref().is_some_and(|deck| deck.contains(card)) {
                return Err(HoldemError::DuplicateCard { card });
            }
        }

        let HandSnapshot {
            mut players,
            pot,
            table,
            board,
            deck,
            history,
            payouts,
            reward_scalar,
        } = snapshot;
        let mut deck = match deck {
            Some(deck) => deck,
            None => {
                let mut deck = Deck::shuffled(&mut self.rng);
                for card in known {
                    if !deck.remove_specific(card) {
                        return Err(HoldemError::DuplicateCard { card });
                    }
                }
                deck
            }
        };
        for player in players.iter_mut().filter(|p| !p.folded && p.hand.is_none()) {
            player.hand = Some([draw(&mut deck)?, draw(&mut deck)?]);
        }

        self.players = players;
        self.pot = pot;
        self.table = table;
        self.board = board;
        self.deck = deck;
        self.history = history;
        self.payouts = payouts;
        self.reward_scalar = reward_scalar;
        self.refresh_equities();
        Ok(())
    }
}

/// Every seat a snapshot refers to must exist at its table.
fn validate_snapshot_seats(snapshot: &HandSnapshot) -> Result<(), HoldemError> {
    let num_seats = snapshot.players.len();
    let check = |seat: usize| {
        if seat < num_seats {
            Ok(())
        } else {
            Err(HoldemError::InvalidSeat { seat, num_seats })
        }
    };

    for (index, player) in snapshot.players.iter().enumerate() {
        if player.seat != index {
            return Err(HoldemError::InvalidSeat {
                seat: player.seat,
                num_seats,
            });
        }
    }
    let table = &snapshot.table;
    check(table.button)?;
    check(table.sb)?;
    check(table.bb)?;
    for seat in [
        table.current_player,
        table.last_raiser,
        table.capped_raise.raiser,
    ]
    .into_iter()
    .flatten()
    {
        check(seat)?;
    }
    if let Some(seat) = table.current_player.filter(|_| !table.hand_over) {
        if !snapshot.players[seat].can_act() {
            return Err(HoldemError::SeatCannotAct { seat });
        }
    }
    for record in &snapshot.history {
        check(record.player)?;
    }
    for payout in &snapshot.payouts {
        check(payout.seat)?;
    }

    if !table.hand_over {
        let num_layers = snapshot.pot.num_layers();
        if let Some(player) = snapshot
            .players
            .iter()
            .find(|p| p.side_pot_rank >= num_layers)
        {
            return Err(HoldemError::InvalidPotRank {
                seat: player.seat,
                rank: player.side_pot_rank,
                num_layers,
            });
        }
    }
    Ok(())
}

fn draw(deck: &mut Deck) -> Result<Card, HoldemError> {
    deck.draw().ok_or(HoldemError::DeckExhausted)
}
