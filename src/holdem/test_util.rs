use approx::assert_abs_diff_eq;

use super::Chips;
use super::engine::HandEngine;
use crate::core::{CardBitSet, HandEvaluator};

/// Check the invariants that must hold between any two steps of a hand.
pub fn assert_valid_hand_state<E: HandEvaluator>(engine: &HandEngine<E>) {
    let players = engine.players();

    // Chips only move between stacks, bets and the pot.
    let starting: Chips = players.iter().map(|p| p.starting_stack).sum();
    let stacks: Chips = players.iter().map(|p| p.stack).sum();
    let bets: Chips = players.iter().map(|p| p.current_bet).sum();
    assert_eq!(
        starting,
        stacks + bets + engine.committed_pots().total(),
        "Chips were created or lost: {players:?}"
    );

    for player in players {
        assert!(player.current_bet <= player.total_invested);
        if player.stack == 0 && player.total_invested > 0 && !player.folded {
            assert!(player.all_in, "Seat {} has no chips but is not all in", player.seat);
        }
    }

    validate_pot_eligibility(engine);
    validate_cards(engine);

    if engine.is_done() {
        assert!(engine.current_player().is_none());
        let rewards = engine.rewards();
        assert_abs_diff_eq!(0.0, rewards.iter().sum::<f32>(), epsilon = 1e-3);
        let paid: Chips = engine.payouts().iter().map(|p| p.amount).sum();
        let invested: Chips = players.iter().map(|p| p.total_invested).sum();
        assert_eq!(invested, paid, "Payouts must add up to the pot");
    } else {
        let seat = engine
            .current_player()
            .expect("A running hand has a player to act");
        assert!(engine.players()[seat].can_act());
        assert!(engine.legal_actions().contains(0));
    }
}

/// Players who committed more can win at least the same pots.
fn validate_pot_eligibility<E: HandEvaluator>(engine: &HandEngine<E>) {
    let players = engine.players();
    let committed = |seat: usize| players[seat].total_invested - players[seat].current_bet;
    for a in players {
        for b in players {
            if committed(a.seat) <= committed(b.seat) {
                assert!(
                    a.side_pot_rank <= b.side_pot_rank,
                    "Seat {} committed less than seat {} but can win more pots",
                    a.seat,
                    b.seat
                );
            }
        }
        if !engine.is_done() {
            assert!(a.side_pot_rank < engine.committed_pots().num_layers());
        }
    }
}

/// No card is in two places at once.
fn validate_cards<E: HandEvaluator>(engine: &HandEngine<E>) {
    let board = engine.community_cards();
    assert!(board.len() <= 5);
    let mut seen = CardBitSet::new();
    let dealt = engine
        .players()
        .iter()
        .filter_map(|p| p.hand)
        .flatten()
        .chain(board.iter().copied());
    for card in dealt {
        assert!(seen.insert(card), "{card} was dealt twice");
        assert!(!engine.deck().contains(card), "{card} is dealt and in the deck");
    }
}
