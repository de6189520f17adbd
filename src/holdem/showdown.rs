use tracing::{debug, event};

use super::action::{Payout, PotLabel};
use super::player::Player;
use super::pot::Pot;
use crate::core::{Card, HandEvaluator, HandStrength};

/// Description attached to a pot nobody contested.
pub const UNCONTESTED: &str = "Won by default";

fn strength<E: HandEvaluator>(evaluator: &E, player: &Player, board: &[Card]) -> HandStrength {
    match player.hand {
        Some(hole) => {
            let mut cards = Vec::with_capacity(2 + board.len());
            cards.extend_from_slice(&hole);
            cards.extend_from_slice(board);
            evaluator.rank(&cards)
        }
        None => HandStrength::UNRANKABLE,
    }
}

/// Pay out every pot layer and return what was paid.
///
/// Layer `k` goes to the contenders whose `side_pot_rank` is at least `k`.
/// The strongest hands split it evenly and any odd chips go to the first
/// winner by seat. `pot` must have been recalculated after the last sweep.
pub fn distribute<E: HandEvaluator>(
    evaluator: &E,
    players: &mut [Player],
    pot: &Pot,
    board: &[Card],
) -> Vec<Payout> {
    let mut contenders: Vec<usize> = players
        .iter()
        .filter(|p| !p.folded && p.total_invested > 0)
        .map(|p| p.seat)
        .collect();
    if contenders.is_empty() {
        contenders = players.iter().filter(|p| !p.folded).map(|p| p.seat).collect();
    }

    // Only rank hands if some layer is actually contested.
    let mut strengths: Vec<Option<HandStrength>> = vec![None; players.len()];
    let mut payouts = Vec::new();

    for layer in 0..pot.num_layers() {
        let amount = pot.layer(layer).unwrap_or(0);
        if amount == 0 {
            continue;
        }
        let label = PotLabel::for_layer(layer);

        let mut eligible: Vec<usize> = contenders
            .iter()
            .copied()
            .filter(|&seat| players[seat].side_pot_rank >= layer)
            .collect();
        if eligible.is_empty() {
            event!(
                tracing::Level::WARN,
                layer,
                amount,
                "No eligible contender for pot layer, splitting among all contenders"
            );
            eligible.clone_from(&contenders);
        }
        if eligible.is_empty() {
            event!(tracing::Level::WARN, layer, amount, "Pot layer left unclaimed");
            continue;
        }

        if let [seat] = eligible[..] {
            players[seat].award(amount);
            debug!(seat, amount, %label, "Pot won uncontested");
            payouts.push(Payout {
                seat,
                amount,
                pot: label,
                hand_description: UNCONTESTED.to_string(),
                hole_cards: players[seat].hand,
            });
            continue;
        }

        for &seat in &eligible {
            if strengths[seat].is_none() {
                strengths[seat] = Some(strength(evaluator, &players[seat], board));
            }
        }
        let best = eligible
            .iter()
            .filter_map(|&seat| strengths[seat])
            .min()
            .unwrap_or(HandStrength::UNRANKABLE);
        let winners: Vec<usize> = eligible
            .into_iter()
            .filter(|&seat| strengths[seat] == Some(best))
            .collect();

        let share = amount / winners.len() as u64;
        let odd = amount % winners.len() as u64;
        for (i, &seat) in winners.iter().enumerate() {
            let won = if i == 0 { share + odd } else { share };
            if won == 0 {
                continue;
            }
            players[seat].award(won);
            debug!(seat, amount = won, %label, hand = %best, "Pot awarded at showdown");
            payouts.push(Payout {
                seat,
                amount: won,
                pot: label,
                hand_description: best.description(),
                hole_cards: players[seat].hand,
            });
        }
    }
    payouts
}
