use super::Chips;
use super::player::Player;

/// Main pot plus side pots.
///
/// Layer 0 is the main pot, layer `i` is `side[i - 1]`. A player with
/// `side_pot_rank == k` can win layers `0..=k`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pot {
    pub main: Chips,
    pub side: Vec<Chips>,
}

/// Result of splitting investments into layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layering {
    pub pot: Pot,
    /// Per input position, the last layer that position contributed to.
    pub ranks: Vec<usize>,
}

/// Split investments into pot layers.
///
/// Every distinct positive investment level closes a layer. The layer holds
/// what each player put in between the previous level and this one, and
/// belongs to everyone who reached it. Zero investments contribute nothing
/// and keep rank 0.
pub fn layer_investments(investments: &[Chips]) -> Layering {
    let mut levels: Vec<Chips> = investments.iter().copied().filter(|&i| i > 0).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut layers: Vec<Chips> = Vec::with_capacity(levels.len());
    let mut ranks = vec![0; investments.len()];
    let mut previous = 0;
    for level in levels {
        let layer_idx = layers.len();
        let mut amount = 0;
        for (pos, &invested) in investments.iter().enumerate() {
            if invested > previous {
                amount += invested.min(level) - previous;
                ranks[pos] = layer_idx;
            }
        }
        layers.push(amount);
        previous = level;
    }

    let mut layers = layers.into_iter();
    let main = layers.next().unwrap_or(0);
    Layering {
        pot: Pot {
            main,
            side: layers.collect(),
        },
        ranks,
    }
}

impl Pot {
    pub fn total(&self) -> Chips {
        self.main + self.side.iter().sum::<Chips>()
    }

    /// Number of layers, counting the main pot.
    pub fn num_layers(&self) -> usize {
        1 + self.side.len()
    }

    pub fn layer(&self, idx: usize) -> Option<Chips> {
        if idx == 0 {
            Some(self.main)
        } else {
            self.side.get(idx - 1).copied()
        }
    }

    pub fn clear(&mut self) {
        self.main = 0;
        self.side.clear();
    }

    /// Move every bet on the table into the main pot.
    pub fn sweep(&mut self, players: &mut [Player]) {
        for player in players.iter_mut() {
            self.main += player.sweep();
        }
    }

    /// Rebuild the layers from what everyone has invested and record each
    /// player's eligibility. Call after `sweep`.
    pub fn recalculate(&mut self, players: &mut [Player]) {
        let investments: Vec<Chips> = players.iter().map(|p| p.total_invested).collect();
        let layering = layer_investments(&investments);
        *self = layering.pot;
        for (player, rank) in players.iter_mut().zip(layering.ranks) {
            player.side_pot_rank = rank;
        }
    }

    /// The layers as they would be if every bet on the table were swept now.
    /// Nothing is mutated.
    pub fn live(players: &[Player]) -> Pot {
        let investments: Vec<Chips> = players.iter().map(|p| p.total_invested).collect();
        layer_investments(&investments).pot
    }
}
