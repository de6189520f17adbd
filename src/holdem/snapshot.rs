use super::action::{ActionRecord, Payout};
use super::betting::TableState;
use super::player::Player;
use super::pot::Pot;
use crate::core::{Card, Deck};

/// Everything needed to pick a hand back up where it was left.
///
/// Produced by `HandEngine::snapshot` and consumed by
/// `HandEngine::restore`. A snapshot without a deck, or with hole cards
/// missing for live seats, is completed at random on restore.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandSnapshot {
    pub players: Vec<Player>,
    pub pot: Pot,
    pub table: TableState,
    pub board: Vec<Card>,
    pub deck: Option<Deck>,
    pub history: Vec<ActionRecord>,
    pub payouts: Vec<Payout>,
    pub reward_scalar: f32,
}

impl HandSnapshot {
    /// What `viewer` is allowed to know: their own hole cards, the board and
    /// the public betting. Other seats' cards and the deck order are dropped.
    pub fn redacted(&self, viewer: usize) -> HandSnapshot {
        let mut view = self.clone();
        view.deck = None;
        for player in view.players.iter_mut().filter(|p| p.seat != viewer) {
            player.hand = None;
        }
        for payout in view.payouts.iter_mut().filter(|p| p.seat != viewer) {
            payout.hole_cards = None;
        }
        view
    }

    /// Cards whose location is known.
    pub fn known_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.players
            .iter()
            .filter_map(|p| p.hand)
            .flatten()
            .chain(self.board.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_cards;

    fn snapshot() -> HandSnapshot {
        let cards = parse_cards("AsKd7c7h").unwrap();
        let mut players = vec![Player::new(0, 100), Player::new(1, 100)];
        players[0].hand = Some([cards[0], cards[1]]);
        players[1].hand = Some([cards[2], cards[3]]);
        HandSnapshot {
            players,
            pot: Pot::default(),
            table: TableState::default(),
            board: parse_cards("2c3c4c").unwrap(),
            deck: Some(Deck::new()),
            history: vec![],
            payouts: vec![],
            reward_scalar: 1.0,
        }
    }

    #[test]
    fn test_redacted_hides_other_seats() {
        let view = snapshot().redacted(1);
        assert!(view.deck.is_none());
        assert!(view.players[0].hand.is_none());
        assert!(view.players[1].hand.is_some());
        assert_eq!(3, view.board.len());
        assert_eq!(5, view.known_cards().count());
    }

    #[test]
    fn test_known_cards() {
        assert_eq!(7, snapshot().known_cards().count());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_keeps_everything() {
        let original = snapshot();
        let json = serde_json::to_string(&original).unwrap();
        let back: HandSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }
}
