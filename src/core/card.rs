use std::fmt;

use thiserror::Error;

/// Number of distinct cards in a standard deck.
pub const NUM_CARDS: usize = 52;

/// Errors produced while turning text or integers into cards.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum CardParseError {
    #[error("unknown card value character '{0}'")]
    UnknownValue(char),
    #[error("unknown card suit character '{0}'")]
    UnknownSuit(char),
    #[error("card string '{0}' is malformed")]
    Malformed(String),
    #[error("card index {0} is outside 0..52")]
    IndexOutOfRange(u8),
}

/// Card rank, ordered from deuce to ace.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[repr(u8)]
pub enum Value {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

const VALUES: [Value; 13] = [
    Value::Two,
    Value::Three,
    Value::Four,
    Value::Five,
    Value::Six,
    Value::Seven,
    Value::Eight,
    Value::Nine,
    Value::Ten,
    Value::Jack,
    Value::Queen,
    Value::King,
    Value::Ace,
];

impl Value {
    /// All values from lowest to highest.
    pub const fn values() -> [Value; 13] {
        VALUES
    }

    pub fn from_u8(v: u8) -> Option<Value> {
        VALUES.get(v as usize).copied()
    }

    /// Parse the usual single character form. `T` is ten.
    pub fn from_char(c: char) -> Option<Value> {
        match c.to_ascii_uppercase() {
            '2' => Some(Value::Two),
            '3' => Some(Value::Three),
            '4' => Some(Value::Four),
            '5' => Some(Value::Five),
            '6' => Some(Value::Six),
            '7' => Some(Value::Seven),
            '8' => Some(Value::Eight),
            '9' => Some(Value::Nine),
            'T' => Some(Value::Ten),
            'J' => Some(Value::Jack),
            'Q' => Some(Value::Queen),
            'K' => Some(Value::King),
            'A' => Some(Value::Ace),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Value::Two => '2',
            Value::Three => '3',
            Value::Four => '4',
            Value::Five => '5',
            Value::Six => '6',
            Value::Seven => '7',
            Value::Eight => '8',
            Value::Nine => '9',
            Value::Ten => 'T',
            Value::Jack => 'J',
            Value::Queen => 'Q',
            Value::King => 'K',
            Value::Ace => 'A',
        }
    }
}

/// Card suit. The discriminant is the suit's slot in the integer card encoding.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[repr(u8)]
pub enum Suit {
    Spade = 0,
    Club = 1,
    Heart = 2,
    Diamond = 3,
}

const SUITS: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Heart, Suit::Diamond];

impl Suit {
    pub const fn suits() -> [Suit; 4] {
        SUITS
    }

    pub fn from_u8(s: u8) -> Option<Suit> {
        SUITS.get(s as usize).copied()
    }

    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            's' => Some(Suit::Spade),
            'c' => Some(Suit::Club),
            'h' => Some(Suit::Heart),
            'd' => Some(Suit::Diamond),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spade => 's',
            Suit::Club => 'c',
            Suit::Heart => 'h',
            Suit::Diamond => 'd',
        }
    }
}

/// A single playing card.
///
/// Cards are plain values. The integer identity used by scenarios and
/// snapshots is `value * 4 + suit`, so `2s` is 0 and `Ad` is 51.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Card {
    pub value: Value,
    pub suit: Suit,
}

impl Card {
    pub fn new(value: Value, suit: Suit) -> Self {
        Self { value, suit }
    }

    /// The integer identity of this card.
    #[inline]
    pub fn index(&self) -> u8 {
        self.value as u8 * 4 + self.suit as u8
    }

    /// Build a card back from its integer identity.
    #[inline]
    pub fn from_index(idx: u8) -> Option<Card> {
        if (idx as usize) < NUM_CARDS {
            Some(Card {
                value: VALUES[(idx / 4) as usize],
                suit: SUITS[(idx % 4) as usize],
            })
        } else {
            None
        }
    }
}

impl TryFrom<u8> for Card {
    type Error = CardParseError;

    fn try_from(idx: u8) -> Result<Self, Self::Error> {
        Card::from_index(idx).ok_or(CardParseError::IndexOutOfRange(idx))
    }
}

impl TryFrom<&str> for Card {
    type Error = CardParseError;

    /// Accepts `As`, `td`, and `10h`.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        let mut chars: Vec<char> = s.chars().collect();
        let suit_char = chars
            .pop()
            .ok_or_else(|| CardParseError::Malformed(s.to_string()))?;
        let value = match chars.as_slice() {
            ['1', '0'] => Value::Ten,
            [c] => Value::from_char(*c).ok_or(CardParseError::UnknownValue(*c))?,
            _ => return Err(CardParseError::Malformed(s.to_string())),
        };
        let suit = Suit::from_char(suit_char).ok_or(CardParseError::UnknownSuit(suit_char))?;
        Ok(Card::new(value, suit))
    }
}

impl std::str::FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Card::try_from(s)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value.to_char(), self.suit.to_char())
    }
}

/// Parse a run of concatenated cards such as `"AhKd"` or `"Ah Kd 10c"`.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardParseError> {
    let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    let mut cards = Vec::with_capacity(chars.len() / 2);
    let mut i = 0;
    while i < chars.len() {
        let width = if chars[i] == '1' { 3 } else { 2 };
        if i + width > chars.len() {
            return Err(CardParseError::Malformed(s.to_string()));
        }
        let token: String = chars[i..i + width].iter().collect();
        cards.push(Card::try_from(token.as_str())?);
        i += width;
    }
    Ok(cards)
}
