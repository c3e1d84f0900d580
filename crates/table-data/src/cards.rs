use anyhow::{bail, Error};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Card rank. Derived ordering is by strength, ace high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All ranks in descending strength order (ace first).
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Ten,
        Rank::Nine,
        Rank::Eight,
        Rank::Seven,
        Rank::Six,
        Rank::Five,
        Rank::Four,
        Rank::Three,
        Rank::Two,
    ];

    pub fn to_char(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::King => 'K',
            Rank::Queen => 'Q',
            Rank::Jack => 'J',
            Rank::Ten => 'T',
            Rank::Nine => '9',
            Rank::Eight => '8',
            Rank::Seven => '7',
            Rank::Six => '6',
            Rank::Five => '5',
            Rank::Four => '4',
            Rank::Three => '3',
            Rank::Two => '2',
        }
    }

    pub fn from_char(c: char) -> Option<Rank> {
        Rank::ALL.iter().copied().find(|r| r.to_char() == c)
    }
}

/// Card suit, identified by its lowercase code character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        Suit::ALL.iter().copied().find(|s| s.to_char() == c)
    }
}

/// A 2-character rank+suit card identifier, e.g. "As" or "Td".
///
/// This is the identity the classifier resolves crops to and the unit the
/// observed hand/board sequences store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardCode {
    pub rank: Rank,
    pub suit: Suit,
}

impl CardCode {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// All 52 codes in rank-major order (As, Ah, Ad, Ac, Ks, ...).
    /// This order is the catalog order used for tie-breaking.
    pub fn all() -> impl Iterator<Item = CardCode> {
        Rank::ALL
            .into_iter()
            .flat_map(|rank| Suit::ALL.into_iter().map(move |suit| CardCode { rank, suit }))
    }
}

impl fmt::Display for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl FromStr for CardCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("card code must be exactly 2 characters, got {:?}", s);
        };
        let Some(rank) = Rank::from_char(r) else {
            bail!("unknown rank character {:?} in card code {:?}", r, s);
        };
        let Some(suit) = Suit::from_char(su) else {
            bail!("unknown suit character {:?} in card code {:?}", su, s);
        };
        Ok(CardCode { rank, suit })
    }
}

impl Serialize for CardCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CardCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_display_round_trip() {
        for code in CardCode::all() {
            let text = code.to_string();
            assert_eq!(text.len(), 2);
            assert_eq!(text.parse::<CardCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_all_is_52_unique() {
        let codes: HashSet<String> = CardCode::all().map(|c| c.to_string()).collect();
        assert_eq!(codes.len(), 52);
    }

    #[test]
    fn test_rank_ordering_ace_high() {
        assert!(Rank::Ace > Rank::King);
        assert!(Rank::King > Rank::Queen);
        assert!(Rank::Ten > Rank::Nine);
        assert!(Rank::Three > Rank::Two);
    }

    #[test]
    fn test_rejects_malformed_codes() {
        assert!("".parse::<CardCode>().is_err());
        assert!("A".parse::<CardCode>().is_err());
        assert!("Asx".parse::<CardCode>().is_err());
        assert!("Xs".parse::<CardCode>().is_err());
        assert!("Az".parse::<CardCode>().is_err());
    }
}
