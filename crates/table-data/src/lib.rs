mod cards;
mod strength;

pub use cards::{CardCode, Rank, Suit};
pub use strength::{canonical_keys, starting_hand_key, HandStrength, StartingHand, StrengthTable};
