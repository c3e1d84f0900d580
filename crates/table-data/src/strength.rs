use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::cards::{CardCode, Rank};

/// Ranking and percentile for one canonical starting hand.
/// Lower ranking is stronger; percentile is in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandStrength {
    pub ranking: u32,
    pub percentile: f64,
}

#[derive(Debug, Deserialize)]
struct StrengthEntry {
    hand: String,
    ranking: u32,
    percentile: f64,
}

#[derive(Debug, Deserialize)]
struct StrengthFile {
    hands: Vec<StrengthEntry>,
}

/// Static starting-hand strength table, keyed by the 169 canonical
/// 2-3 character hand keys ("AA", "AKs", "AKo", ...).
#[derive(Debug, Clone)]
pub struct StrengthTable {
    entries: HashMap<String, HandStrength>,
}

impl StrengthTable {
    /// Load the table from a JSON file of the form
    /// `{"hands": [{"hand": "AA", "ranking": 1, "percentile": 1.0}, ...]}`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read strength table {}", path.display()))?;
        let file: StrengthFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse strength table {}", path.display()))?;

        let table = Self::from_entries(
            file.hands
                .into_iter()
                .map(|e| (e.hand, HandStrength { ranking: e.ranking, percentile: e.percentile })),
        )?;
        tracing::info!("loaded strength table from {}", path.display());
        Ok(table)
    }

    /// Build a table from key/strength pairs. The key space is closed:
    /// every one of the 169 canonical keys must be present, and every
    /// percentile must lie in [0, 1].
    pub fn from_entries(entries: impl IntoIterator<Item = (String, HandStrength)>) -> Result<Self> {
        let mut map = HashMap::new();
        for (key, strength) in entries {
            if !(0.0..=1.0).contains(&strength.percentile) {
                bail!("percentile {} for hand {:?} is outside [0, 1]", strength.percentile, key);
            }
            if map.insert(key.clone(), strength).is_some() {
                bail!("duplicate strength entry for hand {:?}", key);
            }
        }
        for key in canonical_keys() {
            if !map.contains_key(&key) {
                bail!("strength table is missing canonical hand {:?}", key);
            }
        }
        Ok(Self { entries: map })
    }

    pub fn strength(&self, key: &str) -> Option<HandStrength> {
        self.entries.get(key).copied()
    }

    /// Score two observed hole cards. The table is validated complete at
    /// construction, so a missing key is a defect upstream, not a runtime
    /// condition.
    pub fn evaluate(&self, cards: [CardCode; 2]) -> StartingHand {
        let key = starting_hand_key(cards);
        let strength = self
            .strength(&key)
            .unwrap_or_else(|| panic!("starting hand key {:?} missing from strength table", key));
        StartingHand {
            key,
            ranking: strength.ranking,
            percentile: strength.percentile,
        }
    }
}

/// A scored two-card starting hand. Comparisons follow the table ranking:
/// a hand beats another iff its ranking is strictly lower.
#[derive(Debug, Clone, Serialize)]
pub struct StartingHand {
    key: String,
    ranking: u32,
    percentile: f64,
}

impl StartingHand {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ranking(&self) -> u32 {
        self.ranking
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// True iff this hand sits in the top `threshold` percentile range.
    pub fn in_range(&self, threshold: f64) -> bool {
        self.percentile >= threshold
    }
}

impl fmt::Display for StartingHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | ranking={} | percentile={:.2}",
            self.key,
            self.ranking,
            self.percentile * 100.0
        )
    }
}

impl PartialEq for StartingHand {
    fn eq(&self, other: &Self) -> bool {
        self.ranking == other.ranking
    }
}

impl Eq for StartingHand {}

impl PartialOrd for StartingHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StartingHand {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: lower table ranking means a stronger (greater) hand.
        other.ranking.cmp(&self.ranking)
    }
}

/// Derive the canonical 2-3 character key for two hole cards: ranks in
/// descending strength order, "s" suffix for suited, "o" for offsuit,
/// bare pair for equal ranks.
pub fn starting_hand_key(cards: [CardCode; 2]) -> String {
    let [mut high, mut low] = cards;
    if low.rank > high.rank {
        std::mem::swap(&mut high, &mut low);
    }
    let mut key = String::with_capacity(3);
    key.push(high.rank.to_char());
    key.push(low.rank.to_char());
    if high.rank != low.rank {
        key.push(if high.suit == low.suit { 's' } else { 'o' });
    }
    key
}

/// Enumerate the closed key space: 13 pairs, 78 suited, 78 offsuit.
pub fn canonical_keys() -> Vec<String> {
    let mut keys = Vec::with_capacity(169);
    for (i, high) in Rank::ALL.iter().enumerate() {
        for low in &Rank::ALL[i..] {
            let mut key = String::with_capacity(3);
            key.push(high.to_char());
            key.push(low.to_char());
            if high == low {
                keys.push(key);
            } else {
                keys.push(format!("{key}s"));
                key.push('o');
                keys.push(key);
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(code: &str) -> CardCode {
        code.parse().unwrap()
    }

    /// Synthetic table: rankings 1..=169 in canonical key order, with
    /// percentile decreasing as ranking worsens.
    fn test_table() -> StrengthTable {
        StrengthTable::from_entries(canonical_keys().into_iter().enumerate().map(|(i, key)| {
            (
                key,
                HandStrength {
                    ranking: i as u32 + 1,
                    percentile: 1.0 - i as f64 / 169.0,
                },
            )
        }))
        .unwrap()
    }

    #[test]
    fn test_canonical_keys_count() {
        let keys = canonical_keys();
        assert_eq!(keys.len(), 169);
        assert!(keys.contains(&"AA".to_string()));
        assert!(keys.contains(&"AKs".to_string()));
        assert!(keys.contains(&"AKo".to_string()));
        assert!(keys.contains(&"32o".to_string()));
    }

    #[test]
    fn test_key_derivation() {
        assert_eq!(starting_hand_key([card("As"), card("Ks")]), "AKs");
        assert_eq!(starting_hand_key([card("Ks"), card("As")]), "AKs");
        assert_eq!(starting_hand_key([card("As"), card("Ah")]), "AA");
        assert_eq!(starting_hand_key([card("Ah"), card("Kd")]), "AKo");
        assert_eq!(starting_hand_key([card("2c"), card("7d")]), "72o");
    }

    #[test]
    fn test_missing_key_rejected_at_construction() {
        let err = StrengthTable::from_entries(
            [("AA".to_string(), HandStrength { ranking: 1, percentile: 1.0 })],
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing canonical hand"));
    }

    #[test]
    fn test_percentile_out_of_bounds_rejected() {
        let err = StrengthTable::from_entries(
            [("AA".to_string(), HandStrength { ranking: 1, percentile: 1.5 })],
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside [0, 1]"));
    }

    #[test]
    fn test_evaluate_builds_record() {
        let table = test_table();
        let hand = table.evaluate([card("As"), card("Ah")]);
        assert_eq!(hand.key(), "AA");
        assert_eq!(hand.ranking(), 1);
        assert!(hand.in_range(1.0));
    }

    #[test]
    fn test_comparisons_follow_ranking() {
        let table = test_table();
        let aa = table.evaluate([card("As"), card("Ah")]);
        let offsuit = table.evaluate([card("7d"), card("2c")]);
        assert!(aa > offsuit);
        assert!(offsuit < aa);
        assert!(aa != offsuit);
        assert_eq!(aa, aa.clone());
    }

    #[test]
    fn test_ordering_antisymmetric_and_transitive() {
        let table = test_table();
        let mut hands: Vec<StartingHand> = canonical_keys()
            .iter()
            .map(|key| {
                let s = table.strength(key).unwrap();
                StartingHand {
                    key: key.clone(),
                    ranking: s.ranking,
                    percentile: s.percentile,
                }
            })
            .collect();
        for pair in hands.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert_eq!(a > b, b < a);
            assert_eq!(a == b, b == a);
        }
        // Sorting by the derived order must agree with the table ranking.
        hands.sort();
        for pair in hands.windows(2) {
            assert!(pair[0].ranking() > pair[1].ranking());
        }
    }

    #[test]
    fn test_in_range_threshold_edge() {
        let hand = StartingHand {
            key: "AKs".to_string(),
            ranking: 5,
            percentile: 0.95,
        };
        assert!(hand.in_range(0.95));
        assert!(hand.in_range(0.90));
        assert!(!hand.in_range(0.96));
    }
}
