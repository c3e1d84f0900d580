use tracing::warn;

use table_data::CardCode;

/// Append-only, capped sequence of card codes observed on screen.
/// Cleared when the owning phase machine resets to its empty phase.
#[derive(Debug, Clone)]
pub struct ObservedCards {
    cards: Vec<CardCode>,
    cap: usize,
}

impl ObservedCards {
    /// The two hole cards.
    pub fn hand() -> Self {
        Self::with_cap(2)
    }

    /// The five community cards.
    pub fn board() -> Self {
        Self::with_cap(5)
    }

    fn with_cap(cap: usize) -> Self {
        Self {
            cards: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Append a card. Pushes past the cap are dropped with a warning;
    /// a full sequence only shrinks through `clear`.
    pub fn push(&mut self, code: CardCode) {
        if self.cards.len() >= self.cap {
            warn!("dropping {} observed past the {}-card cap", code, self.cap);
            return;
        }
        self.cards.push(code);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[CardCode] {
        &self.cards
    }

    pub fn codes(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(code: &str) -> CardCode {
        code.parse().unwrap()
    }

    #[test]
    fn test_push_and_clear() {
        let mut hand = ObservedCards::hand();
        assert!(hand.is_empty());
        hand.push(card("As"));
        hand.push(card("Kd"));
        assert_eq!(hand.codes(), vec!["As", "Kd"]);
        hand.clear();
        assert!(hand.is_empty());
    }

    #[test]
    fn test_pushes_past_cap_are_dropped() {
        let mut hand = ObservedCards::hand();
        hand.push(card("As"));
        hand.push(card("Kd"));
        hand.push(card("Qh"));
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.codes(), vec!["As", "Kd"]);

        let mut board = ObservedCards::board();
        for code in ["2c", "3c", "4c", "5c", "6c", "7c"] {
            board.push(card(code));
        }
        assert_eq!(board.len(), 5);
    }
}
