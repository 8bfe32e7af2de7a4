//! Win/loss/tie counters.

use serde::{Deserialize, Serialize};

use crate::error::{PenneyError, Result};
use crate::matching::{DeckOutcome, Scoring, Verdict};

/// Cumulative outcome counts for one pair under one scoring rule.
///
/// Invariant: `p1_wins + p2_wins + ties == decks_processed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub p1_wins: u64,
    pub p2_wins: u64,
    pub ties: u64,
    pub decks_processed: u64,
}

impl OutcomeCounts {
    /// Count one more deck.
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Player1 => self.p1_wins += 1,
            Verdict::Player2 => self.p2_wins += 1,
            Verdict::Tie => self.ties += 1,
        }
        self.decks_processed += 1;
    }

    /// Counter-wise sum. Overflow is [`PenneyError::CorruptState`].
    pub fn merged(&self, other: &Self) -> Result<Self> {
        let add = |a: u64, b: u64| {
            a.checked_add(b).ok_or_else(|| {
                PenneyError::CorruptState(format!("outcome counter overflow adding {a} and {b}"))
            })
        };
        Ok(Self {
            p1_wins: add(self.p1_wins, other.p1_wins)?,
            p2_wins: add(self.p2_wins, other.p2_wins)?,
            ties: add(self.ties, other.ties)?,
            decks_processed: add(self.decks_processed, other.decks_processed)?,
        })
    }

    /// The same counts with the players' roles exchanged.
    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self {
            p1_wins: self.p2_wins,
            p2_wins: self.p1_wins,
            ties: self.ties,
            decks_processed: self.decks_processed,
        }
    }

    /// Whether wins and ties add up to the deck count.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.p1_wins
            .checked_add(self.p2_wins)
            .and_then(|n| n.checked_add(self.ties))
            == Some(self.decks_processed)
    }

    /// Fraction of decks won by player 1 (0 when nothing was processed).
    #[must_use]
    pub fn p1_win_rate(&self) -> f64 {
        ratio(self.p1_wins, self.decks_processed)
    }

    /// Player 1 win percentage in [0, 100].
    #[must_use]
    pub fn p1_win_pct(&self) -> f64 {
        100.0 * self.p1_win_rate()
    }

    /// Player 2 win percentage in [0, 100].
    #[must_use]
    pub fn p2_win_pct(&self) -> f64 {
        100.0 * ratio(self.p2_wins, self.decks_processed)
    }

    /// Tie percentage in [0, 100].
    #[must_use]
    pub fn tie_pct(&self) -> f64 {
        100.0 * ratio(self.ties, self.decks_processed)
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Counts for one ordered pair under both rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairRecord {
    pub cards: OutcomeCounts,
    pub tricks: OutcomeCounts,
}

impl PairRecord {
    /// Count one deck's outcome under both rules.
    pub fn record(&mut self, outcome: &DeckOutcome) {
        self.cards.record(outcome.cards.verdict());
        self.tricks.record(outcome.tricks.verdict());
    }

    #[must_use]
    pub const fn get(&self, scoring: Scoring) -> &OutcomeCounts {
        match scoring {
            Scoring::Cards => &self.cards,
            Scoring::Tricks => &self.tricks,
        }
    }

    pub fn merged(&self, other: &Self) -> Result<Self> {
        Ok(Self {
            cards: self.cards.merged(&other.cards)?,
            tricks: self.tricks.merged(&other.tricks)?,
        })
    }

    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self {
            cards: self.cards.swapped(),
            tricks: self.tricks.swapped(),
        }
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.cards.is_consistent()
            && self.tricks.is_consistent()
            && self.cards.decks_processed == self.tricks.decks_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatchOutcome;

    #[test]
    fn test_record_keeps_invariant() {
        let mut counts = OutcomeCounts::default();
        counts.record(Verdict::Player1);
        counts.record(Verdict::Player1);
        counts.record(Verdict::Player2);
        counts.record(Verdict::Tie);

        assert_eq!(counts.p1_wins, 2);
        assert_eq!(counts.decks_processed, 4);
        assert!(counts.is_consistent());
        assert_eq!(counts.p1_win_pct(), 50.0);
        assert_eq!(counts.tie_pct(), 25.0);
    }

    #[test]
    fn test_empty_percentages() {
        let counts = OutcomeCounts::default();
        assert_eq!(counts.p1_win_rate(), 0.0);
        assert_eq!(counts.tie_pct(), 0.0);
    }

    #[test]
    fn test_inconsistent_counts_detected() {
        let counts = OutcomeCounts {
            p1_wins: 3,
            p2_wins: 1,
            ties: 0,
            decks_processed: 5,
        };
        assert!(!counts.is_consistent());

        let overflow = OutcomeCounts {
            p1_wins: u64::MAX,
            p2_wins: 1,
            ties: 0,
            decks_processed: 0,
        };
        assert!(!overflow.is_consistent());
    }

    #[test]
    fn test_merge_and_swap() {
        let a = OutcomeCounts {
            p1_wins: 1,
            p2_wins: 2,
            ties: 3,
            decks_processed: 6,
        };
        let merged = a.merged(&a.swapped()).unwrap();
        assert_eq!(merged.p1_wins, 3);
        assert_eq!(merged.p2_wins, 3);
        assert_eq!(merged.ties, 6);
        assert_eq!(merged.decks_processed, 12);
    }

    #[test]
    fn test_merge_overflow_is_corrupt_state() {
        let half = u64::MAX / 2 + 1;
        let big = OutcomeCounts {
            p1_wins: half,
            p2_wins: 0,
            ties: 0,
            decks_processed: half,
        };
        assert!(big.is_consistent());
        assert!(matches!(big.merged(&big), Err(PenneyError::CorruptState(_))));

        let record = PairRecord {
            cards: big,
            tricks: big.swapped(),
        };
        assert!(matches!(record.merged(&record), Err(PenneyError::CorruptState(_))));
    }

    #[test]
    fn test_pair_record() {
        let mut record = PairRecord::default();
        record.record(&DeckOutcome {
            cards: MatchOutcome::new(10, 4),
            tricks: MatchOutcome::new(2, 2),
        });

        assert_eq!(record.get(Scoring::Cards).p1_wins, 1);
        assert_eq!(record.get(Scoring::Tricks).ties, 1);
        assert!(record.is_consistent());
        assert_eq!(record.swapped().cards.p2_wins, 1);
    }
}
