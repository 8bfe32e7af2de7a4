//! Per-deck outcomes and their classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two players of a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

/// How a deck's matches are turned into scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scoring {
    /// The matching player takes every card in the pile.
    Cards,
    /// The matching player takes one trick.
    Tricks,
}

impl Scoring {
    /// Both rules, in reporting order.
    pub const ALL: [Scoring; 2] = [Scoring::Cards, Scoring::Tricks];

    /// Lower-case name used in file and CLI output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Scoring::Cards => "cards",
            Scoring::Tricks => "tricks",
        }
    }
}

impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who won a deck under one scoring rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Player1,
    Player2,
    /// Equal scores, including 0-0.
    Tie,
}

/// Scores of both players for one deck under one rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub player1: u32,
    pub player2: u32,
}

impl MatchOutcome {
    #[must_use]
    pub const fn new(player1: u32, player2: u32) -> Self {
        Self { player1, player2 }
    }

    /// Strictly greater score wins; anything else is a tie.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self.player1.cmp(&self.player2) {
            std::cmp::Ordering::Greater => Verdict::Player1,
            std::cmp::Ordering::Less => Verdict::Player2,
            std::cmp::Ordering::Equal => Verdict::Tie,
        }
    }

    /// The outcome seen from the other side of the table.
    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self {
            player1: self.player2,
            player2: self.player1,
        }
    }

    pub(crate) fn award(&mut self, player: Player, amount: u32) {
        match player {
            Player::One => self.player1 += amount,
            Player::Two => self.player2 += amount,
        }
    }
}

/// Both rules' outcomes for one deck, from a single scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckOutcome {
    pub cards: MatchOutcome,
    pub tricks: MatchOutcome,
}

impl DeckOutcome {
    /// Outcome under `scoring`.
    #[must_use]
    pub const fn get(&self, scoring: Scoring) -> MatchOutcome {
        match scoring {
            Scoring::Cards => self.cards,
            Scoring::Tricks => self.tricks,
        }
    }

    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self {
            cards: self.cards.swapped(),
            tricks: self.tricks.swapped(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict() {
        assert_eq!(MatchOutcome::new(5, 3).verdict(), Verdict::Player1);
        assert_eq!(MatchOutcome::new(3, 5).verdict(), Verdict::Player2);
        assert_eq!(MatchOutcome::new(4, 4).verdict(), Verdict::Tie);
        assert_eq!(MatchOutcome::new(0, 0).verdict(), Verdict::Tie);
    }

    #[test]
    fn test_award_and_swap() {
        let mut outcome = MatchOutcome::default();
        outcome.award(Player::One, 4);
        outcome.award(Player::Two, 7);
        outcome.award(Player::One, 3);

        assert_eq!(outcome, MatchOutcome::new(7, 7));
        assert_eq!(MatchOutcome::new(1, 2).swapped(), MatchOutcome::new(2, 1));
    }

    #[test]
    fn test_scoring_names() {
        assert_eq!(Scoring::Cards.to_string(), "cards");
        assert_eq!(Scoring::Tricks.to_string(), "tricks");
    }
}
