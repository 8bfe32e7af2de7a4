//! Three-card patterns and the player pairs that compete over them.
//!
//! ## SequenceTriple
//!
//! A triple is stored as a 3-bit mask, first card in the most significant
//! bit, so `"001"` is `0b001` and `"100"` is `0b100`. This is the same layout
//! the matcher uses for its rolling window, so a match is one comparison.
//!
//! ## SequencePair
//!
//! An ordered `(player1, player2)` pair of distinct triples. There are 56
//! ordered pairs and 28 canonical ones (`player1 < player2`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PenneyError, Result};

/// Length of every pattern a player can choose.
pub const SEQUENCE_LEN: usize = 3;

/// Number of distinct triples over a binary alphabet.
pub const TRIPLE_COUNT: usize = 1 << SEQUENCE_LEN;

/// A 3-symbol binary pattern a player watches for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SequenceTriple(u8);

impl SequenceTriple {
    /// Build from a 3-bit mask (first card in bit 2).
    pub fn from_bits(bits: u8) -> Result<Self> {
        if usize::from(bits) >= TRIPLE_COUNT {
            return Err(PenneyError::InvalidSequence(format!(
                "bit pattern {bits:#b} does not fit in three cards"
            )));
        }
        Ok(Self(bits))
    }

    /// Build from three card symbols.
    pub fn from_symbols(symbols: &[u8]) -> Result<Self> {
        if symbols.len() != SEQUENCE_LEN {
            return Err(PenneyError::InvalidSequence(format!(
                "expected {SEQUENCE_LEN} symbols, got {}",
                symbols.len()
            )));
        }
        let mut bits = 0u8;
        for &s in symbols {
            if s > 1 {
                return Err(PenneyError::InvalidSequence(format!(
                    "symbol {s} is not binary"
                )));
            }
            bits = (bits << 1) | s;
        }
        Ok(Self(bits))
    }

    /// The 3-bit mask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The three symbols, first card first.
    #[must_use]
    pub const fn symbols(self) -> [u8; SEQUENCE_LEN] {
        [(self.0 >> 2) & 1, (self.0 >> 1) & 1, self.0 & 1]
    }

    /// Render with the display alphabet: `0 -> B`, `1 -> R`.
    #[must_use]
    pub fn display_label(self) -> String {
        self.symbols()
            .iter()
            .map(|&s| if s == 0 { 'B' } else { 'R' })
            .collect()
    }

    /// All 8 triples in ascending order (`000` .. `111`).
    pub fn all() -> impl Iterator<Item = SequenceTriple> {
        (0..TRIPLE_COUNT as u8).map(SequenceTriple)
    }

    /// Position of this triple in [`SequenceTriple::all`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SequenceTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in self.symbols() {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

impl FromStr for SequenceTriple {
    type Err = PenneyError;

    /// Accepts `0`/`1` or the display alphabet `B`/`R` (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let symbols = s
            .trim()
            .chars()
            .map(|c| match c {
                '0' | 'B' | 'b' => Ok(0),
                '1' | 'R' | 'r' => Ok(1),
                other => Err(PenneyError::InvalidSequence(format!(
                    "unexpected symbol {other:?} in {s:?}"
                ))),
            })
            .collect::<Result<Vec<u8>>>()?;
        Self::from_symbols(&symbols)
    }
}

impl TryFrom<String> for SequenceTriple {
    type Error = PenneyError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SequenceTriple> for String {
    fn from(value: SequenceTriple) -> Self {
        value.to_string()
    }
}

/// The sequences chosen by player 1 and player 2. Never equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPair", into = "RawPair")]
pub struct SequencePair {
    player1: SequenceTriple,
    player2: SequenceTriple,
}

/// Wire form of [`SequencePair`]; validated on the way in.
#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawPair {
    player1: SequenceTriple,
    player2: SequenceTriple,
}

impl TryFrom<RawPair> for SequencePair {
    type Error = PenneyError;

    fn try_from(raw: RawPair) -> Result<Self> {
        Self::new(raw.player1, raw.player2)
    }
}

impl From<SequencePair> for RawPair {
    fn from(pair: SequencePair) -> Self {
        Self {
            player1: pair.player1,
            player2: pair.player2,
        }
    }
}

impl SequencePair {
    /// Pair two sequences. Fails if both players chose the same one.
    pub fn new(player1: SequenceTriple, player2: SequenceTriple) -> Result<Self> {
        if player1 == player2 {
            return Err(PenneyError::InvalidSequence(format!(
                "both players chose {player1}"
            )));
        }
        Ok(Self { player1, player2 })
    }

    /// Parse both sequences from text, e.g. `("001", "110")`.
    pub fn parse(player1: &str, player2: &str) -> Result<Self> {
        Self::new(player1.parse()?, player2.parse()?)
    }

    /// Player 1's sequence.
    #[must_use]
    pub const fn player1(&self) -> SequenceTriple {
        self.player1
    }

    /// Player 2's sequence.
    #[must_use]
    pub const fn player2(&self) -> SequenceTriple {
        self.player2
    }

    /// The same two sequences with the players' roles exchanged.
    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self {
            player1: self.player2,
            player2: self.player1,
        }
    }

    /// Whether this is the canonical orientation (`player1 < player2`).
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.player1 < self.player2
    }

    /// All 56 ordered pairs, player 1 major.
    pub fn all_ordered() -> impl Iterator<Item = SequencePair> {
        SequenceTriple::all().flat_map(|p1| {
            SequenceTriple::all()
                .filter(move |&p2| p2 != p1)
                .map(move |p2| SequencePair {
                    player1: p1,
                    player2: p2,
                })
        })
    }

    /// The 28 canonical pairs.
    pub fn all_canonical() -> impl Iterator<Item = SequencePair> {
        Self::all_ordered().filter(SequencePair::is_canonical)
    }
}

impl fmt::Display for SequencePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.player1, self.player2)
    }
}
