//! Deck generation.
//!
//! ## Overview
//!
//! - **RngState**: seed, half-deck size, decks produced and stream position
//! - **DeckGenerator**: turns an `RngState` into balanced shuffled decks
//!
//! ## Usage
//!
//! ```
//! use penney_sim::generation::{generate, RngState};
//!
//! let first = generate(100, &RngState::new(42, 26)).unwrap();
//! // ... persist `first.state`, later:
//! let more = generate(100, &first.state).unwrap();
//! assert_eq!(more.state.decks_generated, 200);
//! ```

pub mod generator;
pub mod state;

pub use generator::{generate, DeckGenerator, Generation};
pub use state::RngState;
