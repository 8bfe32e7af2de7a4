//! Persistence for decks, generator state and results.
//!
//! ## Layout
//!
//! | Key | Content |
//! |-----|---------|
//! | `decks_{seed}_{index:04}.bin` | bincode deck batch, index from 1 |
//! | `state_{seed}.json` | [`RngState`](crate::generation::RngState) |
//! | `results_{seed}.json` | [`AggregateTable`](crate::analysis::AggregateTable) rows |
//!
//! All access goes through a [`StorageBackend`]. The typed stores borrow a
//! backend and add encoding and validation on top.

pub mod backend;
pub mod decks;
pub mod keys;
pub mod lock;
pub mod results;
pub mod state;

pub use backend::{FsBackend, MemoryBackend, StorageBackend};
pub use decks::DeckArchive;
pub use lock::SeedLock;
pub use results::ResultStore;
pub use state::StateStore;
