//! Storage key layout.
//!
//! Deck batch indices are zero-padded to four digits for readability only.
//! Past batch 9999 lexical order breaks, so batch order always comes from
//! [`batch_index`].

pub fn deck_prefix(seed: u64) -> String {
    format!("decks_{seed}_")
}

pub fn deck_batch(seed: u64, batch_index: u32) -> String {
    format!("decks_{seed}_{batch_index:04}.bin")
}

/// Batch index encoded in a key produced by [`deck_batch`] for `seed`.
pub fn batch_index(seed: u64, key: &str) -> Option<u32> {
    key.strip_prefix(&deck_prefix(seed))?
        .strip_suffix(".bin")?
        .parse()
        .ok()
}

pub const STATE_PREFIX: &str = "state_";

pub fn state(seed: u64) -> String {
    format!("{STATE_PREFIX}{seed}.json")
}

/// Seed encoded in a key produced by [`state`].
pub fn seed_from_state(key: &str) -> Option<u64> {
    key.strip_prefix(STATE_PREFIX)?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

pub fn results(seed: u64) -> String {
    format!("results_{seed}.json")
}

pub fn lock(seed: u64) -> String {
    format!("seed_{seed}")
}
