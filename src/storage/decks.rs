//! Deck batch files.
//!
//! Each file is a bincode record holding a row-major
//! `(deck_count, 2 * half_deck_size)` array of 0/1 bytes. Files are filled up
//! to `decks_per_file` decks; an append first tops up the last file and then
//! opens new ones. The split only affects storage: loading sorts the keys and
//! concatenates, which restores the logical deck sequence.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::backend::StorageBackend;
use super::keys;
use crate::core::Deck;
use crate::error::{PenneyError, Result};

const FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DeckBatchFile {
    version: u32,
    seed: u64,
    batch_index: u32,
    half_deck_size: u64,
    deck_count: u64,
    cards: Vec<u8>,
}

impl DeckBatchFile {
    fn new(seed: u64, batch_index: u32, half_deck_size: usize) -> Self {
        Self {
            version: FORMAT_VERSION,
            seed,
            batch_index,
            half_deck_size: half_deck_size as u64,
            deck_count: 0,
            cards: Vec::new(),
        }
    }

    fn deck_len(&self) -> usize {
        self.half_deck_size as usize * 2
    }

    fn push(&mut self, deck: &Deck) -> Result<()> {
        if deck.half_deck_size() as u64 != self.half_deck_size {
            return Err(PenneyError::HalfDeckMismatch {
                expected: self.half_deck_size as usize,
                found: deck.half_deck_size(),
            });
        }
        self.cards.extend_from_slice(deck.cards());
        self.deck_count += 1;
        Ok(())
    }

    fn decode(key: &str, bytes: &[u8]) -> Result<Self> {
        let file: Self = bincode::deserialize(bytes)?;
        if file.version != FORMAT_VERSION {
            return Err(PenneyError::InvalidDeck(format!(
                "{key}: unsupported format version {}",
                file.version
            )));
        }
        let expected = file.deck_count.checked_mul(file.deck_len() as u64);
        if file.deck_len() == 0 || expected != Some(file.cards.len() as u64) {
            return Err(PenneyError::InvalidDeck(format!(
                "{key}: {} cards do not fill {} decks of {}",
                file.cards.len(),
                file.deck_count,
                file.deck_len()
            )));
        }
        Ok(file)
    }

    fn decks(&self) -> Result<Vec<Deck>> {
        self.cards
            .chunks_exact(self.deck_len())
            .map(Deck::from_cards)
            .collect()
    }
}

/// Reads and writes a seed's deck batch files.
pub struct DeckArchive<'a, B: StorageBackend + ?Sized> {
    backend: &'a B,
    decks_per_file: usize,
}

impl<'a, B: StorageBackend + ?Sized> DeckArchive<'a, B> {
    pub fn new(backend: &'a B, decks_per_file: usize) -> Self {
        Self {
            backend,
            decks_per_file: decks_per_file.max(1),
        }
    }

    fn read(&self, key: &str) -> Result<Option<DeckBatchFile>> {
        self.backend
            .load(key)?
            .map(|bytes| DeckBatchFile::decode(key, &bytes))
            .transpose()
    }

    fn write(&self, file: &DeckBatchFile) -> Result<()> {
        let key = keys::deck_batch(file.seed, file.batch_index);
        self.backend.save(&key, &bincode::serialize(file)?)?;
        debug!(key = %key, decks = file.deck_count, "wrote deck batch");
        Ok(())
    }

    /// The seed's batch keys in numeric batch order.
    fn batch_keys(&self, seed: u64) -> Result<Vec<String>> {
        let mut indexed: Vec<(u32, String)> = self
            .backend
            .list(&keys::deck_prefix(seed))?
            .into_iter()
            .filter_map(|key| keys::batch_index(seed, &key).map(|index| (index, key)))
            .collect();
        indexed.sort_unstable();
        Ok(indexed.into_iter().map(|(_, key)| key).collect())
    }

    /// Append `decks` after the seed's stored decks. Returns files written.
    pub fn append(&self, seed: u64, decks: &[Deck]) -> Result<usize> {
        let Some(first) = decks.first() else {
            return Ok(0);
        };
        let half_deck_size = first.half_deck_size();
        let capacity = self.decks_per_file as u64;

        let existing = self.batch_keys(seed)?;
        let (mut last_index, mut open) = match existing.last() {
            Some(key) => {
                let file = self.read(key)?.ok_or_else(|| {
                    PenneyError::CorruptState(format!("deck file {key} vanished"))
                })?;
                let index = file.batch_index;
                (index, (file.deck_count < capacity).then_some(file))
            }
            None => (0, None),
        };

        let mut written = 0;
        let mut rest = decks;
        while !rest.is_empty() {
            let mut file = match open.take() {
                Some(file) => file,
                None => {
                    last_index = last_index.checked_add(1).ok_or_else(|| {
                        PenneyError::CorruptState(format!("seed {seed} ran out of batch indices"))
                    })?;
                    DeckBatchFile::new(seed, last_index, half_deck_size)
                }
            };
            let room = (capacity - file.deck_count) as usize;
            let (now, later) = rest.split_at(room.min(rest.len()));
            for deck in now {
                file.push(deck)?;
            }
            self.write(&file)?;
            written += 1;
            rest = later;
        }

        info!(seed, decks = decks.len(), files = written, "stored decks");
        Ok(written)
    }

    /// Every stored deck for `seed`, in generation order.
    pub fn load_all(&self, seed: u64) -> Result<Vec<Deck>> {
        let batch_keys = self.batch_keys(seed)?;
        if batch_keys.is_empty() {
            return Err(PenneyError::DataNotFound(seed));
        }
        let mut decks = Vec::new();
        for key in &batch_keys {
            if let Some(file) = self.read(key)? {
                decks.extend(file.decks()?);
            }
        }
        debug!(seed, files = batch_keys.len(), decks = decks.len(), "loaded decks");
        Ok(decks)
    }

    /// Number of decks stored for `seed` (0 if none).
    pub fn deck_count(&self, seed: u64) -> Result<u64> {
        let mut total = 0;
        for key in self.batch_keys(seed)? {
            if let Some(file) = self.read(&key)? {
                total += file.deck_count;
            }
        }
        Ok(total)
    }

    /// Drop every deck after the first `keep`. Returns decks dropped.
    ///
    /// Used to discard decks written by a run that never committed its state.
    pub fn truncate(&self, seed: u64, keep: u64) -> Result<u64> {
        let mut kept = 0;
        let mut dropped = 0;
        for key in self.batch_keys(seed)? {
            let Some(mut file) = self.read(&key)? else {
                continue;
            };
            let room = keep - kept;
            if file.deck_count <= room {
                kept += file.deck_count;
                continue;
            }
            dropped += file.deck_count - room;
            if room == 0 {
                self.backend.remove(&key)?;
            } else {
                file.cards.truncate(room as usize * file.deck_len());
                file.deck_count = room;
                self.write(&file)?;
                kept = keep;
            }
        }
        if dropped > 0 {
            warn!(seed, kept, dropped, "discarded uncommitted decks");
        }
        Ok(dropped)
    }

    /// Delete every batch file for `seed`. Returns files removed.
    pub fn clear(&self, seed: u64) -> Result<usize> {
        let batch_keys = self.batch_keys(seed)?;
        for key in &batch_keys {
            self.backend.remove(key)?;
        }
        Ok(batch_keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{generate, RngState};
    use crate::storage::MemoryBackend;

    fn decks(n: usize, seed: u64, half: usize) -> Vec<Deck> {
        generate(n, &RngState::new(seed, half)).unwrap().decks
    }

    #[test]
    fn test_append_splits_into_files() {
        let backend = MemoryBackend::new();
        let archive = DeckArchive::new(&backend, 10);
        let all = decks(25, 1, 3);

        assert_eq!(archive.append(1, &all).unwrap(), 3);
        assert_eq!(
            backend.list("decks_1_").unwrap(),
            vec!["decks_1_0001.bin", "decks_1_0002.bin", "decks_1_0003.bin"]
        );
        assert_eq!(archive.load_all(1).unwrap(), all);
        assert_eq!(archive.deck_count(1).unwrap(), 25);
    }

    #[test]
    fn test_append_tops_up_last_file() {
        let backend = MemoryBackend::new();
        let archive = DeckArchive::new(&backend, 10);
        let all = decks(22, 2, 26);

        archive.append(2, &all[..4]).unwrap();
        // 6 fill the first file, 10 the second, 2 start a third.
        assert_eq!(archive.append(2, &all[4..]).unwrap(), 3);
        assert_eq!(backend.list("decks_2_").unwrap().len(), 3);
        assert_eq!(archive.load_all(2).unwrap(), all);
    }

    #[test]
    fn test_append_after_full_file_opens_new_one() {
        let backend = MemoryBackend::new();
        let archive = DeckArchive::new(&backend, 5);
        let all = decks(8, 3, 4);

        archive.append(3, &all[..5]).unwrap();
        assert_eq!(archive.append(3, &all[5..]).unwrap(), 1);
        assert_eq!(backend.list("decks_3_").unwrap().len(), 2);
        assert_eq!(archive.load_all(3).unwrap(), all);
    }

    #[test]
    fn test_missing_seed_is_data_not_found() {
        let backend = MemoryBackend::new();
        let archive = DeckArchive::new(&backend, 5);
        archive.append(1, &decks(3, 1, 3)).unwrap();

        assert!(matches!(archive.load_all(2), Err(PenneyError::DataNotFound(2))));
        assert_eq!(archive.deck_count(2).unwrap(), 0);
    }

    #[test]
    fn test_half_deck_mismatch_rejected() {
        let backend = MemoryBackend::new();
        let archive = DeckArchive::new(&backend, 10);
        archive.append(5, &decks(2, 5, 3)).unwrap();

        let result = archive.append(5, &decks(2, 5, 4));
        assert!(matches!(
            result,
            Err(PenneyError::HalfDeckMismatch { expected: 3, found: 4 })
        ));
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let backend = MemoryBackend::new();
        let mut file = DeckBatchFile::new(6, 1, 2);
        file.deck_count = 2;
        file.cards = vec![0, 1, 1, 0, 1];
        backend
            .save(&keys::deck_batch(6, 1), &bincode::serialize(&file).unwrap())
            .unwrap();

        let archive = DeckArchive::new(&backend, 10);
        assert!(matches!(archive.load_all(6), Err(PenneyError::InvalidDeck(_))));
    }

    #[test]
    fn test_five_digit_batches_stay_in_order() {
        let backend = MemoryBackend::new();
        let archive = DeckArchive::new(&backend, 1);
        let all = decks(10_002, 9, 1);

        archive.append(9, &all[..10_001]).unwrap();
        archive.append(9, &all[10_001..]).unwrap();

        assert_eq!(backend.list("decks_9_").unwrap().len(), 10_002);
        assert!(backend.exists("decks_9_10002.bin").unwrap());
        assert_eq!(archive.deck_count(9).unwrap(), 10_002);
        assert_eq!(archive.load_all(9).unwrap(), all);
    }

    #[test]
    fn test_truncate_drops_trailing_decks() {
        let backend = MemoryBackend::new();
        let archive = DeckArchive::new(&backend, 4);
        let all = decks(10, 10, 3);
        archive.append(10, &all).unwrap();

        assert_eq!(archive.truncate(10, 6).unwrap(), 4);
        assert_eq!(backend.list("decks_10_").unwrap().len(), 2);
        assert_eq!(archive.load_all(10).unwrap(), all[..6].to_vec());

        assert_eq!(archive.truncate(10, 6).unwrap(), 0);
        archive.append(10, &all[6..]).unwrap();
        assert_eq!(archive.load_all(10).unwrap(), all);
    }

    #[test]
    fn test_clear() {
        let backend = MemoryBackend::new();
        let archive = DeckArchive::new(&backend, 2);
        archive.append(7, &decks(5, 7, 3)).unwrap();
        archive.append(8, &decks(1, 8, 3)).unwrap();

        assert_eq!(archive.clear(7).unwrap(), 3);
        assert!(matches!(archive.load_all(7), Err(PenneyError::DataNotFound(7))));
        assert_eq!(archive.deck_count(8).unwrap(), 1);
    }
}
