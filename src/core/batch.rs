use std::collections::HashSet;
use std::ops::Index;

use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::core::card::{Card, GridKey};

/// Retry allowance per requested card before giving up on uniqueness.
pub const DEFAULT_ATTEMPTS_PER_CARD: usize = 100;

/// Tuning knobs for batch generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Total attempt budget is `count * attempts_per_card`.
    pub attempts_per_card: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            attempts_per_card: DEFAULT_ATTEMPTS_PER_CARD,
        }
    }
}

/// Reported when a batch came back smaller than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub requested: usize,
    pub produced: usize,
}

/// Ordered set of grid-distinct cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardBatch {
    cards: Vec<Card>,
    requested: usize,
}

impl CardBatch {
    /// Rebuild a batch from cards loaded elsewhere, rejecting duplicate grids.
    pub fn from_cards(cards: Vec<Card>, requested: usize) -> Option<Self> {
        let mut seen = HashSet::with_capacity(cards.len());
        if cards.iter().all(|card| seen.insert(card.key())) {
            Some(Self { cards, requested })
        } else {
            None
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn get(&self, id: usize) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn shortfall(&self) -> Option<Shortfall> {
        (self.cards.len() < self.requested).then_some(Shortfall {
            requested: self.requested,
            produced: self.cards.len(),
        })
    }

    /// SHA-256 over the grids in batch order, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for card in &self.cards {
            hasher.update(card.key().0);
        }
        let digest = hasher.finalize();
        format!("{digest:02x}")
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }
}

impl Index<usize> for CardBatch {
    type Output = Card;

    fn index(&self, index: usize) -> &Card {
        &self.cards[index]
    }
}

impl<'a> IntoIterator for &'a CardBatch {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// Generate `count` grid-distinct cards with the default attempt budget.
pub fn generate_unique_cards<R: Rng + ?Sized>(
    count: usize,
    names: Option<&[String]>,
    rng: &mut R,
) -> CardBatch {
    generate_unique_cards_with(count, names, &GeneratorOptions::default(), rng)
}

/// Generate up to `count` grid-distinct cards.
///
/// Names are handed out in order to cards `1..=names.len()`; an empty name
/// leaves that card unnamed. When the attempt
/// budget runs out first, the batch is returned short and a warning is logged;
/// callers can inspect [`CardBatch::shortfall`].
pub fn generate_unique_cards_with<R: Rng + ?Sized>(
    count: usize,
    names: Option<&[String]>,
    options: &GeneratorOptions,
    rng: &mut R,
) -> CardBatch {
    let max_attempts = count.saturating_mul(options.attempts_per_card);
    let mut cards: Vec<Card> = Vec::with_capacity(count);
    let mut seen: HashSet<GridKey> = HashSet::with_capacity(count);
    let mut attempts = 0usize;

    while cards.len() < count && attempts < max_attempts {
        let position = cards.len();
        let name = names
            .and_then(|list| list.get(position))
            .filter(|name| !name.is_empty())
            .cloned();
        let card = Card::random(position + 1, name, rng);
        if seen.insert(card.key()) {
            cards.push(card);
        }
        attempts += 1;
    }

    debug!(requested = count, produced = cards.len(), attempts, "card generation finished");
    if cards.len() < count {
        warn!(
            requested = count,
            produced = cards.len(),
            "only generated {} unique cards out of {} requested",
            cards.len(),
            count
        );
    }

    CardBatch {
        cards,
        requested: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Generator that always yields zero, so every card comes out identical.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    /// Shared buffer that collects formatted log output.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn batch_has_requested_size_and_sequential_ids() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let batch = generate_unique_cards(12, None, &mut rng);
        assert_eq!(batch.len(), 12);
        assert!(batch.shortfall().is_none());
        let ids: Vec<usize> = batch.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn cards_are_pairwise_distinct() {
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        let batch = generate_unique_cards(200, None, &mut rng);
        let keys: HashSet<GridKey> = batch.iter().map(Card::key).collect();
        assert_eq!(keys.len(), batch.len());
    }

    #[test]
    fn names_apply_positionally() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let list = names(&["Ada", "Grace"]);
        let batch = generate_unique_cards(3, Some(list.as_slice()), &mut rng);
        assert_eq!(batch[0].name.as_deref(), Some("Ada"));
        assert_eq!(batch[1].name.as_deref(), Some("Grace"));
        assert_eq!(batch[2].name, None);
    }

    #[test]
    fn same_seed_same_batch() {
        let list = names(&["a", "b", "c"]);
        let run = |seed| {
            generate_unique_cards(8, Some(list.as_slice()), &mut ChaCha20Rng::seed_from_u64(seed))
        };
        let a = run(42);
        let b = run(42);
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), run(43).fingerprint());
    }

    #[test]
    fn exhausted_budget_returns_short_batch() {
        let batch = generate_unique_cards(5, None, &mut ZeroRng);
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.shortfall(),
            Some(Shortfall {
                requested: 5,
                produced: 1
            })
        );
    }

    #[test]
    fn exhausted_budget_logs_a_warning() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let batch = tracing::subscriber::with_default(subscriber, || {
            generate_unique_cards(5, None, &mut ZeroRng)
        });
        assert_eq!(batch.len(), 1);
        let output = logs.contents();
        assert!(output.contains("WARN"), "no warning in: {output}");
        assert!(output.contains("only generated 1 unique cards out of 5"));
    }

    #[test]
    fn full_batch_logs_no_warning() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            generate_unique_cards(5, None, &mut ChaCha20Rng::seed_from_u64(3))
        });
        assert!(!logs.contents().contains("WARN"));
    }

    #[test]
    fn attempt_budget_is_configurable() {
        let options = GeneratorOptions {
            attempts_per_card: 0,
        };
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let batch = generate_unique_cards_with(4, None, &options, &mut rng);
        assert!(batch.is_empty());
        assert_eq!(batch.shortfall().map(|s| s.produced), Some(0));
    }

    #[test]
    fn zero_cards_requested_is_empty_without_shortfall() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let batch = generate_unique_cards(0, None, &mut rng);
        assert!(batch.is_empty());
        assert!(batch.shortfall().is_none());
    }

    #[test]
    fn from_cards_rejects_duplicate_grids() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let batch = generate_unique_cards(2, None, &mut rng);
        let mut cards = batch.cards().to_vec();
        assert!(CardBatch::from_cards(cards.clone(), 2).is_some());
        cards[1] = Card::new(2, None, *cards[0].grid());
        assert!(CardBatch::from_cards(cards, 2).is_none());
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let fp = generate_unique_cards(3, None, &mut rng).fingerprint();
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
