//! Near-duplicate detection over token-sequence fingerprints

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use url::Url;

/// Opaque hash over a page's ordered filtered-token sequence
///
/// Two pages with identical filtered-token sequences always produce the
/// same fingerprint. Hash collisions mis-classify a page as a duplicate;
/// that loss is accepted, false negatives on identical sequences are not
/// possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentFingerprint(u64);

impl ContentFingerprint {
    /// Fingerprints an ordered token sequence
    ///
    /// Tokens are fed through SHA-256 with a separator byte between them,
    /// so ["ab", "c"] and ["a", "bc"] hash differently; the fingerprint is
    /// the first eight bytes of the digest.
    pub fn of_tokens(tokens: &[String]) -> Self {
        let mut hasher = Sha256::new();
        for token in tokens {
            hasher.update(token.as_bytes());
            hasher.update([0x1f]);
        }
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(prefix))
    }

    /// Hex rendering for logs
    pub fn to_hex(self) -> String {
        hex::encode(self.0.to_be_bytes())
    }
}

/// Maps each fingerprint to the first URL that produced it
///
/// The insert-if-absent step is atomic per fingerprint: under concurrent
/// first arrivals exactly one caller sees "not a duplicate", and that
/// caller's URL stays canonical for the rest of the run.
#[derive(Debug, Default)]
pub struct DuplicateDetector {
    seen: DashMap<ContentFingerprint, String>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprints the token sequence and checks it against pages already
    /// seen
    ///
    /// Returns false (and records this URL as canonical) on first arrival,
    /// true without mutating state on every later arrival.
    pub fn is_duplicate(&self, url: &Url, tokens: &[String]) -> bool {
        let fingerprint = ContentFingerprint::of_tokens(tokens);

        match self.seen.entry(fingerprint) {
            Entry::Occupied(existing) => {
                tracing::debug!(
                    "Content of {} duplicates {} (fingerprint {})",
                    url,
                    existing.get(),
                    fingerprint.to_hex()
                );
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(url.to_string());
                false
            }
        }
    }

    /// Number of distinct fingerprints seen; equals the number of unique
    /// accepted pages, since every accepted page inserts exactly one
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// The canonical URL recorded for a token sequence, if any
    pub fn canonical_url(&self, tokens: &[String]) -> Option<String> {
        self.seen
            .get(&ContentFingerprint::of_tokens(tokens))
            .map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_identical_sequences_same_fingerprint() {
        let a = ContentFingerprint::of_tokens(&tokens(&["alpha", "beta"]));
        let b = ContentFingerprint::of_tokens(&tokens(&["alpha", "beta"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_matters() {
        let a = ContentFingerprint::of_tokens(&tokens(&["alpha", "beta"]));
        let b = ContentFingerprint::of_tokens(&tokens(&["beta", "alpha"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_separator_prevents_concatenation_collisions() {
        let a = ContentFingerprint::of_tokens(&tokens(&["ab", "c"]));
        let b = ContentFingerprint::of_tokens(&tokens(&["a", "bc"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_first_arrival_not_duplicate() {
        let detector = DuplicateDetector::new();
        let words = tokens(&["research", "lab", "news"]);

        assert!(!detector.is_duplicate(&url("https://a.ics.uci.edu/1"), &words));
        assert!(detector.is_duplicate(&url("https://b.ics.uci.edu/2"), &words));
        assert!(detector.is_duplicate(&url("https://c.ics.uci.edu/3"), &words));
    }

    #[test]
    fn test_first_url_stays_canonical() {
        let detector = DuplicateDetector::new();
        let words = tokens(&["one", "two"]);

        detector.is_duplicate(&url("https://first.ics.uci.edu/"), &words);
        detector.is_duplicate(&url("https://second.ics.uci.edu/"), &words);

        assert_eq!(
            detector.canonical_url(&words).unwrap(),
            "https://first.ics.uci.edu/"
        );
    }

    #[test]
    fn test_distinct_sequences_independent() {
        let detector = DuplicateDetector::new();
        assert!(!detector.is_duplicate(&url("https://a.ics.uci.edu/"), &tokens(&["x", "y"])));
        assert!(!detector.is_duplicate(&url("https://b.ics.uci.edu/"), &tokens(&["y", "x"])));
        assert_eq!(detector.len(), 2);
    }

    #[test]
    fn test_empty_sequence_fingerprints() {
        let detector = DuplicateDetector::new();
        assert!(!detector.is_duplicate(&url("https://a.ics.uci.edu/"), &[]));
        assert!(detector.is_duplicate(&url("https://b.ics.uci.edu/"), &[]));
    }

    #[test]
    fn test_concurrent_first_arrivals_single_winner() {
        use std::sync::Arc;

        let detector = Arc::new(DuplicateDetector::new());
        let words = Arc::new(tokens(&["shared", "content"]));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let detector = Arc::clone(&detector);
                let words = Arc::clone(&words);
                std::thread::spawn(move || {
                    let u = url(&format!("https://w{}.ics.uci.edu/", i));
                    detector.is_duplicate(&u, &words)
                })
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one thread wins the insert; everyone else sees a duplicate
        assert_eq!(results.iter().filter(|dup| !**dup).count(), 1);
        assert_eq!(detector.len(), 1);
    }
}
