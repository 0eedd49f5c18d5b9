//! Verse lookup by emotion label.
//!
//! [`VerseIndex`] groups the corpus by label once at startup and is never
//! mutated afterwards, so it is shared across requests without locking.
//! [`VerseSelector`] picks uniformly within a group through an injectable
//! [`RandomSource`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::models::corpus::{CorpusEntry, NO_VERSE_FALLBACK};
use crate::models::emotion::EmotionLabel;

/// Labels holding less than this share of the corpus are reported as imbalanced.
pub const DEFAULT_IMBALANCE_THRESHOLD: f64 = 0.1;

/// Source of uniform indices in `0..len`.
pub trait RandomSource: Send + Sync {
    /// `len` is always non-zero.
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local RNG. Not seedable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic source cycling through a fixed list of indices.
///
/// Each value is reduced modulo the group length.
#[derive(Debug, Default)]
pub struct SequenceSource {
    sequence: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequenceSource {
    pub fn new(sequence: Vec<usize>) -> Self {
        Self {
            sequence,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceSource {
    fn pick(&self, len: usize) -> usize {
        if self.sequence.is_empty() {
            return 0;
        }
        let pos = self.cursor.fetch_add(1, Ordering::Relaxed) % self.sequence.len();
        self.sequence[pos] % len
    }
}

/// Corpus grouped by label, in load order within each group.
#[derive(Debug, Default, Clone)]
pub struct VerseIndex {
    groups: [Vec<CorpusEntry>; EmotionLabel::COUNT],
}

impl VerseIndex {
    pub fn from_entries(entries: impl IntoIterator<Item = CorpusEntry>) -> Self {
        let mut groups: [Vec<CorpusEntry>; EmotionLabel::COUNT] = Default::default();
        for entry in entries {
            groups[entry.label.index()].push(entry);
        }
        Self { groups }
    }

    pub fn group(&self, label: EmotionLabel) -> &[CorpusEntry] {
        &self.groups[label.index()]
    }

    /// Total entries across all labels.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CorpusStats {
        self.stats_with_threshold(DEFAULT_IMBALANCE_THRESHOLD)
    }

    /// Per-label counts and the labels whose share falls below `threshold`.
    pub fn stats_with_threshold(&self, threshold: f64) -> CorpusStats {
        let total = self.len();
        let counts: Vec<LabelCount> = EmotionLabel::ALL
            .iter()
            .map(|&label| {
                let count = self.group(label).len();
                let share = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                };
                LabelCount {
                    label,
                    count,
                    share,
                }
            })
            .collect();

        let imbalanced = counts
            .iter()
            .filter(|c| c.share < threshold)
            .map(|c| c.label)
            .collect();

        CorpusStats {
            total,
            counts,
            imbalanced,
        }
    }
}

/// Entry count for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: EmotionLabel,
    pub count: usize,
    pub share: f64,
}

/// Class distribution of the loaded corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub total: usize,
    pub counts: Vec<LabelCount>,
    pub imbalanced: Vec<EmotionLabel>,
}

/// Outcome of a verse lookup. `NotFound` is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerseLookup<'a> {
    Found(&'a CorpusEntry),
    NotFound,
}

impl VerseLookup<'_> {
    /// Formatted citation, or the fallback message.
    pub fn citation(&self) -> String {
        match self {
            VerseLookup::Found(entry) => entry.citation(),
            VerseLookup::NotFound => NO_VERSE_FALLBACK.to_string(),
        }
    }

    pub fn entry(&self) -> Option<&CorpusEntry> {
        match *self {
            VerseLookup::Found(entry) => Some(entry),
            VerseLookup::NotFound => None,
        }
    }
}

/// Picks a random verse for a label.
#[derive(Clone)]
pub struct VerseSelector {
    index: Arc<VerseIndex>,
    random: Arc<dyn RandomSource>,
}

impl VerseSelector {
    pub fn new(index: Arc<VerseIndex>, random: Arc<dyn RandomSource>) -> Self {
        Self { index, random }
    }

    /// Selector backed by the thread RNG.
    pub fn with_thread_rng(index: Arc<VerseIndex>) -> Self {
        Self::new(index, Arc::new(ThreadRngSource))
    }

    pub fn index(&self) -> &VerseIndex {
        &self.index
    }

    /// Uniformly chosen entry from the label's group.
    pub fn select(&self, label: EmotionLabel) -> VerseLookup<'_> {
        let group = self.index.group(label);
        if group.is_empty() {
            return VerseLookup::NotFound;
        }
        // Guard against sources that ignore the range contract
        let idx = self.random.pick(group.len()).min(group.len() - 1);
        VerseLookup::Found(&group[idx])
    }
}
