pub mod corpus;
pub mod emotion;

pub use corpus::{CorpusEntry, SourceReference, NO_VERSE_FALLBACK};
pub use emotion::{EmotionLabel, ProbabilityVector, Verdict};
