//! Labeled reference corpus records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::emotion::EmotionLabel;

/// Citation shown when the predicted label has no corpus entries.
pub const NO_VERSE_FALLBACK: &str = "No verse found for the predicted emotion.";

/// Location of a verse: surah number and verse number within that surah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceReference {
    pub surah_no: u32,
    pub ayah_no_surah: u32,
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Surah {}, Verse {}", self.surah_no, self.ayah_no_surah)
    }
}

/// One labeled verse from the reference corpus. Read-only after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub label: EmotionLabel,
    pub text: String,
    pub source: SourceReference,
}

impl CorpusEntry {
    pub fn new(
        label: EmotionLabel,
        text: impl Into<String>,
        surah_no: u32,
        ayah_no_surah: u32,
    ) -> Self {
        Self {
            label,
            text: text.into(),
            source: SourceReference {
                surah_no,
                ayah_no_surah,
            },
        }
    }

    /// `"<text> (Surah <n>, Verse <m>)"`
    pub fn citation(&self) -> String {
        format!("{} ({})", self.text, self.source)
    }
}
