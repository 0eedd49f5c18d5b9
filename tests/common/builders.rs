//! Test data builders for corpus construction.
//!
//! Provides a fluent API for writing corpus CSV files with sensible defaults.

#![allow(dead_code)]

use quranjar::models::{CorpusEntry, EmotionLabel};

/// Builder for corpus CSV content.
///
/// Column order differs from the loader's lookup order on purpose, the loader
/// finds columns by header name.
pub struct CorpusBuilder {
    rows: Vec<[String; 4]>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a well-formed verse row.
    pub fn verse(self, label: EmotionLabel, text: &str, surah: u32, ayah: u32) -> Self {
        self.raw(label.as_str(), text, &surah.to_string(), &ayah.to_string())
    }

    /// Add a row verbatim, including blank or malformed fields.
    pub fn raw(mut self, label: &str, text: &str, surah: &str, ayah: &str) -> Self {
        self.rows.push([
            surah.to_string(),
            ayah.to_string(),
            text.to_string(),
            label.to_string(),
        ]);
        self
    }

    /// A small corpus with at least one verse for every label.
    pub fn balanced() -> Self {
        Self::new()
            .verse(EmotionLabel::Anger, "and those who restrain anger", 3, 134)
            .verse(EmotionLabel::Fear, "do not fear, indeed I am with you", 20, 46)
            .verse(EmotionLabel::Joy, "in the bounty of Allah let them rejoice", 10, 58)
            .verse(EmotionLabel::Sadness, "indeed, with hardship comes ease", 94, 6)
    }

    /// Entries the loader should produce for the well-formed rows.
    pub fn entries(&self) -> Vec<CorpusEntry> {
        self.rows
            .iter()
            .filter_map(|[surah, ayah, text, label]| {
                Some(CorpusEntry::new(
                    label.parse().ok()?,
                    text.clone(),
                    surah.parse().ok()?,
                    ayah.parse().ok()?,
                ))
            })
            .filter(|e| !e.text.trim().is_empty())
            .collect()
    }

    /// Render as CSV with a header row.
    pub fn to_csv(&self) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["surah_no", "ayah_no_surah", "ayah_en", "label"])
            .expect("write header");
        for row in &self.rows {
            wtr.write_record(row).expect("write row");
        }
        String::from_utf8(wtr.into_inner().expect("flush csv")).expect("utf8 csv")
    }
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self::new()
    }
}
