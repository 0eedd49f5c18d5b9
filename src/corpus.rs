//! Reference corpus loading.
//!
//! Reads the labeled verse CSV once at startup. Required columns are
//! `label`, `ayah_en`, `surah_no` and `ayah_no_surah`; any others are ignored.
//! Rows with a blank label or verse text, or unreadable verse numbers, are
//! skipped and counted. A label outside the four known emotions is a
//! configuration error.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::models::corpus::CorpusEntry;
use crate::models::emotion::EmotionLabel;
use crate::services::verse::VerseIndex;
use crate::JarError;

const COL_LABEL: &str = "label";
const COL_TEXT: &str = "ayah_en";
const COL_SURAH: &str = "surah_no";
const COL_AYAH: &str = "ayah_no_surah";

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    BlankLabel,
    BlankText,
    BadReference(String),
}

/// Loaded entries plus the rows that were dropped (1-based data row numbers).
#[derive(Debug, Clone, Default)]
pub struct CorpusLoad {
    pub entries: Vec<CorpusEntry>,
    pub skipped: Vec<(usize, SkipReason)>,
}

impl CorpusLoad {
    pub fn into_index(self) -> VerseIndex {
        VerseIndex::from_entries(self.entries)
    }
}

struct Columns {
    label: usize,
    text: usize,
    surah: usize,
    ayah: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, JarError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| JarError::Corpus(format!("missing required column '{}'", name)))
        };
        Ok(Self {
            label: find(COL_LABEL)?,
            text: find(COL_TEXT)?,
            surah: find(COL_SURAH)?,
            ayah: find(COL_AYAH)?,
        })
    }
}

/// Verse numbers may be written as floats (`"2.0"`) by dataframe exports.
fn parse_number(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

/// Parse corpus CSV from any reader.
pub fn read_corpus<R: Read>(reader: R) -> Result<CorpusLoad, JarError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::locate(rdr.headers()?)?;

    let mut load = CorpusLoad::default();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let label_raw = field(columns.label);
        if label_raw.is_empty() {
            load.skipped.push((row, SkipReason::BlankLabel));
            continue;
        }
        let text = field(columns.text);
        if text.is_empty() {
            load.skipped.push((row, SkipReason::BlankText));
            continue;
        }

        let label: EmotionLabel = label_raw.parse().map_err(|_| {
            JarError::Corpus(format!(
                "row {}: label '{}' is not one of anger, fear, joy, sadness",
                row, label_raw
            ))
        })?;

        let (surah, ayah) = (field(columns.surah), field(columns.ayah));
        match (parse_number(surah), parse_number(ayah)) {
            (Some(surah_no), Some(ayah_no)) => {
                load.entries.push(CorpusEntry::new(label, text, surah_no, ayah_no));
            }
            _ => {
                load.skipped.push((
                    row,
                    SkipReason::BadReference(format!("surah '{}', verse '{}'", surah, ayah)),
                ));
            }
        }
    }

    Ok(load)
}

/// Load and index the corpus file, logging data-quality findings.
pub fn load_corpus(path: &Path) -> Result<VerseIndex, JarError> {
    let file = std::fs::File::open(path).map_err(|e| {
        JarError::Corpus(format!("Failed to open corpus {}: {}", path.display(), e))
    })?;
    let load = read_corpus(std::io::BufReader::new(file))?;

    if !load.skipped.is_empty() {
        warn!(
            "Skipped {} corpus rows with blank label/text or bad verse numbers (first at row {})",
            load.skipped.len(),
            load.skipped[0].0
        );
    }

    let index = load.into_index();
    let stats = index.stats();
    info!(
        "Corpus loaded from {}: {} entries",
        path.display(),
        stats.total
    );
    for count in &stats.counts {
        info!("  {}: {} ({:.1}%)", count.label, count.count, count.share * 100.0);
    }
    if !stats.imbalanced.is_empty() {
        let labels: Vec<&str> = stats.imbalanced.iter().map(|l| l.as_str()).collect();
        warn!("Imbalanced corpus labels: {}", labels.join(", "));
    }

    Ok(index)
}
