//! Observation records and subject directory entries.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Directory entry for a tracked subject, as listed by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
    pub id: String,
    pub name: String,
}

/// Category of an observation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCategory {
    /// Emotion log entries
    Emotion,
    /// Sensory response entries
    Sensory,
    /// General tracking entries
    Tracking,
}

impl RecordCategory {
    /// All tracked categories, in canonical order.
    pub const ALL: [RecordCategory; 3] = [
        RecordCategory::Emotion,
        RecordCategory::Sensory,
        RecordCategory::Tracking,
    ];
}

/// Valence of an observation, when the record carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Valence {
    Positive,
    Neutral,
    Negative,
}

/// A single time-series observation for a subject.
///
/// Records are delivered by the record store ordered by timestamp ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub timestamp: Timestamp,
    pub category: RecordCategory,
    /// Valence, for records that carry one (emotion entries mostly do,
    /// tracking entries mostly don't).
    pub valence: Option<Valence>,
    /// Free-form note attached at capture time.
    pub note: Option<String>,
}

impl ObservationRecord {
    /// Create a bare record with no valence or note.
    pub fn new(timestamp: Timestamp, category: RecordCategory) -> Self {
        Self {
            timestamp,
            category,
            valence: None,
            note: None,
        }
    }

    /// Attach a valence.
    pub fn with_valence(mut self, valence: Valence) -> Self {
        self.valence = Some(valence);
        self
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Per-category record counts for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub emotion: u32,
    pub sensory: u32,
    pub tracking: u32,
}

impl CategoryCounts {
    /// Tally counts from a record slice.
    pub fn tally(records: &[ObservationRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.category {
                RecordCategory::Emotion => counts.emotion += 1,
                RecordCategory::Sensory => counts.sensory += 1,
                RecordCategory::Tracking => counts.tracking += 1,
            }
        }
        counts
    }

    /// Total records across all categories.
    pub fn total(&self) -> u32 {
        self.emotion + self.sensory + self.tracking
    }

    /// Number of categories with at least one record.
    pub fn observed_categories(&self) -> u32 {
        [self.emotion, self.sensory, self.tracking]
            .iter()
            .filter(|&&n| n > 0)
            .count() as u32
    }

    /// Count for a specific category.
    pub fn for_category(&self, category: RecordCategory) -> u32 {
        match category {
            RecordCategory::Emotion => self.emotion,
            RecordCategory::Sensory => self.sensory,
            RecordCategory::Tracking => self.tracking,
        }
    }
}
