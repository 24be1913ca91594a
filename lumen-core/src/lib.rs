//! LUMEN Core - Shared Data Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types, the error taxonomy, and the clock
//! seam - no business logic.

pub mod clock;
pub mod error;
pub mod record;
pub mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{
    AnalyzerError, ConfigError, DataError, LumenError, LumenResult, StoreError, ValidationError,
};
pub use record::{CategoryCounts, ObservationRecord, RecordCategory, SubjectRef, Valence};
pub use snapshot::{
    AnalyticsSnapshot, AnomalyFinding, CorrelationFinding, PatternFinding, PredictionFinding,
    Significance,
};

use chrono::{DateTime, Utc};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Subject identifier. Subjects are externally owned; their ids are opaque
/// strings supplied by the record store.
pub type SubjectId = String;
