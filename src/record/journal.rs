//! Journal entry record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated, authored block of journal text.
///
/// An entry always carries a parsed date: content preceding the first
/// recognized date line in a journal is discarded, never emitted as an
/// undated entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Parsed entry date.
    pub entry_date: NaiveDate,
    /// The date line exactly as written in the source.
    pub date_str: String,
    /// Author name; empty when no author line was detected.
    pub author: String,
    /// Entry content, cleaned of placeholder markers and excess blank lines.
    pub content: String,
    /// Identifier of the source document.
    pub source_name: String,
}
