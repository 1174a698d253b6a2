//! The three extractors: experiment sheets, goal tables, journal text.
//!
//! All three share the same failure semantics: they never return an error.
//! A missing landmark degrades to a partial or empty result, a malformed
//! value degrades to absence or a default, and it is the caller's decision
//! whether an empty result set (`Experiment::runs`, the goal list, the
//! entry list) is worth surfacing as a warning.
//!
//! Each extraction call processes one fully materialised grid or text blob
//! to completion, sequentially and without I/O; independent inputs can be
//! extracted in parallel by the caller with no shared state.

mod goals;
mod journal;
mod sheet;

pub use goals::extract_goals;
pub use journal::{extract_journal, filter_entries_by_date_range};
pub use sheet::extract_experiment;
