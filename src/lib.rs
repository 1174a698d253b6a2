//! # Labmark: Landmark-Based Lab Record Extraction
//!
//! Labmark converts loosely-structured documents - lab experiment record
//! sheets, a goal-tracking table, and free-form journal logs - into
//! strongly-typed records without any fixed schema or machine-readable
//! markup. Sections are located by *landmark cells* (`FAM`, `RUN ID:`,
//! `Reagents`, a date on its own line) and read through bounded positional
//! heuristics, so the engine degrades gracefully on every input variant
//! instead of failing outright.
//!
//! ## Design Principles
//!
//! - **No error type**: structural absence, malformed values, and
//!   out-of-range access all surface as absence inside the records; the
//!   caller decides whether an empty result is a failure.
//! - **Bounded scans**: every open-ended section scan has a named row cap,
//!   bounding worst-case work per call without timeouts.
//! - **Idempotent and sequential**: no I/O, no clocks, no shared state;
//!   identical input always yields identical records.
//!
//! ## Example Usage
//!
//! ```rust
//! use labmark::{extract_experiment, Grid};
//!
//! let grid = Grid::from_rows(vec![
//!     vec!["Purpose".to_string(), String::new(), "Check LOD".to_string()],
//! ]);
//! let exp = extract_experiment(&grid, "01_05_2026 Liquid + TS");
//! assert_eq!(exp.purpose, "Check LOD");
//! assert!(exp.runs.is_empty()); // no Ct table on this sheet - still valid
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod extract;
pub mod grid;
pub mod record;
pub mod report;

pub use extract::{extract_experiment, extract_goals, extract_journal, filter_entries_by_date_range};
pub use grid::Grid;
pub use record::{
    ChannelAssignment, CtValues, Experiment, Fluorophore, Goal, JournalEntry, ReagentFormulation,
    ReagentItem, Run, SequenceSetup, SequenceStep,
};
