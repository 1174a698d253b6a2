//! Typed domain records produced by the extractors.
//!
//! ## Schema Overview
//!
//! ```text
//! Experiment (1) ──< ChannelAssignment (0..10)
//!                ──< Run (N) ── ct_fam/ct_rox: CtValues
//!                               └── sequence: Option<SequenceSetup> ──< SequenceStep (N)
//!                ──< ReagentFormulation (N) ──< ReagentItem (N)
//!
//! Goal          (independent, one per goal-table row span)
//! JournalEntry  (independent, one per dated journal block)
//! ```
//!
//! All records are plain immutable value structs: created once per input,
//! owned solely by the caller, no behavior beyond data access. There is no
//! error type anywhere in this schema: malformed or missing input surfaces
//! as absence (`Option::None`, empty strings, zero defaults) inside the
//! records themselves.

mod ct_values;
mod experiment;
mod goal;
mod journal;
mod reagent;
mod run;
mod sequence;

pub use ct_values::{CtValues, CHANNEL_COUNT};
pub use experiment::{ChannelAssignment, Experiment, Fluorophore};
pub use goal::Goal;
pub use journal::JournalEntry;
pub use reagent::{ReagentFormulation, ReagentItem};
pub use run::Run;
pub use sequence::{SequenceSetup, SequenceStep};
