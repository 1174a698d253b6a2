//! Experiment record - one per extracted sheet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ReagentFormulation, Run};

/// The two fluorescence detection channels of the dual-channel assay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fluorophore {
    /// Target-signal channel.
    Fam,
    /// Internal-control channel.
    Rox,
}

impl std::fmt::Display for Fluorophore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fam => write!(f, "FAM"),
            Self::Rox => write!(f, "ROX"),
        }
    }
}

/// Assignment of a sample description to one device channel.
///
/// Labels carry embedded semantics (copy numbers, no-template-control
/// markers) consumed by downstream analysis; the engine treats them as
/// opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAssignment {
    /// Channel index, 0-4.
    pub channel: u8,
    /// Detection channel the assignment belongs to.
    pub fluorophore: Fluorophore,
    /// Free-text sample label, e.g. "6600 cp/uL" or "NC".
    pub label: String,
}

/// One extracted experiment sheet.
///
/// Created once per input grid and immutable after extraction. An
/// experiment with an empty `runs` list is a valid outcome (the sheet had
/// no usable Ct table), distinguishable from a parse error - there are no
/// parse errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Identifier of the source document (file or sheet name).
    pub source_name: String,
    /// Date inferred from the source name, when it embeds one.
    pub experiment_date: Option<NaiveDate>,
    /// Stated purpose of the experiment.
    pub purpose: String,
    /// Free-form description of the experiments performed (may be multi-line).
    pub description: String,
    /// Tester name(s).
    pub tester: String,
    /// Device identifier, e.g. "TS-003".
    pub device: String,
    /// General notes (may be multi-line).
    pub notes: String,
    /// Resume / conclusions text (may be multi-line).
    pub resume: String,
    /// Per-channel sample assignments, FAM entries before ROX entries.
    pub channel_assignments: Vec<ChannelAssignment>,
    /// Runs from the Ct summary table, in sheet order.
    pub runs: Vec<Run>,
    /// Reagent formulations, in sheet order.
    pub reagent_formulations: Vec<ReagentFormulation>,
}

impl Experiment {
    /// Create an empty experiment for a source document.
    #[must_use]
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::default()
        }
    }

    /// Assignments for one detection channel, in channel order.
    #[must_use]
    pub fn assignments_for(&self, fluorophore: Fluorophore) -> Vec<&ChannelAssignment> {
        self.channel_assignments
            .iter()
            .filter(|ca| ca.fluorophore == fluorophore)
            .collect()
    }

    /// Look up a run by its run identifier.
    #[must_use]
    pub fn run(&self, run_id: &str) -> Option<&Run> {
        self.runs.iter().find(|r| r.run_id == run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_experiment_is_empty() {
        let exp = Experiment::new("sheet-01");
        assert_eq!(exp.source_name, "sheet-01");
        assert!(exp.experiment_date.is_none());
        assert!(exp.runs.is_empty());
        assert!(exp.channel_assignments.is_empty());
    }

    #[test]
    fn test_assignments_for_filters_by_fluorophore() {
        let mut exp = Experiment::new("s");
        exp.channel_assignments.push(ChannelAssignment {
            channel: 0,
            fluorophore: Fluorophore::Fam,
            label: "6600 cp".to_string(),
        });
        exp.channel_assignments.push(ChannelAssignment {
            channel: 0,
            fluorophore: Fluorophore::Rox,
            label: "IC".to_string(),
        });
        assert_eq!(exp.assignments_for(Fluorophore::Fam).len(), 1);
        assert_eq!(exp.assignments_for(Fluorophore::Rox)[0].label, "IC");
    }

    #[test]
    fn test_fluorophore_display() {
        assert_eq!(Fluorophore::Fam.to_string(), "FAM");
        assert_eq!(Fluorophore::Rox.to_string(), "ROX");
    }
}
