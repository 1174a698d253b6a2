//! Run record - one physical execution within an experiment sheet.

use serde::{Deserialize, Serialize};

use super::{CtValues, SequenceSetup};

/// One run (trial) of an experiment.
///
/// A run is created by the Ct summary table pass; the per-run detail pass
/// later merges labeled sub-fields into it, matched on `run_id`. The run
/// identifier is unique within an experiment and is the only join key
/// between the two passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Trial number, 0 when missing or unparseable.
    pub trial: u32,
    /// Run identifier, e.g. "0105_003_TS_6600_1". Unique within an experiment.
    pub run_id: String,
    /// Ct values on the FAM (target) channel block.
    pub ct_fam: CtValues,
    /// Ct values on the ROX (internal control) channel block.
    pub ct_rox: CtValues,
    /// Notes from the Ct table row.
    pub notes: String,
    /// Sample setup text from the detail block.
    pub sample_setup: Option<String>,
    /// Reagent batch number from the detail block.
    pub batch_number: Option<String>,
    /// Notes from the detail block (distinct from the table-row notes).
    pub run_notes: Option<String>,
    /// Video file reference from the detail block.
    pub video: Option<String>,
    /// Report file reference from the detail block.
    pub report: Option<String>,
    /// Thermal-cycling sequence from the detail block.
    pub sequence: Option<SequenceSetup>,
}

impl Run {
    /// Create a run with Ct data only, as the table pass does.
    #[must_use]
    pub fn new(trial: u32, run_id: impl Into<String>) -> Self {
        Self {
            trial,
            run_id: run_id.into(),
            ..Self::default()
        }
    }

    /// True when neither channel block carries any Ct value.
    #[must_use]
    pub fn has_no_ct_data(&self) -> bool {
        self.ct_fam.is_empty() && self.ct_rox.is_empty()
    }
}
