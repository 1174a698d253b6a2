//! Thermal-cycling sequence records.

use serde::{Deserialize, Serialize};

/// One step of a thermal-cycling sequence.
///
/// All values are preserved verbatim: sheets mix plain numbers, ranges
/// ("95-85") and annotated strings ("60 (touchdown)") in the same columns,
/// so the engine does not attempt to normalise them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStep {
    /// Step name. Repeats the previous named step when the sheet row only
    /// added cycle/offset data under the same step.
    pub name: String,
    /// Temperature text, typically Celsius.
    pub temperature: String,
    /// Duration text, typically seconds.
    pub duration: String,
    /// Cycle count text.
    pub cycles: String,
    /// Time offset text.
    pub offset: String,
}

/// Sequence setup of one run: chip type plus ordered steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSetup {
    /// Chip type label from the section marker row.
    pub chip_type: String,
    /// Steps in sheet order.
    pub steps: Vec<SequenceStep>,
}

impl SequenceSetup {
    /// Create a sequence setup with no steps yet.
    #[must_use]
    pub fn new(chip_type: impl Into<String>) -> Self {
        Self {
            chip_type: chip_type.into(),
            steps: Vec::new(),
        }
    }
}
