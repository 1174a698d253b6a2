//! Reagent formulation records.

use serde::{Deserialize, Serialize};

/// One reagent line: name plus volume in microliters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReagentItem {
    /// Reagent name as written in the sheet.
    pub name: String,
    /// Volume in uL, 0.0 when missing or unparseable.
    pub volume: f64,
}

/// A reagent formulation: either one list for the whole experiment or one
/// per channel, depending on the sheet layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReagentFormulation {
    /// Channel index for per-channel layouts; absent when the formulation
    /// applies to the whole experiment.
    pub channel: Option<u8>,
    /// Declared number of samples the mix was prepared for.
    pub sample_count: Option<u32>,
    /// Reagent lines in sheet order, excluding the terminating total row.
    pub reagents: Vec<ReagentItem>,
    /// Total volume in uL from the terminating "Total" row.
    pub total_volume: Option<f64>,
}

impl ReagentFormulation {
    /// Create an empty formulation for a channel (or the whole experiment).
    #[must_use]
    pub fn new(channel: Option<u8>) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }
}
