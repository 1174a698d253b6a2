//! Ct values - one optional cycle-threshold slot per detection channel.

use serde::{Deserialize, Serialize};

/// Number of detection channels on the device.
pub const CHANNEL_COUNT: usize = 5;

/// Cycle-threshold values for the five channels of one fluorophore.
///
/// Each slot is either a finite non-negative number (including exact zero,
/// meaning "detected at baseline") or absent (meaning "no amplification /
/// not tested"). The absent/zero distinction is semantically load-bearing
/// downstream and is never collapsed in either direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CtValues([Option<f64>; CHANNEL_COUNT]);

impl CtValues {
    /// Create from five channel slots.
    #[must_use]
    pub const fn new(slots: [Option<f64>; CHANNEL_COUNT]) -> Self {
        Self(slots)
    }

    /// Value for a channel index, `None` for absent slots and for indices
    /// outside 0..5.
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    /// Channel 0 value.
    #[must_use]
    pub const fn ch0(&self) -> Option<f64> {
        self.0[0]
    }

    /// Channel 1 value.
    #[must_use]
    pub const fn ch1(&self) -> Option<f64> {
        self.0[1]
    }

    /// Channel 2 value.
    #[must_use]
    pub const fn ch2(&self) -> Option<f64> {
        self.0[2]
    }

    /// Channel 3 value.
    #[must_use]
    pub const fn ch3(&self) -> Option<f64> {
        self.0[3]
    }

    /// Channel 4 value.
    #[must_use]
    pub const fn ch4(&self) -> Option<f64> {
        self.0[4]
    }

    /// All five slots in channel order.
    #[must_use]
    pub const fn slots(&self) -> &[Option<f64>; CHANNEL_COUNT] {
        &self.0
    }

    /// True when every slot is absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}
