//! Goal record - one per goal-table row span.

use serde::{Deserialize, Serialize};

/// One goal from the goal-tracking table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Short name, unique within a goal table.
    pub short_name: String,
    /// Requirements text, possibly accumulated across multiple rows.
    pub requirements: String,
    /// Point value, 0 when unspecified or unparseable.
    pub points: u32,
    /// Sign-off field text.
    pub sign_off: String,
    /// Due-date text, preserved as written.
    pub due_date: String,
    /// Goal-type text.
    pub goal_type: String,
}
