//! Goal table extractor.
//!
//! The goal table interleaves goal rows with priority markers, section
//! headers and spacer rows, and splits a goal's requirement text (and
//! sometimes its points or due date) across several physical rows. The
//! extractor walks the grid once: each candidate row opens a goal, then
//! continuation rows (empty name column) are consumed into it until the
//! next named row.

use tracing::warn;

use crate::grid::Grid;
use crate::record::Goal;

/// Column holding the goal short name.
const NAME_COL: usize = 1;
/// Column holding requirement text.
const REQUIREMENTS_COL: usize = 3;
/// Column holding the point value.
const POINTS_COL: usize = 4;
/// Column holding the sign-off field.
const SIGN_OFF_COL: usize = 5;
/// Column holding the due-date text.
const DUE_DATE_COL: usize = 6;
/// Column holding the goal-type text.
const GOAL_TYPE_COL: usize = 7;

/// Name-column values that never start a goal: priority markers and the
/// percent-check row.
const SKIP_MARKERS: [&str; 3] = ["high", "low", "individual % check:"];

/// Names that structurally match a goal row but carry no goal content.
const NAME_DENYLIST: [&str; 1] = ["total"];

/// Extract all goals from a goal-table grid.
///
/// Rows whose name column is empty, a skip marker, a section header
/// (contains `/`), or the table's own header row (`active goal…`) never
/// start a goal. Point values that fail integer parsing become 0 rather
/// than an error.
///
/// ## Example
///
/// ```
/// use labmark::{extract_goals, Grid};
///
/// let grid = Grid::from_rows(vec![
///     vec![String::new(), "R2D2".into(), String::new(), "Ship rev 2".into(), "50".into()],
///     vec![String::new(), String::new(), String::new(), "and document it".into()],
/// ]);
/// let goals = extract_goals(&grid);
/// assert_eq!(goals.len(), 1);
/// assert_eq!(goals[0].points, 50);
/// assert_eq!(goals[0].requirements, "Ship rev 2\nand document it");
/// ```
#[must_use]
pub fn extract_goals(grid: &Grid) -> Vec<Goal> {
    let mut goals = Vec::new();
    let mut i = 0;

    while i < grid.row_count() {
        let short_name = grid.cell(i, NAME_COL);
        let name_lower = short_name.to_lowercase();

        if short_name.is_empty() || SKIP_MARKERS.contains(&name_lower.as_str()) {
            i += 1;
            continue;
        }
        if name_lower.starts_with("active goal") || short_name.contains('/') {
            i += 1;
            continue;
        }

        let mut requirement_lines = vec![grid.cell(i, REQUIREMENTS_COL).to_string()];
        let mut points_text = grid.cell(i, POINTS_COL).to_string();
        let sign_off = grid.cell(i, SIGN_OFF_COL).to_string();
        let mut due_date = grid.cell(i, DUE_DATE_COL).to_string();
        let goal_type = grid.cell(i, GOAL_TYPE_COL).to_string();

        // Continuation rows: requirement text accumulates, and points/due
        // date back-fill from the first row that supplies them (some table
        // variants split these across rows).
        let mut j = i + 1;
        while j < grid.row_count() {
            if !grid.cell(j, NAME_COL).is_empty() {
                break;
            }
            let continuation = grid.cell(j, REQUIREMENTS_COL);
            if !continuation.is_empty() {
                requirement_lines.push(continuation.to_string());
            }
            if points_text.is_empty() {
                points_text = grid.cell(j, POINTS_COL).to_string();
            }
            if due_date.is_empty() {
                due_date = grid.cell(j, DUE_DATE_COL).to_string();
            }
            j += 1;
        }

        if NAME_DENYLIST.contains(&name_lower.as_str()) {
            warn!(name = %short_name, "discarding non-goal row from goal table");
            i = j;
            continue;
        }

        let requirements = requirement_lines
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        goals.push(Goal {
            short_name: short_name.to_string(),
            requirements,
            points: points_text.parse().unwrap_or(0),
            sign_off,
            due_date,
            goal_type,
        });
        i = j;
    }

    goals
}
