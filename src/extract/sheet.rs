//! Experiment sheet extractor.
//!
//! Sheets have no fixed schema: section positions drift between variants,
//! fields span multiple rows, and whole sections are optional. The
//! extractor therefore locates every section by landmark cells (`FAM`,
//! `RUN ID:`, `Reagents`, ...) and reads a bounded window of rows around
//! each landmark. Every window has a named cap constant so the worst-case
//! work per sheet is bounded without any timeout machinery.
//!
//! Pipeline order matters: the Ct table pass creates the [`Run`] records
//! that the per-run detail pass later merges into by run identifier.
//!
//! No pass can fail. A missing landmark makes its pass a no-op, and an
//! [`Experiment`] with header metadata but an empty run list is a valid
//! output; callers decide whether that is worth a warning.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::grid::Grid;
use crate::record::{
    ChannelAssignment, CtValues, Experiment, Fluorophore, ReagentFormulation, ReagentItem, Run,
    SequenceSetup, SequenceStep,
};

/// Header metadata never appears below this row.
const HEADER_SCAN_ROWS: usize = 40;
/// Column holding header field values (`Purpose | | <value>`).
const HEADER_VALUE_COL: usize = 2;
/// Rows scanned below the `FAM` anchor for FAM channel labels.
const FAM_CHANNEL_WINDOW: usize = 5;
/// Offset range below the `FAM` anchor searched for the `ROX` sub-anchor.
const ROX_ANCHOR_WINDOW: std::ops::Range<usize> = 5..12;
/// Rows scanned below the Ct anchor for run rows (about 13 data rows after
/// the two header rows).
const CT_TABLE_SCAN_ROWS: usize = 15;
/// Width of one fluorophore's Ct block: one column per channel.
const CT_BLOCK_WIDTH: usize = crate::record::CHANNEL_COUNT;
/// Default FAM block start when column inference finds nothing.
const DEFAULT_FAM_COL: usize = 6;
/// A detail block never extends past this many rows.
const DETAIL_BLOCK_SPAN: usize = 100;
/// Rows scanned for thermal-cycle steps below a `Sequence setup` marker.
const SEQUENCE_SCAN_ROWS: usize = 15;
/// The reagent landmark always sits in the first few rows of the sheet.
const REAGENT_LANDMARK_ROWS: usize = 5;
/// Rows scanned for reagent lines below the landmark.
const REAGENT_SCAN_ROWS: usize = 25;
/// Window (rows x cols) searched for the volume column header.
const REAGENT_HEADER_WINDOW: usize = 5;
/// Columns scanned right of the landmark for per-channel group starts.
const REAGENT_CHANNEL_COL_WINDOW: usize = 30;
/// Header cells excluded from single-list reagent names as noise.
const GENERIC_REAGENT_HEADERS: [&str; 2] = ["reagent", "reagent description"];

static FILENAME_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})_(\d{2})_(\d{4})").expect("valid regex"));
static CHANNEL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CH\s*([0-4])").expect("valid regex"));

/// Header fields recognised in column 0 of the sheet's top rows.
///
/// Multi-row fields end when the *next* field's label appears; the
/// terminating-label sets below make that heuristic an explicit,
/// independently testable lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderField {
    Purpose,
    Description,
    Tester,
    Device,
    Notes,
    Resume,
}

impl HeaderField {
    /// Match a lowercased column-0 label against the field vocabulary.
    fn from_label(label: &str) -> Option<Self> {
        if label == "purpose" {
            Some(Self::Purpose)
        } else if label.starts_with("experiment") {
            Some(Self::Description)
        } else if label.starts_with("tester") {
            Some(Self::Tester)
        } else if label == "device" {
            Some(Self::Device)
        } else if label.starts_with("notes") {
            Some(Self::Notes)
        } else if label.starts_with("resume") {
            Some(Self::Resume)
        } else {
            None
        }
    }

    /// Column-0 prefixes that end this field's multi-row span.
    const fn terminators(self) -> &'static [&'static str] {
        match self {
            Self::Description => &["tester", "device", "notes", "resume", "fam", "rox"],
            Self::Notes => &["resume", "video", "fam", "rox", "device", "tester"],
            Self::Resume => &["fam", "rox", "notes"],
            Self::Purpose | Self::Tester | Self::Device => &[],
        }
    }

    /// Maximum number of physical rows the field may span.
    const fn max_span(self) -> usize {
        match self {
            Self::Description => 6,
            Self::Notes | Self::Resume => 10,
            Self::Purpose | Self::Tester | Self::Device => 1,
        }
    }
}

/// Extract one [`Experiment`] from a sheet grid.
///
/// `source_name` identifies the sheet for provenance and is scanned for an
/// embedded `MM_DD_YYYY` date.
///
/// ## Example
///
/// ```
/// use labmark::{extract_experiment, Grid};
///
/// let grid = Grid::from_rows(vec![vec![
///     "Purpose".to_string(),
///     String::new(),
///     "Check LOD".to_string(),
/// ]]);
/// let exp = extract_experiment(&grid, "01_05_2026 Liquid + TS");
/// assert_eq!(exp.purpose, "Check LOD");
/// assert!(exp.runs.is_empty());
/// ```
#[must_use]
pub fn extract_experiment(grid: &Grid, source_name: &str) -> Experiment {
    let mut exp = Experiment::new(source_name);
    exp.experiment_date = date_from_source_name(source_name);

    parse_header_metadata(grid, &mut exp);

    if let Some(anchor) = find_ct_table_anchor(grid) {
        debug!(row = anchor, "found Ct table anchor");
        parse_channel_assignments(grid, anchor, &mut exp);
        parse_ct_table(grid, anchor, &mut exp);
    }

    parse_run_details(grid, &mut exp);
    parse_reagents(grid, &mut exp);

    exp
}

/// Infer the experiment date from an `MM_DD_YYYY` fragment of the source
/// name. Missing or impossible dates yield `None`, never an error.
fn date_from_source_name(source_name: &str) -> Option<chrono::NaiveDate> {
    let caps = FILENAME_DATE.captures(source_name)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    chrono::NaiveDate::from_ymd_opt(year, month, day)
}

/// Scan the top of the sheet for labeled header fields.
fn parse_header_metadata(grid: &Grid, exp: &mut Experiment) {
    for row in 0..grid.row_count().min(HEADER_SCAN_ROWS + 1) {
        let label = grid.cell(row, 0).to_lowercase();
        let Some(field) = HeaderField::from_label(&label) else {
            continue;
        };
        match field {
            HeaderField::Purpose => exp.purpose = grid.cell(row, HEADER_VALUE_COL).to_string(),
            HeaderField::Tester => exp.tester = grid.cell(row, HEADER_VALUE_COL).to_string(),
            HeaderField::Device => exp.device = grid.cell(row, HEADER_VALUE_COL).to_string(),
            HeaderField::Description => exp.description = collect_multi_row(grid, row, field),
            HeaderField::Notes => exp.notes = collect_multi_row(grid, row, field),
            HeaderField::Resume => exp.resume = collect_multi_row(grid, row, field),
        }
    }
}

/// Accumulate a multi-row header field: the starting row's value plus the
/// value column of following rows, until a terminating label or the
/// field's span cap.
fn collect_multi_row(grid: &Grid, start: usize, field: HeaderField) -> String {
    let mut lines = vec![grid.cell(start, HEADER_VALUE_COL).to_string()];
    for row in start + 1..grid.row_count().min(start + field.max_span()) {
        let next_label = grid.cell(row, 0).to_lowercase();
        if !next_label.is_empty()
            && field.terminators().iter().any(|t| next_label.starts_with(t))
        {
            break;
        }
        let value = grid.cell(row, HEADER_VALUE_COL);
        if !value.is_empty() {
            lines.push(value.to_string());
        }
    }
    lines.join("\n")
}

/// Find the row where the dual-channel Ct summary table starts: column 0
/// equals `FAM` and the row also mentions `TRIAL` or `RUN ID`.
fn find_ct_table_anchor(grid: &Grid) -> Option<usize> {
    (0..grid.row_count()).find(|&row| {
        if !grid.cell(row, 0).eq_ignore_ascii_case("FAM") {
            return false;
        }
        let text = grid.row_text_upper(row);
        text.contains("TRIAL") || text.contains("RUN ID")
    })
}

/// Channel index from a `CH n` marker cell.
fn channel_number(text: &str) -> Option<u8> {
    CHANNEL_MARKER
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Capture FAM channel labels below the anchor, then ROX labels below the
/// `ROX` sub-anchor further down in the same table.
fn parse_channel_assignments(grid: &Grid, anchor: usize, exp: &mut Experiment) {
    for offset in 1..=FAM_CHANNEL_WINDOW {
        push_channel_assignment(grid, anchor + offset, Fluorophore::Fam, exp);
    }

    for offset in ROX_ANCHOR_WINDOW {
        let row = anchor + offset;
        if grid.cell(row, 0).eq_ignore_ascii_case("ROX") {
            for rox_offset in 1..=FAM_CHANNEL_WINDOW {
                push_channel_assignment(grid, row + rox_offset, Fluorophore::Rox, exp);
            }
            break;
        }
    }
}

fn push_channel_assignment(grid: &Grid, row: usize, fluorophore: Fluorophore, exp: &mut Experiment) {
    let marker = grid.cell(row, 0).to_uppercase();
    if !marker.starts_with("CH") {
        return;
    }
    if let Some(channel) = channel_number(&marker) {
        exp.channel_assignments.push(ChannelAssignment {
            channel,
            fluorophore,
            label: grid.cell(row, 1).to_string(),
        });
    }
}

/// Infer the starting columns of the FAM and ROX Ct blocks from the header
/// row below the anchor. Column positions vary across sheet variants, so a
/// fixed offset alone would misalign; content inference comes first and the
/// fixed default is only the last resort.
fn infer_ct_columns(grid: &Grid, anchor: usize) -> (usize, usize) {
    let header_row = anchor + 1;
    if header_row >= grid.row_count() {
        return (DEFAULT_FAM_COL, DEFAULT_FAM_COL + CT_BLOCK_WIDTH);
    }

    let mut ct_positions = Vec::new();
    for (col, cell) in grid.row(header_row).iter().enumerate() {
        let v = cell.trim().to_lowercase();
        if v.contains("ct") && (v.contains("ch0") || v.contains("ch 0")) {
            ct_positions.push(col);
        }
    }

    if ct_positions.len() >= 2 {
        return (ct_positions[0], ct_positions[1]);
    }
    if let Some(&fam) = ct_positions.first() {
        return (fam, fam + CT_BLOCK_WIDTH);
    }

    // Fallback: any header cell mentioning Ct at all.
    let mut fam = None;
    let mut rox = None;
    for (col, cell) in grid.row(header_row).iter().enumerate() {
        if cell.to_lowercase().contains("ct") {
            if fam.is_none() {
                fam = Some(col);
            } else {
                rox = Some(col);
                break;
            }
        }
    }
    let fam = fam.unwrap_or(DEFAULT_FAM_COL);
    (fam, rox.unwrap_or(fam + CT_BLOCK_WIDTH))
}

/// Parse one Ct cell. Empty or `-` means "no amplification" and stays
/// absent; `0`/`0.00` means "detected at baseline" and stays an exact zero.
/// The two are never collapsed into each other.
fn parse_ct_value(value: &str) -> Option<f64> {
    if value.is_empty() || value == "-" {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_ct_block(grid: &Grid, row: usize, start_col: usize) -> CtValues {
    let mut slots = [None; CT_BLOCK_WIDTH];
    for (i, slot) in slots.iter_mut().enumerate() {
        *slot = parse_ct_value(grid.cell(row, start_col + i));
    }
    CtValues::new(slots)
}

/// Read run rows out of the Ct summary table.
fn parse_ct_table(grid: &Grid, anchor: usize, exp: &mut Experiment) {
    let (fam_start, rox_start) = infer_ct_columns(grid, anchor);

    // Trial/run-id/notes columns come from the anchor row's own header
    // cells; fixed positions are only the fallback.
    let mut trial_col = None;
    let mut runid_col = None;
    let mut notes_col = None;
    for (col, cell) in grid.row(anchor).iter().enumerate() {
        let v = cell.trim().to_uppercase();
        if v == "TRIAL" {
            trial_col = Some(col);
        } else if v.contains("RUN ID") || v.contains("RUN_ID") {
            runid_col = Some(col);
        } else if v == "NOTES" {
            notes_col = Some(col);
        }
    }
    let trial_col = trial_col.unwrap_or(2);
    let runid_col = runid_col.unwrap_or(3);

    // Data starts two rows below the anchor (skipping the CH header row)
    // and the scan stops at the cap regardless of content.
    for row in anchor + 2..grid.row_count().min(anchor + CT_TABLE_SCAN_ROWS) {
        let trial_text = grid.cell(row, trial_col);
        let run_id = grid.cell(row, runid_col);
        if run_id.is_empty() {
            // Channel-label rows (CH n / ROX) and spacer rows have no run id.
            continue;
        }

        let mut run = Run::new(trial_text.parse().unwrap_or(0), run_id);
        run.ct_fam = parse_ct_block(grid, row, fam_start);
        run.ct_rox = parse_ct_block(grid, row, rox_start);
        if let Some(col) = notes_col {
            run.notes = grid.cell(row, col).to_string();
        }
        exp.runs.push(run);
    }
}

/// A `RUN ID:` marker row opening a per-run detail block.
struct DetailMarker {
    row: usize,
    trial_text: String,
    run_id: String,
}

/// Merge per-run detail blocks into the runs created by the Ct table pass.
///
/// A block whose run identifier matches no table run builds a throwaway
/// stub (keeping the field-capture code uniform) that is never added to the
/// experiment: detail without Ct data is discarded.
fn parse_run_details(grid: &Grid, exp: &mut Experiment) {
    let mut markers = Vec::new();
    for row in 0..grid.row_count() {
        let label = grid.cell(row, 0).to_uppercase();
        if let Some(rest) = label.strip_prefix("RUN ID:") {
            let trial_text = if rest.trim().is_empty() {
                grid.cell(row, 1).to_string()
            } else {
                rest.trim().to_string()
            };
            markers.push(DetailMarker {
                row,
                trial_text,
                run_id: grid.cell(row, HEADER_VALUE_COL).to_string(),
            });
        }
    }

    for (idx, marker) in markers.iter().enumerate() {
        let end = markers.get(idx + 1).map_or_else(
            || grid.row_count().min(marker.row + DETAIL_BLOCK_SPAN),
            |next| next.row,
        );

        let mut stub = None;
        let run = if let Some(pos) = exp.runs.iter().position(|r| r.run_id == marker.run_id) {
            &mut exp.runs[pos]
        } else if marker.run_id.is_empty() {
            continue;
        } else {
            warn!(
                run_id = %marker.run_id,
                "detail block has no matching Ct table run; discarding"
            );
            stub.insert(Run::new(
                marker.trial_text.parse().unwrap_or(0),
                marker.run_id.as_str(),
            ))
        };

        for row in marker.row + 1..end {
            let label = grid.cell(row, 0).to_lowercase();
            let value = || grid.cell(row, HEADER_VALUE_COL).to_string();
            if label.starts_with("sample setup") {
                run.sample_setup = Some(value());
            } else if label.starts_with("batch number") {
                run.batch_number = Some(value());
            } else if label.contains("notes") && !label.starts_with("run") {
                // First non-empty notes row wins; later ones belong to
                // sub-sections this pass does not model.
                let v = value();
                if run.run_notes.is_none() && !v.is_empty() {
                    run.run_notes = Some(v);
                }
            } else if label.starts_with("video") {
                run.video = Some(value());
            } else if label.starts_with("report") {
                run.report = Some(value());
            } else if label.starts_with("sequence setup") {
                run.sequence = Some(parse_sequence_section(grid, row));
            }
        }
    }
}

/// Parse a `Sequence setup` sub-block: chip type on the marker row, column
/// headers on the next row, then thermal-cycle steps.
fn parse_sequence_section(grid: &Grid, start: usize) -> SequenceSetup {
    let mut seq = SequenceSetup::new(grid.cell(start, HEADER_VALUE_COL));
    if start + 1 >= grid.row_count() {
        return seq;
    }

    // Step name is sticky: a row that only adds cycle/offset data under the
    // previous step omits the name and inherits it.
    let mut current_name = String::new();
    for row in start + 2..grid.row_count().min(start + SEQUENCE_SCAN_ROWS) {
        let name = grid.cell(row, 2);
        let temperature = grid.cell(row, 3);
        if name.is_empty() && temperature.is_empty() {
            break;
        }
        if !name.is_empty() {
            current_name = name.to_string();
        }
        if !temperature.is_empty() {
            seq.steps.push(SequenceStep {
                name: current_name.clone(),
                temperature: temperature.to_string(),
                duration: grid.cell(row, 4).to_string(),
                cycles: grid.cell(row, 5).to_string(),
                offset: grid.cell(row, 6).to_string(),
            });
        }
    }
    seq
}

/// Locate the reagent section landmark and dispatch on its layout.
///
/// Two layouts exist and are auto-detected from the landmark row's text:
/// side-by-side per-channel column groups (header mentions `channel 0` /
/// `channel 1`) or a single name/volume list.
fn parse_reagents(grid: &Grid, exp: &mut Experiment) {
    let Some((landmark_row, landmark_col)) = find_reagent_landmark(grid) else {
        return;
    };

    let header_text = grid
        .row(landmark_row)
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let per_channel = header_text.contains("channel 0") || header_text.contains("channel 1");

    if per_channel {
        parse_per_channel_reagents(grid, landmark_row, landmark_col, exp);
    } else {
        parse_single_reagent_list(grid, landmark_row, landmark_col, exp);
    }
}

fn find_reagent_landmark(grid: &Grid) -> Option<(usize, usize)> {
    // Primary landmark: a cell starting with "reagent".
    for row in 0..grid.row_count().min(REAGENT_LANDMARK_ROWS) {
        for col in 0..grid.row(row).len() {
            if grid.cell(row, col).to_lowercase().starts_with("reagent") {
                return Some((row, col));
            }
        }
    }
    // Alternative landmarks used by sheets without a "Reagents:" header.
    for row in 0..grid.row_count().min(REAGENT_LANDMARK_ROWS) {
        for col in 0..grid.row(row).len() {
            let v = grid.cell(row, col).to_lowercase();
            if v.contains("number of samples") || v.contains("master mix") {
                return Some((row, col));
            }
        }
    }
    None
}

fn parse_total_volume(volume_text: &str) -> Option<f64> {
    if volume_text.is_empty() {
        Some(0.0)
    } else {
        volume_text.parse().ok()
    }
}

fn parse_single_reagent_list(grid: &Grid, start_row: usize, start_col: usize, exp: &mut Experiment) {
    let mut formulation = ReagentFormulation::new(None);

    // Find the volume column by header text near the landmark.
    let mut vol_col = None;
    'outer: for row in start_row..grid.row_count().min(start_row + REAGENT_HEADER_WINDOW) {
        let width = grid.row(row).len();
        for col in start_col..width.min(start_col + REAGENT_HEADER_WINDOW) {
            let v = grid.cell(row, col).to_lowercase();
            if v.contains("volume") || v.contains("ul") {
                vol_col = Some(col);
                break 'outer;
            }
        }
    }
    let vol_col = vol_col.unwrap_or(start_col + 3);
    let name_col = if start_col + 1 < vol_col {
        start_col + 1
    } else {
        start_col
    };

    for row in start_row + 2..grid.row_count().min(start_row + REAGENT_SCAN_ROWS) {
        let mut name = grid.cell(row, name_col);
        if name.is_empty() {
            name = grid.cell(row, start_col);
        }
        let volume_text = grid.cell(row, vol_col);

        // Blank spacer rows do not terminate the list.
        if name.is_empty() && volume_text.is_empty() {
            continue;
        }

        let name_lower = name.to_lowercase();
        if name_lower.starts_with("total") {
            formulation.total_volume = parse_total_volume(volume_text);
            break;
        }

        if !name.is_empty() && !GENERIC_REAGENT_HEADERS.contains(&name_lower.as_str()) {
            formulation.reagents.push(ReagentItem {
                name: name.to_string(),
                volume: volume_text.parse().unwrap_or(0.0),
            });
        }
    }

    if !formulation.reagents.is_empty() {
        exp.reagent_formulations.push(formulation);
    }
}

fn parse_per_channel_reagents(
    grid: &Grid,
    start_row: usize,
    start_col: usize,
    exp: &mut Experiment,
) {
    // Column groups are located by their own header cells; the group's
    // left-to-right position gives the channel index.
    let width = grid.row(start_row).len();
    let mut group_cols = Vec::new();
    for col in start_col..width.min(start_col + REAGENT_CHANNEL_COL_WINDOW) {
        let v = grid.cell(start_row, col).to_lowercase();
        if v.starts_with("channel") || v.contains("number of samples") {
            group_cols.push(col);
        }
    }

    for (index, &group_col) in group_cols.iter().take(CT_BLOCK_WIDTH).enumerate() {
        let mut formulation = ReagentFormulation::new(u8::try_from(index).ok());
        formulation.sample_count = grid.cell(start_row + 1, group_col + 1).parse().ok();

        // Skip the group header, sample count, and mix header rows.
        for row in start_row + 3..grid.row_count().min(start_row + REAGENT_SCAN_ROWS) {
            let name = grid.cell(row, group_col);
            let volume_text = grid.cell(row, group_col + 1);

            if name.is_empty() && volume_text.is_empty() {
                continue;
            }

            if name.to_lowercase().starts_with("total") {
                formulation.total_volume = parse_total_volume(volume_text);
                break;
            }

            if !name.is_empty() {
                formulation.reagents.push(ReagentItem {
                    name: name.to_string(),
                    volume: volume_text.parse().unwrap_or(0.0),
                });
            }
        }

        if !formulation.reagents.is_empty() {
            exp.reagent_formulations.push(formulation);
        }
    }
}
