//! Integration tests for the experiment sheet extractor.

use labmark::{extract_experiment, Fluorophore, Grid};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a row with values at specific column indices.
fn sparse_row(cells: &[(usize, &str)]) -> Vec<String> {
    let width = cells.iter().map(|(c, _)| c + 1).max().unwrap_or(0);
    let mut row = vec![String::new(); width];
    for (col, value) in cells {
        row[*col] = (*value).to_string();
    }
    row
}

/// A realistic device-testing sheet: header metadata with a reagent list on
/// the right, the dual-channel Ct table with its channel legend in the
/// leftmost columns, and per-run detail blocks far below the header area.
fn device_testing_sheet() -> Grid {
    let mut rows = vec![
        // Header area, with the reagent section to the right.
        sparse_row(&[(0, "Purpose"), (2, "Check LOD HS with real sample"), (8, "Reagents:")]),
        sparse_row(&[(0, "Experiments"), (2, "LOD titration with TS device"), (11, "Volume (uL)")]),
        sparse_row(&[(0, "Tester"), (2, "Adit"), (9, "Master Mix"), (11, "12.5")]),
        sparse_row(&[(0, "Device"), (2, "TS-003"), (9, "Primer Mix"), (11, "2.5")]),
        sparse_row(&[(0, "Notes"), (2, "Preheat block before load")]),
        sparse_row(&[(2, "Second note line"), (9, "Template"), (11, "10")]),
        sparse_row(&[(0, "Resume"), (2, "LOD confirmed at 6600 cp"), (9, "Total"), (11, "25")]),
        vec![],
        // Ct summary table: anchor, header row, then data rows that double
        // as the FAM channel legend in columns 0-1.
        sparse_row(&[(0, "FAM"), (2, "Trial"), (3, "Run ID"), (14, "Notes")]),
        sparse_row(&[
            (0, "CH 0"),
            (1, "6600 cp/uL"),
            (4, "Ch0 Ct"),
            (5, "Ch1 Ct"),
            (6, "Ch2 Ct"),
            (7, "Ch3 Ct"),
            (8, "Ch4 Ct"),
            (9, "Ch0 Ct"),
            (10, "Ch1 Ct"),
            (11, "Ch2 Ct"),
            (12, "Ch3 Ct"),
            (13, "Ch4 Ct"),
        ]),
        sparse_row(&[
            (0, "CH 1"),
            (1, "660 cp/uL"),
            (2, "1"),
            (3, "0105_003_TS_6600_1"),
            (4, "-"),
            (5, "-"),
            (6, "24.63"),
            (7, "-"),
            (8, "0"),
            (9, "-"),
            (10, "-"),
            (11, "25.92"),
            (12, "-"),
            (13, "-"),
            (14, "clean curve"),
        ]),
        sparse_row(&[
            (0, "CH 2"),
            (1, "66 cp/uL"),
            (2, "2"),
            (3, "0105_003_TS_6600_2"),
            (6, "25.10"),
            (11, "26.04"),
        ]),
        sparse_row(&[
            (0, "CH 3"),
            (1, "NC"),
            (2, "3"),
            (3, "0105_003_TS_660_1"),
            (6, "28.77"),
            (11, "26.40"),
        ]),
        sparse_row(&[
            (0, "CH 4"),
            (2, "x"),
            (3, "0105_003_TS_NC_1"),
            (6, "not measured"),
        ]),
        sparse_row(&[(0, "ROX")]),
        sparse_row(&[(0, "CH 0"), (1, "IC")]),
        sparse_row(&[(0, "CH 1"), (1, "IC")]),
        sparse_row(&[(0, "CH 2"), (1, "IC")]),
        vec![],
        vec![],
    ];

    // Detail blocks sit well below the header area on real sheets.
    while rows.len() < 45 {
        rows.push(vec![]);
    }
    rows.extend([
        sparse_row(&[(0, "RUN ID: 1"), (2, "0105_003_TS_6600_1")]),
        sparse_row(&[(0, "Sample setup"), (2, "Extracted sample, 6600 cp")]),
        sparse_row(&[(0, "Batch number"), (2, "B-117")]),
        sparse_row(&[(0, "Notes"), (2, "Slight bubble in chamber")]),
        sparse_row(&[(0, "Video"), (2, "run1.mp4")]),
        sparse_row(&[(0, "Report"), (2, "run1.pdf")]),
        sparse_row(&[(0, "Sequence setup"), (2, "TS chip v2")]),
        sparse_row(&[(2, "Step"), (3, "Temp (C)"), (4, "Time (s)"), (5, "Cycle (times)"), (6, "Offset")]),
        sparse_row(&[(2, "Preheat"), (3, "95"), (4, "120"), (5, "1")]),
        sparse_row(&[(2, "Touchdown"), (3, "65-60"), (4, "15"), (5, "10"), (6, "-1")]),
        sparse_row(&[(3, "60"), (4, "30"), (5, "35")]),
        vec![],
        sparse_row(&[(0, "RUN ID: 2"), (2, "0105_003_TS_6600_2")]),
        sparse_row(&[(0, "Sample setup"), (2, "Extracted sample, 660 cp")]),
        sparse_row(&[(0, "RUN ID: 9"), (2, "9999_UNKNOWN")]),
        sparse_row(&[(0, "Sample setup"), (2, "detail without a Ct table run")]),
    ]);

    Grid::from_rows(rows)
}

#[test]
fn test_full_sheet_extraction() {
    init_tracing();
    let exp = extract_experiment(
        &device_testing_sheet(),
        "Device Testing - H1 2026 - 01_05_2026 Liquid + TS",
    );

    assert_eq!(
        exp.experiment_date,
        chrono::NaiveDate::from_ymd_opt(2026, 1, 5)
    );
    assert_eq!(exp.purpose, "Check LOD HS with real sample");
    assert_eq!(exp.description, "LOD titration with TS device");
    assert_eq!(exp.tester, "Adit");
    assert_eq!(exp.device, "TS-003");
    assert_eq!(exp.notes, "Preheat block before load\nSecond note line");
    assert_eq!(exp.resume, "LOD confirmed at 6600 cp");
    assert_eq!(exp.runs.len(), 4);
}

#[test]
fn test_ct_values_preserve_absent_and_zero() {
    let exp = extract_experiment(&device_testing_sheet(), "01_05_2026");
    let run = &exp.runs[0];

    assert_eq!(run.run_id, "0105_003_TS_6600_1");
    assert_eq!(run.trial, 1);
    assert_eq!(run.ct_fam.ch0(), None, "`-` stays absent");
    assert_eq!(run.ct_fam.ch2(), Some(24.63));
    assert_eq!(run.ct_fam.ch4(), Some(0.0), "`0` stays an exact zero");
    assert_eq!(run.ct_rox.ch2(), Some(25.92));
    assert_eq!(run.notes, "clean curve");

    // Unparseable trial number and Ct text degrade to defaults.
    let last = &exp.runs[3];
    assert_eq!(last.trial, 0);
    assert_eq!(last.ct_fam.ch2(), None);
}

#[test]
fn test_channel_assignments_both_fluorophores() {
    let exp = extract_experiment(&device_testing_sheet(), "01_05_2026");

    let fam = exp.assignments_for(Fluorophore::Fam);
    assert_eq!(fam.len(), 5);
    assert_eq!(fam[0].channel, 0);
    assert_eq!(fam[0].label, "6600 cp/uL");
    assert_eq!(fam[3].label, "NC");
    assert_eq!(fam[4].label, "");

    let rox = exp.assignments_for(Fluorophore::Rox);
    assert_eq!(rox.len(), 3);
    assert!(rox.iter().all(|ca| ca.label == "IC"));
}

#[test]
fn test_detail_block_merge_by_run_id() {
    let exp = extract_experiment(&device_testing_sheet(), "01_05_2026");

    let run = exp.run("0105_003_TS_6600_1").expect("run from Ct table");
    assert_eq!(run.sample_setup.as_deref(), Some("Extracted sample, 6600 cp"));
    assert_eq!(run.batch_number.as_deref(), Some("B-117"));
    assert_eq!(run.run_notes.as_deref(), Some("Slight bubble in chamber"));
    assert_eq!(run.video.as_deref(), Some("run1.mp4"));
    assert_eq!(run.report.as_deref(), Some("run1.pdf"));

    let second = exp.run("0105_003_TS_6600_2").expect("second run");
    assert_eq!(second.sample_setup.as_deref(), Some("Extracted sample, 660 cp"));
    assert!(second.sequence.is_none());
}

#[test]
fn test_unmatched_detail_block_is_discarded() {
    let exp = extract_experiment(&device_testing_sheet(), "01_05_2026");

    // The RUN ID: 9 block matches no Ct table run; run count is unchanged
    // and its detail text lands nowhere.
    assert_eq!(exp.runs.len(), 4);
    assert!(exp.run("9999_UNKNOWN").is_none());
    assert!(!exp
        .runs
        .iter()
        .any(|r| r.sample_setup.as_deref() == Some("detail without a Ct table run")));
}

#[test]
fn test_sequence_steps_with_sticky_name() {
    let exp = extract_experiment(&device_testing_sheet(), "01_05_2026");
    let seq = exp
        .run("0105_003_TS_6600_1")
        .and_then(|r| r.sequence.as_ref())
        .expect("sequence setup");

    assert_eq!(seq.chip_type, "TS chip v2");
    assert_eq!(seq.steps.len(), 3);
    assert_eq!(seq.steps[0].name, "Preheat");
    assert_eq!(seq.steps[0].temperature, "95");
    assert_eq!(seq.steps[1].name, "Touchdown");
    assert_eq!(seq.steps[1].temperature, "65-60");
    assert_eq!(seq.steps[1].offset, "-1");
    assert_eq!(seq.steps[2].name, "Touchdown", "nameless row inherits the step name");
    assert_eq!(seq.steps[2].cycles, "35");
}

#[test]
fn test_single_reagent_list_with_total() {
    let exp = extract_experiment(&device_testing_sheet(), "01_05_2026");

    assert_eq!(exp.reagent_formulations.len(), 1);
    let f = &exp.reagent_formulations[0];
    assert_eq!(f.channel, None);
    assert_eq!(f.total_volume, Some(25.0));
    let names: Vec<&str> = f.reagents.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Master Mix", "Primer Mix", "Template"]);
    assert!(
        !names.contains(&"Total"),
        "total row is captured as volume, not as an item"
    );
    assert_eq!(f.reagents[0].volume, 12.5);
}

#[test]
fn test_per_channel_reagent_layout() {
    init_tracing();
    let rows = vec![
        sparse_row(&[(0, "Reagents:"), (1, "channel 0"), (4, "channel 1")]),
        sparse_row(&[(1, "Number of samples"), (2, "4"), (4, "Number of samples"), (5, "6")]),
        sparse_row(&[(1, "Master mix"), (2, "Volume"), (4, "Master mix"), (5, "Volume")]),
        sparse_row(&[(1, "Ftaq"), (2, "5"), (4, "Ftaq"), (5, "7.5")]),
        sparse_row(&[(1, "Total"), (2, "5"), (4, "Total"), (5, "7.5")]),
    ];
    let exp = extract_experiment(&Grid::from_rows(rows), "sheet");

    assert_eq!(exp.reagent_formulations.len(), 2);
    assert_eq!(exp.reagent_formulations[0].channel, Some(0));
    assert_eq!(exp.reagent_formulations[0].sample_count, Some(4));
    assert_eq!(exp.reagent_formulations[0].reagents.len(), 1);
    assert_eq!(exp.reagent_formulations[0].total_volume, Some(5.0));
    assert_eq!(exp.reagent_formulations[1].channel, Some(1));
    assert_eq!(exp.reagent_formulations[1].sample_count, Some(6));
    assert_eq!(exp.reagent_formulations[1].total_volume, Some(7.5));
}

#[test]
fn test_sheet_without_ct_anchor_keeps_metadata() {
    let rows = vec![
        sparse_row(&[(0, "Purpose"), (2, "Dry run of the loader")]),
        sparse_row(&[(0, "Tester"), (2, "Bowo")]),
        sparse_row(&[(0, "Device"), (2, "TS-006")]),
    ];
    let exp = extract_experiment(&Grid::from_rows(rows), "no table here");

    assert_eq!(exp.purpose, "Dry run of the loader");
    assert_eq!(exp.tester, "Bowo");
    assert!(exp.runs.is_empty());
    assert!(exp.channel_assignments.is_empty());
    assert_eq!(exp.experiment_date, None);
}

#[test]
fn test_extraction_is_idempotent() {
    let grid = device_testing_sheet();
    let first = extract_experiment(&grid, "01_05_2026 Liquid + TS");
    let second = extract_experiment(&grid, "01_05_2026 Liquid + TS");
    assert_eq!(first, second);
}

#[test]
fn test_experiment_serde_round_trip() {
    let exp = extract_experiment(&device_testing_sheet(), "01_05_2026 Liquid + TS");
    let json = serde_json::to_string(&exp).expect("serialize");
    let back: labmark::Experiment = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(exp, back);
}
