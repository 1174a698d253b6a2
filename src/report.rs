//! Human-readable summaries of extracted records.
//!
//! Downstream consumers (analysis prompts, weekly reports) take plain
//! markdown-flavored text. The experiment summary embeds a literal
//! two-axis table (trial x channel) of Ct values, rendering absent values
//! as `-` and exact-zero values as `0.00` so the absent/zero distinction
//! survives serialization.

use std::fmt::Write;

use crate::record::{Experiment, Goal, JournalEntry, CHANNEL_COUNT};

/// Render a Ct slot: absent as `-`, values with two decimals (zero as `0.00`).
fn fmt_ct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Render one experiment as a markdown-flavored summary.
#[must_use]
pub fn experiment_summary(exp: &Experiment) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "### Experiment: {}", exp.source_name);
    if let Some(date) = exp.experiment_date {
        let _ = writeln!(out, "**Date**: {date}");
    }
    let _ = writeln!(out, "**Purpose**: {}", exp.purpose);
    if !exp.description.is_empty() {
        let _ = writeln!(out, "**Experiments**: {}", exp.description);
    }
    let _ = writeln!(out, "**Tester**: {}", exp.tester);
    let _ = writeln!(out, "**Device**: {}", exp.device);
    if !exp.notes.is_empty() {
        let _ = writeln!(out, "**Notes**: {}", exp.notes);
    }

    if !exp.channel_assignments.is_empty() {
        let _ = writeln!(out, "\n**Channel Assignments**:");
        for ca in &exp.channel_assignments {
            if !ca.label.is_empty() {
                let _ = writeln!(out, "  - {} CH {}: {}", ca.fluorophore, ca.channel, ca.label);
            }
        }
    }

    if !exp.runs.is_empty() {
        let _ = writeln!(out, "\n**Ct Values**:");
        let mut header = String::from("| Trial | Run ID |");
        for ch in 0..CHANNEL_COUNT {
            let _ = write!(header, " FAM Ch{ch} |");
        }
        for ch in 0..CHANNEL_COUNT {
            let _ = write!(header, " ROX Ch{ch} |");
        }
        header.push_str(" Notes |");
        let _ = writeln!(out, "{header}");
        let _ = writeln!(out, "|{}", "---|".repeat(2 * CHANNEL_COUNT + 3));

        for run in &exp.runs {
            let _ = write!(out, "| {} | {} |", run.trial, run.run_id);
            for ch in 0..CHANNEL_COUNT {
                let _ = write!(out, " {} |", fmt_ct(run.ct_fam.channel(ch)));
            }
            for ch in 0..CHANNEL_COUNT {
                let _ = write!(out, " {} |", fmt_ct(run.ct_rox.channel(ch)));
            }
            let _ = writeln!(out, " {} |", run.notes);
        }
    }

    // Sequence setup from the first run that carries one.
    for run in &exp.runs {
        if let Some(seq) = &run.sequence {
            if seq.steps.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n**Sequence Setup** ({}):", seq.chip_type);
            for step in &seq.steps {
                let _ = writeln!(
                    out,
                    "  - {}: {}C, {}s, {} cycles, offset {}",
                    step.name, step.temperature, step.duration, step.cycles, step.offset
                );
            }
            break;
        }
    }

    if !exp.resume.is_empty() {
        let _ = writeln!(out, "\n**Resume/Conclusions**: {}", exp.resume);
    }

    out.trim_end().to_string()
}

/// Render a goal list as a markdown-flavored summary.
#[must_use]
pub fn goals_summary(goals: &[Goal]) -> String {
    let mut out = String::from("## Team Goals\n");
    for goal in goals {
        let _ = writeln!(out, "\n### {} ({} pts)", goal.short_name, goal.points);
        let _ = writeln!(out, "**Due**: {}", goal.due_date);
        let _ = writeln!(out, "**Requirements**: {}", goal.requirements);
    }
    out.trim_end().to_string()
}

/// Render journal entries grouped by date string, newest date first.
#[must_use]
pub fn journal_summary(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "No journal entries for this period.".to_string();
    }

    let mut sorted: Vec<&JournalEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));

    // Group consecutive entries sharing a date string, preserving the
    // newest-first ordering of the groups.
    let mut groups: Vec<(&str, Vec<&JournalEntry>)> = Vec::new();
    for entry in sorted {
        match groups.last_mut() {
            Some((date_str, group)) if *date_str == entry.date_str => group.push(entry),
            _ => groups.push((&entry.date_str, vec![entry])),
        }
    }

    let mut out = String::from("## Journal Entries\n");
    for (date_str, group) in groups {
        let _ = writeln!(out, "\n### {date_str}");
        for entry in group {
            if !entry.author.is_empty() {
                let _ = writeln!(out, "**{}**", entry.author);
            }
            let _ = writeln!(out, "{}\n", entry.content);
        }
    }
    out.trim_end().to_string()
}
