//! Human-readable stdout summaries.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use hdq_profile::TableProfile;
use hdq_validate::{Outcome, ValidationSummary};

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_profiles(profiles: &[(&'static str, TableProfile)]) {
    let mut shape = styled_table();
    shape.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Duplicate rows"),
        header_cell("Memory (bytes)"),
    ]);
    for column in 1..=4 {
        if let Some(col) = shape.column_mut(column) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    for (name, profile) in profiles {
        shape.add_row(vec![
            Cell::new(name),
            Cell::new(profile.rows),
            Cell::new(profile.columns),
            Cell::new(profile.duplicate_rows),
            Cell::new(profile.memory_bytes),
        ]);
    }
    println!("{shape}");

    let mut missing = styled_table();
    missing.set_header(vec![
        header_cell("Table"),
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Missing"),
        header_cell("Missing %"),
    ]);
    for column in 3..=4 {
        if let Some(col) = missing.column_mut(column) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    for (name, profile) in profiles {
        for (column, count) in &profile.missing_counts {
            missing.add_row(vec![
                Cell::new(name),
                Cell::new(column),
                Cell::new(&profile.data_types[column]),
                Cell::new(count),
                Cell::new(format!("{:.2}", profile.missing_percentages[column])),
            ]);
        }
    }
    println!("{missing}");
}

pub fn print_validation(report: &ValidationSummary) {
    let mut table = styled_table();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Validator"),
        header_cell("Flag"),
        header_cell("Count"),
    ]);
    if let Some(col) = table.column_mut(3) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for table_report in &report.tables {
        for run in &table_report.runs {
            match &run.outcome {
                Outcome::Evaluated(flags) => {
                    for (flag, count) in flags.counts() {
                        table.add_row(vec![
                            Cell::new(table_report.table),
                            Cell::new(run.validator),
                            Cell::new(flag),
                            Cell::new(count),
                        ]);
                    }
                }
                Outcome::NotApplicable { missing } => {
                    table.add_row(vec![
                        Cell::new(table_report.table),
                        Cell::new(run.validator),
                        Cell::new(format!("not applicable (missing: {})", missing.join(", "))),
                        Cell::new("-"),
                    ]);
                }
            }
        }
    }
    println!("{table}");

    let mut consistency = styled_table();
    consistency.set_header(vec![header_cell("Cross-table check"), header_cell("Count")]);
    if let Some(col) = consistency.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }
    let counts = &report.consistency;
    consistency.add_row(vec![
        Cell::new("admissions_with_unknown_patient"),
        Cell::new(counts.admissions_with_unknown_patient),
    ]);
    consistency.add_row(vec![
        Cell::new("labs_with_unknown_patient"),
        Cell::new(counts.labs_with_unknown_patient),
    ]);
    consistency.add_row(vec![
        Cell::new("patients_missing_admissions"),
        Cell::new(counts.patients_missing_admissions),
    ]);
    consistency.add_row(vec![
        Cell::new("patients_missing_labs"),
        Cell::new(counts.patients_missing_labs),
    ]);
    println!("{consistency}");

    let flagged = report.flagged_total();
    if flagged == 0 && counts.total() == 0 {
        println!("no findings");
    } else {
        println!("{} flag(s), {} consistency finding(s)", flagged, counts.total());
    }
}
