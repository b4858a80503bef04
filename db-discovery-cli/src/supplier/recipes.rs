//! Which file feeds which table, and how each one is cleaned up

use crate::dataset::Dataset;

/// Where a dataset's rows come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// CSV file in the data directory
    Csv(&'static str),
    /// Excel workbook in the data directory
    Xlsx(&'static str),
    /// Generated in memory
    PretendEmployees,
}

/// A bundled dataset: its source, its target table and its cleaning steps
#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    pub table: &'static str,
    /// Name used in progress messages
    pub label: &'static str,
    pub source: Source,
    pub clean: fn(&mut Dataset),
}

/// Every dataset the loader knows about, in load order
pub const RECIPES: &[Recipe] = &[
    Recipe {
        table: "titanic",
        label: "titanic",
        source: Source::Csv("titanic.csv"),
        clean: clean_titanic,
    },
    Recipe {
        table: "penguin",
        label: "penguin",
        source: Source::Csv("penguins.csv"),
        clean: clean_penguin,
    },
    Recipe {
        table: "heart",
        label: "heart",
        source: Source::Csv("heart.csv"),
        clean: clean_patients,
    },
    Recipe {
        table: "diabetes",
        label: "diabetes",
        source: Source::Csv("diabetes.csv"),
        clean: clean_patients,
    },
    Recipe {
        table: "health_care",
        label: "health_care",
        source: Source::Csv("healthcare_dataset.csv"),
        clean: underscore_spaces,
    },
    Recipe {
        table: "chronic_disease",
        label: "chronic_disease",
        source: Source::Csv("chronic_disease_indicators.csv"),
        clean: underscore_spaces,
    },
    Recipe {
        table: "wny_health",
        label: "WNY Healthelink - wny_health",
        source: Source::Xlsx("HeWNY Sample File.xlsx"),
        clean: clean_wny_health,
    },
    Recipe {
        table: "pretend_employees",
        label: "pretend employee",
        source: Source::PretendEmployees,
        clean: |_| {},
    },
];

fn clean_titanic(ds: &mut Dataset) {
    ds.normalize_column_names();
    ds.fill_nulls("pclass", "Unknown pclass");
    ds.fill_nulls("cabin", "Unknown cabin");
    ds.fill_nulls("sex", "Unknown sex");
}

fn clean_penguin(ds: &mut Dataset) {
    ds.normalize_column_names();
    for symbol in ["(", ")", "/"] {
        ds.replace_in_column_names(symbol, "_");
    }
}

/// heart and diabetes rows get a stable patient id
fn clean_patients(ds: &mut Dataset) {
    ds.normalize_column_names();
    ds.with_index_column("patient_id");
}

fn underscore_spaces(ds: &mut Dataset) {
    ds.replace_in_column_names(" ", "_");
}

fn clean_wny_health(ds: &mut Dataset) {
    ds.replace_in_column_names(" ", "_");
    ds.rename_column("BCS", "Breast_Cancer_Screening");
    ds.rename_column("CCS", "Cervical_Cancer_Screening");
    ds.rename_column("COL", "Colorectal_Cancer_Screening");
}
