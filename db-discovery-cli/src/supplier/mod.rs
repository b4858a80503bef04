//! Data supplier: reads the bundled sample files into cleaned datasets

pub mod csv_reader;
pub mod excel_reader;
pub mod recipes;
pub mod sample;

pub use recipes::{RECIPES, Recipe, Source};
pub use sample::pretend_employees;

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::dataset::Dataset;

/// A cleaned dataset and the table it goes into
#[derive(Debug, Clone)]
pub struct SuppliedDataset {
    pub table: &'static str,
    pub dataset: Dataset,
}

/// Read a source without cleaning it
pub fn read_source(source: Source, data_dir: &Path) -> Result<Dataset> {
    match source {
        Source::Csv(file) => csv_reader::read_csv(data_dir.join(file)),
        Source::Xlsx(file) => excel_reader::read_xlsx(data_dir.join(file)),
        Source::PretendEmployees => pretend_employees(),
    }
}

/// Read and clean one recipe's dataset
pub fn supply(recipe: &Recipe, data_dir: &Path) -> Result<Dataset> {
    let mut dataset = read_source(recipe.source, data_dir)?;
    (recipe.clean)(&mut dataset);
    Ok(dataset)
}

/// Read every known dataset, reporting (and skipping) the ones that fail
pub fn supply_all(data_dir: &Path) -> Vec<SuppliedDataset> {
    let mut supplied = Vec::with_capacity(RECIPES.len());

    for recipe in RECIPES {
        match supply(recipe, data_dir) {
            Ok(dataset) => {
                let (rows, columns) = dataset.shape();
                println!(
                    "The data contains {} rows and {} columns of {} data",
                    rows, columns, recipe.label
                );
                supplied.push(SuppliedDataset {
                    table: recipe.table,
                    dataset,
                });
            }
            Err(e) => {
                eprintln!(
                    "{} Could not read {} data: {:#}",
                    "✗".red(),
                    recipe.label,
                    e
                );
            }
        }
    }

    supplied
}

/// Every target table name, in load order
pub fn table_names() -> impl Iterator<Item = &'static str> {
    RECIPES.iter().map(|r| r.table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_data_dir;
    use crate::dataset::ColumnKind;

    fn bundled(table: &str) -> Dataset {
        let recipe = RECIPES.iter().find(|r| r.table == table).unwrap();
        supply(recipe, &default_data_dir()).unwrap()
    }

    #[test]
    fn test_supply_all_bundled() {
        let supplied = supply_all(&default_data_dir());
        let tables: Vec<&str> = supplied.iter().map(|s| s.table).collect();
        assert_eq!(tables, table_names().collect::<Vec<_>>());
        assert!(supplied.iter().all(|s| s.dataset.row_count() > 0));
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let supplied = supply_all(dir.path());
        assert_eq!(supplied.len(), 1);
        assert_eq!(supplied[0].table, "pretend_employees");
    }

    #[test]
    fn test_bundled_titanic() {
        let ds = bundled("titanic");
        assert!(ds.column_names().iter().all(|n| *n == n.to_lowercase()));
        for name in ["pclass", "cabin", "sex"] {
            assert_eq!(ds.column(name).unwrap().null_count(), 0, "{}", name);
        }
        assert_eq!(ds.column("cabin").unwrap().kind(), &ColumnKind::Text);
    }

    #[test]
    fn test_bundled_penguin_names() {
        let ds = bundled("penguin");
        assert!(
            ds.column_names()
                .iter()
                .all(|n| !n.contains(['(', ')', '/', ' ']))
        );
        assert!(ds.column("culmen_length__mm_").is_some());
    }

    #[test]
    fn test_bundled_patient_ids() {
        for table in ["heart", "diabetes"] {
            let ds = bundled(table);
            let ids = ds.column("patient_id").unwrap();
            assert_eq!(ids.kind(), &ColumnKind::Integer);
            assert_eq!(ids.len(), ds.row_count());
        }
    }

    #[test]
    fn test_bundled_wny_health() {
        let ds = bundled("wny_health");
        for name in [
            "Breast_Cancer_Screening",
            "Cervical_Cancer_Screening",
            "Colorectal_Cancer_Screening",
        ] {
            assert!(ds.column(name).is_some(), "{}", name);
        }
        assert_eq!(
            ds.column("Visit_Date").unwrap().kind(),
            &ColumnKind::Timestamp
        );
        assert_eq!(ds.column("Patient_ID").unwrap().kind(), &ColumnKind::Integer);
    }
}
