//! Multi-sheet workbook content model.

use std::collections::BTreeMap;

use serde::Serialize;

use censo_core::{Field, SurveyRecord};
use censo_store::StoreStatistics;

/// Spreadsheet sheet names cap out at 31 characters.
pub const MAX_SHEET_NAME: usize = 31;

const ALL_RECORDS_SHEET: &str = "Todas las Encuestas";
const STATISTICS_SHEET: &str = "Estadísticas";

#[derive(Debug, Clone, Serialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Assemble the export workbook: every record on the first sheet, one
    /// sheet per department, and a closing metric/value statistics sheet.
    #[must_use]
    pub fn build(records: &[SurveyRecord], stats: &StoreStatistics) -> Self {
        let mut sheets = vec![data_sheet(ALL_RECORDS_SHEET, records)];

        let mut by_department: BTreeMap<&str, Vec<&SurveyRecord>> = BTreeMap::new();
        for record in records {
            if !record.department.is_empty() {
                by_department
                    .entry(record.department.as_str())
                    .or_default()
                    .push(record);
            }
        }
        for (department, group) in by_department {
            let rows = group.iter().map(|r| record_row(r)).collect();
            sheets.push(Sheet {
                name: sheet_name(department),
                header: data_header(),
                rows,
            });
        }

        sheets.push(statistics_sheet(stats));
        Self { sheets }
    }
}

fn data_header() -> Vec<String> {
    Field::ALL
        .iter()
        .map(|f| f.column_name().to_owned())
        .collect()
}

fn record_row(record: &SurveyRecord) -> Vec<String> {
    Field::ALL.iter().map(|f| record.get(*f)).collect()
}

fn data_sheet(name: &str, records: &[SurveyRecord]) -> Sheet {
    Sheet {
        name: name.to_owned(),
        header: data_header(),
        rows: records.iter().map(record_row).collect(),
    }
}

fn statistics_sheet(stats: &StoreStatistics) -> Sheet {
    let metric = |name: &str, value: u64| vec![name.to_owned(), value.to_string()];
    Sheet {
        name: STATISTICS_SHEET.to_owned(),
        header: vec!["Métrica".to_owned(), "Valor".to_owned()],
        rows: vec![
            metric("Total Encuestas", stats.total),
            metric("Encuestas Críticas", stats.critical),
            metric("Departamentos Únicos", stats.unique_departments),
            metric("Sistemas Únicos", stats.unique_systems),
            metric("Encuestas Automatizadas", stats.automated),
        ],
    }
}

fn sheet_name(department: &str) -> String {
    department.chars().take(MAX_SHEET_NAME).collect()
}

#[cfg(test)]
mod tests {
    use censo_store::testing::sample_record;

    use super::*;

    fn stats() -> StoreStatistics {
        StoreStatistics {
            total: 3,
            unique_departments: 2,
            unique_systems: 1,
            critical: 1,
            automated: 0,
        }
    }

    #[test]
    fn first_sheet_holds_every_record() {
        let mut it = sample_record("B");
        it.department = "IT".into();
        let records = vec![sample_record("A"), it, sample_record("C")];

        let workbook = Workbook::build(&records, &stats());
        assert_eq!(workbook.sheets[0].name, "Todas las Encuestas");
        assert_eq!(workbook.sheets[0].rows.len(), 3);
        assert_eq!(workbook.sheets[0].header.len(), 15);
        assert_eq!(workbook.sheets[0].header[0], "fecha_envio");
    }

    #[test]
    fn one_sheet_per_department_in_sorted_order() {
        let mut it = sample_record("B");
        it.department = "IT".into();
        let records = vec![sample_record("A"), it];

        let workbook = Workbook::build(&records, &stats());
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Todas las Encuestas", "Finanzas", "IT", "Estadísticas"]
        );
        assert_eq!(workbook.sheets[1].rows.len(), 1);
        assert_eq!(workbook.sheets[2].rows.len(), 1);
    }

    #[test]
    fn long_department_names_are_truncated() {
        let mut record = sample_record("A");
        record.department = "Dirección General de Operaciones y Logística".into();
        let workbook = Workbook::build(&[record], &stats());
        assert_eq!(workbook.sheets[1].name.chars().count(), MAX_SHEET_NAME);
    }

    #[test]
    fn statistics_sheet_closes_the_workbook() {
        let workbook = Workbook::build(&[], &stats());
        let last = workbook.sheets.last().unwrap();
        assert_eq!(last.name, "Estadísticas");
        assert_eq!(
            last.rows[0],
            vec!["Total Encuestas".to_owned(), "3".to_owned()]
        );
        assert_eq!(last.rows.len(), 5);
    }
}
