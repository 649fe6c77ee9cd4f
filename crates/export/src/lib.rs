//! Export adapters for survey records.
//!
//! The CSV adapter emits the finished payload directly (it shares the
//! flat-file codec). The workbook and document adapters produce structured
//! content models (sheets, sections, tables) ready for a spreadsheet or
//! page renderer; binary rendering lives outside this crate.

pub mod csv;
pub mod document;
pub mod workbook;

use chrono::{DateTime, Utc};

pub use document::{Document, Section, TableSection};
pub use workbook::{Sheet, Workbook};

/// Default timestamped filename for an export artifact.
#[must_use]
pub fn export_filename(extension: &str, now: DateTime<Utc>) -> String {
    format!(
        "encuestas_reportes_export_{}.{extension}",
        now.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn filenames_embed_the_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 9).unwrap();
        assert_eq!(
            export_filename("csv", now),
            "encuestas_reportes_export_20240305_143009.csv"
        );
        assert_eq!(
            export_filename("xlsx", now),
            "encuestas_reportes_export_20240305_143009.xlsx"
        );
    }
}
