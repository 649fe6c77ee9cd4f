//! CSV dump of a record set, in the flat-file wire format.

use censo_core::{csv, SurveyRecord};

/// Render the 15-column header plus one line per record.
#[must_use]
pub fn to_csv(records: &[SurveyRecord]) -> String {
    let mut out = String::new();
    out.push_str(&csv::header());
    out.push('\n');
    for record in records {
        out.push_str(&csv::encode_record(record));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use censo_store::testing::sample_record;

    use super::*;

    #[test]
    fn empty_set_yields_header_only() {
        let out = to_csv(&[]);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("fecha_envio,nombre_reporte,"));
    }

    #[test]
    fn one_line_per_record() {
        let records = vec![sample_record("A"), sample_record("B")];
        let out = to_csv(&records);
        assert_eq!(out.lines().count(), 3);
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn embedded_commas_stay_quoted() {
        let mut record = sample_record("Ventas, consolidado");
        record.description = Some("línea 1\nlínea 2".into());
        let out = to_csv(&[record]);
        assert!(out.contains("\"Ventas, consolidado\""));

        let decoded = censo_core::csv::decode(&out);
        assert_eq!(decoded.len(), 1);
        let roundtripped = decoded[0].as_ref().unwrap();
        assert_eq!(roundtripped.report_name, "Ventas, consolidado");
        assert_eq!(roundtripped.description.as_deref(), Some("línea 1\nlínea 2"));
    }
}
