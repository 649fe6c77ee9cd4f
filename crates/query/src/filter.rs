use censo_core::SurveyRecord;

/// Composable record filter.
///
/// Each criterion is optional; set criteria are combined with AND. The
/// department, criticality, and periodicity criteria match exactly, while
/// `search` does a case-insensitive substring match over the report name,
/// the responsible person, and the source system.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub department: Option<String>,
    pub criticality: Option<String>,
    pub periodicity: Option<String>,
    pub search: Option<String>,
}

impl RecordFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    #[must_use]
    pub fn criticality(mut self, criticality: impl Into<String>) -> Self {
        self.criticality = Some(criticality.into());
        self
    }

    #[must_use]
    pub fn periodicity(mut self, periodicity: impl Into<String>) -> Self {
        self.periodicity = Some(periodicity.into());
        self
    }

    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// True when no criterion is set; every record passes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.department.is_none()
            && self.criticality.is_none()
            && self.periodicity.is_none()
            && self.search.is_none()
    }

    #[must_use]
    pub fn matches(&self, record: &SurveyRecord) -> bool {
        if let Some(department) = &self.department {
            if record.department != *department {
                return false;
            }
        }
        if let Some(criticality) = &self.criticality {
            if record.criticality != *criticality {
                return false;
            }
        }
        if let Some(periodicity) = &self.periodicity {
            if record.periodicity != *periodicity {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [
                record.report_name.as_str(),
                record.responsible.as_str(),
                record.source_system.as_str(),
            ]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Filter a slice, preserving the input order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [SurveyRecord]) -> Vec<&'a SurveyRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use censo_store::testing::sample_record;

    use super::*;

    fn fixtures() -> Vec<SurveyRecord> {
        let mut ventas = sample_record("Reporte de Ventas");
        ventas.department = "Comercial".into();
        ventas.criticality = "Alto".into();

        let mut nomina = sample_record("Nómina Mensual");
        nomina.department = "RRHH".into();
        nomina.source_system = "Workday".into();

        let cierre = sample_record("Cierre Contable");
        vec![ventas, nomina, cierre]
    }

    #[test]
    fn empty_filter_passes_everything() {
        let records = fixtures();
        let filter = RecordFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&records).len(), records.len());
    }

    #[test]
    fn criteria_combine_with_and() {
        let records = fixtures();
        let filter = RecordFilter::new()
            .department("Finanzas")
            .criticality("Medio");

        let matched = filter.apply(&records);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].report_name, "Cierre Contable");

        // Same department but a criticality nothing has.
        let none = RecordFilter::new()
            .department("Finanzas")
            .criticality("Alto")
            .apply(&records);
        assert!(none.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_across_three_fields() {
        let records = fixtures();

        let by_name = RecordFilter::new().search("VENTAS").apply(&records);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].report_name, "Reporte de Ventas");

        let by_system = RecordFilter::new().search("workday").apply(&records);
        assert_eq!(by_system.len(), 1);
        assert_eq!(by_system[0].report_name, "Nómina Mensual");

        let by_responsible = RecordFilter::new().search("gómez").apply(&records);
        assert_eq!(by_responsible.len(), 3);
    }

    #[test]
    fn exact_criteria_and_search_compose() {
        let records = fixtures();

        // "sap" alone hits two records across departments; the department
        // criterion narrows it to one.
        let by_search = RecordFilter::new().search("sap").apply(&records);
        assert_eq!(by_search.len(), 2);

        let narrowed = RecordFilter::new()
            .department("Finanzas")
            .search("sap")
            .apply(&records);
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].report_name, "Cierre Contable");

        // Each criterion passes on its own but their conjunction does not.
        let disjoint = RecordFilter::new()
            .department("Comercial")
            .search("workday")
            .apply(&records);
        assert!(disjoint.is_empty());
    }

    #[test]
    fn search_does_not_look_at_other_fields() {
        let records = fixtures();
        // "Comercial" only appears in a department.
        assert!(RecordFilter::new().search("Comercial").apply(&records).is_empty());
    }

    #[test]
    fn apply_preserves_input_order() {
        let records = fixtures();
        let matched = RecordFilter::new().search("e").apply(&records);
        let names: Vec<&str> = matched.iter().map(|r| r.report_name.as_str()).collect();
        assert_eq!(
            names,
            ["Reporte de Ventas", "Nómina Mensual", "Cierre Contable"]
        );
    }
}
