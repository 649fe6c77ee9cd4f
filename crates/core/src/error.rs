use crate::field::Field;

/// Errors produced while validating a survey submission or assigning a
/// field value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more mandatory fields are empty.
    #[error("campos obligatorios sin completar: {}", format_fields(.0))]
    MissingFields(Vec<Field>),

    /// The responsible email fails the syntactic check (`@` and `.`).
    #[error("email inválido: {0}")]
    InvalidEmail(String),

    /// A value could not be parsed into the field's representation.
    #[error("valor inválido para {field}: {value}")]
    InvalidValue {
        /// The field being assigned.
        field: Field,
        /// The rejected raw value.
        value: String,
    },
}

fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_names_labels() {
        let err = ValidationError::MissingFields(vec![Field::ReportName, Field::Criticality]);
        let msg = err.to_string();
        assert!(msg.contains("Nombre del Reporte"));
        assert!(msg.contains("Nivel de Criticidad"));
    }
}
