use clap::Args;

use censo_core::Field;
use censo_store::{RecordId, RecordPatch, RecordStore};

use crate::session::Session;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Record id.
    pub id: RecordId,

    /// Field assignment as `columna=valor`; repeatable. An empty value
    /// clears an optional field.
    #[arg(long = "set", value_parser = parse_assignment, required = true)]
    pub set: Vec<(Field, String)>,

    /// Reason recorded on each history entry.
    #[arg(long)]
    pub reason: Option<String>,
}

fn parse_assignment(raw: &str) -> Result<(Field, String), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("se esperaba columna=valor, recibido: {raw}"))?;
    let field: Field = column.trim().parse().map_err(|e| format!("{e}"))?;
    Ok((field, value.to_owned()))
}

pub async fn run(
    store: &dyn RecordStore,
    session: &Session,
    args: &UpdateArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let patch: RecordPatch = args.set.iter().cloned().collect();
    let written = store
        .update(args.id, &patch, &session.username, args.reason.as_deref())
        .await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&written)?);
        }
        OutputFormat::Text => {
            if written.is_empty() {
                println!("Sin cambios para la encuesta {}", args.id);
                return Ok(());
            }
            println!("Encuesta {} actualizada ({} cambios)", args.id, written.len());
            for entry in &written {
                println!(
                    "  {field}: \"{prior}\" -> \"{new}\"",
                    field = entry.field.label(),
                    prior = entry.prior_value,
                    new = entry.new_value,
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_parse_column_names() {
        let (field, value) = parse_assignment("criticidad=Alto").unwrap();
        assert_eq!(field, Field::Criticality);
        assert_eq!(value, "Alto");
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let (field, value) = parse_assignment("observaciones=a=b").unwrap();
        assert_eq!(field, Field::Observations);
        assert_eq!(value, "a=b");
    }

    #[test]
    fn unknown_columns_are_rejected() {
        assert!(parse_assignment("color=rojo").is_err());
        assert!(parse_assignment("sin-igual").is_err());
    }
}
