//! Export of a completed registration as a JSON document

use crate::state::{DraftState, FieldRule, FieldValue, FormSchema, TextFormat};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize export: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("clipboard is unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Build the export document for a draft.
///
/// Every schema field appears once. Bookkeeping (step, session, timestamps)
/// is dropped; codes are expanded to their display names and a
/// `submittedAt` timestamp is added.
pub fn build_export(schema: &FormSchema, draft: &DraftState, submitted_at: DateTime<Utc>) -> Value {
    let mut doc = Map::new();
    for name in schema.field_names() {
        let Some(spec) = schema.field(name) else {
            continue;
        };
        let value = draft.value(name);
        let exported = match &spec.rule {
            FieldRule::Toggle | FieldRule::Consent { .. } => {
                Value::Bool(value.is_some_and(FieldValue::as_flag))
            }
            FieldRule::CheckboxGroup(_) => Value::Array(
                value
                    .map(FieldValue::as_choices)
                    .unwrap_or_default()
                    .iter()
                    .map(|code| Value::String(label_or_code(&spec.rule, code)))
                    .collect(),
            ),
            FieldRule::Choice(_) => {
                let code = value.map(FieldValue::as_text).unwrap_or_default().trim();
                Value::String(label_or_code(&spec.rule, code))
            }
            FieldRule::Text(_) => {
                let text = value.map(FieldValue::as_text).unwrap_or_default().trim();
                match spec.format {
                    TextFormat::Phone => Value::String(format_phone(text)),
                    TextFormat::Plain => Value::String(text.to_string()),
                }
            }
        };
        doc.insert(name.to_string(), exported);
    }
    doc.insert(
        "submittedAt".to_string(),
        Value::String(submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    Value::Object(doc)
}

fn label_or_code(rule: &FieldRule, code: &str) -> String {
    rule.option_label(code).unwrap_or(code).to_string()
}

/// Group phone digits as `123-456-7890`, or `+CC 123-456-7890` when a
/// country prefix is present. Anything else is returned trimmed.
pub fn format_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    let grouped = |local: &str| format!("{}-{}-{}", &local[..3], &local[3..6], &local[6..]);

    match (trimmed.starts_with('+'), digits.len()) {
        (false, 10) => grouped(&digits),
        (true, 11..=13) => {
            let (country, local) = digits.split_at(digits.len() - 10);
            format!("+{} {}", country, grouped(local))
        }
        _ => trimmed.to_string(),
    }
}

/// `registro-<session>-<YYYYmmddHHMMSS>.json`
pub fn export_file_name(session_id: &str, at: DateTime<Utc>) -> String {
    format!("registro-{}-{}.json", session_id, at.format("%Y%m%d%H%M%S"))
}

/// Write the document into `dir`, creating it when missing
pub fn write_export(
    dir: &Path,
    session_id: &str,
    doc: &Value,
    at: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(session_id, at));
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(&path, json)?;
    tracing::info!(path = %path.display(), "export written");
    Ok(path)
}

pub fn copy_to_clipboard(doc: &Value) -> Result<(), ExportError> {
    use arboard::Clipboard;
    let text = serde_json::to_string_pretty(doc)?;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}
