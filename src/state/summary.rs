//! Read-only summary of the collected values

use super::draft::DraftState;
use super::forms::{FieldRule, FieldSpec, FieldValue, FormSchema};

/// Text shown for optional fields left blank
pub const NOT_PROVIDED: &str = "No especificado";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub label: &'static str,
    pub value: String,
}

/// Values of one step, titled like the step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub title: &'static str,
    pub entries: Vec<SummaryEntry>,
}

/// Group every collected value by step. The summary step itself only holds
/// the consent checkbox, so it is left out.
pub fn build_summary(schema: &FormSchema, draft: &DraftState) -> Vec<SummarySection> {
    let total = schema.total_steps();
    schema
        .steps()
        .iter()
        .filter(|step| step.number < total)
        .map(|step| SummarySection {
            title: step.title,
            entries: schema
                .step_fields(step.number)
                .into_iter()
                .map(|spec| SummaryEntry {
                    label: spec.label,
                    value: sanitize(&display_value(spec, draft.value(spec.name))),
                })
                .collect(),
        })
        .collect()
}

/// Human-readable rendering of a stored value
pub fn display_value(spec: &FieldSpec, value: Option<&FieldValue>) -> String {
    let Some(value) = value else {
        return match spec.rule {
            FieldRule::Toggle | FieldRule::Consent { .. } => "No".to_string(),
            _ => NOT_PROVIDED.to_string(),
        };
    };

    match (&spec.rule, value) {
        (FieldRule::Toggle | FieldRule::Consent { .. }, v) => yes_no(v.as_flag()),
        (FieldRule::Choice(_), FieldValue::Text(code)) if !code.trim().is_empty() => spec
            .rule
            .option_label(code.trim())
            .map(str::to_string)
            .unwrap_or_else(|| code.trim().to_string()),
        (FieldRule::CheckboxGroup(_), FieldValue::Choices(codes)) if !codes.is_empty() => codes
            .iter()
            .map(|c| spec.rule.option_label(c).unwrap_or(c.as_str()))
            .collect::<Vec<_>>()
            .join(", "),
        (_, v) if v.is_empty() => NOT_PROVIDED.to_string(),
        (_, FieldValue::Text(s)) => s.trim().to_string(),
        (_, FieldValue::Choices(c)) => c.join(", "),
        (_, FieldValue::Flag(b)) => yes_no(*b),
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Sí" } else { "No" };
    text.to_string()
}

/// Escape control characters so user input can't inject terminal escape
/// sequences (or break the layout) when interpolated into the screen.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push(' '),
            c if c.is_control() || is_bidi_override(c) => {
                out.extend(c.escape_unicode());
            }
            c => out.push(c),
        }
    }
    out
}

/// Bidirectional overrides can visually reorder the surrounding text
fn is_bidi_override(c: char) -> bool {
    matches!(c, '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn draft_with(values: &[(&str, FieldValue)]) -> DraftState {
        let mut draft = DraftState::new("s", Utc::now());
        for (name, value) in values {
            draft.set_value(name, value.clone());
        }
        draft
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_sections_follow_steps() {
        let schema = FormSchema::registration().unwrap();
        let summary = build_summary(&schema, &draft_with(&[]));
        let titles: Vec<_> = summary.iter().map(|s| s.title).collect();
        assert_eq!(titles, ["Información personal", "Dirección", "Preferencias"]);
        assert_eq!(summary[0].entries.len(), 4);
    }

    #[test]
    fn test_display_values() {
        let schema = FormSchema::registration().unwrap();
        let draft = draft_with(&[
            ("firstName", text(" Ana ")),
            ("country", text("mx")),
            (
                "interests",
                FieldValue::Choices(vec!["cine".to_string(), "viajes".to_string()]),
            ),
            ("newsletter", FieldValue::Flag(true)),
        ]);
        let summary = build_summary(&schema, &draft);

        let value = |section: usize, label: &str| {
            summary[section]
                .entries
                .iter()
                .find(|e| e.label == label)
                .map(|e| e.value.clone())
                .unwrap()
        };
        assert_eq!(value(0, "Nombre"), "Ana");
        assert_eq!(value(0, "Teléfono"), NOT_PROVIDED);
        assert_eq!(value(1, "País"), "México");
        assert_eq!(value(1, "Código postal (opcional)"), NOT_PROVIDED);
        assert_eq!(value(2, "Intereses"), "Cine, Viajes");
        assert_eq!(value(2, "Recibir boletín"), "Sí");
    }

    #[test]
    fn test_escape_sequences_are_neutralized() {
        assert_eq!(sanitize("Ana\u{1b}[2J"), "Ana\\u{1b}[2J");
        assert_eq!(sanitize("a\nb"), "a\\nb");
        assert_eq!(sanitize("x\u{202E}y"), "x\\u{202e}y");
    }

    #[test]
    fn test_summary_values_are_sanitized() {
        let schema = FormSchema::registration().unwrap();
        let draft = draft_with(&[("city", text("Lima\u{7}"))]);
        let summary = build_summary(&schema, &draft);
        let city = summary[1]
            .entries
            .iter()
            .find(|e| e.label == "Ciudad")
            .unwrap();
        assert_eq!(city.value, "Lima\\u{7}");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("Núñez & <b>"), "Núñez & <b>");
    }
}
