//! Field validation
//!
//! Pure mapping from `(field, value, rule)` to a verdict. Only the first
//! violated constraint is reported so each field shows one message.

use super::field::FieldValue;
use super::rules::{FieldRule, TextRule, Violation};

/// Outcome of validating a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldVerdict {
    Valid,
    Invalid {
        violation: Violation,
        message: String,
    },
}

impl FieldVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldVerdict::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FieldVerdict::Valid => None,
            FieldVerdict::Invalid { message, .. } => Some(message),
        }
    }

    fn invalid(rule: &FieldRule, violation: Violation) -> Self {
        FieldVerdict::Invalid {
            violation,
            message: rule.message_for(violation),
        }
    }
}

/// Validate `value` against `rule`. A missing value is treated as empty.
pub fn validate_field(field: &str, value: Option<&FieldValue>, rule: &FieldRule) -> FieldVerdict {
    let empty = value.map(|v| is_empty_for(rule, v)).unwrap_or(true);

    if rule.is_required() && empty {
        tracing::trace!(field, "required value missing");
        return FieldVerdict::invalid(rule, required_violation(rule));
    }
    let Some(value) = value.filter(|_| !empty) else {
        return FieldVerdict::Valid;
    };

    match rule {
        FieldRule::Text(text) => match check_text(value.as_text(), text) {
            Some(violation) => FieldVerdict::invalid(rule, violation),
            None => FieldVerdict::Valid,
        },
        FieldRule::Choice(choice) => {
            let code = value.as_text().trim();
            if choice.options.iter().any(|o| o.code == code) {
                FieldVerdict::Valid
            } else {
                FieldVerdict::invalid(rule, Violation::InvalidOption)
            }
        }
        FieldRule::CheckboxGroup(group) => {
            let checked = value
                .as_choices()
                .iter()
                .filter(|c| group.options.iter().any(|o| o.code == c.as_str()))
                .count();
            if checked < group.min_checked {
                FieldVerdict::invalid(rule, Violation::MinChecked)
            } else {
                FieldVerdict::Valid
            }
        }
        FieldRule::Consent { .. } | FieldRule::Toggle => FieldVerdict::Valid,
    }
}

/// Emptiness as seen through the shape the rule expects
fn is_empty_for(rule: &FieldRule, value: &FieldValue) -> bool {
    match rule {
        FieldRule::Text(_) | FieldRule::Choice(_) => value.as_text().trim().is_empty(),
        FieldRule::CheckboxGroup(_) => value.as_choices().is_empty(),
        FieldRule::Consent { .. } | FieldRule::Toggle => !value.as_flag(),
    }
}

/// Checkbox groups express "required" as a minimum count
fn required_violation(rule: &FieldRule) -> Violation {
    match rule {
        FieldRule::CheckboxGroup(_) => Violation::MinChecked,
        _ => Violation::Required,
    }
}

fn check_text(raw: &str, rule: &TextRule) -> Option<Violation> {
    let value = raw.trim();
    let len = value.chars().count();

    if rule.min_length.is_some_and(|min| len < min) {
        return Some(Violation::MinLength);
    }
    if rule.max_length.is_some_and(|max| len > max) {
        return Some(Violation::MaxLength);
    }
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(value) {
            return Some(Violation::Pattern);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::rules::{CheckboxGroupRule, ChoiceRule, FieldOption};
    use std::collections::HashMap;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn name_rule() -> FieldRule {
        FieldRule::Text(
            TextRule::required()
                .length(Some(2), Some(10))
                .pattern(r"^[A-Za-z]+$")
                .unwrap()
                .message(Violation::Required, "El nombre es obligatorio")
                .message(Violation::MinLength, "Mínimo 2 caracteres")
                .message(Violation::MaxLength, "Máximo 10 caracteres")
                .message(Violation::Pattern, "Solo letras"),
        )
    }

    fn group_rule() -> FieldRule {
        FieldRule::CheckboxGroup(CheckboxGroupRule {
            min_checked: 1,
            options: vec![
                FieldOption::new("cine", "Cine"),
                FieldOption::new("viajes", "Viajes"),
            ],
            message: "Selecciona al menos un interés".to_string(),
        })
    }

    #[test]
    fn test_required_empty_fails_with_required_message() {
        let rule = name_rule();
        for value in [None, Some(text("")), Some(text("   "))] {
            let verdict = validate_field("firstName", value.as_ref(), &rule);
            assert_eq!(verdict.message(), Some("El nombre es obligatorio"));
        }
    }

    #[test]
    fn test_optional_empty_is_valid() {
        let rule = FieldRule::Text(TextRule::optional().pattern(r"^\d{4,6}$").unwrap());
        assert!(validate_field("postalCode", Some(&text("")), &rule).is_valid());
        assert!(validate_field("postalCode", None, &rule).is_valid());
    }

    #[test]
    fn test_min_length_reported_before_pattern() {
        // "1" is both too short and not letters
        let verdict = validate_field("firstName", Some(&text("1")), &name_rule());
        assert_eq!(verdict.message(), Some("Mínimo 2 caracteres"));
    }

    #[test]
    fn test_max_length() {
        let verdict = validate_field("firstName", Some(&text("Abcdefghijk")), &name_rule());
        assert_eq!(verdict.message(), Some("Máximo 10 caracteres"));
    }

    #[test]
    fn test_pattern_mismatch() {
        let verdict = validate_field("firstName", Some(&text("Ana1")), &name_rule());
        assert!(matches!(
            verdict,
            FieldVerdict::Invalid {
                violation: Violation::Pattern,
                ..
            }
        ));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let rule = FieldRule::Text(TextRule::required().length(Some(2), Some(2)));
        assert!(validate_field("x", Some(&text("ñá")), &rule).is_valid());
    }

    #[test]
    fn test_valid_value() {
        assert!(validate_field("firstName", Some(&text("Ana")), &name_rule()).is_valid());
    }

    #[test]
    fn test_checkbox_group_requires_minimum() {
        let rule = group_rule();
        let none = FieldValue::Choices(vec![]);
        assert_eq!(
            validate_field("interests", Some(&none), &rule).message(),
            Some("Selecciona al menos un interés")
        );
        let one = FieldValue::Choices(vec!["cine".to_string()]);
        assert!(validate_field("interests", Some(&one), &rule).is_valid());
    }

    #[test]
    fn test_checkbox_group_ignores_unknown_options() {
        let unknown = FieldValue::Choices(vec!["golf".to_string()]);
        assert!(!validate_field("interests", Some(&unknown), &group_rule()).is_valid());
    }

    #[test]
    fn test_choice_rejects_unknown_code() {
        let rule = FieldRule::Choice(ChoiceRule {
            required: true,
            options: vec![FieldOption::new("mx", "México")],
            messages: HashMap::from([(Violation::Required, "Selecciona un país".to_string())]),
        });
        assert_eq!(
            validate_field("country", None, &rule).message(),
            Some("Selecciona un país")
        );
        assert!(validate_field("country", Some(&text("mx")), &rule).is_valid());
        assert_eq!(
            validate_field("country", Some(&text("zz")), &rule).message(),
            Some("Selecciona una opción válida")
        );
    }

    #[test]
    fn test_consent_must_be_checked() {
        let rule = FieldRule::Consent {
            required: true,
            message: "Debes aceptar los términos".to_string(),
        };
        assert!(!validate_field("terms", Some(&FieldValue::Flag(false)), &rule).is_valid());
        assert!(validate_field("terms", Some(&FieldValue::Flag(true)), &rule).is_valid());
    }

    #[test]
    fn test_wrong_shape_is_treated_as_empty() {
        let verdict = validate_field("firstName", Some(&FieldValue::Flag(true)), &name_rule());
        assert_eq!(verdict.message(), Some("El nombre es obligatorio"));
    }
}
