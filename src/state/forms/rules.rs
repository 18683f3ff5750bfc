//! Declarative field rules

use regex::Regex;
use std::collections::HashMap;

/// Kind of rule violation a field can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    InvalidOption,
    MinChecked,
}

/// A selectable option: stored code plus display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub code: &'static str,
    pub label: &'static str,
}

impl FieldOption {
    pub const fn new(code: &'static str, label: &'static str) -> Self {
        Self { code, label }
    }
}

/// Free-text constraints
#[derive(Debug, Clone, Default)]
pub struct TextRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub messages: HashMap<Violation, String>,
}

impl TextRule {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    pub fn optional() -> Self {
        Self::default()
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn message(mut self, violation: Violation, message: &str) -> Self {
        self.messages.insert(violation, message.to_string());
        self
    }
}

/// Single-choice select box
#[derive(Debug, Clone)]
pub struct ChoiceRule {
    pub required: bool,
    pub options: Vec<FieldOption>,
    pub messages: HashMap<Violation, String>,
}

/// "Check at least N" group of checkboxes
#[derive(Debug, Clone)]
pub struct CheckboxGroupRule {
    pub min_checked: usize,
    pub options: Vec<FieldOption>,
    pub message: String,
}

/// Immutable validation contract for one field
#[derive(Debug, Clone)]
pub enum FieldRule {
    Text(TextRule),
    Choice(ChoiceRule),
    CheckboxGroup(CheckboxGroupRule),
    /// Single checkbox that must be ticked when `required`
    Consent { required: bool, message: String },
    /// Unconstrained checkbox
    Toggle,
}

impl FieldRule {
    pub fn is_required(&self) -> bool {
        match self {
            FieldRule::Text(r) => r.required,
            FieldRule::Choice(r) => r.required,
            FieldRule::CheckboxGroup(r) => r.min_checked > 0,
            FieldRule::Consent { required, .. } => *required,
            FieldRule::Toggle => false,
        }
    }

    /// Options for choice-like rules
    pub fn options(&self) -> &[FieldOption] {
        match self {
            FieldRule::Choice(r) => &r.options,
            FieldRule::CheckboxGroup(r) => &r.options,
            _ => &[],
        }
    }

    /// Display label for an option code, if the rule knows it
    pub fn option_label(&self, code: &str) -> Option<&'static str> {
        self.options()
            .iter()
            .find(|o| o.code == code)
            .map(|o| o.label)
    }

    /// Message configured for a violation, with a generic fallback
    pub fn message_for(&self, violation: Violation) -> String {
        let configured = match self {
            FieldRule::Text(r) => r.messages.get(&violation).cloned(),
            FieldRule::Choice(r) => r.messages.get(&violation).cloned(),
            FieldRule::CheckboxGroup(r) => Some(r.message.clone()),
            FieldRule::Consent { message, .. } => Some(message.clone()),
            FieldRule::Toggle => None,
        };
        configured.unwrap_or_else(|| default_message(violation).to_string())
    }
}

fn default_message(violation: Violation) -> &'static str {
    match violation {
        Violation::Required => "Este campo es obligatorio",
        Violation::MinLength => "El valor es demasiado corto",
        Violation::MaxLength => "El valor es demasiado largo",
        Violation::Pattern => "El formato no es válido",
        Violation::InvalidOption => "Selecciona una opción válida",
        Violation::MinChecked => "Selecciona al menos una opción",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_constraints() {
        let rule = TextRule::required()
            .length(Some(2), Some(50))
            .message(Violation::MinLength, "corto");
        assert!(rule.required);
        assert_eq!(rule.min_length, Some(2));
        assert_eq!(rule.max_length, Some(50));
        assert_eq!(rule.messages[&Violation::MinLength], "corto");
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        assert!(TextRule::optional().pattern("([a-z").is_err());
    }

    #[test]
    fn test_message_fallback() {
        let rule = FieldRule::Text(TextRule::required());
        assert_eq!(
            rule.message_for(Violation::Required),
            "Este campo es obligatorio"
        );
    }

    #[test]
    fn test_option_label_lookup() {
        let rule = FieldRule::Choice(ChoiceRule {
            required: true,
            options: vec![FieldOption::new("mx", "México")],
            messages: HashMap::new(),
        });
        assert_eq!(rule.option_label("mx"), Some("México"));
        assert_eq!(rule.option_label("zz"), None);
    }

    #[test]
    fn test_toggle_is_never_required() {
        assert!(!FieldRule::Toggle.is_required());
    }
}
