//! Form field value objects

use serde::{Deserialize, Serialize};

/// Type-safe field values
///
/// Serialized untagged so a persisted draft reads like a plain form dump:
/// `{"firstName": "Ana", "interests": ["viajes"], "terms": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Choices(Vec<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Text content, or an empty string for non-text values
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Checked options, or an empty slice for non-group values
    pub fn as_choices(&self) -> &[String] {
        match self {
            FieldValue::Choices(c) => c,
            _ => &[],
        }
    }

    /// Checkbox state (false for non-flag values)
    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }

    /// Whether the value counts as "not filled in"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Choices(c) => c.is_empty(),
            FieldValue::Flag(b) => !b,
        }
    }

    /// Push a character to a text value
    pub fn push_char(&mut self, c: char) {
        if let FieldValue::Text(s) = self {
            s.push(c);
        }
    }

    /// Remove the last character from a text value
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = self {
            s.pop();
        }
    }

    /// Toggle a flag, or toggle `option` inside a checkbox group
    pub fn toggle(&mut self, option: Option<&str>) {
        match (self, option) {
            (FieldValue::Flag(b), _) => *b = !*b,
            (FieldValue::Choices(c), Some(option)) => {
                if let Some(pos) = c.iter().position(|o| o == option) {
                    c.remove(pos);
                } else {
                    c.push(option.to_string());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_untagged_serialization() {
        let values = vec![
            FieldValue::Text("Ana".to_string()),
            FieldValue::Choices(vec!["viajes".to_string()]),
            FieldValue::Flag(true),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["Ana",["viajes"],true]"#);

        let parsed: Vec<FieldValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, values);
    }

    #[test]
    fn test_whitespace_text_is_empty() {
        assert!(FieldValue::Text("   ".to_string()).is_empty());
        assert!(!FieldValue::Text(" a ".to_string()).is_empty());
    }

    #[test]
    fn test_toggle_group_option() {
        let mut value = FieldValue::Choices(vec![]);
        value.toggle(Some("cine"));
        assert_eq!(value.as_choices(), ["cine".to_string()]);
        value.toggle(Some("cine"));
        assert!(value.is_empty());
    }

    #[test]
    fn test_toggle_flag() {
        let mut value = FieldValue::Flag(false);
        value.toggle(None);
        assert!(value.as_flag());
    }

    #[test]
    fn test_push_char_ignored_for_choices() {
        let mut value = FieldValue::Choices(vec![]);
        value.push_char('x');
        assert_eq!(value, FieldValue::Choices(vec![]));
    }

    #[test]
    fn test_pop_char() {
        let mut value = FieldValue::Text("Ana".to_string());
        value.pop_char();
        assert_eq!(value.as_text(), "An");
    }
}
