//! Form domain layer
//!
//! Declarative schema, typed field values and the pure validator used by
//! the wizard.

mod field;
mod rules;
mod schema;
mod validator;

pub use field::FieldValue;
pub use rules::{CheckboxGroupRule, ChoiceRule, FieldOption, FieldRule, TextRule, Violation};
pub use schema::{FieldSpec, FormSchema, StepDescriptor, TextFormat, COUNTRIES, INTERESTS};
pub use validator::{validate_field, FieldVerdict};
