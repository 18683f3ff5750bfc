//! Registration form schema: steps, fields and their rules
//!
//! Built once at startup and shared by the wizard, the summary and the UI.

use super::rules::{CheckboxGroupRule, ChoiceRule, FieldOption, FieldRule, TextRule, Violation};
use std::collections::HashMap;

pub const COUNTRIES: &[FieldOption] = &[
    FieldOption::new("ar", "Argentina"),
    FieldOption::new("cl", "Chile"),
    FieldOption::new("co", "Colombia"),
    FieldOption::new("es", "España"),
    FieldOption::new("us", "Estados Unidos"),
    FieldOption::new("mx", "México"),
    FieldOption::new("pe", "Perú"),
];

pub const INTERESTS: &[FieldOption] = &[
    FieldOption::new("tecnologia", "Tecnología"),
    FieldOption::new("deportes", "Deportes"),
    FieldOption::new("musica", "Música"),
    FieldOption::new("viajes", "Viajes"),
    FieldOption::new("lectura", "Lectura"),
    FieldOption::new("cine", "Cine"),
];

/// How a text value is written out in the export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    #[default]
    Plain,
    /// Digits regrouped as a phone number
    Phone,
}

/// One field of the form
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub rule: FieldRule,
    pub is_multiline: bool,
    pub format: TextFormat,
}

/// One step of the wizard and the fields it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    /// 1-based ordinal
    pub number: usize,
    pub title: &'static str,
    pub fields: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct FormSchema {
    steps: Vec<StepDescriptor>,
    fields: HashMap<&'static str, FieldSpec>,
}

impl FormSchema {
    pub fn new(steps: Vec<StepDescriptor>, fields: Vec<FieldSpec>) -> Self {
        Self {
            steps,
            fields: fields.into_iter().map(|f| (f.name, f)).collect(),
        }
    }

    /// The four-step registration form
    pub fn registration() -> Result<Self, regex::Error> {
        let name_rule = |label: &str| -> Result<FieldRule, regex::Error> {
            Ok(FieldRule::Text(
                TextRule::required()
                    .length(Some(2), Some(50))
                    .pattern(r"^[\p{L}\s'-]+$")?
                    .message(Violation::Required, &format!("El {label} es obligatorio"))
                    .message(
                        Violation::MinLength,
                        &format!("El {label} debe tener al menos 2 caracteres"),
                    )
                    .message(
                        Violation::MaxLength,
                        &format!("El {label} no puede superar 50 caracteres"),
                    )
                    .message(
                        Violation::Pattern,
                        &format!("El {label} solo puede contener letras"),
                    ),
            ))
        };

        let fields = vec![
            FieldSpec {
                name: "firstName",
                label: "Nombre",
                rule: name_rule("nombre")?,
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "lastName",
                label: "Apellido",
                rule: name_rule("apellido")?,
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "email",
                label: "Correo electrónico",
                rule: FieldRule::Text(
                    TextRule::required()
                        .pattern(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?
                        .message(Violation::Required, "El correo electrónico es obligatorio")
                        .message(Violation::Pattern, "Introduce un correo electrónico válido"),
                ),
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "phone",
                label: "Teléfono",
                rule: FieldRule::Text(
                    TextRule::required()
                        .length(Some(10), Some(20))
                        .pattern(r"^\+?(?:[\s()-]*\d){10,15}[\s()-]*$")?
                        .message(Violation::Required, "El teléfono es obligatorio")
                        .message(
                            Violation::MinLength,
                            "El teléfono debe tener al menos 10 dígitos",
                        )
                        .message(Violation::MaxLength, "El teléfono es demasiado largo")
                        .message(
                            Violation::Pattern,
                            "Introduce un teléfono válido de 10 a 15 dígitos",
                        ),
                ),
                is_multiline: false,
                format: TextFormat::Phone,
            },
            FieldSpec {
                name: "country",
                label: "País",
                rule: FieldRule::Choice(ChoiceRule {
                    required: true,
                    options: COUNTRIES.to_vec(),
                    messages: HashMap::from([
                        (Violation::Required, "Selecciona un país".to_string()),
                        (Violation::InvalidOption, "Selecciona un país válido".to_string()),
                    ]),
                }),
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "city",
                label: "Ciudad",
                rule: FieldRule::Text(
                    TextRule::required()
                        .length(Some(2), Some(50))
                        .message(Violation::Required, "La ciudad es obligatoria")
                        .message(
                            Violation::MinLength,
                            "La ciudad debe tener al menos 2 caracteres",
                        )
                        .message(Violation::MaxLength, "La ciudad no puede superar 50 caracteres"),
                ),
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "address",
                label: "Dirección",
                rule: FieldRule::Text(
                    TextRule::required()
                        .length(Some(5), Some(100))
                        .message(Violation::Required, "La dirección es obligatoria")
                        .message(
                            Violation::MinLength,
                            "La dirección debe tener al menos 5 caracteres",
                        )
                        .message(
                            Violation::MaxLength,
                            "La dirección no puede superar 100 caracteres",
                        ),
                ),
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "postalCode",
                label: "Código postal (opcional)",
                rule: FieldRule::Text(
                    TextRule::optional()
                        .pattern(r"^\d{4,6}$")?
                        .message(Violation::Pattern, "El código postal debe tener 4 a 6 dígitos"),
                ),
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "interests",
                label: "Intereses",
                rule: FieldRule::CheckboxGroup(CheckboxGroupRule {
                    min_checked: 1,
                    options: INTERESTS.to_vec(),
                    message: "Selecciona al menos un interés".to_string(),
                }),
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "newsletter",
                label: "Recibir boletín",
                rule: FieldRule::Toggle,
                is_multiline: false,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "comments",
                label: "Comentarios (opcional)",
                rule: FieldRule::Text(
                    TextRule::optional()
                        .length(None, Some(300))
                        .message(
                            Violation::MaxLength,
                            "Los comentarios no pueden superar 300 caracteres",
                        ),
                ),
                is_multiline: true,
                format: TextFormat::Plain,
            },
            FieldSpec {
                name: "terms",
                label: "Acepto los términos y condiciones",
                rule: FieldRule::Consent {
                    required: true,
                    message: "Debes aceptar los términos y condiciones".to_string(),
                },
                is_multiline: false,
                format: TextFormat::Plain,
            },
        ];

        let steps = vec![
            StepDescriptor {
                number: 1,
                title: "Información personal",
                fields: vec!["firstName", "lastName", "email", "phone"],
            },
            StepDescriptor {
                number: 2,
                title: "Dirección",
                fields: vec!["country", "city", "address", "postalCode"],
            },
            StepDescriptor {
                number: 3,
                title: "Preferencias",
                fields: vec!["interests", "newsletter", "comments"],
            },
            StepDescriptor {
                number: 4,
                title: "Confirmación",
                fields: vec!["terms"],
            },
        ];

        Ok(Self::new(steps, fields))
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    /// Step by 1-based number
    pub fn step(&self, number: usize) -> Option<&StepDescriptor> {
        number.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name).map(|f| &f.rule)
    }

    /// Field specs of a step, in display order
    pub fn step_fields(&self, number: usize) -> Vec<&FieldSpec> {
        self.step(number)
            .map(|s| s.fields.iter().filter_map(|n| self.field(n)).collect())
            .unwrap_or_default()
    }

    /// Every field name in step order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().flat_map(|s| s.fields.iter().copied())
    }
}
