//! Declarative field rules and the schemas for the public contact form
//! and the admin login form.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Field values keyed by field name.
pub type FormValues = BTreeMap<String, String>;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\S+@\S+$").expect("email pattern is valid"));

/// A single validation rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The value must be non-empty.
    Required,
    /// A non-empty value must match. Empty values are left to `Required`.
    Pattern(Regex),
}

impl Rule {
    /// Email shape: something, an `@`, something, no whitespace.
    pub fn email() -> Self {
        Rule::Pattern(EMAIL_SHAPE.clone())
    }

    fn check(&self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::Pattern(re) => value.is_empty() || re.is_match(value),
        }
    }
}

/// Rules for one field, sharing a single message.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub rules: Vec<Rule>,
    pub message: String,
}

/// Field-level errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Ordered set of field specs.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field with its rules and the message shown when any fails.
    pub fn field(mut self, name: &str, rules: Vec<Rule>, message: &str) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            rules,
            message: message.to_string(),
        });
        self
    }

    /// Declare a field with no rules.
    pub fn optional(self, name: &str) -> Self {
        self.field(name, Vec::new(), "")
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Empty value map with every declared field present.
    pub fn blank_values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|spec| (spec.name.clone(), String::new()))
            .collect()
    }

    /// Check every field; missing fields are treated as empty.
    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for spec in &self.fields {
            let value = values.get(&spec.name).map(String::as_str).unwrap_or("");
            if spec.rules.iter().any(|rule| !rule.check(value)) {
                errors.insert(spec.name.clone(), spec.message.clone());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Public contact form: name, email, optional phone, message.
    pub fn contact() -> Self {
        Self::new()
            .field("name", vec![Rule::Required], "Name is required")
            .field(
                "email",
                vec![Rule::Required, Rule::email()],
                "Valid email is required",
            )
            .optional("phone")
            .field("message", vec![Rule::Required], "Message is required")
    }

    /// Admin sign-in form.
    pub fn login() -> Self {
        Self::new()
            .field(
                "email",
                vec![Rule::Required, Rule::email()],
                "Valid email is required",
            )
            .field("password", vec![Rule::Required], "Password is required")
    }
}
