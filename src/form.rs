//! Explicit form state: raw field text, per-field errors and typed validation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::format::{is_amount_char, parse_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Money,
    Integer,
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Characters a user may type into a field of this kind.
    pub fn accepts(&self, c: char) -> bool {
        match self {
            FieldKind::Text => !c.is_control(),
            FieldKind::Email => !c.is_whitespace() && !c.is_control(),
            FieldKind::Money => is_amount_char(c),
            FieldKind::Integer => c.is_ascii_digit(),
            // choices are picked, not typed
            FieldKind::Choice(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Money(f64),
    Integer(u32),
    Choice(&'static str),
}

/// Typed values of every field that validated. Empty optional fields are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    values: BTreeMap<&'static str, FieldValue>,
}

impl FormData {
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            FieldValue::Text(text) => Some(text.as_str()),
            FieldValue::Choice(choice) => Some(*choice),
            _ => None,
        }
    }

    pub fn money(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            FieldValue::Money(amount) => Some(*amount),
            _ => None,
        }
    }

    pub fn integer(&self, key: &str) -> Option<u32> {
        match self.values.get(key)? {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// Error messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_errors(.0))]
pub struct FieldErrors(BTreeMap<&'static str, String>);

fn join_errors(errors: &BTreeMap<&'static str, String>) -> String {
    errors
        .iter()
        .map(|(key, message)| format!("{key}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    pub fn insert(&mut self, key: &'static str, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    specs: &'static [FieldSpec],
    values: BTreeMap<&'static str, String>,
    errors: BTreeMap<&'static str, String>,
}

impl FormState {
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self {
            specs,
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn specs(&self) -> &'static [FieldSpec] {
        self.specs
    }

    pub fn spec(&self, key: &str) -> Option<&'static FieldSpec> {
        self.specs.iter().find(|spec| spec.key == key)
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Replaces a field's text. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(spec) = self.spec(key) {
            self.values.insert(spec.key, value.into());
            self.errors.remove(spec.key);
        }
    }

    /// Appends a typed character if the field kind accepts it.
    pub fn push(&mut self, key: &str, c: char) -> bool {
        let Some(spec) = self.spec(key) else {
            return false;
        };
        if !spec.kind.accepts(c) {
            return false;
        }
        self.values.entry(spec.key).or_default().push(c);
        self.errors.remove(spec.key);
        true
    }

    pub fn pop(&mut self, key: &str) {
        if let Some(value) = self.values.get_mut(key) {
            value.pop();
        }
    }

    /// Steps a choice field to its next option, wrapping around.
    pub fn cycle_choice(&mut self, key: &str) {
        let Some(spec) = self.spec(key) else {
            return;
        };
        let FieldKind::Choice(options) = spec.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = self.value(key);
        let next = options
            .iter()
            .position(|option| *option == current)
            .map(|i| (i + 1) % options.len())
            .unwrap_or(0);
        self.set(key, options[next]);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.errors.clear();
    }

    /// Validates every field.
    pub fn validate(&mut self) -> Result<FormData, FieldErrors> {
        let keys: Vec<&'static str> = self.specs.iter().map(|spec| spec.key).collect();
        self.validate_fields(&keys)
    }

    /// Validates only `keys`, leaving errors of other fields untouched.
    pub fn validate_fields(&mut self, keys: &[&str]) -> Result<FormData, FieldErrors> {
        let mut data = FormData::default();
        let mut errors = BTreeMap::new();
        let specs = self.specs;

        for spec in specs.iter().filter(|spec| keys.contains(&spec.key)) {
            self.errors.remove(spec.key);
            match check(spec, self.value(spec.key)) {
                Ok(Some(value)) => {
                    data.values.insert(spec.key, value);
                }
                Ok(None) => {}
                Err(message) => {
                    errors.insert(spec.key, message);
                }
            }
        }

        if errors.is_empty() {
            Ok(data)
        } else {
            self.errors.extend(errors.clone());
            Err(FieldErrors(errors))
        }
    }
}

fn check(spec: &FieldSpec, raw: &str) -> Result<Option<FieldValue>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return if spec.required {
            Err("required".to_string())
        } else {
            Ok(None)
        };
    }

    match spec.kind {
        FieldKind::Text => Ok(Some(FieldValue::Text(raw.to_string()))),
        FieldKind::Email => {
            if is_email(raw) {
                Ok(Some(FieldValue::Text(raw.to_string())))
            } else {
                Err("enter a valid email address".to_string())
            }
        }
        FieldKind::Money => match parse_amount(raw) {
            Some(amount) if amount >= 0.0 => Ok(Some(FieldValue::Money(amount))),
            _ => Err("enter an amount".to_string()),
        },
        FieldKind::Integer => raw
            .parse::<u32>()
            .map(|n| Some(FieldValue::Integer(n)))
            .map_err(|_| "enter a whole number".to_string()),
        FieldKind::Choice(options) => options
            .iter()
            .copied()
            .find(|option| *option == raw)
            .map(|option| Some(FieldValue::Choice(option)))
            .ok_or_else(|| format!("choose one of: {}", options.join(", "))),
    }
}

fn is_email(raw: &str) -> bool {
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: &[&str] = &["Red", "Green", "Blue"];

    static SPECS: &[FieldSpec] = &[
        FieldSpec::required("name", "Name", FieldKind::Text),
        FieldSpec::required("email", "Email", FieldKind::Email),
        FieldSpec::optional("budget", "Budget", FieldKind::Money),
        FieldSpec::optional("rooms", "Rooms", FieldKind::Integer),
        FieldSpec::required("color", "Color", FieldKind::Choice(COLORS)),
    ];

    #[test]
    fn reports_every_invalid_field() {
        let mut form = FormState::new(SPECS);
        form.set("email", "not-an-email");
        form.set("rooms", "2.5");

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some("required"));
        assert_eq!(errors.get("email"), Some("enter a valid email address"));
        assert_eq!(errors.get("rooms"), Some("enter a whole number"));
        assert_eq!(errors.get("color"), Some("choose one of: Red, Green, Blue"));
        assert_eq!(errors.get("budget"), None);
        assert_eq!(form.error("name"), Some("required"));
    }

    #[test]
    fn produces_typed_data() {
        let mut form = FormState::new(SPECS);
        form.set("name", "  Ada  ");
        form.set("email", "ada@example.com");
        form.set("budget", "$450,000");
        form.set("rooms", "3");
        form.cycle_choice("color");

        let data = form.validate().unwrap();
        assert_eq!(data.text("name"), Some("Ada"));
        assert_eq!(data.money("budget"), Some(450_000.0));
        assert_eq!(data.integer("rooms"), Some(3));
        assert_eq!(data.text("color"), Some("Red"));
    }

    #[test]
    fn partial_validation_only_touches_named_fields() {
        let mut form = FormState::new(SPECS);
        form.set("name", "Ada");
        assert!(form.validate_fields(&["name"]).is_ok());
        assert_eq!(form.error("email"), None);

        assert!(form.validate_fields(&["email"]).is_err());
        assert_eq!(form.error("email"), Some("required"));
        form.push("email", 'a');
        assert_eq!(form.error("email"), None);
    }

    #[test]
    fn typing_respects_field_kind() {
        let mut form = FormState::new(SPECS);
        assert!(form.push("rooms", '4'));
        assert!(!form.push("rooms", 'x'));
        assert!(form.push("budget", '$'));
        assert!(!form.push("email", ' '));
        assert!(!form.push("color", 'R'));
        assert!(!form.push("missing", 'a'));
        assert_eq!(form.value("rooms"), "4");
        form.pop("rooms");
        assert_eq!(form.value("rooms"), "");
    }

    #[test]
    fn choice_cycles_and_wraps() {
        let mut form = FormState::new(SPECS);
        form.cycle_choice("color");
        form.cycle_choice("color");
        assert_eq!(form.value("color"), "Green");
        form.cycle_choice("color");
        form.cycle_choice("color");
        assert_eq!(form.value("color"), "Red");
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a@@b.co"));
        assert!(!is_email("a@.co"));
    }

    #[test]
    fn errors_display_as_one_line() {
        let mut form = FormState::new(SPECS);
        form.set("name", "Ada");
        form.set("email", "ada@example.com");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.to_string(), "color: required");

        form.set("email", "");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.to_string(), "color: required; email: required");
    }
}
