use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{FieldInput, FieldSpec, StepSpec};
use crate::profiles::{Attributes, FieldValue};

const EARLIEST_YEAR: i32 = 1900;

/// A single blocking problem with a field, shown inline next to the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &FieldSpec, message: impl Into<String>) -> Self {
        Self {
            field: field.key.to_string(),
            message: message.into(),
        }
    }
}

/// Check every visible field of a step against the current values.
pub fn validate_step(step: &StepSpec, values: &Attributes) -> Vec<FieldIssue> {
    step.visible_fields(values)
        .filter_map(|field| validate_field(field, values.get(field.key)))
        .collect()
}

pub fn validate_field(field: &FieldSpec, value: Option<&FieldValue>) -> Option<FieldIssue> {
    let value = match value {
        Some(value) if !value.is_blank() => value,
        _ if field.required => {
            return Some(FieldIssue::new(field, format!("{} is required", field.label)));
        }
        _ => return None,
    };

    match (field.input, value) {
        (FieldInput::MultiSelect { options }, FieldValue::List(selected)) => selected
            .iter()
            .find(|choice| !options.contains(&choice.as_str()))
            .map(|choice| FieldIssue::new(field, format!("'{choice}' is not an available option"))),
        (FieldInput::MultiSelect { .. }, FieldValue::Text(_)) => {
            Some(FieldIssue::new(field, "expected a list of options"))
        }
        (_, FieldValue::List(_)) => Some(FieldIssue::new(field, "expected a single value")),
        (input, FieldValue::Text(text)) => validate_text(field, input, text.trim()),
    }
}

fn validate_text(field: &FieldSpec, input: FieldInput, text: &str) -> Option<FieldIssue> {
    let valid = match input {
        FieldInput::Text | FieldInput::LongText => true,
        FieldInput::Email => is_email(text),
        FieldInput::Phone => is_phone(text),
        FieldInput::Url | FieldInput::Upload { .. } => is_url(text),
        FieldInput::Number => text.parse::<u64>().is_ok(),
        FieldInput::Year => {
            let current = Utc::now().year();
            text.parse::<i32>()
                .map(|year| (EARLIEST_YEAR..=current).contains(&year))
                .unwrap_or(false)
        }
        FieldInput::Select { options } => options.contains(&text),
        FieldInput::MultiSelect { .. } => false,
    };

    if valid {
        return None;
    }

    let message = match input {
        FieldInput::Email => "enter a valid email address".to_string(),
        FieldInput::Phone => "enter a phone number with 7 to 15 digits".to_string(),
        FieldInput::Url | FieldInput::Upload { .. } => {
            "enter a link starting with http:// or https://".to_string()
        }
        FieldInput::Number => "enter a whole number".to_string(),
        FieldInput::Year => format!("enter a year between {EARLIEST_YEAR} and this year"),
        FieldInput::Select { .. } => format!("'{text}' is not an available option"),
        _ => format!("{} is invalid", field.label),
    };
    Some(FieldIssue::new(field, message))
}

fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !text.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn is_phone(text: &str) -> bool {
    let mut digits = 0;
    for ch in text.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '+' | '-' | '(' | ')' | ' ' => {}
            _ => return false,
        }
    }
    (7..=15).contains(&digits)
}

fn is_url(text: &str) -> bool {
    let rest = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !rest.contains(char::is_whitespace)
        }
        None => false,
    }
}
