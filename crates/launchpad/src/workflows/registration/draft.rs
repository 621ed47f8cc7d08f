use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::WizardDefinition;
use super::validation::{validate_step, FieldIssue};
use crate::profiles::{Attributes, EntityKind, FieldValue, ProfileId, ProfileRecord, UserId};

/// Persisted, partially-filled wizard state for one owner and entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardDraft {
    pub kind: EntityKind,
    pub owner: UserId,
    pub current_step: usize,
    pub values: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editing: Option<ProfileId>,
    pub updated_at: DateTime<Utc>,
}

/// Errors raised while driving the wizard state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("'{0}' is not a field of this wizard")]
    UnknownField(String),
    #[error("'{field}' expects {expected}")]
    ValueShape {
        field: String,
        expected: &'static str,
    },
    #[error("'{option}' is not an option of '{field}'")]
    UnknownOption { field: String, option: String },
    #[error("step '{step}' has {} incomplete field(s)", .issues.len())]
    StepIncomplete {
        step: &'static str,
        issues: Vec<FieldIssue>,
    },
    #[error("already on the final step; submit the profile instead")]
    FinalStep,
}

/// Result of a successful `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMove {
    pub from: usize,
    pub to: usize,
}

impl WizardDraft {
    pub fn new(kind: EntityKind, owner: UserId) -> Self {
        Self {
            kind,
            owner,
            current_step: 0,
            values: Attributes::new(),
            editing: None,
            updated_at: Utc::now(),
        }
    }

    /// Prefill a draft from a stored profile so the owner can edit and resubmit it.
    pub fn from_record(record: &ProfileRecord) -> Self {
        Self {
            kind: record.kind,
            owner: record.owner.clone(),
            current_step: 0,
            values: record.attributes.clone(),
            editing: Some(record.id.clone()),
            updated_at: Utc::now(),
        }
    }

    pub fn set_field(
        &mut self,
        definition: &WizardDefinition,
        key: &str,
        value: FieldValue,
    ) -> Result<(), WizardError> {
        let field = definition
            .field(key)
            .ok_or_else(|| WizardError::UnknownField(key.to_string()))?;

        let value = match (field.input.is_list(), value) {
            (true, FieldValue::List(values)) => FieldValue::List(dedupe(values)),
            (false, FieldValue::Text(value)) => FieldValue::Text(value),
            (true, FieldValue::Text(_)) => {
                return Err(WizardError::ValueShape {
                    field: key.to_string(),
                    expected: "a list of options",
                })
            }
            (false, FieldValue::List(_)) => {
                return Err(WizardError::ValueShape {
                    field: key.to_string(),
                    expected: "a single value",
                })
            }
        };

        self.values.insert(field.key.to_string(), value);
        self.touch();
        Ok(())
    }

    /// Add an option to a multi-select field, or remove it if already selected.
    pub fn toggle_option(
        &mut self,
        definition: &WizardDefinition,
        key: &str,
        option: &str,
    ) -> Result<(), WizardError> {
        let field = definition
            .field(key)
            .ok_or_else(|| WizardError::UnknownField(key.to_string()))?;
        if !field.input.is_list() {
            return Err(WizardError::ValueShape {
                field: key.to_string(),
                expected: "a single value",
            });
        }
        let known = field
            .input
            .options()
            .is_some_and(|options| options.contains(&option));
        if !known {
            return Err(WizardError::UnknownOption {
                field: key.to_string(),
                option: option.to_string(),
            });
        }

        let entry = self
            .values
            .entry(field.key.to_string())
            .or_insert_with(|| FieldValue::List(Vec::new()));
        if let FieldValue::List(selected) = entry {
            if let Some(position) = selected.iter().position(|value| value == option) {
                selected.remove(position);
            } else {
                selected.push(option.to_string());
            }
        } else {
            *entry = FieldValue::List(vec![option.to_string()]);
        }
        self.touch();
        Ok(())
    }

    /// Validate the current step and move forward when it is complete.
    pub fn advance(&mut self, definition: &WizardDefinition) -> Result<StepMove, WizardError> {
        let from = self.current_step.min(definition.last_step());
        if from >= definition.last_step() {
            return Err(WizardError::FinalStep);
        }
        let step = &definition.steps[from];
        let issues = validate_step(step, &self.values);
        if !issues.is_empty() {
            return Err(WizardError::StepIncomplete {
                step: step.key,
                issues,
            });
        }

        self.current_step = from + 1;
        self.touch();
        Ok(StepMove {
            from,
            to: self.current_step,
        })
    }

    /// Go back one step without validating; stays on the first step.
    pub fn retreat(&mut self) -> usize {
        self.current_step = self.current_step.saturating_sub(1);
        self.touch();
        self.current_step
    }

    /// Issues across every step, in step order.
    pub fn validate(&self, definition: &WizardDefinition) -> Vec<FieldIssue> {
        definition
            .steps
            .iter()
            .flat_map(|step| validate_step(step, &self.values))
            .collect()
    }

    /// Index of the first step that still has issues.
    pub fn first_incomplete_step(&self, definition: &WizardDefinition) -> Option<usize> {
        definition
            .steps
            .iter()
            .position(|step| !validate_step(step, &self.values).is_empty())
    }

    /// Values to submit: visible, known, non-blank fields only.
    pub fn prune_hidden(&self, definition: &WizardDefinition) -> Attributes {
        definition
            .fields()
            .filter(|field| field.is_visible(&self.values))
            .filter_map(|field| {
                let value = self.values.get(field.key)?;
                let value = match value {
                    FieldValue::Text(text) => FieldValue::Text(text.trim().to_string()),
                    FieldValue::List(values) => FieldValue::List(values.clone()),
                };
                if value.is_blank() && !field.input.is_list() {
                    None
                } else {
                    Some((field.key.to_string(), value))
                }
            })
            .collect()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim().to_string();
        if !value.is_empty() && !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

/// Read-model returned to the wizard UI after every interaction.
#[derive(Debug, Clone, Serialize)]
pub struct DraftProgress {
    pub kind: EntityKind,
    pub current_step: usize,
    pub total_steps: usize,
    pub step_key: &'static str,
    pub step_title: &'static str,
    pub is_final_step: bool,
    pub visible_fields: Vec<&'static str>,
    pub values: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing: Option<ProfileId>,
    pub updated_at: DateTime<Utc>,
}

impl DraftProgress {
    pub fn new(draft: &WizardDraft, definition: &'static WizardDefinition) -> Self {
        let index = draft.current_step.min(definition.last_step());
        let step = &definition.steps[index];
        Self {
            kind: draft.kind,
            current_step: index,
            total_steps: definition.steps.len(),
            step_key: step.key,
            step_title: step.title,
            is_final_step: index == definition.last_step(),
            visible_fields: step
                .visible_fields(&draft.values)
                .map(|field| field.key)
                .collect(),
            values: draft.values.clone(),
            editing: draft.editing.clone(),
            updated_at: draft.updated_at,
        }
    }
}
