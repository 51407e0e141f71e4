use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Human readable messages keyed by the offending field, e.g.
/// `guestToInvite[1].email`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
  Message(String),
  Fields(FieldErrors),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpError {
  pub error: ErrorBody,
}

impl HttpError {
  pub fn message(&self) -> Option<&str> {
    match &self.error {
      ErrorBody::Message(message) => Some(message),
      ErrorBody::Fields(_) => None,
    }
  }

  pub fn fields(&self) -> Option<&FieldErrors> {
    match &self.error {
      ErrorBody::Message(_) => None,
      ErrorBody::Fields(fields) => Some(fields),
    }
  }
}

impl From<&str> for HttpError {
  fn from(message: &str) -> Self {
    Self {
      error: ErrorBody::Message(String::from(message)),
    }
  }
}

impl From<ValidationErrors> for HttpError {
  fn from(errors: ValidationErrors) -> Self {
    Self::from(field_errors(&errors))
  }
}

impl From<FieldErrors> for HttpError {
  fn from(fields: FieldErrors) -> Self {
    Self {
      error: ErrorBody::Fields(fields),
    }
  }
}

pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
  let mut fields = FieldErrors::new();
  collect_field_errors(errors, "", &mut fields);
  fields
}

/// Adds type errors to validation errors. A field with the wrong JSON type
/// only reports its type, never what validation said about it or below it.
pub fn merge_type_errors(mut fields: FieldErrors, type_errors: FieldErrors) -> FieldErrors {
  for (path, messages) in type_errors {
    let nested_field = format!("{}.", path);
    let nested_entry = format!("{}[", path);
    fields.retain(|key, _| {
      key != &path && !key.starts_with(&nested_field) && !key.starts_with(&nested_entry)
    });
    fields.insert(path, messages);
  }
  fields
}

fn collect_field_errors(
  errors: &ValidationErrors,
  prefix: &str,
  fields: &mut FieldErrors,
) {
  for (field, kind) in errors.errors() {
    let path = if prefix.is_empty() {
      camel_case(field)
    } else {
      format!("{}.{}", prefix, camel_case(field))
    };
    match kind {
      ValidationErrorsKind::Field(errors) => fields
        .entry(path)
        .or_default()
        .extend(errors.iter().map(human_message)),
      ValidationErrorsKind::Struct(errors) => {
        collect_field_errors(errors, &path, fields)
      }
      ValidationErrorsKind::List(entries) => {
        for (index, errors) in entries {
          collect_field_errors(errors, &format!("{}[{}]", path, index), fields);
        }
      }
    }
  }
}

fn human_message(error: &ValidationError) -> String {
  if let Some(message) = &error.message {
    return message.to_string();
  }
  match &*error.code {
    "required" => String::from("is required"),
    "length" => String::from("must not be empty"),
    "email" => String::from("must be a valid email"),
    code => format!("is invalid ({})", code),
  }
}

// Error keys mirror the JSON payload, which is camelCase.
fn camel_case(field: &str) -> String {
  let mut result = String::with_capacity(field.len());
  let mut upper_next = false;
  for c in field.chars() {
    if c == '_' {
      upper_next = !result.is_empty();
    } else if upper_next {
      result.extend(c.to_uppercase());
      upper_next = false;
    } else {
      result.push(c);
    }
  }
  result
}
