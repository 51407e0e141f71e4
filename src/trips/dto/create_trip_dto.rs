use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};
use validator_derive::Validate;

use crate::shared::http_error::FieldErrors;

const STRING_FIELDS: [&str; 5] =
  ["destination", "startAt", "endsAt", "ownerName", "ownerEmail"];
const GUEST_STRING_FIELDS: [&str; 2] = ["name", "email"];

/// Raw create-trip payload. Every field is optional at the serde level so
/// that a missing field is reported by validation next to the others
/// instead of aborting deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTripDto {
  #[validate(
    required(message = "destination is required"),
    length(min = 1, message = "destination must not be empty")
  )]
  pub destination: Option<String>,

  #[serde(rename = "startAt")]
  #[validate(
    required(message = "start date is required"),
    custom(function = "validate_trip_date", message = "start date must be a date or a date-time")
  )]
  pub start_at: Option<String>,

  #[serde(rename = "endsAt")]
  #[validate(
    required(message = "end date is required"),
    custom(function = "validate_trip_date", message = "end date must be a date or a date-time")
  )]
  pub ends_at: Option<String>,

  #[serde(rename = "ownerName")]
  #[validate(
    required(message = "owner name is required"),
    length(min = 1, message = "owner name must not be empty")
  )]
  pub owner_name: Option<String>,

  #[serde(rename = "ownerEmail")]
  #[validate(
    required(message = "owner email is required"),
    email(message = "owner email must be a valid email")
  )]
  pub owner_email: Option<String>,

  #[serde(rename = "guestToInvite")]
  #[validate(nested)]
  pub guest_to_invite: Option<Vec<GuestToInviteDto>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuestToInviteDto {
  #[validate(
    required(message = "guest name is required"),
    length(min = 1, message = "guest name must not be empty")
  )]
  pub name: Option<String>,

  #[validate(
    required(message = "guest email is required"),
    email(message = "guest email must be a valid email")
  )]
  pub email: Option<String>,
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a `YYYY-MM-DDTHH:MM:SS[.fff]Z`
/// date-time. Offsets other than `Z`, padding-free dates and surrounding
/// whitespace are rejected.
pub fn parse_trip_date(value: &str) -> Option<DateTime<Utc>> {
  if !is_date_shape(value.get(..10)?) {
    return None;
  }
  if value.len() == 10 {
    return NaiveDate::parse_from_str(value, "%Y-%m-%d")
      .ok()
      .and_then(|date| date.and_hms_opt(0, 0, 0))
      .map(|date_time| date_time.and_utc());
  }
  if value.as_bytes()[10] != b'T' || !value.ends_with('Z') {
    return None;
  }
  DateTime::parse_from_rfc3339(value)
    .ok()
    .map(|date_time| date_time.with_timezone(&Utc))
}

fn is_date_shape(value: &str) -> bool {
  value.len() == 10
    && value.bytes().enumerate().all(|(index, byte)| match index {
      4 | 7 => byte == b'-',
      _ => byte.is_ascii_digit(),
    })
}

/// Checks the JSON type of every known field. Values of the wrong type are
/// reported under their wire name and removed, so the rest of the payload
/// still deserializes and validates.
pub fn take_type_errors(payload: &mut Map<String, Value>) -> FieldErrors {
  let mut errors = FieldErrors::new();
  take_string_type_errors(payload, &STRING_FIELDS, "", &mut errors);

  match payload.get_mut("guestToInvite") {
    None | Some(Value::Null) => {}
    Some(Value::Array(entries)) => {
      for (index, entry) in entries.iter_mut().enumerate() {
        let path = format!("guestToInvite[{}]", index);
        match entry {
          Value::Object(guest) => take_string_type_errors(
            guest,
            &GUEST_STRING_FIELDS,
            &format!("{}.", path),
            &mut errors,
          ),
          _ => {
            errors.insert(path, vec![String::from("must be an object")]);
            *entry = Value::Object(Map::new());
          }
        }
      }
    }
    Some(_) => {
      errors.insert(
        String::from("guestToInvite"),
        vec![String::from("must be a list")],
      );
      payload.remove("guestToInvite");
    }
  }
  errors
}

fn take_string_type_errors(
  object: &mut Map<String, Value>,
  fields: &[&str],
  prefix: &str,
  errors: &mut FieldErrors,
) {
  for field in fields {
    let wrong_type = object
      .get(*field)
      .is_some_and(|value| !value.is_string() && !value.is_null());
    if wrong_type {
      errors.insert(
        format!("{}{}", prefix, field),
        vec![String::from("must be a string")],
      );
      object.remove(*field);
    }
  }
}

fn validate_trip_date(value: &str) -> Result<(), ValidationError> {
  match parse_trip_date(value) {
    Some(_) => Ok(()),
    None => Err(ValidationError::new("date")),
  }
}
