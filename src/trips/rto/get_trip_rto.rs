use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct GetTripRto {
  pub id: String,
  pub destination: String,
  #[serde(rename = "startsAt")]
  pub starts_at: DateTime<Utc>,
  #[serde(rename = "endsAt")]
  pub ends_at: DateTime<Utc>,
  #[serde(rename = "ownerName")]
  pub owner_name: String,
  #[serde(rename = "ownerEmail")]
  pub owner_email: String,
  #[serde(rename = "isConfirmed")]
  pub is_confirmed: bool,
  pub guests: Vec<GuestRto>,
  pub links: Vec<LinkRto>,
  pub activities: Vec<ActivityRto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuestRto {
  pub id: String,
  pub name: String,
  pub email: String,
  #[serde(rename = "isConfirmed")]
  pub is_confirmed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkRto {
  pub title: String,
  pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityRto {
  pub title: String,
  #[serde(rename = "occursAt")]
  pub occurs_at: DateTime<Utc>,
}
