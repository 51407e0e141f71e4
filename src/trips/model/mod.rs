use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
  pub id: String,
  pub destination: String,
  pub starts_at: DateTime<Utc>,
  pub ends_at: DateTime<Utc>,
  pub owner_name: String,
  pub owner_email: String,
  pub is_confirmed: bool,
  pub guests: Vec<Guest>,
  pub links: Vec<Link>,
  pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
  pub id: String,
  pub email: String,
  pub name: String,
  pub is_confirmed: bool,
}

// Links and activities have no write path yet; trips are always read back
// with both lists empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
  pub title: String,
  pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
  pub title: String,
  pub occurs_at: DateTime<Utc>,
}
