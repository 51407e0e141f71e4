use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRto {
  pub message: String,
  pub id: String,
}

impl From<&str> for CreatedRto {
  fn from(id: &str) -> Self {
    Self {
      message: String::from("Created"),
      id: String::from(id),
    }
  }
}
