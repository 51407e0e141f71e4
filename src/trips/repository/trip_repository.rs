use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::store::document_store::{Document, DocumentStore, StoreError};
use crate::trips::model::{Guest, Trip};

pub const TRIPS_COLLECTION: &str = "trips";

pub fn guests_collection(trip_id: &str) -> String {
  format!("{}/{}/guests", TRIPS_COLLECTION, trip_id)
}

#[derive(Debug, Error)]
pub enum TripRepositoryError {
  #[error("Store error: {0}")]
  StoreError(#[from] StoreError),

  #[error("Serialization error: {0}")]
  SerializationError(#[from] serde_json::Error),
}

pub trait TripRepository {
  async fn find_one(&self, id: &str) -> Result<Option<Trip>, TripRepositoryError>;
  /// Stores the trip, then its guests one by one. Returns the trip id.
  async fn create(
    &self,
    create_trip: CreateTrip,
  ) -> Result<String, TripRepositoryError>;
}

pub struct TripRepositoryImpl<DS: DocumentStore> {
  store: DS,
}

impl<DS: DocumentStore> TripRepositoryImpl<DS> {
  pub fn new(store: DS) -> Self {
    Self { store }
  }
}

impl<DS: DocumentStore> TripRepository for TripRepositoryImpl<DS> {
  async fn find_one(&self, id: &str) -> Result<Option<Trip>, TripRepositoryError> {
    let Some(document) = self.store.get(TRIPS_COLLECTION, id).await? else {
      return Ok(None);
    };
    let trip_document: TripDocument = serde_json::from_value(document.data)?;

    let guests = self
      .store
      .list(&guests_collection(&document.id))
      .await?
      .into_iter()
      .map(Guest::try_from)
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(trip_document.into_trip(document.id, guests)))
  }

  async fn create(
    &self,
    create_trip: CreateTrip,
  ) -> Result<String, TripRepositoryError> {
    let trip_document = TripDocument {
      destination: create_trip.destination,
      starts_at: create_trip.starts_at,
      ends_at: create_trip.ends_at,
      owner_name: create_trip.owner_name,
      owner_email: create_trip.owner_email,
      confirmed: false,
    };
    let id = self
      .store
      .add(TRIPS_COLLECTION, serde_json::to_value(trip_document)?)
      .await?;

    // Not atomic: a failure here keeps the trip and the guests written so far.
    let guests_collection = guests_collection(&id);
    for guest in create_trip.guests {
      let guest_document = GuestDocument {
        email: guest.email,
        name: guest.name,
        is_confirmed: false,
      };
      self
        .store
        .add(&guests_collection, serde_json::to_value(guest_document)?)
        .await?;
    }

    Ok(id)
  }
}

/// Validated create-trip command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTrip {
  pub destination: String,
  pub starts_at: DateTime<Utc>,
  pub ends_at: DateTime<Utc>,
  pub owner_name: String,
  pub owner_email: String,
  pub guests: Vec<CreateGuest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGuest {
  pub name: String,
  pub email: String,
}

// On-disk shapes. Field names are part of the stored format.
#[derive(Debug, Serialize, Deserialize)]
struct TripDocument {
  destination: String,
  starts_at: DateTime<Utc>,
  ends_at: DateTime<Utc>,
  owner_name: String,
  owner_email: String,
  #[serde(default)]
  confirmed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct GuestDocument {
  email: String,
  name: String,
  #[serde(default)]
  is_confirmed: bool,
}

impl TripDocument {
  fn into_trip(self, id: String, guests: Vec<Guest>) -> Trip {
    Trip {
      id,
      destination: self.destination,
      starts_at: self.starts_at,
      ends_at: self.ends_at,
      owner_name: self.owner_name,
      owner_email: self.owner_email,
      is_confirmed: self.confirmed,
      guests,
      links: Vec::new(),
      activities: Vec::new(),
    }
  }
}

impl TryFrom<Document> for Guest {
  type Error = serde_json::Error;

  fn try_from(document: Document) -> Result<Self, Self::Error> {
    let guest: GuestDocument = serde_json::from_value(document.data)?;
    Ok(Self {
      id: document.id,
      email: guest.email,
      name: guest.name,
      is_confirmed: guest.is_confirmed,
    })
  }
}
