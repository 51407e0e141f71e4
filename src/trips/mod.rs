pub mod dto;
pub mod model;
pub mod notification;
pub mod repository;
pub mod rto;

use actix_web::{http::header, web, HttpResponse, Responder};
use dto::create_trip_dto::{
  parse_trip_date, take_type_errors, CreateTripDto, GuestToInviteDto,
};
use dto::get_trip_dto::GetTripDto;
use log::error;
use model::{Activity, Guest, Link, Trip};
use notification::notify_trip_created;
use repository::trip_repository::{
  CreateGuest, CreateTrip, TripRepository, TripRepositoryError,
};
use rto::get_trip_rto::{ActivityRto, GetTripRto, GuestRto, LinkRto};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::shared::{
  http_error::{field_errors, merge_type_errors, HttpError},
  mailer::Mailer,
  rto::created_rto::CreatedRto,
};
use crate::AppState;

pub async fn get_trip<TR: TripRepository + 'static, M: Mailer + 'static>(
  data: web::Data<AppState<TR, M>>,
  path: web::Path<GetTripDto>,
) -> impl Responder {
  // Perform validation
  if let Err(validation_errors) = path.validate() {
    // If validation fails, return a 400 error with details
    return HttpResponse::BadRequest().json(HttpError::from(validation_errors));
  }
  data
    .trip_repository
    .find_one(&path.id)
    .await
    .map(|trip| trip.map(trip_found).unwrap_or_else(trip_not_found))
    .unwrap_or_else(internal_server_error)
}

fn trip_found(trip: Trip) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("application/json")
    .json(GetTripRto::from(trip))
}

fn trip_not_found() -> HttpResponse {
  HttpResponse::NotFound()
    .content_type("application/json")
    .json(HttpError::from("Trip not found"))
}

/// `POST /api/trips`. The body is read raw so that malformed JSON and
/// validation failures can be told apart.
pub async fn create_trip<TR: TripRepository + 'static, M: Mailer + 'static>(
  data: web::Data<AppState<TR, M>>,
  body: web::Bytes,
) -> impl Responder {
  let mut payload: serde_json::Value = match serde_json::from_slice(&body) {
    Ok(payload) => payload,
    Err(_) => return bad_request(HttpError::from("Invalid JSON")),
  };
  let Some(fields) = payload.as_object_mut() else {
    return bad_request(HttpError::from("Expected a JSON object"));
  };
  let type_errors = take_type_errors(fields);
  let dto: CreateTripDto = match serde_json::from_value(payload) {
    Ok(dto) => dto,
    Err(error) => return bad_request(HttpError::from(error.to_string().as_str())),
  };
  let create_trip = match CreateTrip::try_from(dto) {
    Ok(create_trip) if type_errors.is_empty() => create_trip,
    Ok(_) => return bad_request(HttpError::from(type_errors)),
    Err(validation_errors) => {
      return bad_request(HttpError::from(merge_type_errors(
        field_errors(&validation_errors),
        type_errors,
      )))
    }
  };

  match data.trip_repository.create(create_trip.clone()).await {
    Ok(id) => {
      notify_trip_created(&data.mailer, &data.config, &id, &create_trip).await;
      trip_created(&id)
    }
    Err(error) => internal_server_error(error),
  }
}

fn trip_created(id: &str) -> HttpResponse {
  HttpResponse::Created()
    .content_type("application/json")
    .append_header((header::LOCATION, format!("/api/trips/{}", id)))
    .json(CreatedRto::from(id))
}

fn bad_request(error: HttpError) -> HttpResponse {
  HttpResponse::BadRequest()
    .content_type("application/json")
    .json(error)
}

fn internal_server_error(error: TripRepositoryError) -> HttpResponse {
  error!("Trip request failed: {}", error);
  HttpResponse::InternalServerError()
    .content_type("application/json")
    .json(HttpError::from("Internal Server Error"))
}

impl TryFrom<CreateTripDto> for CreateTrip {
  type Error = ValidationErrors;

  fn try_from(dto: CreateTripDto) -> Result<Self, Self::Error> {
    dto.validate()?;
    Ok(Self {
      destination: required("destination", dto.destination)?,
      starts_at: required_date("start_at", dto.start_at)?,
      ends_at: required_date("ends_at", dto.ends_at)?,
      owner_name: required("owner_name", dto.owner_name)?,
      owner_email: required("owner_email", dto.owner_email)?,
      guests: dto
        .guest_to_invite
        .unwrap_or_default()
        .into_iter()
        .map(CreateGuest::try_from)
        .collect::<Result<_, _>>()?,
    })
  }
}

impl TryFrom<GuestToInviteDto> for CreateGuest {
  type Error = ValidationErrors;

  fn try_from(dto: GuestToInviteDto) -> Result<Self, Self::Error> {
    Ok(Self {
      name: required("name", dto.name)?,
      email: required("email", dto.email)?,
    })
  }
}

// Validation already rejected missing values; these only keep the
// conversion total.
fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationErrors> {
  value.ok_or_else(|| field_error(field, "required"))
}

fn required_date(
  field: &'static str,
  value: Option<String>,
) -> Result<chrono::DateTime<chrono::Utc>, ValidationErrors> {
  parse_trip_date(&required(field, value)?).ok_or_else(|| field_error(field, "date"))
}

fn field_error(field: &'static str, code: &'static str) -> ValidationErrors {
  let mut errors = ValidationErrors::new();
  errors.add(field, ValidationError::new(code));
  errors
}

// Transform Trip domain to RTO
impl From<Trip> for GetTripRto {
  fn from(trip: Trip) -> Self {
    Self {
      id: trip.id,
      destination: trip.destination,
      starts_at: trip.starts_at,
      ends_at: trip.ends_at,
      owner_name: trip.owner_name,
      owner_email: trip.owner_email,
      is_confirmed: trip.is_confirmed,
      guests: trip.guests.into_iter().map(GuestRto::from).collect(),
      links: trip.links.into_iter().map(LinkRto::from).collect(),
      activities: trip.activities.into_iter().map(ActivityRto::from).collect(),
    }
  }
}

impl From<Guest> for GuestRto {
  fn from(guest: Guest) -> Self {
    Self {
      id: guest.id,
      name: guest.name,
      email: guest.email,
      is_confirmed: guest.is_confirmed,
    }
  }
}

impl From<Link> for LinkRto {
  fn from(link: Link) -> Self {
    Self {
      title: link.title,
      url: link.url,
    }
  }
}

impl From<Activity> for ActivityRto {
  fn from(activity: Activity) -> Self {
    Self {
      title: activity.title,
      occurs_at: activity.occurs_at,
    }
  }
}
