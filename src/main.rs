mod shared;
mod trips;

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use nanoid::nanoid;
use shared::config::Config;
use shared::database::Database;
use shared::mailer::{Mailer, MailerImpl};
use shared::store::document_store::PgDocumentStore;
use trips::repository::trip_repository::{TripRepository, TripRepositoryImpl};
use trips::{create_trip, get_trip};

const ID_ALPHABET: [char; 62] = [
  '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E',
  'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
  'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
  'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x',
  'y', 'z',
];

/// Document ids: 20 alphanumeric characters.
pub fn custom_nanoid() -> String {
  nanoid!(20, &ID_ALPHABET)
}

// This struct represents state
pub struct AppState<TR: TripRepository, M: Mailer> {
  pub trip_repository: TR,
  pub mailer: M,
  pub config: Config,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

  let app_config = Config::default();
  let database = Database::new(&app_config)
    .await
    .map_err(std::io::Error::other)?;
  let database = Arc::new(database);
  let mailer = MailerImpl::new(&app_config).map_err(std::io::Error::other)?;

  let server_address = app_config.server_address.clone();
  info!("Listening on http://{}", server_address);

  HttpServer::new(move || {
    let app_state = web::Data::new(AppState {
      trip_repository: TripRepositoryImpl::new(PgDocumentStore::new(
        database.clone(),
      )),
      mailer: mailer.clone(),
      config: app_config.clone(),
    });
    App::new()
      .wrap(Logger::default())
      .configure(|cfg| config(cfg, app_state))
  })
  .bind(server_address)?
  .run()
  .await
}

// Function to initialize the App
fn config<TR: TripRepository + 'static, M: Mailer + 'static>(
  config: &mut web::ServiceConfig,
  app_state: web::Data<AppState<TR, M>>,
) {
  // Rate limit per IP address, bursts up to `rate_limit_burst` requests
  let governor_config = GovernorConfigBuilder::default()
    .requests_per_second(app_state.config.rate_limit_per_second)
    .burst_size(app_state.config.rate_limit_burst)
    .finish()
    .unwrap_or_default();

  config.app_data(app_state).service(
    web::scope("/api").service(
      web::scope("/trips")
        .wrap(Governor::new(&governor_config))
        .route("/{id}", web::get().to(get_trip::<TR, M>))
        .route("", web::post().to(create_trip::<TR, M>)),
    ),
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    http::header::HeaderValue,
    http::StatusCode,
    test::{call_service, init_service, read_body_json, TestRequest},
    App,
  };
  use helpers::tests::test_app_state;
  use shared::{
    http_error::HttpError, mailer::tests::MailerMock,
    rto::created_rto::CreatedRto,
    store::document_store::tests::InMemoryDocumentStore,
  };
  use std::{net::SocketAddr, str::FromStr};
  use trips::rto::get_trip_rto::GetTripRto;

  fn peer() -> SocketAddr {
    SocketAddr::from_str("127.0.0.1:12345").unwrap()
  }

  #[test]
  fn test_custom_nanoid() {
    let id = custom_nanoid();
    assert_eq!(id.len(), 20);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(id, custom_nanoid());
  }

  #[actix_rt::test]
  async fn test_create_and_get_trip_in_memory() {
    let app_state = test_app_state(
      TripRepositoryImpl::new(InMemoryDocumentStore::new()),
      MailerMock::new(),
    );

    // Initialize the service in-memory
    let app = init_service(
      App::new().configure(|cfg| config(cfg, app_state.clone())),
    )
    .await;

    // 1) Create trip
    let create_req = TestRequest::post()
      .uri("/api/trips")
      .peer_addr(peer())
      .append_header((
        actix_web::http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
      ))
      .set_json(serde_json::json!({
          "destination": "Paris",
          "startAt": "2024-06-01",
          "endsAt": "2024-06-10T12:00:00Z",
          "ownerName": "Ana",
          "ownerEmail": "ana@example.com",
          "guestToInvite": [
            { "name": "Bia", "email": "bia@example.com" },
            { "name": "Caio", "email": "caio@example.com" }
          ]
      }))
      .to_request();

    let create_resp = call_service(&app, create_req).await;
    assert_eq!(create_resp.status(), StatusCode::CREATED, "Create trip failed");

    let created: CreatedRto = read_body_json(create_resp).await;
    assert_eq!(created.message, "Created");

    // 2) Get trip
    let get_trip_req = TestRequest::get()
      .uri(&format!("/api/trips/{}", created.id))
      .peer_addr(peer())
      .to_request();

    let get_trip_resp = call_service(&app, get_trip_req).await;
    assert!(get_trip_resp.status().is_success(), "Get trip failed");

    let trip: GetTripRto = read_body_json(get_trip_resp).await;
    assert_eq!(trip.id, created.id);
    assert_eq!(trip.destination, "Paris");
    assert!(!trip.is_confirmed);
    assert_eq!(trip.guests.len(), 2);
    assert!(trip.guests.iter().all(|guest| !guest.is_confirmed));

    // 3) One confirmation mail, to the owner
    let messages = app_state.mailer.messages.read().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to[0].email, "ana@example.com");
  }

  #[actix_rt::test]
  async fn test_invalid_json_is_bad_request() {
    let app = init_service(App::new().configure(|cfg| {
      config(
        cfg,
        test_app_state(
          TripRepositoryImpl::new(InMemoryDocumentStore::new()),
          MailerMock::new(),
        ),
      )
    }))
    .await;

    let req = TestRequest::post()
      .uri("/api/trips")
      .peer_addr(peer())
      .append_header((
        actix_web::http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
      ))
      .set_payload("{\"destination\": \"Paris\",")
      .to_request();

    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let error: HttpError = read_body_json(resp).await;
    assert_eq!(error.message(), Some("Invalid JSON"));
  }

  #[actix_rt::test]
  async fn test_unknown_trip_is_not_found() {
    let app = init_service(App::new().configure(|cfg| {
      config(
        cfg,
        test_app_state(
          TripRepositoryImpl::new(InMemoryDocumentStore::new()),
          MailerMock::new(),
        ),
      )
    }))
    .await;

    let req = TestRequest::get()
      .uri("/api/trips/doesNotExist")
      .peer_addr(peer())
      .to_request();

    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let error: HttpError = read_body_json(resp).await;
    assert_eq!(error.message(), Some("Trip not found"));
  }
}
