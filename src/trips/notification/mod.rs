use chrono::{DateTime, Locale, Utc};
use log::{info, warn};

use crate::shared::config::Config;
use crate::shared::mailer::{MailAddress, MailMessage, Mailer};
use crate::trips::repository::trip_repository::CreateTrip;

pub fn format_trip_date(date: &DateTime<Utc>) -> String {
  date
    .date_naive()
    .format_localized("%d de %B de %Y", Locale::pt_BR)
    .to_string()
}

pub fn confirmation_link(config: &Config, trip_id: &str) -> String {
  format!("{}/trips/{}/confirm", config.app_url, trip_id)
}

pub fn compose_trip_created_mail(
  config: &Config,
  trip_id: &str,
  create_trip: &CreateTrip,
) -> MailMessage {
  let starts_at = format_trip_date(&create_trip.starts_at);
  let ends_at = format_trip_date(&create_trip.ends_at);
  let link = confirmation_link(config, trip_id);

  let html = format!(
    r#"<div style="font-family: sans-serif; font-size: 16px; line-height: 1.6;">
  <p>Você solicitou a criação de uma viagem para <strong>{destination}</strong> nas datas de <strong>{starts_at}</strong> até <strong>{ends_at}</strong>.</p>
  <p></p>
  <p>Para confirmar sua viagem, clique no link abaixo:</p>
  <p></p>
  <p><a href="{link}">Confirmar viagem</a></p>
  <p></p>
  <p>Caso você não saiba do que se trata esse e-mail, apenas ignore esse e-mail.</p>
</div>"#,
    destination = create_trip.destination,
  );

  MailMessage {
    from: MailAddress {
      name: config.mail_sender_name.clone(),
      email: config.mail_sender_address.clone(),
    },
    to: vec![MailAddress {
      name: create_trip.owner_name.clone(),
      email: create_trip.owner_email.clone(),
    }],
    subject: format!(
      "Confirme sua viagem para {} em {}",
      create_trip.destination, starts_at
    ),
    html,
  }
}

/// Sends the owner confirmation mail. Failures are logged and swallowed, the
/// trip is already stored at this point.
pub async fn notify_trip_created<M: Mailer>(
  mailer: &M,
  config: &Config,
  trip_id: &str,
  create_trip: &CreateTrip,
) {
  let message = compose_trip_created_mail(config, trip_id, create_trip);
  match mailer.send(message).await {
    Ok(receipt) => match receipt.preview_url {
      Some(preview_url) => {
        info!("Confirmation mail for trip {} sent: {}", trip_id, preview_url)
      }
      None => info!("Confirmation mail for trip {} sent", trip_id),
    },
    Err(error) => {
      warn!("Confirmation mail for trip {} failed: {}", trip_id, error)
    }
  }
}
