use std::sync::Arc;

use log::info;
use sqlx::{PgPool, Pool, Postgres};

use crate::shared::config::Config;

const CREATE_DOCUMENTS_TABLE: &str = r#"
  CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (collection, id)
  )
"#;

pub struct Database {
  pub pool: Arc<Pool<Postgres>>,
}

impl Database {
  pub async fn new(config: &Config) -> Result<Self, sqlx::Error> {
    let pool = prepare_pool(&config.database_url).await?;
    Ok(Self { pool: Arc::new(pool) })
  }
}

pub async fn prepare_pool(database_url: &str) -> Result<Pool<Postgres>, sqlx::Error> {
  let pool = PgPool::connect(database_url).await?;
  sqlx::query(CREATE_DOCUMENTS_TABLE).execute(&pool).await?;
  info!("Document store ready");
  Ok(pool)
}
