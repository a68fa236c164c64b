use std::str::FromStr;

use foundations::BootstrapResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::settings::SqlSettings;

pub mod games;
pub mod maps;
pub mod models;
pub mod scores;
pub mod stats;
#[cfg(test)]
pub(crate) mod testing;
pub mod users;

/// Opens the pool over the bot's database.  It is created once at startup and handed to every
/// request through the server state.
pub(crate) async fn open_pool(settings: &SqlSettings) -> BootstrapResult<SqlitePool> {
  let options = SqliteConnectOptions::from_str(&settings.db_url)?.read_only(settings.read_only);
  let pool = SqlitePoolOptions::new()
    .max_connections(settings.max_connections)
    .connect_with(options)
    .await?;
  Ok(pool)
}
