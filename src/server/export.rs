use axum::{extract::State, Json};
use serde::Serialize;

use super::{db_error, track, APIError, AppState};
use crate::{db::models::User, db::users, metrics::http_server};

/// Record pushed to the external user search index.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ExportedUser {
  #[serde(rename = "objectID")]
  object_id: i64,
  name: String,
  user_id: Option<i64>,
  matches_played: i64,
  playtime: i64,
  number_one_results: i64,
}

impl From<User> for ExportedUser {
  fn from(user: User) -> Self {
    ExportedUser {
      object_id: user.id,
      name: user.name,
      user_id: user.user_id,
      matches_played: user.matches_played,
      playtime: user.playtime,
      number_one_results: user.number_one_results,
    }
  }
}

pub(super) async fn export_users(
  State(state): State<AppState>,
) -> Result<Json<Vec<ExportedUser>>, APIError> {
  let endpoint_name = "export_users";
  http_server::requests_total(endpoint_name).inc();

  let res = users::all(&state.pool)
    .await
    .map(|users| Json(users.into_iter().map(ExportedUser::from).collect()))
    .map_err(db_error("Failed to export users"));
  track(endpoint_name, res)
}
