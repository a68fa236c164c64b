use axum::{
  extract::{Path, State},
  Json,
};
use serde::Serialize;

use super::{db_error, parse_plain_integer, track, APIError, AppState};
use crate::{
  db::users,
  leaderboard::{
    build_entries, LeaderboardEntry, LeaderboardMetric, PageLinks, PageRequest,
  },
  metrics::http_server,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LeaderboardPage {
  metric: LeaderboardMetric,
  page: u32,
  page_size: u32,
  links: PageLinks,
  entries: Vec<LeaderboardEntry>,
}

async fn load_page(
  state: &AppState,
  metric: &str,
  page: &str,
) -> Result<LeaderboardPage, APIError> {
  let (Some(metric), Some(page)) = (
    LeaderboardMetric::from_path(metric),
    parse_plain_integer::<u32>(page),
  ) else {
    return Err(APIError::not_found("Leaderboard page not found"));
  };

  let request = PageRequest::new(page, state.settings.limits.leaderboard_page_size);
  let users = users::leaderboard_page(&state.pool, metric, request)
    .await
    .map_err(db_error("Failed to load leaderboard"))?;

  Ok(LeaderboardPage {
    metric,
    page,
    page_size: request.page_size,
    links: PageLinks::for_page(page),
    entries: build_entries(request, users),
  })
}

pub(super) async fn leaderboard_page(
  State(state): State<AppState>,
  Path((metric, page)): Path<(String, String)>,
) -> Result<Json<LeaderboardPage>, APIError> {
  let endpoint_name = "leaderboard";
  http_server::requests_total(endpoint_name).inc();

  let res = load_page(&state, &metric, &page).await.map(Json);
  track(endpoint_name, res)
}
