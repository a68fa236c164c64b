use axum::{
  extract::{Path, Query, State},
  Json,
};
use serde::{Deserialize, Serialize};

use super::{db_error, track, APIError, AppState};
use crate::{
  db::{
    models::{PlayerBan, User},
    scores::{self, ScoreOrder, ScoreWithBeatmap},
    stats, users,
  },
  metrics::http_server,
  ranking::{number_one_rate, RankCount, UserRanks},
  settings::LimitSettings,
};

#[derive(Deserialize)]
pub(super) struct SearchParams {
  username: String,
}

pub(super) async fn search(
  State(state): State<AppState>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<User>>, APIError> {
  let endpoint_name = "user.search";
  http_server::requests_total(endpoint_name).inc();

  let res = users::search_by_name(&state.pool, &params.username)
    .await
    .map(Json)
    .map_err(db_error("Failed to search users"));
  track(endpoint_name, res)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScoreListParams {
  user_id: i64,
  limit: Option<u32>,
}

fn resolve_limit(limit: Option<u32>, limits: &LimitSettings) -> Result<u32, APIError> {
  match limit {
    None => Ok(limits.default_score_limit),
    Some(0) => Err(APIError::bad_request("limit must be at least 1")),
    Some(limit) => Ok(limit.min(limits.max_score_limit)),
  }
}

async fn list_scores(
  state: &AppState,
  params: ScoreListParams,
  order: ScoreOrder,
) -> Result<Vec<ScoreWithBeatmap>, APIError> {
  let limit = resolve_limit(params.limit, &state.settings.limits)?;

  let user = users::find_by_id(&state.pool, params.user_id)
    .await
    .map_err(db_error("Failed to look up user"))?;
  if user.is_none() {
    return Err(APIError::not_found("User not found"));
  }

  scores::for_user_with_beatmaps(&state.pool, params.user_id, order, limit)
    .await
    .map_err(db_error("Failed to load scores"))
}

pub(super) async fn top_scores(
  State(state): State<AppState>,
  Query(params): Query<ScoreListParams>,
) -> Result<Json<Vec<ScoreWithBeatmap>>, APIError> {
  let endpoint_name = "user.top5Scores";
  http_server::requests_total(endpoint_name).inc();

  let res = list_scores(&state, params, ScoreOrder::TotalScore).await.map(Json);
  track(endpoint_name, res)
}

pub(super) async fn recent_scores(
  State(state): State<AppState>,
  Query(params): Query<ScoreListParams>,
) -> Result<Json<Vec<ScoreWithBeatmap>>, APIError> {
  let endpoint_name = "user.recentScores";
  http_server::requests_total(endpoint_name).inc();

  let res = list_scores(&state, params, ScoreOrder::Time).await.map(Json);
  track(endpoint_name, res)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserProfile {
  user: User,
  /// `None` renders as "unranked".
  ranks: Option<UserRanks>,
  rank_histogram: Vec<RankCount>,
  total_scores: i64,
  number_one_rate: Option<f64>,
  playtime_hours: f64,
  active_ban: Option<PlayerBan>,
}

async fn load_profile(state: &AppState, key: &str) -> Result<UserProfile, APIError> {
  let pool = &state.pool;
  let Some(user) = users::find_by_name_or_id(pool, key)
    .await
    .map_err(db_error("Failed to look up user"))?
  else {
    return Err(APIError::not_found("User not found"));
  };

  let ranks = stats::user_ranks(pool, state.settings.ranking.strategy, user.id)
    .await
    .map_err(db_error("Failed to rank user"))?;
  let rank_histogram = stats::rank_histogram(pool, user.id)
    .await
    .map_err(db_error("Failed to load rank histogram"))?;
  let total_scores = scores::count_for_user(pool, user.id)
    .await
    .map_err(db_error("Failed to count scores"))?;
  let active_ban = match user.user_id {
    Some(osu_user_id) => users::active_ban(pool, osu_user_id)
      .await
      .map_err(db_error("Failed to look up bans"))?,
    None => None,
  };

  Ok(UserProfile {
    ranks,
    rank_histogram,
    total_scores,
    number_one_rate: number_one_rate(&user),
    playtime_hours: user.playtime as f64 / 3600.,
    active_ban,
    user,
  })
}

pub(super) async fn profile(
  State(state): State<AppState>,
  Path(name_or_id): Path<String>,
) -> Result<Json<UserProfile>, APIError> {
  let endpoint_name = "user_profile";
  http_server::requests_total(endpoint_name).inc();

  let res = load_profile(&state, &name_or_id).await.map(Json);
  track(endpoint_name, res)
}
