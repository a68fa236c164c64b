use std::time::Duration;

use axum::{
  extract::{Path, Query, State},
  Json,
};
use serde::{Deserialize, Serialize};

use super::{db_error, parse_plain_integer, track, APIError, AppState};
use crate::{
  cache::get_or_populate,
  db::{
    games, maps,
    models::{Game, Map},
    scores::{self, ScoreWithUser},
  },
  metrics::http_server,
  osu_api::OsuBeatmap,
};

const BEATMAP_TOP_SCORES: u32 = 10;

#[derive(Deserialize)]
pub(super) struct BeatmapParams {
  id: u64,
}

pub(super) async fn get_beatmap(
  State(state): State<AppState>,
  Query(params): Query<BeatmapParams>,
) -> Result<Json<OsuBeatmap>, APIError> {
  let endpoint_name = "games.getBeatmap";
  http_server::requests_total(endpoint_name).inc();

  let ttl = Duration::from_secs(state.settings.cache.beatmap_ttl_secs);
  let beatmap = get_or_populate(&*state.cache, "beatmap", params.id, ttl, || {
    state.osu.fetch_beatmap(params.id)
  })
  .await;

  let res = match beatmap {
    Ok(Some(beatmap)) => Ok(Json(beatmap)),
    Ok(None) => Err(APIError::not_found("Beatmap not found")),
    Err(err) => {
      warn!("Couldn't fetch beatmap {}; reporting it as not found: {err}", params.id);
      Err(APIError::not_found("Beatmap not found"))
    },
  };
  track(endpoint_name, res)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BeatmapPage {
  map: Map,
  /// Whether the bot refuses to pick the map.
  banned: bool,
  top_scores: Vec<ScoreWithUser>,
}

async fn load_beatmap_page(state: &AppState, segment: &str) -> Result<BeatmapPage, APIError> {
  let Some(beatmap_id) = parse_plain_integer::<i64>(segment) else {
    return Err(APIError::not_found("Beatmap not found"));
  };

  let Some(map) = maps::find_by_beatmap_id(&state.pool, beatmap_id)
    .await
    .map_err(db_error("Failed to look up beatmap"))?
  else {
    return Err(APIError::not_found("Beatmap not found"));
  };
  let banned = maps::is_banned(&state.pool, map.beatmap_id, map.beatmap_set_id)
    .await
    .map_err(db_error("Failed to look up map bans"))?;
  let top_scores =
    scores::top_for_beatmap_with_users(&state.pool, beatmap_id, BEATMAP_TOP_SCORES)
      .await
      .map_err(db_error("Failed to load beatmap scores"))?;

  Ok(BeatmapPage {
    map,
    banned,
    top_scores,
  })
}

pub(super) async fn beatmap_page(
  State(state): State<AppState>,
  Path(beatmap_id): Path<String>,
) -> Result<Json<BeatmapPage>, APIError> {
  let endpoint_name = "beatmap_page";
  http_server::requests_total(endpoint_name).inc();

  let res = load_beatmap_page(&state, &beatmap_id).await.map(Json);
  track(endpoint_name, res)
}

#[derive(Deserialize)]
pub(super) struct RecentGamesParams {
  limit: Option<u32>,
}

pub(super) async fn recent_games(
  State(state): State<AppState>,
  Query(params): Query<RecentGamesParams>,
) -> Result<Json<Vec<Game>>, APIError> {
  let endpoint_name = "recent_games";
  http_server::requests_total(endpoint_name).inc();

  let max = state.settings.limits.games_limit;
  let res = match params.limit {
    Some(0) => Err(APIError::bad_request("limit must be at least 1")),
    limit => games::recent(&state.pool, limit.map_or(max, |limit| limit.min(max)))
      .await
      .map(Json)
      .map_err(db_error("Failed to load games")),
  };
  track(endpoint_name, res)
}

#[cfg(test)]
mod tests {
  use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
  };
  use serde_json::json;

  use super::*;
  use crate::{
    db::testing::*,
    server::testing::{test_state, test_state_with_osu},
  };

  fn beatmap(id: u64) -> OsuBeatmap {
    OsuBeatmap {
      id,
      beatmapset_id: 1,
      version: "Insane".to_owned(),
      difficulty_rating: 5.2,
      mode: "osu".to_owned(),
      status: "ranked".to_owned(),
      total_length: 142,
      hit_length: 109,
      bpm: Some(180.),
      cs: 4.,
      ar: 9.,
      accuracy: 8.,
      drain: 6.,
      max_combo: Some(800),
      playcount: 10,
      passcount: 5,
      beatmapset: None,
    }
  }

  #[tokio::test]
  async fn cached_beatmaps_skip_the_upstream() {
    let state = test_state().await;
    state
      .cache
      .set_ex(
        "beatmap:75",
        serde_json::to_string(&beatmap(75)).unwrap(),
        Duration::from_secs(60),
      )
      .await
      .unwrap();

    let Json(res) = get_beatmap(State(state), Query(BeatmapParams { id: 75 }))
      .await
      .unwrap();
    assert_eq!(res, beatmap(75));
  }

  #[tokio::test]
  async fn unknown_beatmap_with_unreachable_upstream_is_not_found() {
    let state = test_state().await;
    let err = get_beatmap(State(state.clone()), Query(BeatmapParams { id: 76 }))
      .await
      .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(state.cache.get("beatmap:76").await.unwrap(), None);
  }

  /// Serves a token endpoint plus `beatmaps` as `/api/v2/beatmaps/{id}` on a local port and returns
  /// its base URL.
  async fn serve_osu_api(beatmaps: Router) -> String {
    let app = Router::new()
      .route(
        "/oauth/token",
        post(|| async {
          Json(json!({ "token_type": "Bearer", "expires_in": 86400, "access_token": "token" }))
        }),
      )
      .nest("/api/v2/beatmaps", beatmaps);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{addr}")
  }

  #[tokio::test]
  async fn upstream_not_found_is_not_found_and_not_cached() {
    let beatmaps = Router::new().route(
      "/{id}",
      get(|| async { StatusCode::NOT_FOUND }),
    );
    let state = test_state_with_osu(&serve_osu_api(beatmaps).await).await;

    let err = get_beatmap(State(state.clone()), Query(BeatmapParams { id: 77 }))
      .await
      .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(state.cache.get("beatmap:77").await.unwrap(), None);
  }

  #[tokio::test]
  async fn upstream_timeout_is_not_found_and_not_cached() {
    let beatmaps = Router::new().route(
      "/{id}",
      get(|Path(id): Path<u64>| async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Json(beatmap(id))
      }),
    );
    let state = test_state_with_osu(&serve_osu_api(beatmaps).await).await;

    let err = get_beatmap(State(state.clone()), Query(BeatmapParams { id: 78 }))
      .await
      .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(state.cache.get("beatmap:78").await.unwrap(), None);
  }

  #[tokio::test]
  async fn fetched_beatmaps_are_cached() {
    let beatmaps = Router::new().route(
      "/{id}",
      get(|Path(id): Path<u64>| async move { Json(beatmap(id)) }),
    );
    let state = test_state_with_osu(&serve_osu_api(beatmaps).await).await;

    let Json(res) = get_beatmap(State(state.clone()), Query(BeatmapParams { id: 79 }))
      .await
      .unwrap();
    assert_eq!(res, beatmap(79));
    assert!(state.cache.get("beatmap:79").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn invalid_beatmap_ids_are_rejected_before_the_store() {
    let state = test_state().await;
    state.pool.close().await;
    let err = beatmap_page(State(state), Path("not-a-map".to_owned()))
      .await
      .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn beatmap_page_lists_top_scores() {
    let state = test_state().await;
    insert_map(&state.pool, 75, 1, "DISCO PRINCE").await;
    insert_map_ban(&state.pool, Some(1), None).await;
    insert_user(&state.pool, 1, "alice", 1, 1, 60).await;
    insert_user(&state.pool, 2, "bob", 1, 0, 60).await;
    insert_score(&state.pool, 1, 75, 500, 5, "2024-01-01 00:00:00").await;
    insert_score(&state.pool, 2, 75, 900, 6, "2024-01-01 00:00:00").await;

    let Json(page) = beatmap_page(State(state.clone()), Path("75".to_owned()))
      .await
      .unwrap();
    assert_eq!(page.map.beatmap_name, "DISCO PRINCE");
    assert!(page.banned);
    let names: Vec<&str> = page
      .top_scores
      .iter()
      .map(|s| s.user.as_ref().unwrap().name.as_str())
      .collect();
    assert_eq!(names, vec!["bob", "alice"]);
    assert_eq!(page.top_scores[0].grade, "S");

    let err = beatmap_page(State(state), Path("76".to_owned()))
      .await
      .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn recent_games_are_capped() {
    let state = test_state().await;
    insert_game(&state.pool, 1, 4, "2024-03-01 10:00:00").await;
    insert_game(&state.pool, 2, 4, "2024-03-01 11:00:00").await;

    let Json(games) = recent_games(State(state.clone()), Query(RecentGamesParams { limit: None }))
      .await
      .unwrap();
    assert_eq!(games.len(), 2);

    let Json(games) =
      recent_games(State(state.clone()), Query(RecentGamesParams { limit: Some(1) }))
        .await
        .unwrap();
    assert_eq!(games[0].beatmap_id, 2);

    let err = recent_games(State(state), Query(RecentGamesParams { limit: Some(0) }))
      .await
      .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
  }
}
