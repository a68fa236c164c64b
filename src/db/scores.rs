use fxhash::FxHashMap;
use serde::Serialize;
use sqlx::SqlitePool;

use super::{
  maps,
  models::{Map, Score, User, SCORE_COLUMNS},
  users,
};
use crate::mods::{grade_name, mod_names};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreOrder {
  /// Highest `TotalScore` first.
  TotalScore,
  /// Newest first.
  Time,
}

impl ScoreOrder {
  fn order_by(self) -> &'static str {
    match self {
      ScoreOrder::TotalScore => "TotalScore DESC, Id ASC",
      ScoreOrder::Time => "Time DESC, Id DESC",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWithBeatmap {
  #[serde(flatten)]
  pub score: Score,
  pub grade: &'static str,
  pub mod_names: Vec<&'static str>,
  /// `None` when the bot never recorded the map.
  pub beatmap: Option<Map>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWithUser {
  #[serde(flatten)]
  pub score: Score,
  pub grade: &'static str,
  pub mod_names: Vec<&'static str>,
  pub user: Option<User>,
}

pub async fn for_user(
  pool: &SqlitePool,
  user_id: i64,
  order: ScoreOrder,
  limit: u32,
) -> sqlx::Result<Vec<Score>> {
  sqlx::query_as(&format!(
    "SELECT {SCORE_COLUMNS} FROM Scores WHERE UserId = ? ORDER BY {} LIMIT ?",
    order.order_by()
  ))
  .bind(user_id)
  .bind(limit as i64)
  .fetch_all(pool)
  .await
}

/// The user's scores in the requested order, each joined with the map it was set on.
pub async fn for_user_with_beatmaps(
  pool: &SqlitePool,
  user_id: i64,
  order: ScoreOrder,
  limit: u32,
) -> sqlx::Result<Vec<ScoreWithBeatmap>> {
  let scores = for_user(pool, user_id, order, limit).await?;

  let beatmap_ids: Vec<i64> = scores.iter().map(|s| s.beatmap_id).collect();
  let mut maps_by_id: FxHashMap<i64, Map> = FxHashMap::default();
  for map in maps::find_by_beatmap_ids(pool, &beatmap_ids).await? {
    maps_by_id.entry(map.beatmap_id).or_insert(map);
  }

  Ok(
    scores
      .into_iter()
      .map(|score| ScoreWithBeatmap {
        grade: grade_name(score.rank),
        mod_names: mod_names(score.mods),
        beatmap: maps_by_id.get(&score.beatmap_id).cloned(),
        score,
      })
      .collect(),
  )
}

/// Highest scores set on a beatmap, each joined with the user that set it.
pub async fn top_for_beatmap_with_users(
  pool: &SqlitePool,
  beatmap_id: i64,
  limit: u32,
) -> sqlx::Result<Vec<ScoreWithUser>> {
  let scores: Vec<Score> = sqlx::query_as(&format!(
    "SELECT {SCORE_COLUMNS} FROM Scores WHERE BeatmapId = ? ORDER BY TotalScore DESC, Id ASC \
     LIMIT ?"
  ))
  .bind(beatmap_id)
  .bind(limit as i64)
  .fetch_all(pool)
  .await?;

  let user_ids: Vec<i64> = scores.iter().map(|s| s.user_id).collect();
  let users_by_id: FxHashMap<i64, User> = users::find_by_ids(pool, &user_ids)
    .await?
    .into_iter()
    .map(|u| (u.id, u))
    .collect();

  Ok(
    scores
      .into_iter()
      .map(|score| ScoreWithUser {
        grade: grade_name(score.rank),
        mod_names: mod_names(score.mods),
        user: users_by_id.get(&score.user_id).cloned(),
        score,
      })
      .collect(),
  )
}

pub async fn count_for_user(pool: &SqlitePool, user_id: i64) -> sqlx::Result<i64> {
  sqlx::query_scalar("SELECT COUNT(*) FROM Scores WHERE UserId = ?")
    .bind(user_id)
    .fetch_one(pool)
    .await
}
