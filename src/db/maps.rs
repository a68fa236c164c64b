use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::models::{Map, MAP_COLUMNS};

/// `BeatmapId` isn't unique in `Maps`; the oldest row wins.
pub async fn find_by_beatmap_id(pool: &SqlitePool, beatmap_id: i64) -> sqlx::Result<Option<Map>> {
  sqlx::query_as(&format!(
    "SELECT {MAP_COLUMNS} FROM Maps WHERE BeatmapId = ? ORDER BY Id ASC LIMIT 1"
  ))
  .bind(beatmap_id)
  .fetch_optional(pool)
  .await
}

/// Every map row for the given beatmap ids, oldest first.
pub async fn find_by_beatmap_ids(pool: &SqlitePool, beatmap_ids: &[i64]) -> sqlx::Result<Vec<Map>> {
  if beatmap_ids.is_empty() {
    return Ok(Vec::new());
  }

  let mut qb: QueryBuilder<'_, Sqlite> =
    QueryBuilder::new(format!("SELECT {MAP_COLUMNS} FROM Maps WHERE BeatmapId IN ("));
  let mut separated = qb.separated(", ");
  for beatmap_id in beatmap_ids {
    separated.push_bind(*beatmap_id);
  }
  separated.push_unseparated(") ORDER BY Id ASC");
  qb.build_query_as().fetch_all(pool).await
}

/// Whether the bot refuses to pick this beatmap, either directly or through its set.
pub async fn is_banned(
  pool: &SqlitePool,
  beatmap_id: i64,
  beatmap_set_id: i64,
) -> sqlx::Result<bool> {
  sqlx::query_scalar(
    "SELECT EXISTS(SELECT 1 FROM MapBans WHERE BeatmapId = ? OR BeatmapSetId = ?)",
  )
  .bind(beatmap_id)
  .bind(beatmap_set_id)
  .fetch_one(pool)
  .await
}
