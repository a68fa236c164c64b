use sqlx::SqlitePool;

use super::models::Game;

/// Most recent games that had at least one player.
pub async fn recent(pool: &SqlitePool, limit: u32) -> sqlx::Result<Vec<Game>> {
  sqlx::query_as(
    "SELECT Id, BeatmapId, PlayerCount, PlayerFinishCount, PlayerPassedCount, Time FROM Games \
     WHERE PlayerCount > 0 ORDER BY Time DESC, Id DESC LIMIT ?",
  )
  .bind(limit as i64)
  .fetch_all(pool)
  .await
}
