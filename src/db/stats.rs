use sqlx::SqlitePool;

use super::users;
use crate::{
  ranking::{self, RankCount, UserRanks},
  settings::RankingStrategy,
};

/// Ranks of `user_id` across the whole user population, computed with SQLite window functions.
pub async fn user_ranks_sql(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Option<UserRanks>> {
  sqlx::query_as(
    "SELECT matches_played, number_one_results, playtime FROM (
       SELECT
         Id,
         RANK() OVER (ORDER BY MatchesPlayed DESC) AS matches_played,
         RANK() OVER (ORDER BY NumberOneResults DESC) AS number_one_results,
         RANK() OVER (ORDER BY Playtime DESC) AS playtime
       FROM Users
     ) WHERE Id = ?",
  )
  .bind(user_id)
  .fetch_optional(pool)
  .await
}

/// Same as [`user_ranks_sql`], but ranks a snapshot of the metrics in process.
pub async fn user_ranks_in_memory(
  pool: &SqlitePool,
  user_id: i64,
) -> sqlx::Result<Option<UserRanks>> {
  let snapshot = users::metric_snapshot(pool).await?;
  Ok(ranking::rank_user(&snapshot, user_id))
}

pub async fn user_ranks(
  pool: &SqlitePool,
  strategy: RankingStrategy,
  user_id: i64,
) -> sqlx::Result<Option<UserRanks>> {
  match strategy {
    RankingStrategy::Sql => user_ranks_sql(pool, user_id).await,
    RankingStrategy::InMemory => user_ranks_in_memory(pool, user_id).await,
  }
}

/// Number of the user's scores per placement rank.  Ranks the user never got are left out.
pub async fn rank_histogram(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<RankCount>> {
  sqlx::query_as(
    "SELECT Rank AS rank, COUNT(*) AS count FROM Scores WHERE UserId = ? GROUP BY Rank ORDER BY \
     Rank ASC",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await
}
