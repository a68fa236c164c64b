use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::models::{PlayerBan, User, UserMetrics, USER_COLUMNS};
use crate::leaderboard::{LeaderboardMetric, PageRequest};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
  sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM Users WHERE Id = ?"))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_osu_id(pool: &SqlitePool, osu_user_id: i64) -> sqlx::Result<Option<User>> {
  sqlx::query_as(&format!(
    "SELECT {USER_COLUMNS} FROM Users WHERE UserId = ? ORDER BY Id ASC LIMIT 1"
  ))
  .bind(osu_user_id)
  .fetch_optional(pool)
  .await
}

/// Every user whose name is exactly `name`.  Names are not guaranteed to be unique.
pub async fn search_by_name(pool: &SqlitePool, name: &str) -> sqlx::Result<Vec<User>> {
  sqlx::query_as(&format!(
    "SELECT {USER_COLUMNS} FROM Users WHERE Name = ? ORDER BY Id ASC"
  ))
  .bind(name)
  .fetch_all(pool)
  .await
}

/// Resolves the key of a profile URL.  Numeric keys are tried as an osu! id and then as an
/// internal id; any key is finally tried as an exact name, so players with numeric names still
/// resolve.
pub async fn find_by_name_or_id(pool: &SqlitePool, key: &str) -> sqlx::Result<Option<User>> {
  if let Ok(id) = key.parse::<i64>() {
    if let Some(user) = find_by_osu_id(pool, id).await? {
      return Ok(Some(user));
    }
    if let Some(user) = find_by_id(pool, id).await? {
      return Ok(Some(user));
    }
  }

  Ok(search_by_name(pool, key).await?.into_iter().next())
}

pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> sqlx::Result<Vec<User>> {
  if ids.is_empty() {
    return Ok(Vec::new());
  }

  let mut qb: QueryBuilder<'_, Sqlite> =
    QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM Users WHERE Id IN ("));
  let mut separated = qb.separated(", ");
  for id in ids {
    separated.push_bind(*id);
  }
  separated.push_unseparated(")");
  qb.build_query_as().fetch_all(pool).await
}

/// One page of users ordered by `metric`, highest first.  Ties fall back to `Id` so that a given
/// page always holds the same users.
pub async fn leaderboard_page(
  pool: &SqlitePool,
  metric: LeaderboardMetric,
  page: PageRequest,
) -> sqlx::Result<Vec<User>> {
  let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
  sqlx::query_as(&format!(
    "SELECT {USER_COLUMNS} FROM Users ORDER BY {} DESC, Id ASC LIMIT ? OFFSET ?",
    metric.column()
  ))
  .bind(page.page_size as i64)
  .bind(offset)
  .fetch_all(pool)
  .await
}

pub async fn metric_snapshot(pool: &SqlitePool) -> sqlx::Result<Vec<UserMetrics>> {
  sqlx::query_as("SELECT Id, MatchesPlayed, NumberOneResults, Playtime FROM Users")
    .fetch_all(pool)
    .await
}

pub async fn all(pool: &SqlitePool) -> sqlx::Result<Vec<User>> {
  sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM Users ORDER BY Id ASC"))
    .fetch_all(pool)
    .await
}

/// The most recent active ban of the player with the given osu! id.
pub async fn active_ban(pool: &SqlitePool, osu_user_id: i64) -> sqlx::Result<Option<PlayerBan>> {
  sqlx::query_as(
    "SELECT Id, Active, UserId, Reason, Time, Expire, HostBan FROM PlayerBans WHERE UserId = ? \
     AND Active = 1 AND (Expire IS NULL OR Expire > datetime('now')) ORDER BY Time DESC LIMIT 1",
  )
  .bind(osu_user_id)
  .fetch_optional(pool)
  .await
}
