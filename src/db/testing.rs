//! In-memory copy of the bot's schema plus helpers for seeding it in tests.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

const SCHEMA: &str = r#"
CREATE TABLE "Users" (
  "Id" INTEGER NOT NULL PRIMARY KEY,
  "UserId" INTEGER NULL,
  "Name" TEXT NOT NULL,
  "Playtime" INTEGER NOT NULL,
  "MatchesPlayed" INTEGER NOT NULL,
  "NumberOneResults" INTEGER NOT NULL,
  "Administrator" INTEGER NOT NULL DEFAULT 0,
  "AutoSkipEnabled" INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE "Maps" (
  "Id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
  "BeatmapId" INTEGER NOT NULL,
  "BeatmapSetId" INTEGER NOT NULL,
  "BeatmapName" TEXT NOT NULL,
  "BeatmapArtist" TEXT NOT NULL,
  "DifficultyName" TEXT NOT NULL,
  "StarRating" REAL NULL,
  "TimesPlayed" INTEGER NOT NULL,
  "AveragePassPercentage" REAL NULL,
  "AverageLeavePercentage" REAL NULL,
  "LastPlayed" TEXT NOT NULL
);

CREATE TABLE "Scores" (
  "Id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
  "UserId" INTEGER NOT NULL REFERENCES "Users" ("Id"),
  "gameId" INTEGER NOT NULL,
  "PlayerId" INTEGER NULL,
  "LobbyId" INTEGER NOT NULL,
  "OsuScoreId" INTEGER NULL,
  "BeatmapId" INTEGER NOT NULL,
  "TotalScore" INTEGER NOT NULL,
  "Rank" INTEGER NOT NULL,
  "MaxCombo" INTEGER NOT NULL,
  "Count300" INTEGER NOT NULL,
  "Count100" INTEGER NOT NULL,
  "Count50" INTEGER NOT NULL,
  "CountMiss" INTEGER NOT NULL,
  "Mods" INTEGER NOT NULL,
  "Time" TEXT NOT NULL
);

CREATE TABLE "Games" (
  "Id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
  "BeatmapId" INTEGER NOT NULL,
  "PlayerCount" INTEGER NOT NULL,
  "PlayerFinishCount" INTEGER NOT NULL,
  "PlayerPassedCount" INTEGER NOT NULL,
  "Time" TEXT NOT NULL
);

CREATE TABLE "PlayerBans" (
  "Id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
  "Active" INTEGER NOT NULL,
  "UserId" INTEGER NOT NULL,
  "Reason" TEXT NULL,
  "Time" TEXT NOT NULL,
  "Expire" TEXT NULL,
  "HostBan" INTEGER NOT NULL
);

CREATE TABLE "MapBans" (
  "Id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
  "BeatmapSetId" INTEGER NULL,
  "BeatmapId" INTEGER NULL
);
"#;

/// A single-connection pool over a fresh in-memory database.  Every connection to
/// `sqlite::memory:` gets its own database, so the pool must never open a second one.
pub(crate) async fn memory_pool() -> SqlitePool {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .idle_timeout(None)
    .max_lifetime(None)
    .connect("sqlite::memory:")
    .await
    .expect("failed to open in-memory database");
  sqlx::raw_sql(SCHEMA)
    .execute(&pool)
    .await
    .expect("failed to create schema");
  pool
}

pub(crate) async fn insert_user(
  pool: &SqlitePool,
  id: i64,
  name: &str,
  matches_played: i64,
  number_one_results: i64,
  playtime: i64,
) {
  sqlx::query(
    "INSERT INTO Users (Id, UserId, Name, Playtime, MatchesPlayed, NumberOneResults) VALUES (?, \
     ?, ?, ?, ?, ?)",
  )
  .bind(id)
  .bind(id + 1000)
  .bind(name)
  .bind(playtime)
  .bind(matches_played)
  .bind(number_one_results)
  .execute(pool)
  .await
  .expect("failed to insert user");
}

pub(crate) async fn insert_score(
  pool: &SqlitePool,
  user_id: i64,
  beatmap_id: i64,
  total_score: i64,
  rank: i64,
  time: &str,
) -> i64 {
  sqlx::query(
    "INSERT INTO Scores (UserId, gameId, LobbyId, BeatmapId, TotalScore, Rank, MaxCombo, \
     Count300, Count100, Count50, CountMiss, Mods, Time) VALUES (?, 1, 1, ?, ?, ?, 100, 90, 5, 1, \
     2, 72, ?)",
  )
  .bind(user_id)
  .bind(beatmap_id)
  .bind(total_score)
  .bind(rank)
  .bind(time)
  .execute(pool)
  .await
  .expect("failed to insert score")
  .last_insert_rowid()
}

pub(crate) async fn insert_map(pool: &SqlitePool, beatmap_id: i64, beatmap_set_id: i64, name: &str) {
  sqlx::query(
    "INSERT INTO Maps (BeatmapId, BeatmapSetId, BeatmapName, BeatmapArtist, DifficultyName, \
     StarRating, TimesPlayed, AveragePassPercentage, AverageLeavePercentage, LastPlayed) VALUES \
     (?, ?, ?, 'Artist', 'Insane', 5.2, 3, 66.6, NULL, '2024-03-01 20:00:00')",
  )
  .bind(beatmap_id)
  .bind(beatmap_set_id)
  .bind(name)
  .execute(pool)
  .await
  .expect("failed to insert map");
}

pub(crate) async fn insert_game(pool: &SqlitePool, beatmap_id: i64, player_count: i64, time: &str) {
  sqlx::query(
    "INSERT INTO Games (BeatmapId, PlayerCount, PlayerFinishCount, PlayerPassedCount, Time) \
     VALUES (?, ?, ?, ?, ?)",
  )
  .bind(beatmap_id)
  .bind(player_count)
  .bind(player_count)
  .bind(player_count / 2)
  .bind(time)
  .execute(pool)
  .await
  .expect("failed to insert game");
}

pub(crate) async fn insert_player_ban(
  pool: &SqlitePool,
  osu_user_id: i64,
  active: bool,
  expire: Option<&str>,
) {
  sqlx::query(
    "INSERT INTO PlayerBans (Active, UserId, Reason, Time, Expire, HostBan) VALUES (?, ?, \
     'spamming', '2024-01-01 00:00:00', ?, 0)",
  )
  .bind(active)
  .bind(osu_user_id)
  .bind(expire)
  .execute(pool)
  .await
  .expect("failed to insert player ban");
}

pub(crate) async fn insert_map_ban(
  pool: &SqlitePool,
  beatmap_set_id: Option<i64>,
  beatmap_id: Option<i64>,
) {
  sqlx::query("INSERT INTO MapBans (BeatmapSetId, BeatmapId) VALUES (?, ?)")
    .bind(beatmap_set_id)
    .bind(beatmap_id)
    .execute(pool)
    .await
    .expect("failed to insert map ban");
}
