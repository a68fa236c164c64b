//! Rows of the tables maintained by the lobby bot.  Table and column names are the bot's.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::prelude::FromRow;

pub(crate) const USER_COLUMNS: &str =
  "Id, UserId, Name, Playtime, MatchesPlayed, NumberOneResults, Administrator, AutoSkipEnabled";

pub(crate) const SCORE_COLUMNS: &str = "Id, UserId, gameId, PlayerId, LobbyId, OsuScoreId, \
                                        BeatmapId, TotalScore, Rank, MaxCombo, Count300, \
                                        Count100, Count50, CountMiss, Mods, Time";

pub(crate) const MAP_COLUMNS: &str = "Id, BeatmapId, BeatmapSetId, BeatmapName, BeatmapArtist, \
                                      DifficultyName, StarRating, TimesPlayed, \
                                      AveragePassPercentage, AverageLeavePercentage, LastPlayed";

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  #[sqlx(rename = "Id")]
  pub id: i64,
  /// osu! user id.  Missing for players the bot never resolved.
  #[sqlx(rename = "UserId")]
  pub user_id: Option<i64>,
  #[sqlx(rename = "Name")]
  pub name: String,
  /// Seconds spent in matches.
  #[sqlx(rename = "Playtime")]
  pub playtime: i64,
  #[sqlx(rename = "MatchesPlayed")]
  pub matches_played: i64,
  #[sqlx(rename = "NumberOneResults")]
  pub number_one_results: i64,
  #[sqlx(rename = "Administrator")]
  pub administrator: bool,
  #[sqlx(rename = "AutoSkipEnabled")]
  pub auto_skip_enabled: bool,
}

/// The columns of a user that take part in ranking.
#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct UserMetrics {
  #[sqlx(rename = "Id")]
  pub id: i64,
  #[sqlx(rename = "MatchesPlayed")]
  pub matches_played: i64,
  #[sqlx(rename = "NumberOneResults")]
  pub number_one_results: i64,
  #[sqlx(rename = "Playtime")]
  pub playtime: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Score {
  #[sqlx(rename = "Id")]
  pub id: i64,
  /// References `Users.Id`.
  #[sqlx(rename = "UserId")]
  pub user_id: i64,
  #[sqlx(rename = "gameId")]
  pub game_id: i64,
  #[sqlx(rename = "PlayerId")]
  pub player_id: Option<i64>,
  #[sqlx(rename = "LobbyId")]
  pub lobby_id: i64,
  #[sqlx(rename = "OsuScoreId")]
  pub osu_score_id: Option<i64>,
  /// References `Maps.BeatmapId`.
  #[sqlx(rename = "BeatmapId")]
  pub beatmap_id: i64,
  #[sqlx(rename = "TotalScore")]
  pub total_score: i64,
  /// Grade, 1 (F) through 7 (SS).
  #[sqlx(rename = "Rank")]
  pub rank: i64,
  #[sqlx(rename = "MaxCombo")]
  pub max_combo: i64,
  #[sqlx(rename = "Count300")]
  pub count300: i64,
  #[sqlx(rename = "Count100")]
  pub count100: i64,
  #[sqlx(rename = "Count50")]
  pub count50: i64,
  #[sqlx(rename = "CountMiss")]
  pub count_miss: i64,
  /// Legacy mods bitmask.
  #[sqlx(rename = "Mods")]
  pub mods: i64,
  #[sqlx(rename = "Time")]
  pub time: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Map {
  #[sqlx(rename = "Id")]
  pub id: i64,
  #[sqlx(rename = "BeatmapId")]
  pub beatmap_id: i64,
  #[sqlx(rename = "BeatmapSetId")]
  pub beatmap_set_id: i64,
  #[sqlx(rename = "BeatmapName")]
  pub beatmap_name: String,
  #[sqlx(rename = "BeatmapArtist")]
  pub beatmap_artist: String,
  #[sqlx(rename = "DifficultyName")]
  pub difficulty_name: String,
  #[sqlx(rename = "StarRating")]
  pub star_rating: Option<f64>,
  #[sqlx(rename = "TimesPlayed")]
  pub times_played: i64,
  #[sqlx(rename = "AveragePassPercentage")]
  pub average_pass_percentage: Option<f64>,
  #[sqlx(rename = "AverageLeavePercentage")]
  pub average_leave_percentage: Option<f64>,
  #[sqlx(rename = "LastPlayed")]
  pub last_played: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Game {
  #[sqlx(rename = "Id")]
  pub id: i64,
  #[sqlx(rename = "BeatmapId")]
  pub beatmap_id: i64,
  #[sqlx(rename = "PlayerCount")]
  pub player_count: i64,
  #[sqlx(rename = "PlayerFinishCount")]
  pub player_finish_count: i64,
  #[sqlx(rename = "PlayerPassedCount")]
  pub player_passed_count: i64,
  #[sqlx(rename = "Time")]
  pub time: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBan {
  #[sqlx(rename = "Id")]
  pub id: i64,
  #[sqlx(rename = "Active")]
  pub active: bool,
  /// References `Users.UserId` (the osu! id), not `Users.Id`.
  #[sqlx(rename = "UserId")]
  pub user_id: i64,
  #[sqlx(rename = "Reason")]
  pub reason: Option<String>,
  #[sqlx(rename = "Time")]
  pub time: NaiveDateTime,
  #[sqlx(rename = "Expire")]
  pub expire: Option<NaiveDateTime>,
  #[sqlx(rename = "HostBan")]
  pub host_ban: bool,
}
