use foundations::{
  settings::{settings, Settings},
  telemetry::settings::TelemetrySettings,
};
use serde::{Deserialize, Serialize};
use serde_default_utils::*;

fn default_osu_base_url() -> String { "https://osu.ppy.sh".to_owned() }

#[settings]
pub struct SqlSettings {
  /// SQLite URL of the database written by the lobby bot, e.g. `sqlite://autohost.db`.
  pub db_url: String,
  /// Open the database read-only.  Nothing in this service writes to it.
  #[serde(default = "default_bool::<true>")]
  pub read_only: bool,
  #[serde(default = "default_u32::<8>")]
  pub max_connections: u32,
}

#[settings]
pub struct OsuSettings {
  /// Osu! OAuth client ID
  pub client_id: u32,
  /// Osu! OAuth client secret
  pub client_secret: String,
  /// Base URL for both the OAuth token endpoint and the v2 API.
  #[serde(default = "default_osu_base_url")]
  pub base_url: String,
  /// Timeout applied to every request made to the osu! API.
  #[serde(default = "default_u64::<10>")]
  pub request_timeout_secs: u64,
}

#[settings]
pub struct CacheSettings {
  /// Redis URL.  When unset, beatmaps are cached in process memory.
  pub redis_url: Option<String>,
  /// How long fetched beatmaps stay cached.
  #[serde(default = "default_u64::<3600>")]
  pub beatmap_ttl_secs: u64,
}

#[settings]
pub struct GrafanaSettings {
  /// Grafana base URL, including the trailing slash.
  pub url: String,
  pub api_key: String,
  /// UID of the Prometheus datasource holding the bot's `IsConnected` metric.
  pub datasource_uid: String,
  #[serde(default = "default_u64::<10>")]
  pub request_timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
  /// Let SQLite compute ranks with `RANK() OVER (...)`.
  #[default]
  Sql,
  /// Load the metric snapshot and rank it in process.
  InMemory,
}

impl Settings for RankingStrategy {}

#[settings]
pub struct RankingSettings {
  pub strategy: RankingStrategy,
}

#[settings]
pub struct LimitSettings {
  #[serde(default = "default_u32::<50>")]
  pub leaderboard_page_size: u32,
  /// Limit used by the score listings when the caller doesn't pass one.
  #[serde(default = "default_u32::<5>")]
  pub default_score_limit: u32,
  /// Upper bound applied to caller-supplied score listing limits.
  #[serde(default = "default_u32::<100>")]
  pub max_score_limit: u32,
  #[serde(default = "default_u32::<50>")]
  pub games_limit: u32,
}

#[settings]
pub struct ServerSettings {
  /// Telemetry settings.
  pub telemetry: TelemetrySettings,

  /// Port that the HTTP server will listen on.
  #[serde(default = "default_u16::<4510>")]
  pub port: u16,
  pub sql: SqlSettings,
  pub osu: OsuSettings,
  pub cache: CacheSettings,
  /// Used by `stats.connected`.  The procedure reports the upstream as unavailable when unset.
  pub grafana: Option<GrafanaSettings>,
  pub ranking: RankingSettings,
  pub limits: LimitSettings,
}
