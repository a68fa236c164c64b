use std::{fmt::Display, str::FromStr, sync::Arc};

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
  Router,
};
use foundations::BootstrapResult;
use sqlx::SqlitePool;
use tower_http::{
  cors,
  trace::{DefaultMakeSpan, DefaultOnResponse},
};
use tracing::Level;

use crate::{
  cache::{KvCache, MemoryCache},
  db,
  grafana::GrafanaClient,
  metrics::http_server,
  osu_api::OsuClient,
  settings::{CacheSettings, ServerSettings},
};

mod export;
mod games;
mod leaderboard;
mod stats;
mod users;

#[derive(Debug)]
pub struct APIError {
  pub status: StatusCode,
  pub message: String,
}

impl APIError {
  pub fn not_found(message: impl Into<String>) -> Self {
    APIError {
      status: StatusCode::NOT_FOUND,
      message: message.into(),
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    APIError {
      status: StatusCode::BAD_REQUEST,
      message: message.into(),
    }
  }

  /// A dependency we call out to failed or returned something unusable.
  pub fn upstream(message: impl Into<String>) -> Self {
    APIError {
      status: StatusCode::BAD_GATEWAY,
      message: message.into(),
    }
  }

  pub fn unavailable(message: impl Into<String>) -> Self {
    APIError {
      status: StatusCode::SERVICE_UNAVAILABLE,
      message: message.into(),
    }
  }

  pub fn internal(message: impl Into<String>) -> Self {
    APIError {
      status: StatusCode::INTERNAL_SERVER_ERROR,
      message: message.into(),
    }
  }
}

impl Display for APIError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.status, self.message)
  }
}

impl IntoResponse for APIError {
  fn into_response(self) -> Response { (self.status, self.message).into_response() }
}

/// Parses a numeric path segment.  Only plain non-negative integers are accepted: no sign, no
/// whitespace, nothing that overflows `T`.
pub(crate) fn parse_plain_integer<T: FromStr>(segment: &str) -> Option<T> {
  if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  segment.parse().ok()
}

/// Logs a store failure and hides its details from the caller.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> APIError {
  move |err| {
    error!("{context}: {err}");
    APIError::internal(context)
  }
}

/// Bumps the success or failure counter of `endpoint_name` depending on `res`.
pub(crate) fn track<T>(endpoint_name: &'static str, res: Result<T, APIError>) -> Result<T, APIError> {
  match &res {
    Ok(_) => http_server::requests_success_total(endpoint_name).inc(),
    Err(err) => http_server::requests_failed_total(endpoint_name, err.status.as_u16()).inc(),
  };
  res
}

#[derive(Clone)]
pub struct AppState {
  pub pool: SqlitePool,
  pub cache: Arc<dyn KvCache>,
  pub osu: Arc<OsuClient>,
  /// `None` when no Grafana instance is configured.
  pub grafana: Option<Arc<GrafanaClient>>,
  pub settings: Arc<ServerSettings>,
}

async fn index() -> &'static str {
  http_server::requests_total("index").inc();
  http_server::requests_success_total("index").inc();
  "autohost-stats up and running successfully!"
}

pub fn build_router(state: AppState) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/trpc/user.search", get(users::search))
    .route("/trpc/user.top5Scores", get(users::top_scores))
    .route("/trpc/user.recentScores", get(users::recent_scores))
    .route("/trpc/games.getBeatmap", get(games::get_beatmap))
    .route("/trpc/stats.connected", get(stats::connected))
    .route("/leaderboard/{metric}/{page}", get(leaderboard::leaderboard_page))
    .route("/users/{name_or_id}", get(users::profile))
    .route("/beatmaps/{beatmap_id}", get(games::beatmap_page))
    .route("/games", get(games::recent_games))
    .route("/api/users", get(export::export_users))
    .with_state(state)
    .layer(
      tower_http::cors::CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_headers(cors::Any)
        .allow_methods(cors::Any),
    )
    .layer(
      tower_http::trace::TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::default().level(Level::INFO)),
    )
}

#[cfg(feature = "redis_cache")]
async fn connect_redis(redis_url: &str) -> BootstrapResult<Arc<dyn KvCache>> {
  let cache = crate::cache::RedisCache::connect(redis_url).await?;
  info!("Connected to Redis for beatmap caching");
  Ok(Arc::new(cache))
}

#[cfg(not(feature = "redis_cache"))]
async fn connect_redis(redis_url: &str) -> BootstrapResult<Arc<dyn KvCache>> {
  warn!("Ignoring Redis URL {redis_url}; built without the redis_cache feature");
  Ok(Arc::new(MemoryCache::new()))
}

async fn open_cache(settings: &CacheSettings) -> BootstrapResult<Arc<dyn KvCache>> {
  match &settings.redis_url {
    Some(redis_url) => connect_redis(redis_url).await,
    None => {
      info!("No Redis URL configured; caching beatmaps in memory");
      Ok(Arc::new(MemoryCache::new()))
    },
  }
}

pub async fn start_server(settings: &ServerSettings) -> BootstrapResult<()> {
  let pool = db::open_pool(&settings.sql).await?;
  let cache = open_cache(&settings.cache).await?;
  let osu = Arc::new(OsuClient::new(&settings.osu)?);
  let grafana = match settings.grafana.clone() {
    Some(grafana) => Some(Arc::new(GrafanaClient::new(grafana)?)),
    None => {
      warn!("Grafana is not configured; stats.connected will report it as unavailable");
      None
    },
  };

  let router = build_router(AppState {
    pool,
    cache,
    osu,
    grafana,
    settings: Arc::new(settings.clone()),
  });

  let addr = format!("0.0.0.0:{}", settings.port);
  info!("Server is listening on http://{}", addr);
  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, router).await?;
  Ok(())
}
