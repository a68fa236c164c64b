use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
  metrics::upstream, oauth::ClientCredentials, server::APIError, settings::OsuSettings,
};

/// A beatmap difficulty as returned by the osu! API v2.  Only the fields shown on beatmap cards are
/// kept; this is also the shape that gets cached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OsuBeatmap {
  pub id: u64,
  pub beatmapset_id: u64,
  /// Difficulty name
  pub version: String,
  pub difficulty_rating: f64,
  pub mode: String,
  pub status: String,
  /// Seconds
  pub total_length: u32,
  pub hit_length: u32,
  pub bpm: Option<f64>,
  pub cs: f64,
  pub ar: f64,
  /// Overall difficulty
  pub accuracy: f64,
  /// HP drain
  pub drain: f64,
  pub max_combo: Option<u32>,
  pub playcount: u64,
  pub passcount: u64,
  pub beatmapset: Option<OsuBeatmapset>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OsuBeatmapset {
  pub id: u64,
  pub title: String,
  pub artist: String,
  pub creator: String,
}

pub struct OsuClient {
  http: Client,
  base_url: String,
  credentials: ClientCredentials,
}

impl OsuClient {
  pub fn new(settings: &OsuSettings) -> reqwest::Result<Self> {
    let http = Client::builder()
      .timeout(Duration::from_secs(settings.request_timeout_secs))
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(OsuClient {
      http,
      base_url: settings.base_url.trim_end_matches('/').to_owned(),
      credentials: ClientCredentials::new(settings.client_id, settings.client_secret.clone()),
    })
  }

  // curl --request GET \
  //     --get "https://osu.ppy.sh/api/v2/beatmaps/75" \
  //     --header "Content-Type: application/json" \
  //     --header "Accept: application/json" --header "Authorization: Bearer <token>"
  /// Returns `None` if the osu! API doesn't know the beatmap.
  pub async fn fetch_beatmap(&self, beatmap_id: u64) -> Result<Option<OsuBeatmap>, APIError> {
    let auth_header = self
      .credentials
      .get_auth_header(&self.http, &self.base_url)
      .await
      .map_err(|err| {
        error!("Failed to get auth header: {}", err);
        upstream::osu_api_requests_failed_total("fetch_beatmap", 0).inc();
        err
      })?;

    upstream::osu_api_requests_total("fetch_beatmap").inc();
    let now = Instant::now();
    let res = self
      .http
      .get(format!("{}/api/v2/beatmaps/{beatmap_id}", self.base_url))
      .header("Content-Type", "application/json")
      .header("Accept", "application/json")
      .header("Authorization", auth_header)
      .send()
      .await
      .map_err(|err| {
        if err.is_timeout() {
          warn!("Timed out fetching beatmap {beatmap_id}");
        } else {
          error!("Failed to fetch beatmap {beatmap_id}: {}", err);
        }
        upstream::osu_api_requests_failed_total(
          "fetch_beatmap",
          err.status().map(|s| s.as_u16()).unwrap_or(0),
        )
        .inc();
        APIError::upstream("Failed to fetch beatmap")
      })?;
    let status_code = res.status();
    let res_text = res.text().await.map_err(|err| {
      error!(?status_code, "Failed to read beatmap response: {}", err);
      upstream::osu_api_requests_failed_total("fetch_beatmap", status_code.as_u16()).inc();
      APIError::upstream("Failed to read beatmap response")
    })?;

    upstream::osu_api_response_time_seconds("fetch_beatmap")
      .observe(now.elapsed().as_nanos() as u64);

    if status_code == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !status_code.is_success() {
      error!(
        ?status_code,
        "Failed to fetch beatmap; status: {status_code}; res: {res_text}"
      );
      upstream::osu_api_requests_failed_total("fetch_beatmap", status_code.as_u16()).inc();
      return Err(APIError::upstream("Failed to fetch beatmap"));
    }

    match parse_beatmap(&res_text) {
      Ok(beatmap) => Ok(Some(beatmap)),
      Err(err) => {
        error!(
          ?status_code,
          "Failed to parse beatmap response; res: {res_text}; err: {err}"
        );
        upstream::osu_api_requests_failed_total("fetch_beatmap", status_code.as_u16()).inc();
        Err(APIError::upstream("Failed to parse beatmap response"))
      },
    }
  }
}

fn parse_beatmap(res_text: &str) -> Result<OsuBeatmap, serde_path_to_error::Error<serde_json::Error>> {
  let deserializer = &mut serde_json::Deserializer::from_str(res_text);
  serde_path_to_error::deserialize(deserializer)
}
