use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{metrics::upstream, server::APIError};

#[derive(Clone, Deserialize)]
struct OAuthToken {
  token_type: String,
  access_token: String,
  expires_in: u32,
}

impl OAuthToken {
  fn build_auth_header(&self) -> String { format!("{} {}", self.token_type, self.access_token) }
}

struct TokenCache {
  token: Option<OAuthToken>,
  expiration: Option<Instant>,
}

impl TokenCache {
  fn new() -> Self {
    TokenCache {
      token: None,
      expiration: None,
    }
  }

  fn is_valid(&self) -> bool {
    match self.expiration {
      // Add in 30 seconds of leeway to account for possible delay
      Some(expiration) => expiration > Instant::now() + Duration::from_secs(30),
      None => false,
    }
  }

  fn auth_header(&self) -> Option<String> {
    if !self.is_valid() {
      return None;
    }
    self.token.as_ref().map(OAuthToken::build_auth_header)
  }

  fn store(&mut self, token: OAuthToken) {
    self.expiration = Some(Instant::now() + Duration::from_secs(token.expires_in as u64));
    self.token = Some(token);
  }
}

/// Client credentials grant for the osu! API.  The token is shared by every request and refreshed
/// shortly before it expires.
pub struct ClientCredentials {
  client_id: u32,
  client_secret: String,
  token_cache: RwLock<TokenCache>,
}

impl ClientCredentials {
  pub fn new(client_id: u32, client_secret: String) -> Self {
    ClientCredentials {
      client_id,
      client_secret,
      token_cache: RwLock::new(TokenCache::new()),
    }
  }

  // curl --request POST \
  //     "https://osu.ppy.sh/oauth/token" \
  //     --header "Accept: application/json" \
  //     --header "Content-Type: application/x-www-form-urlencoded" \
  //     --data "client_id=id&client_secret=secret&grant_type=client_credentials&scope=public"
  async fn fetch_access_token(&self, http: &Client, base_url: &str) -> Result<OAuthToken, APIError> {
    let form = [
      ("client_id", self.client_id.to_string()),
      ("client_secret", self.client_secret.clone()),
      ("grant_type", "client_credentials".to_string()),
      ("scope", "public".to_string()),
    ];
    let res = http
      .post(format!("{base_url}/oauth/token"))
      .header("Accept", "application/json")
      .form(&form)
      .send()
      .await
      .map_err(|err| {
        error!("Failed to fetch access token: {err}");
        APIError::upstream("Failed to fetch access token")
      })?;

    let status_code = res.status();
    if !status_code.is_success() {
      error!(?status_code, "Failed to fetch access token");
      return Err(APIError::upstream("Failed to fetch access token"));
    }

    res.json().await.map_err(|err| {
      error!("Failed to read access token res: {err}");
      APIError::upstream("Failed to read access token response")
    })
  }

  pub async fn get_auth_header(&self, http: &Client, base_url: &str) -> Result<String, APIError> {
    if let Some(header) = self.token_cache.read().await.auth_header() {
      return Ok(header);
    }

    let mut token_cache = self.token_cache.write().await;
    // another request may have refreshed the token while we waited for the lock
    if let Some(header) = token_cache.auth_header() {
      return Ok(header);
    }

    info!("Fetching new OAuth token");
    let now = Instant::now();
    upstream::oauth_refresh_requests_total().inc();
    upstream::osu_api_requests_total("fetch_token").inc();

    match self.fetch_access_token(http, base_url).await {
      Ok(oauth_token) => {
        info!("Successfully fetched new OAuth token");
        upstream::oauth_refresh_response_time_seconds().observe(now.elapsed().as_nanos() as u64);
        let header = oauth_token.build_auth_header();
        token_cache.store(oauth_token);
        Ok(header)
      },
      Err(err) => {
        upstream::oauth_refresh_requests_failed_total().inc();
        Err(err)
      },
    }
  }
}
