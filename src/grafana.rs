use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::{metrics::upstream, server::APIError, settings::GrafanaSettings};

/// Queries the Prometheus datasource behind Grafana for the bot's connection status.
pub struct GrafanaClient {
  http: Client,
  settings: GrafanaSettings,
}

/// Two series: the current `IsConnected` state and the 30-day uptime percentage.
fn connected_query(datasource_uid: &str) -> Value {
  let datasource = json!({ "type": "prometheus", "uid": datasource_uid });
  json!({
    "queries": [
      {
        "datasource": datasource,
        "editorMode": "code",
        "expr": "(IsConnected * up)",
        "instant": false,
        "range": true,
        "refId": "connected",
        "interval": "12h",
        "datasourceId": 1,
        "maxDataPoints": 1,
      },
      {
        "datasource": datasource,
        "editorMode": "code",
        "expr": "avg_over_time((sum((up AND IsConnected) OR on() vector(1)))[30d:1m]) * 100",
        "instant": false,
        "range": true,
        "refId": "A",
        "interval": "1h",
        "datasourceId": 1,
        "maxDataPoints": 12,
      },
    ],
    "from": "now-12h",
    "to": "now",
  })
}

impl GrafanaClient {
  pub fn new(settings: GrafanaSettings) -> reqwest::Result<Self> {
    let http = Client::builder()
      .timeout(Duration::from_secs(settings.request_timeout_secs))
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(GrafanaClient { http, settings })
  }

  pub async fn fetch_connected(&self) -> Result<Value, APIError> {
    upstream::grafana_requests_total().inc();

    let res = async {
      let res = self
        .http
        .post(format!("{}api/ds/query", self.settings.url))
        .header("Accept", "application/json")
        .bearer_auth(&self.settings.api_key)
        .json(&connected_query(&self.settings.datasource_uid))
        .send()
        .await?;
      res.error_for_status()?.json::<Value>().await
    };

    res.await.map_err(|err| {
      error!("Failed to query Grafana: {err}");
      upstream::grafana_requests_failed_total().inc();
      APIError::upstream("Failed to query Grafana")
    })
  }
}
