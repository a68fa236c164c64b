use foundations::telemetry::metrics::{metrics, Counter, HistogramBuilder, TimeHistogram};

#[metrics]
pub mod http_server {
  /// Number of HTTP requests.
  pub fn requests_total(endpoint_name: &'static str) -> Counter;

  /// Number of successful HTTP requests.
  pub fn requests_success_total(endpoint_name: &'static str) -> Counter;

  /// Number of failed requests, by the status they were answered with.
  pub fn requests_failed_total(endpoint_name: &'static str, status_code: u16) -> Counter;
}

#[metrics]
pub mod upstream {
  /// Number of requests made to the osu! API.
  pub fn osu_api_requests_total(endpoint_name: &'static str) -> Counter;

  /// Failed osu! API requests.  `status_code` is 0 when no response was received.
  pub fn osu_api_requests_failed_total(endpoint_name: &'static str, status_code: u16) -> Counter;

  #[ctor = HistogramBuilder {
    buckets: &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
  }]
  pub fn osu_api_response_time_seconds(endpoint_name: &'static str) -> TimeHistogram;

  /// OAuth client credentials grants.
  pub fn oauth_refresh_requests_total() -> Counter;

  pub fn oauth_refresh_requests_failed_total() -> Counter;

  #[ctor = HistogramBuilder {
    buckets: &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
  }]
  pub fn oauth_refresh_response_time_seconds() -> TimeHistogram;

  /// Queries sent to the Grafana datasource API.
  pub fn grafana_requests_total() -> Counter;

  pub fn grafana_requests_failed_total() -> Counter;
}

#[metrics]
pub mod kv_cache {
  /// Lookups answered from the cache.
  pub fn hits_total(namespace: &'static str) -> Counter;

  /// Lookups that had to go to the upstream.
  pub fn misses_total(namespace: &'static str) -> Counter;

  /// Cache operations that failed and were treated as misses.
  pub fn errors_total(namespace: &'static str, operation: &'static str) -> Counter;
}
