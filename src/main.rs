#[macro_use]
extern crate tracing;

use foundations::{
  cli::Cli,
  telemetry::{self, TelemetryConfig},
  BootstrapResult,
};

use crate::settings::ServerSettings;

mod cache;
mod db;
mod grafana;
mod leaderboard;
mod metrics;
mod mods;
mod oauth;
mod osu_api;
mod ranking;
mod server;
mod settings;

#[tokio::main]
async fn main() -> BootstrapResult<()> {
  tracing_subscriber::fmt::init();

  let service_info = foundations::service_info!();
  let cli = Cli::<ServerSettings>::new(&service_info, vec![])?;

  let telemetry_driver = telemetry::init(TelemetryConfig {
    service_info: &service_info,
    settings: &cli.settings.telemetry,
    custom_server_routes: vec![],
  })?;
  tokio::spawn(async move {
    if let Err(err) = telemetry_driver.await {
      error!("Telemetry server exited: {err}");
    }
  });

  info!("Starting autohost-stats");
  server::start_server(&cli.settings).await
}
