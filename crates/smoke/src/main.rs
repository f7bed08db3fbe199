use std::path::Path;

use bidi_runtime::{BidiSession, DriverServer};
use bidi_smoke::config::{self, SmokeConfig};
use bidi_smoke::error::{Result, SmokeError};
use bidi_smoke::logging;
use bidi_smoke::scenario::{self, Scenario};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    logging::init();
    let config = SmokeConfig::from_env();

    let driver = match &config.driver_binary {
        Some(binary) => {
            match DriverServer::launch(
                binary,
                config::DRIVER_PORT,
                Path::new(config::DRIVER_LOG_PATH),
                true,
            )
            .await
            {
                Ok(server) => Some(server),
                Err(err) => {
                    error!(target = "smoke", error = %err, "driver launch failed");
                    std::process::exit(1);
                }
            }
        }
        None => {
            info!(
                target = "smoke",
                port = config::DRIVER_PORT,
                "no driver binary configured; expecting one already listening"
            );
            None
        }
    };

    let outcome = run(&config).await;

    if let Some(server) = driver {
        if let Err(err) = server.shutdown().await {
            warn!(target = "smoke", error = %err, "driver shutdown failed");
        }
    }

    match outcome {
        Ok(()) => info!(target = "smoke", "capture scenario passed"),
        Err(err) => {
            error!(target = "smoke", error = %err, "capture scenario failed");
            std::process::exit(1);
        }
    }
}

async fn run(config: &SmokeConfig) -> Result<()> {
    let session_config =
        config.session_config(format!("ws://127.0.0.1:{}/session", config::DRIVER_PORT));
    let session = BidiSession::connect(&session_config)
        .await
        .map_err(SmokeError::Session)?;

    scenario::run(&Scenario::fixed(), session).await
}
