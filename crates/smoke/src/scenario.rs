//! The orchestrator: one linear scenario with guaranteed teardown.

use crate::error::Result;
use crate::session::{ContextLike, SessionLike};
use crate::{capture, config, diagnostics, locator};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Everything the scenario touches, so tests can redirect the file paths and
/// drop the settle pause.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub url: String,
    pub expression: String,
    pub browser_log: PathBuf,
    pub driver_log: PathBuf,
    pub settle_pause: Duration,
}

impl Scenario {
    /// The fixed scenario the binary runs.
    pub fn fixed() -> Self {
        Self {
            url: config::TARGET_URL.to_string(),
            expression: config::ELEMENT_EXPRESSION.to_string(),
            browser_log: PathBuf::from(config::BROWSER_LOG_PATH),
            driver_log: PathBuf::from(config::DRIVER_LOG_PATH),
            settle_pause: config::SETTLE_PAUSE,
        }
    }
}

/// Runs the capture scenario against an acquired session.
///
/// Teardown (session termination plus external-log printing) happens exactly
/// once on every exit path. A primary failure from the steps always wins over
/// a termination failure; the latter only becomes the scenario's error when
/// the steps themselves succeeded.
pub async fn run<S: SessionLike>(scenario: &Scenario, session: S) -> Result<()> {
    let outcome = drive(scenario, &session).await;

    let ended = session.end().await;
    diagnostics::print_external_logs(&scenario.browser_log, &scenario.driver_log);

    match (outcome, ended) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(end_err)) => Err(end_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(end_err)) => {
            warn!(
                target = "smoke",
                error = %end_err,
                "session termination also failed during teardown"
            );
            Err(err)
        }
    }
}

async fn drive<S: SessionLike>(scenario: &Scenario, session: &S) -> Result<()> {
    info!(target = "smoke", url = %scenario.url, "starting capture scenario");

    let context = session.new_tab().await?;
    context.navigate(&scenario.url).await?;

    let element = locator::resolve_element(&context, &scenario.expression).await?;
    capture::capture_and_verify(session, &context, &element).await?;

    // Give the browser and driver a moment to flush their log files before
    // teardown reads them.
    tokio::time::sleep(scenario.settle_pause).await;
    Ok(())
}
