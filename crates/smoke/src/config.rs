//! Fixed scenario constants and the opaque session configuration.

use bidi_runtime::SessionConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Self-contained document the scenario navigates to.
pub const TARGET_URL: &str = "data:text/html,<h1 id='target'>capture me</h1>";

/// Expression resolving the element under capture.
pub const ELEMENT_EXPRESSION: &str = "document.querySelector('#target')";

/// Where the browser writes its debug log.
pub const BROWSER_LOG_PATH: &str = "/tmp/chrome_debug.log";

/// Where the driver writes its log.
pub const DRIVER_LOG_PATH: &str = "/tmp/chromedriver.log";

/// Pause before teardown so the browser and driver can flush their logs.
pub const SETTLE_PAUSE: Duration = Duration::from_secs(2);

/// Port the driver listens on.
pub const DRIVER_PORT: u16 = 9515;

/// Base64-encoded PNG signature prefix a valid capture must start with.
pub const PNG_BASE64_PREFIX: &str = "iVBOR";

/// Binary locations picked up from the environment and passed through to
/// session construction uninterpreted.
#[derive(Debug, Clone, Default)]
pub struct SmokeConfig {
    /// Browser executable, from `SMOKE_BROWSER_BINARY`
    pub browser_binary: Option<PathBuf>,
    /// Driver executable, from `SMOKE_DRIVER_BINARY`; when absent a driver
    /// is expected to be listening on [`DRIVER_PORT`] already
    pub driver_binary: Option<PathBuf>,
}

impl SmokeConfig {
    /// Reads the binary locations from the environment.
    pub fn from_env() -> Self {
        Self {
            browser_binary: std::env::var_os("SMOKE_BROWSER_BINARY").map(PathBuf::from),
            driver_binary: std::env::var_os("SMOKE_DRIVER_BINARY").map(PathBuf::from),
        }
    }

    /// Session configuration for a smoke run: BiDi on, logging maximal.
    pub fn session_config(&self, websocket_url: String) -> SessionConfig {
        SessionConfig {
            websocket_url,
            browser_binary: self.browser_binary.clone(),
            browser_args: vec!["--headless=new".to_string()],
            verbose_logging: true,
            enable_bidi: true,
        }
    }
}
